use std::fmt::{Display, Formatter};

/// A `(year, month, day)` triple produced by a [`Calendar`](super::Calendar).
///
/// Years are signed: negative is BC, positive is AD, and there is no year 0.
/// `(0, 0, 0)` is the null date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct CalendarDate {
    year: i32,
    month: u32,
    day: u32,
}

impl CalendarDate {
    pub const NULL: Self = Self {
        year: 0,
        month: 0,
        day: 0,
    };

    /// Only the calendar builds dates, so every instance has been validated.
    pub(super) const fn from_parts(year: i32, month: u32, day: u32) -> Self {
        Self { year, month, day }
    }

    pub const fn year(&self) -> i32 {
        self.year
    }

    pub const fn month(&self) -> u32 {
        self.month
    }

    pub const fn day(&self) -> u32 {
        self.day
    }

    pub const fn is_null(&self) -> bool {
        self.year == 0 && self.month == 0 && self.day == 0
    }

    /// Renders the date the way Paradox cells show it: `D-M-Y`, unpadded.
    pub fn to_dmy(&self) -> String {
        format!("{}-{}-{}", self.day, self.month, self.year)
    }
}

/// `YYYY/MM/DD`, or an empty string for the null date.
impl Display for CalendarDate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.is_null() {
            return Ok(());
        }
        if self.year < 0 {
            write!(f, "-{:04}/{:02}/{:02}", -self.year, self.month, self.day)
        } else {
            write!(f, "{:04}/{:02}/{:02}", self.year, self.month, self.day)
        }
    }
}
