//! Proleptic calendar arithmetic over ordinal day numbers.
//!
//! A [`Calendar`] converts between an [`OrdinalDate`] (days since 1970-01-01)
//! and a [`CalendarDate`] triple using integer arithmetic only. Dates before
//! the configured [`CalendarReform`] follow the Julian leap rule, dates after it
//! the Gregorian one, and the days dropped at the reform do not exist.
//!
//! ```text
//! 1582-10-04 (Julian) ──┐
//!                       │  adjacent ordinals, 10 missing days
//! 1582-10-15 (Gregorian)┘
//! ```
//!
//! BC years are negative and there is no year 0. All operations are pure and
//! return new values.

mod date;
mod ordinal;

pub use date::CalendarDate;
pub use ordinal::OrdinalDate;

use thiserror::Error;

/// Errors raised by calendar conversions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalendarError {
    /// The triple is not a date on this calendar and could not be normalized.
    #[error("Invalid date: {year}/{month}/{day}")]
    InvalidDate { year: i32, month: i32, day: i32 },

    /// The ordinal lies outside 999,999 BC .. 999,999 AD.
    #[error("Invalid ordinal date: {0}")]
    InvalidOrdinal(i32),
}

/// A convenience `Result` alias for calendar operations.
pub type CalendarResult<T> = std::result::Result<T, CalendarError>;

const MIN_YEAR: i32 = -999_999;
const MAX_YEAR: i32 = 999_999;

// Chosen so that 1970-01-01 comes out as ordinal 0.
const AD_EPOCH_ADJUSTMENT: i32 = -719_530;
const BC_EPOCH_ADJUSTMENT: i32 = AD_EPOCH_ADJUSTMENT + 366;

const DAYS_PER_MONTH: [u32; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];
const DAYS_BEFORE_MONTH: [u32; 12] = [0, 31, 59, 90, 120, 151, 181, 212, 243, 273, 304, 334];
const LEAP_DAYS_BEFORE_MONTH: [u32; 12] = [0, 31, 60, 91, 121, 152, 182, 213, 244, 274, 305, 335];

const MONTH_OF_DAY: [u8; 365] = month_of_day_table::<365>(false);
const LEAP_MONTH_OF_DAY: [u8; 366] = month_of_day_table::<366>(true);

/// Builds the "day of year → month" lookup, indexed by day of year minus one.
const fn month_of_day_table<const N: usize>(leap: bool) -> [u8; N] {
    let mut table = [0u8; N];
    let mut ddd = 0;
    let mut month = 0;
    while month < 12 {
        let mut last = DAYS_PER_MONTH[month];
        if leap && month == 1 {
            last += 1;
        }
        let mut day = 0;
        while day < last {
            table[ddd] = (month + 1) as u8;
            ddd += 1;
            day += 1;
        }
        month += 1;
    }
    table
}

/// `multiplicand * multiplier / divisor`, rounded toward negative infinity,
/// with a 64-bit intermediate. `divisor` must be positive.
fn floored_mul_div(multiplicand: i32, multiplier: i32, divisor: i32) -> i32 {
    (multiplicand as i64 * multiplier as i64).div_euclid(divisor as i64) as i32
}

/// The switch from the Julian to the Gregorian calendar.
///
/// The last Julian day and the first Gregorian day share a year and month,
/// and are adjacent ordinals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarReform {
    year: i32,
    month: i32,
    last_julian_day: i32,
    first_gregorian_day: i32,
}

impl CalendarReform {
    /// Thursday 1582-10-04 (Julian) was followed by Friday 1582-10-15.
    pub const PAPAL: Self = Self {
        year: 1582,
        month: 10,
        last_julian_day: 4,
        first_gregorian_day: 15,
    };

    /// Britain and its colonies: 1752-09-02 was followed by 1752-09-14.
    pub const BRITISH: Self = Self {
        year: 1752,
        month: 9,
        last_julian_day: 2,
        first_gregorian_day: 14,
    };

    /// A reform whose first Gregorian day is `year-month-day`.
    ///
    /// The number of dropped days is the drift the Julian calendar had
    /// accumulated by then. The whole gap must fall inside one month, and
    /// centurial years are rejected because their February is ambiguous.
    pub fn adopted(year: i32, month: i32, day: i32) -> CalendarResult<Self> {
        let invalid = CalendarError::InvalidDate { year, month, day };
        if year < Self::PAPAL.year || year > MAX_YEAR || year % 100 == 0 || !(1..=12).contains(&month) {
            return Err(invalid);
        }
        let drift = year / 100 - year / 400 - 2;
        let last_julian_day = day - drift - 1;
        if last_julian_day < 1 || day > DAYS_PER_MONTH[(month - 1) as usize] as i32 {
            return Err(invalid);
        }
        Ok(Self {
            year,
            month,
            last_julian_day,
            first_gregorian_day: day,
        })
    }

    /// `(year, month, day)` of the last Julian date.
    pub fn last_julian(&self) -> (i32, i32, i32) {
        (self.year, self.month, self.last_julian_day)
    }

    /// `(year, month, day)` of the first Gregorian date.
    pub fn first_gregorian(&self) -> (i32, i32, i32) {
        (self.year, self.month, self.first_gregorian_day)
    }

    /// Days dropped from the calendar at the reform.
    pub fn missing_days(&self) -> i32 {
        self.first_gregorian_day - self.last_julian_day - 1
    }
}

impl Default for CalendarReform {
    fn default() -> Self {
        Self::PAPAL
    }
}

/// Age between two dates, as reported by [`Calendar::age`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Age {
    pub years: u32,
    pub months: u32,
    pub days: u32,
}

/// The year after `year`, skipping the nonexistent year 0.
fn next_year(year: i32) -> i32 {
    if year == -1 { 1 } else { year + 1 }
}

/// The year before `year`, skipping the nonexistent year 0.
fn previous_year(year: i32) -> i32 {
    if year == 1 { -1 } else { year - 1 }
}

/// Date arithmetic for one [`CalendarReform`].
///
/// Construction precomputes the anchor ordinals used to estimate the year of
/// an ordinal; everything else is computed on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Calendar {
    reform: CalendarReform,
    leap100_year: i32,
    leap400_year: i32,
    missing_days: i32,
    min_ordinal: i32,
    max_ordinal: i32,
    jan01_0004bc: i32,
    jan01_0001: i32,
    jan01_0004: i32,
    first_gregorian_ordinal: i32,
    first_gregorian_dec31: i32,
    jan01_leap100: i32,
    jan01_leap400: i32,
}

impl Default for Calendar {
    fn default() -> Self {
        Self::new(CalendarReform::PAPAL)
    }
}

impl Calendar {
    pub fn new(reform: CalendarReform) -> Self {
        let first_year = reform.year;
        let mut calendar = Self {
            reform,
            // The mod 100 and mod 400 rules take effect at the first
            // century (resp. quad-century) year after the reform.
            leap100_year: (first_year + 99) / 100 * 100,
            leap400_year: (first_year + 399) / 400 * 400,
            missing_days: reform.missing_days(),
            min_ordinal: 0,
            max_ordinal: 0,
            jan01_0004bc: 0,
            jan01_0001: 0,
            jan01_0004: 0,
            first_gregorian_ordinal: 0,
            first_gregorian_dec31: 0,
            jan01_leap100: 0,
            jan01_leap400: 0,
        };

        // raw_ordinal only depends on the rule fields set above.
        calendar.min_ordinal = calendar.raw_ordinal(MIN_YEAR, 1, 1);
        calendar.max_ordinal = calendar.raw_ordinal(MAX_YEAR, 12, 31);
        calendar.jan01_0004bc = calendar.raw_ordinal(-4, 1, 1);
        calendar.jan01_0001 = calendar.raw_ordinal(1, 1, 1);
        calendar.jan01_0004 = calendar.raw_ordinal(4, 1, 1);
        calendar.first_gregorian_ordinal =
            calendar.raw_ordinal(reform.year, reform.month, reform.first_gregorian_day);
        calendar.first_gregorian_dec31 = calendar.raw_ordinal(reform.year, 12, 31);
        calendar.jan01_leap100 = calendar.raw_ordinal(calendar.leap100_year, 1, 1);
        calendar.jan01_leap400 = calendar.raw_ordinal(calendar.leap400_year, 1, 1);
        calendar
    }

    /// The papal (1582) calendar.
    pub fn gregorian() -> Self {
        Self::new(CalendarReform::PAPAL)
    }

    /// The British (1752) calendar.
    pub fn british() -> Self {
        Self::new(CalendarReform::BRITISH)
    }

    pub fn reform(&self) -> CalendarReform {
        self.reform
    }

    /// First year in which the mod 100 rule applies (1600 papal, 1800 British).
    pub fn leap100_year(&self) -> i32 {
        self.leap100_year
    }

    /// First year in which the mod 400 rule applies (1600 papal, 2000 British).
    pub fn leap400_year(&self) -> i32 {
        self.leap400_year
    }

    pub fn min_ordinal(&self) -> OrdinalDate {
        OrdinalDate::new(self.min_ordinal)
    }

    pub fn max_ordinal(&self) -> OrdinalDate {
        OrdinalDate::new(self.max_ordinal)
    }

    /// Leap year test honoring the Julian rule before the reform and the
    /// mod 100 / mod 400 exceptions after it.
    pub fn is_leap_year(&self, year: i32) -> bool {
        if year < self.leap100_year {
            return year % 4 == 0;
        }
        if year % 4 != 0 {
            return false;
        }
        if year % 100 != 0 {
            return true;
        }
        year >= self.leap400_year && year % 400 == 0
    }

    /// Days in `month` (1..=12).
    pub fn days_in_month(month: u32, leap: bool) -> u32 {
        if month == 2 && leap {
            29
        } else {
            DAYS_PER_MONTH[(month - 1) as usize]
        }
    }

    /// Days in the year before the first of `month` (1..=12).
    pub fn days_before_month(month: u32, leap: bool) -> u32 {
        if leap {
            LEAP_DAYS_BEFORE_MONTH[(month - 1) as usize]
        } else {
            DAYS_BEFORE_MONTH[(month - 1) as usize]
        }
    }

    /// Ordinal of January 1 of `year`.
    pub fn jan01_of_year(&self, year: i32) -> OrdinalDate {
        OrdinalDate::new(self.raw_jan01(year))
    }

    fn raw_jan01(&self, year: i32) -> i32 {
        if year < 0 {
            return year * 365 + year / 4 + BC_EPOCH_ADJUSTMENT;
        }

        let mut leaps_in_prior_years = (year + 3) / 4;
        let missing_day_adjust = if year > self.reform.year { self.missing_days } else { 0 };
        if year > self.leap100_year {
            leaps_in_prior_years -= (year - self.leap100_year + 99) / 100;
        }
        if year > self.leap400_year {
            leaps_in_prior_years += (year - self.leap400_year + 399) / 400;
        }

        year * 365 + leaps_in_prior_years - missing_day_adjust + AD_EPOCH_ADJUSTMENT
    }

    /// Validation check for a triple. `(0, 0, 0)` is the valid null date.
    pub fn is_valid(&self, year: i32, month: i32, day: i32) -> bool {
        if year == 0 {
            return month == 0 && day == 0;
        }
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) || !(1..=12).contains(&month) || !(1..=31).contains(&day) {
            return false;
        }
        let reform = &self.reform;
        let in_gap = year == reform.year
            && month == reform.month
            && reform.last_julian_day < day
            && day < reform.first_gregorian_day;
        !in_gap && day as u32 <= Self::days_in_month(month as u32, self.is_leap_year(year))
    }

    /// Builds a date, rejecting invalid triples.
    pub fn date(&self, year: i32, month: i32, day: i32) -> CalendarResult<CalendarDate> {
        if !self.is_valid(year, month, day) {
            return Err(CalendarError::InvalidDate { year, month, day });
        }
        Ok(CalendarDate::from_parts(year, month as u32, day as u32))
    }

    /// Ordinal of a validated triple.
    pub fn ordinal(&self, year: i32, month: i32, day: i32) -> CalendarResult<OrdinalDate> {
        self.date(year, month, day).map(|date| self.to_ordinal(date))
    }

    /// Converts a date to its ordinal. The null date maps to [`OrdinalDate::NULL`].
    pub fn to_ordinal(&self, date: CalendarDate) -> OrdinalDate {
        OrdinalDate::new(self.raw_ordinal(date.year(), date.month() as i32, date.day() as i32))
    }

    /// Ordinal arithmetic without validation. Callers pass a valid triple.
    fn raw_ordinal(&self, year: i32, month: i32, day: i32) -> i32 {
        if year == 0 && month == 0 && day == 0 {
            return OrdinalDate::NULL.days();
        }

        // raw_jan01 already accounts for the gap in later years; only the
        // reform year itself needs adjusting here.
        let reform = &self.reform;
        let missing_day_adjust = if year == reform.year
            && ((month == reform.month && day > reform.last_julian_day) || month > reform.month)
        {
            self.missing_days
        } else {
            0
        };

        self.raw_jan01(year) + Self::days_before_month(month as u32, self.is_leap_year(year)) as i32
            - missing_day_adjust
            + day
            - 1
    }

    /// Converts an ordinal to its `(year, month, day)` triple.
    pub fn to_date(&self, ordinal: OrdinalDate) -> CalendarResult<CalendarDate> {
        if ordinal.is_null() {
            return Ok(CalendarDate::NULL);
        }
        let ordinal = ordinal.days();

        let mut year = if ordinal > self.max_ordinal {
            return Err(CalendarError::InvalidOrdinal(ordinal));
        } else if ordinal >= self.first_gregorian_ordinal {
            // 365 + 1/4 - 1/100 + 1/400 days per year. Estimating from the
            // mod 400 anchor also covers the years before the mod 100 rule.
            self.leap400_year + floored_mul_div(ordinal - self.jan01_leap400, 10_000, 3_652_425)
        } else if ordinal >= self.jan01_0001 {
            4 + floored_mul_div(ordinal - self.jan01_0004, 100, 36_525)
        } else if ordinal >= self.min_ordinal {
            -4 + floored_mul_div(ordinal - self.jan01_0004bc, 100, 36_525)
        } else {
            return Err(CalendarError::InvalidOrdinal(ordinal));
        };

        // The estimate is off by at most one year. Compare against the real
        // January 1 boundaries, since the reform year is short.
        if year == 0 {
            year = if ordinal >= self.jan01_0001 { 1 } else { -1 };
        }
        if ordinal < self.raw_jan01(year) {
            year = previous_year(year);
        } else if ordinal >= self.raw_jan01(next_year(year)) {
            year = next_year(year);
        }
        let leap = self.is_leap_year(year);
        let mut ddd = ordinal - self.raw_jan01(year) + 1;

        if ordinal >= self.first_gregorian_ordinal && ordinal <= self.first_gregorian_dec31 {
            ddd += self.missing_days;
        }

        let index = (ddd - 1) as usize;
        let month = if leap { LEAP_MONTH_OF_DAY[index] } else { MONTH_OF_DAY[index] } as u32;
        let day = ddd as u32 - Self::days_before_month(month, leap);

        Ok(CalendarDate::from_parts(year, month, day))
    }

    /// Folds an out-of-range month or day into the adjacent valid date.
    ///
    /// Month overflow adjusts the year first; day overflow is then resolved
    /// by stepping `day - 1` ordinal days from the first of the month.
    /// `(1954, 9, 31)` becomes 1954-10-01 and `(1954, 13, 1)` becomes 1955-01-01.
    pub fn normalize(&self, year: i32, month: i32, day: i32) -> CalendarResult<CalendarDate> {
        if self.is_valid(year, month, day) {
            return self.date(year, month, day);
        }
        let invalid = CalendarError::InvalidDate { year, month, day };

        let mut folded_year = year as i64;
        let mut folded_month = month as i64;
        if folded_month > 12 {
            folded_year += (folded_month - 1) / 12;
            folded_month = (folded_month - 1) % 12 + 1;
        } else if folded_month <= 0 {
            folded_year -= -folded_month / 12 + 1;
            folded_month = 12 - (-folded_month % 12);
        }
        let (Ok(year), Ok(month)) = (i32::try_from(folded_year), i32::try_from(folded_month)) else {
            return Err(invalid);
        };
        if self.is_valid(year, month, day) {
            return self.date(year, month, day);
        }

        if !self.is_valid(year, month, 1) {
            return Err(invalid);
        }
        let shifted = (day as i64 - 1)
            .checked_add(self.raw_ordinal(year, month, 1) as i64)
            .and_then(|ordinal| i32::try_from(ordinal).ok())
            .ok_or(invalid)?;
        self.to_date(OrdinalDate::new(shifted))
    }

    /// Day number within the year, January 1 = 1. Zero for the null date.
    pub fn day_of_year(&self, ordinal: OrdinalDate) -> CalendarResult<u32> {
        if ordinal.is_null() {
            return Ok(0);
        }
        let date = self.to_date(ordinal)?;
        Ok((ordinal.days() - self.raw_jan01(date.year()) + 1) as u32)
    }

    /// Day of week, 0 = Sunday .. 6 = Saturday. Zero for the null date.
    pub fn day_of_week(ordinal: OrdinalDate) -> u32 {
        if ordinal.is_null() {
            return 0;
        }
        // 1970-01-01 was a Thursday.
        (ordinal.days() as i64 + 4).rem_euclid(7) as u32
    }

    /// ISO 8601 day of week, 1 = Monday .. 7 = Sunday. Zero for the null date.
    pub fn iso_day_of_week(ordinal: OrdinalDate) -> u32 {
        if ordinal.is_null() {
            return 0;
        }
        Self::monday_zero_day_of_week(ordinal.days()) as u32 + 1
    }

    fn monday_zero_day_of_week(ordinal: i32) -> i32 {
        (ordinal as i64 + 3).rem_euclid(7) as i32
    }

    /// ISO 8601 week number, 1..=53.
    ///
    /// Week 1 is the Monday-started week containing January 4, so January 1
    /// may belong to week 52 or 53 of the previous year and late December to
    /// week 1 of the next. Only defined from January 1 of the mod 100 rule
    /// year on; returns 0 for earlier, null or out-of-range ordinals.
    pub fn iso_week_number(&self, ordinal: OrdinalDate) -> u32 {
        if ordinal.is_null() || ordinal.days() < self.jan01_leap100 {
            return 0;
        }
        let Ok(date) = self.to_date(ordinal) else {
            return 0;
        };
        let ordinal = ordinal.days();

        let week1_start = |year: i32| {
            let jan04 = self.raw_ordinal(year, 1, 4);
            jan04 - Self::monday_zero_day_of_week(jan04)
        };

        let mut start = week1_start(date.year());
        if ordinal < start {
            start = week1_start(date.year() - 1);
        } else if date.month() == 12 {
            let next_start = week1_start(date.year() + 1);
            if ordinal >= next_start {
                start = next_start;
            }
        }
        ((ordinal - start) / 7 + 1) as u32
    }

    /// Age in whole years, months and days from `birth` to `as_of`.
    ///
    /// Returns zero when `as_of` precedes `birth` or either date is null.
    pub fn age(&self, birth: CalendarDate, as_of: CalendarDate) -> Age {
        if birth.is_null() || as_of.is_null() {
            return Age::default();
        }
        let mut years = as_of.year() - birth.year();
        let mut months = as_of.month() as i32 - birth.month() as i32;
        let mut days = as_of.day() as i32 - birth.day() as i32;

        if days < 0 {
            days += Self::days_in_month(birth.month(), self.is_leap_year(birth.year())) as i32;
            months -= 1;
        }
        if months < 0 {
            months += 12;
            years -= 1;
        }
        // No year 0 between 1 BC and 1 AD.
        if birth.year() < 0 && as_of.year() > 0 {
            years -= 1;
        }
        if years < 0 {
            return Age::default();
        }
        Age {
            years: years as u32,
            months: months as u32,
            days: days as u32,
        }
    }
}
