//! Ordinal day numbers: the primary internal representation of a date.

use std::fmt::{Display, Formatter};

use serde::{
    Deserialize, Deserializer, Serialize, Serializer,
    de::{self, Visitor},
};

use super::CalendarError;

/// Signed count of days since 1970-01-01 (day 0).
///
/// [`OrdinalDate::NULL`] stands for "no date" and is carried through copies
/// and (de)serialization unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OrdinalDate(i32);

impl OrdinalDate {
    /// The null date. Converts to the `(0, 0, 0)` triple.
    pub const NULL: Self = Self(i32::MIN);

    /// 1970-01-01.
    pub const EPOCH: Self = Self(0);

    /// Earliest supported ordinal, 999,999 BC January 1.
    pub const MIN: Self = Self(-365_968_798);

    /// Latest supported ordinal, 999,999 AD December 31.
    pub const MAX: Self = Self(364_522_971);

    /// Wraps a raw day count without range checking.
    pub const fn new(days: i32) -> Self {
        Self(days)
    }

    /// Wraps a raw day count, rejecting values outside `MIN..=MAX`.
    /// The null sentinel is accepted.
    pub fn checked(days: i32) -> Result<Self, CalendarError> {
        let ordinal = Self(days);
        if ordinal.is_null() || (Self::MIN..=Self::MAX).contains(&ordinal) {
            Ok(ordinal)
        } else {
            Err(CalendarError::InvalidOrdinal(days))
        }
    }

    pub const fn days(self) -> i32 {
        self.0
    }

    pub const fn is_null(self) -> bool {
        self.0 == i32::MIN
    }

    /// Milliseconds since 1970-01-01 00:00 UTC, ignoring leap seconds.
    /// The null date maps to `i64::MIN`.
    pub const fn timestamp_millis(self) -> i64 {
        if self.is_null() {
            i64::MIN
        } else {
            self.0 as i64 * 86_400_000
        }
    }
}

impl Default for OrdinalDate {
    fn default() -> Self {
        Self::NULL
    }
}

impl Display for OrdinalDate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.is_null() {
            write!(f, "null")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

// Only the day count goes over the wire; the triple is recomputed on demand.
impl Serialize for OrdinalDate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_i32(self.0)
    }
}

struct OrdinalVisitor;

impl Visitor<'_> for OrdinalVisitor {
    type Value = OrdinalDate;

    fn expecting(&self, formatter: &mut Formatter) -> std::fmt::Result {
        formatter.write_str("a day count between 999,999 BC and 999,999 AD, or the null ordinal")
    }

    fn visit_i64<E>(self, value: i64) -> Result<OrdinalDate, E>
    where
        E: de::Error,
    {
        let days = i32::try_from(value).map_err(|_| E::custom(format!("ordinal out of range: {}", value)))?;
        OrdinalDate::checked(days).map_err(E::custom)
    }

    fn visit_u64<E>(self, value: u64) -> Result<OrdinalDate, E>
    where
        E: de::Error,
    {
        let days = i32::try_from(value).map_err(|_| E::custom(format!("ordinal out of range: {}", value)))?;
        OrdinalDate::checked(days).map_err(E::custom)
    }
}

impl<'de> Deserialize<'de> for OrdinalDate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_i32(OrdinalVisitor)
    }
}
