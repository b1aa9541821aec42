//! Calendar keys used by entries and month navigation.
//!
//! # Responsibility
//! - Define `DateKey` (one calendar day) and `YearMonth` (one navigable month).
//! - Provide the month ordinal used as the single comparison primitive for
//!   range clamping.
//!
//! # Invariants
//! - Every `DateKey` is a real Gregorian date with year in `1000..=9999`.
//! - Every `YearMonth` has year in `1000..=9999` and month in `1..=12`.
//! - `YearMonth` ordering is exactly the ordering of `ordinal()`.

use crate::calendar::{check_month, check_year, days_in_month, CalendarInputError};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt::{Display, Formatter};

/// One calendar day `(year, month, day)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "DateKeyParts", into = "DateKeyParts")]
pub struct DateKey {
    date: NaiveDate,
}

/// Serialized shape of [`DateKey`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DateKeyParts {
    pub year: i64,
    pub month: i64,
    pub day: i64,
}

impl DateKey {
    /// Validates and builds a day key.
    ///
    /// # Errors
    /// - `InvalidMonth` / `InvalidYear` for out-of-domain fields.
    /// - `InvalidDay` when `day` exceeds the month length (leap years honored).
    pub fn new(year: i64, month: i64, day: i64) -> Result<Self, CalendarInputError> {
        let month = check_month(month)?;
        let year = check_year(year)?;
        let max_day = days_in_month(year, month)?;
        let invalid_day = CalendarInputError::InvalidDay {
            year,
            month,
            day,
            days_in_month: max_day,
        };
        if !(1..=i64::from(max_day)).contains(&day) {
            return Err(invalid_day);
        }
        let date = NaiveDate::from_ymd_opt(year, month, day as u32).ok_or(invalid_day)?;
        Ok(Self { date })
    }

    /// Converts a chrono date, rejecting years outside the supported domain.
    pub fn from_naive(date: NaiveDate) -> Result<Self, CalendarInputError> {
        check_year(i64::from(date.year()))?;
        Ok(Self { date })
    }

    pub fn year(&self) -> i32 {
        self.date.year()
    }

    pub fn month(&self) -> u32 {
        self.date.month()
    }

    pub fn day(&self) -> u32 {
        self.date.day()
    }

    /// Month containing this day.
    pub fn year_month(&self) -> YearMonth {
        YearMonth {
            year: self.year(),
            month: self.month(),
        }
    }

    pub fn to_naive(&self) -> NaiveDate {
        self.date
    }
}

impl Display for DateKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year(), self.month(), self.day())
    }
}

impl TryFrom<DateKeyParts> for DateKey {
    type Error = CalendarInputError;

    fn try_from(value: DateKeyParts) -> Result<Self, Self::Error> {
        Self::new(value.year, value.month, value.day)
    }
}

impl From<DateKey> for DateKeyParts {
    fn from(value: DateKey) -> Self {
        Self {
            year: i64::from(value.year()),
            month: i64::from(value.month()),
            day: i64::from(value.day()),
        }
    }
}

/// One navigable month `(year, month)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "YearMonthParts")]
pub struct YearMonth {
    year: i32,
    month: u32,
}

/// Deserialized shape of [`YearMonth`].
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct YearMonthParts {
    pub year: i64,
    pub month: i64,
}

impl YearMonth {
    /// Validates and builds a month key.
    pub fn new(year: i64, month: i64) -> Result<Self, CalendarInputError> {
        let month = check_month(month)?;
        let year = check_year(year)?;
        Ok(Self { year, month })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// Total-order position of this month: `year * 12 + (month - 1)`.
    pub fn ordinal(&self) -> i64 {
        i64::from(self.year) * 12 + i64::from(self.month) - 1
    }

    /// Inverse of [`YearMonth::ordinal`]. Returns `None` outside the domain.
    pub fn from_ordinal(ordinal: i64) -> Option<Self> {
        Self::new(ordinal.div_euclid(12), ordinal.rem_euclid(12) + 1).ok()
    }

    /// The month before this one, if still inside the year domain.
    pub fn previous(&self) -> Option<Self> {
        Self::from_ordinal(self.ordinal() - 1)
    }

    /// The month after this one, if still inside the year domain.
    pub fn next(&self) -> Option<Self> {
        Self::from_ordinal(self.ordinal() + 1)
    }

    /// Number of days in this month.
    pub fn days(&self) -> u32 {
        // Fields are validated on construction, so the lookup cannot fail.
        days_in_month(self.year, self.month).unwrap_or(31)
    }

    /// Clamps this month into `[floor, ceiling]` by ordinal.
    pub fn clamp_between(self, floor: Self, ceiling: Self) -> Self {
        if self < floor {
            floor
        } else if self > ceiling {
            ceiling
        } else {
            self
        }
    }
}

impl Ord for YearMonth {
    fn cmp(&self, other: &Self) -> Ordering {
        self.ordinal().cmp(&other.ordinal())
    }
}

impl PartialOrd for YearMonth {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Display for YearMonth {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl From<DateKey> for YearMonth {
    fn from(value: DateKey) -> Self {
        value.year_month()
    }
}

impl TryFrom<YearMonthParts> for YearMonth {
    type Error = CalendarInputError;

    fn try_from(value: YearMonthParts) -> Result<Self, Self::Error> {
        Self::new(value.year, value.month)
    }
}

#[cfg(test)]
mod tests {
    use super::{DateKey, YearMonth};
    use crate::calendar::CalendarInputError;

    #[test]
    fn date_key_rejects_day_past_month_end() {
        assert!(DateKey::new(2024, 2, 29).is_ok());
        let err = DateKey::new(2023, 2, 29).unwrap_err();
        assert!(matches!(
            err,
            CalendarInputError::InvalidDay {
                day: 29,
                days_in_month: 28,
                ..
            }
        ));
        assert!(DateKey::new(2024, 4, 0).is_err());
        assert!(DateKey::new(2024, 4, 31).is_err());
    }

    #[test]
    fn ordinal_orders_across_year_boundary() {
        let dec = YearMonth::new(2023, 12).unwrap();
        let jan = YearMonth::new(2024, 1).unwrap();
        assert_eq!(jan.ordinal() - dec.ordinal(), 1);
        assert!(dec < jan);
        assert_eq!(dec.next(), Some(jan));
        assert_eq!(jan.previous(), Some(dec));
    }

    #[test]
    fn navigation_stops_at_domain_edges() {
        assert_eq!(YearMonth::new(1000, 1).unwrap().previous(), None);
        assert_eq!(YearMonth::new(9999, 12).unwrap().next(), None);
    }

    #[test]
    fn clamp_between_uses_month_order() {
        let floor = YearMonth::new(2022, 3).unwrap();
        let ceiling = YearMonth::new(2024, 11).unwrap();
        let early = YearMonth::new(2020, 1).unwrap();
        let late = YearMonth::new(2025, 1).unwrap();
        let inside = YearMonth::new(2023, 7).unwrap();

        assert_eq!(early.clamp_between(floor, ceiling), floor);
        assert_eq!(late.clamp_between(floor, ceiling), ceiling);
        assert_eq!(inside.clamp_between(floor, ceiling), inside);
    }

    #[test]
    fn date_key_display_is_zero_padded() {
        assert_eq!(DateKey::new(2024, 4, 1).unwrap().to_string(), "2024-04-01");
        assert_eq!(YearMonth::new(2024, 4).unwrap().to_string(), "2024-04");
    }
}
