//! Calendar engine: month lengths and local "today".
//!
//! # Responsibility
//! - Compute Gregorian month lengths for the supported year domain.
//! - Decompose the injected clock's current date into calendar fields.
//!
//! # Invariants
//! - Supported years are `1000..=9999`, months are `1..=12`.
//! - Functions are pure apart from the clock read in [`today`].

use crate::clock::Clock;
use crate::model::date::DateKey;
use chrono::{Datelike, NaiveDate};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Lowest year accepted anywhere in the calendar domain.
pub const MIN_YEAR: i32 = 1000;
/// Highest year accepted anywhere in the calendar domain.
pub const MAX_YEAR: i32 = 9999;

/// Malformed calendar input (year, month or day outside its domain).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarInputError {
    InvalidYear(i64),
    InvalidMonth(i64),
    InvalidDay {
        year: i32,
        month: u32,
        day: i64,
        days_in_month: u32,
    },
}

impl Display for CalendarInputError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidYear(year) => {
                write!(f, "year must be between {MIN_YEAR} and {MAX_YEAR}, got {year}")
            }
            Self::InvalidMonth(month) => {
                write!(f, "month must be between 1 and 12, got {month}")
            }
            Self::InvalidDay {
                year,
                month,
                day,
                days_in_month,
            } => write!(
                f,
                "invalid day: {year:04}-{month:02}-{day:02} is not a real date (month has {days_in_month} days)"
            ),
        }
    }
}

impl Error for CalendarInputError {}

/// Validates a year against the supported domain.
pub fn check_year(year: i64) -> Result<i32, CalendarInputError> {
    if !(i64::from(MIN_YEAR)..=i64::from(MAX_YEAR)).contains(&year) {
        return Err(CalendarInputError::InvalidYear(year));
    }
    Ok(year as i32)
}

/// Validates a month number (`1..=12`).
pub fn check_month(month: i64) -> Result<u32, CalendarInputError> {
    if !(1..=12).contains(&month) {
        return Err(CalendarInputError::InvalidMonth(month));
    }
    Ok(month as u32)
}

/// Returns the number of days in `month` of `year`, honoring leap years.
///
/// # Errors
/// - `InvalidMonth` when `month` is outside `1..=12`.
/// - `InvalidYear` when `year` is outside `1000..=9999`.
pub fn days_in_month(year: i32, month: u32) -> Result<u32, CalendarInputError> {
    let month = check_month(i64::from(month))?;
    let year = check_year(i64::from(year))?;

    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    // Year 10000 is still representable by chrono, so December 9999 resolves.
    let last_day = NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first_of_next| first_of_next.pred_opt())
        .map(|date| date.day())
        .ok_or(CalendarInputError::InvalidYear(i64::from(year)))?;

    Ok(last_day)
}

/// Returns today's date in the clock's local calendar.
///
/// # Errors
/// - Returns `CalendarInputError` only when the clock reports a date outside
///   the supported year domain.
pub fn today(clock: &impl Clock) -> Result<DateKey, CalendarInputError> {
    DateKey::from_naive(clock.today())
}

#[cfg(test)]
mod tests {
    use super::{days_in_month, today, CalendarInputError};
    use crate::clock::FixedClock;

    #[test]
    fn regular_month_lengths() {
        let expected = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];
        for (index, days) in expected.iter().enumerate() {
            let month = index as u32 + 1;
            assert_eq!(days_in_month(2023, month).unwrap(), *days, "month {month}");
        }
    }

    #[test]
    fn february_follows_gregorian_leap_rules() {
        assert_eq!(days_in_month(2000, 2).unwrap(), 29);
        assert_eq!(days_in_month(2024, 2).unwrap(), 29);
        assert_eq!(days_in_month(1900, 2).unwrap(), 28);
        assert_eq!(days_in_month(2023, 2).unwrap(), 28);
    }

    #[test]
    fn domain_edges_resolve() {
        assert_eq!(days_in_month(1000, 1).unwrap(), 31);
        assert_eq!(days_in_month(9999, 12).unwrap(), 31);
    }

    #[test]
    fn out_of_domain_input_is_rejected() {
        assert_eq!(
            days_in_month(2024, 0).unwrap_err(),
            CalendarInputError::InvalidMonth(0)
        );
        assert_eq!(
            days_in_month(2024, 13).unwrap_err(),
            CalendarInputError::InvalidMonth(13)
        );
        assert_eq!(
            days_in_month(999, 5).unwrap_err(),
            CalendarInputError::InvalidYear(999)
        );
        assert_eq!(
            days_in_month(10000, 5).unwrap_err(),
            CalendarInputError::InvalidYear(10000)
        );
    }

    #[test]
    fn today_decomposes_clock_date() {
        let clock = FixedClock::ymd(2024, 11, 15).unwrap();
        let key = today(&clock).unwrap();
        assert_eq!((key.year(), key.month(), key.day()), (2024, 11, 15));
    }
}
