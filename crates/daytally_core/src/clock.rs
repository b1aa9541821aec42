//! Injectable source of the current local date.
//!
//! Services take a [`Clock`] instead of reading wall-clock time directly so
//! navigation and upsert logic stay deterministic under test.

use crate::calendar::CalendarInputError;
use crate::model::date::DateKey;
use chrono::{Local, NaiveDate};

/// Provider of the current calendar date.
pub trait Clock {
    /// Returns today's date in the provider's calendar.
    fn today(&self) -> NaiveDate;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn today(&self) -> NaiveDate {
        (**self).today()
    }
}

/// Clock backed by the server's local time zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Clock pinned to one date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock {
    date: NaiveDate,
}

impl FixedClock {
    pub fn new(date: NaiveDate) -> Self {
        Self { date }
    }

    /// Builds a fixed clock from calendar fields, validating the date.
    pub fn ymd(year: i32, month: u32, day: u32) -> Result<Self, CalendarInputError> {
        let key = DateKey::new(i64::from(year), i64::from(month), i64::from(day))?;
        Ok(Self::new(key.to_naive()))
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.date
    }
}
