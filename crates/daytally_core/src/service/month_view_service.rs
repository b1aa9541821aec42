//! Month view assembly service.
//!
//! # Responsibility
//! - Resolve the month to display for a principal and load its entries.
//!
//! # Invariants
//! - Navigation input never causes a failure; only store reads can fail.
//! - The service performs no writes.

use crate::calendar::{self, CalendarInputError};
use crate::clock::Clock;
use crate::model::date::YearMonth;
use crate::model::entry::Principal;
use crate::model::month_view::MonthView;
use crate::repo::entry_repo::{EntryStore, StoreError};
use crate::service::range_resolver::{requested_month, resolve_month};
use log::debug;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors from month view assembly.
#[derive(Debug)]
pub enum MonthViewError {
    /// Clock reported a date outside the calendar domain.
    Calendar(CalendarInputError),
    Store(StoreError),
}

impl Display for MonthViewError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Calendar(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for MonthViewError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Calendar(err) => Some(err),
            Self::Store(err) => Some(err),
        }
    }
}

impl From<CalendarInputError> for MonthViewError {
    fn from(value: CalendarInputError) -> Self {
        Self::Calendar(value)
    }
}

impl From<StoreError> for MonthViewError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Read path: month navigation for one principal.
pub struct MonthViewService<S: EntryStore, C: Clock> {
    store: S,
    clock: C,
}

impl<S: EntryStore, C: Clock> MonthViewService<S, C> {
    pub fn new(store: S, clock: C) -> Self {
        Self { store, clock }
    }

    /// Builds the month view for optional numeric request parts.
    ///
    /// Absent, partial, or out-of-domain requests show the current month.
    pub fn resolve_month_view(
        &self,
        principal: Principal,
        requested_year: Option<i64>,
        requested_month_number: Option<i64>,
    ) -> Result<MonthView, MonthViewError> {
        self.month_view(
            principal,
            requested_month(requested_year, requested_month_number),
        )
    }

    /// Builds the month view for an already parsed request.
    pub fn month_view(
        &self,
        principal: Principal,
        requested: Option<YearMonth>,
    ) -> Result<MonthView, MonthViewError> {
        let current = calendar::today(&self.clock)?.year_month();
        let earliest = self
            .store
            .find_earliest_entry(principal)?
            .map(|date| date.year_month());

        let resolved = resolve_month(earliest, requested, current);
        let days_in_month = calendar::days_in_month(
            resolved.effective.year(),
            resolved.effective.month(),
        )?;
        let entries = self
            .store
            .find_entries_for_month(principal, resolved.effective)?;

        debug!(
            "event=month_view module=service status=ok user_id={} requested={} effective={} floor={} ceiling={} entries={}",
            principal,
            requested.map_or_else(|| "none".to_string(), |month| month.to_string()),
            resolved.effective,
            resolved.range.floor,
            resolved.range.ceiling,
            entries.len()
        );

        Ok(MonthView {
            effective: resolved.effective,
            floor: resolved.range.floor,
            ceiling: resolved.range.ceiling,
            days_in_month,
            entries,
        })
    }
}
