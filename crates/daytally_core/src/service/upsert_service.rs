//! Day upsert use-case service.
//!
//! # Responsibility
//! - Record today's value for a principal, one value per day.
//!
//! # Invariants
//! - Invalid input never reaches the store.
//! - The existence pre-check is only a hint; a `DuplicateKey` from
//!   `create_entry` means a concurrent writer won and is retried as a replace.
//! - No other store error is absorbed, including `NotFound` from replace.

use crate::calendar::{self, CalendarInputError};
use crate::clock::Clock;
use crate::model::date::DateKey;
use crate::model::entry::{Entry, EntryValue, Principal, ValueValidationError};
use crate::repo::entry_repo::{EntryStore, StoreError, StoreResult};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

/// Errors from `submit_today`.
#[derive(Debug)]
pub enum SubmitError {
    /// Submitted value was rejected before touching the store.
    Validation(ValueValidationError),
    /// Clock reported a date outside the calendar domain.
    Calendar(CalendarInputError),
    /// Store failure, surfaced unchanged.
    Store(StoreError),
}

impl Display for SubmitError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Calendar(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for SubmitError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Calendar(err) => Some(err),
            Self::Store(err) => Some(err),
        }
    }
}

impl From<ValueValidationError> for SubmitError {
    fn from(value: ValueValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<CalendarInputError> for SubmitError {
    fn from(value: CalendarInputError) -> Self {
        Self::Calendar(value)
    }
}

impl From<StoreError> for SubmitError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// How the day's entry ended up stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WriteMode {
    Create,
    Replace,
    ReplaceAfterConflict,
}

impl WriteMode {
    fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Replace => "replace",
            Self::ReplaceAfterConflict => "replace_after_conflict",
        }
    }
}

/// Write path: create-or-replace today's entry.
pub struct DayUpsertService<S: EntryStore, C: Clock> {
    store: S,
    clock: C,
}

impl<S: EntryStore, C: Clock> DayUpsertService<S, C> {
    pub fn new(store: S, clock: C) -> Self {
        Self { store, clock }
    }

    /// Records `raw_value` as today's value for `principal`.
    ///
    /// # Contract
    /// - Non-numeric input fails with `Validation(NotANumber)`.
    /// - Fractional or out-of-range input fails with `Validation(OutOfRange)`.
    /// - A second submission on the same day overwrites the first.
    /// - Returns the stored entry.
    pub fn submit_today(
        &self,
        principal: Principal,
        raw_value: &str,
    ) -> Result<Entry, SubmitError> {
        let started_at = Instant::now();

        let value = match EntryValue::parse(raw_value) {
            Ok(value) => value,
            Err(err) => {
                info!(
                    "event=entry_submit module=service status=rejected user_id={} reason={}",
                    principal,
                    rejection_reason(&err)
                );
                return Err(err.into());
            }
        };
        let today = calendar::today(&self.clock)?;

        match self.upsert(principal, today, value) {
            Ok((entry, mode)) => {
                info!(
                    "event=entry_submit module=service status=ok user_id={} date={} mode={} duration_ms={}",
                    principal,
                    today,
                    mode.as_str(),
                    started_at.elapsed().as_millis()
                );
                Ok(entry)
            }
            Err(err) => {
                warn!(
                    "event=entry_submit module=service status=error user_id={} date={} duration_ms={} error={}",
                    principal,
                    today,
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err.into())
            }
        }
    }

    fn upsert(
        &self,
        principal: Principal,
        date: DateKey,
        value: EntryValue,
    ) -> StoreResult<(Entry, WriteMode)> {
        if self.store.find_entry(principal, date)?.is_some() {
            let entry = self.store.replace_entry_value(principal, date, value)?;
            return Ok((entry, WriteMode::Replace));
        }

        match self.store.create_entry(&Entry::new(principal, date, value)) {
            Ok(entry) => Ok((entry, WriteMode::Create)),
            Err(StoreError::DuplicateKey { .. }) => {
                warn!(
                    "event=entry_submit module=service status=conflict user_id={} date={} action=replace",
                    principal, date
                );
                let entry = self.store.replace_entry_value(principal, date, value)?;
                Ok((entry, WriteMode::ReplaceAfterConflict))
            }
            Err(err) => Err(err),
        }
    }
}

fn rejection_reason(err: &ValueValidationError) -> &'static str {
    match err {
        ValueValidationError::NotANumber(_) => "not_a_number",
        ValueValidationError::OutOfRange(_) => "out_of_range",
    }
}

#[cfg(test)]
mod tests {
    use super::{DayUpsertService, SubmitError};
    use crate::clock::FixedClock;
    use crate::model::date::{DateKey, YearMonth};
    use crate::model::entry::{Entry, EntryValue, Principal, ValueValidationError};
    use crate::repo::entry_repo::{EntryStore, StoreError, StoreResult};
    use std::cell::{Cell, RefCell};
    use std::collections::BTreeMap;

    /// In-memory store that can simulate a concurrent writer slipping in
    /// between the existence check and the insert.
    #[derive(Default)]
    struct ScriptedStore {
        rows: RefCell<BTreeMap<(i64, DateKey), EntryValue>>,
        hide_next_find: Cell<bool>,
        lose_replace: Cell<bool>,
        create_calls: Cell<u32>,
        replace_calls: Cell<u32>,
    }

    impl EntryStore for ScriptedStore {
        fn find_entry(&self, principal: Principal, date: DateKey) -> StoreResult<Option<Entry>> {
            if self.hide_next_find.replace(false) {
                return Ok(None);
            }
            Ok(self
                .rows
                .borrow()
                .get(&(principal.id(), date))
                .map(|value| Entry::new(principal, date, *value)))
        }

        fn find_entries_for_month(
            &self,
            principal: Principal,
            month: YearMonth,
        ) -> StoreResult<Vec<Entry>> {
            Ok(self
                .rows
                .borrow()
                .iter()
                .filter(|((id, date), _)| *id == principal.id() && date.year_month() == month)
                .map(|((_, date), value)| Entry::new(principal, *date, *value))
                .collect())
        }

        fn find_earliest_entry(&self, principal: Principal) -> StoreResult<Option<DateKey>> {
            Ok(self
                .rows
                .borrow()
                .keys()
                .filter(|(id, _)| *id == principal.id())
                .map(|(_, date)| *date)
                .min())
        }

        fn create_entry(&self, entry: &Entry) -> StoreResult<Entry> {
            self.create_calls.set(self.create_calls.get() + 1);
            let key = (entry.principal.id(), entry.date);
            let mut rows = self.rows.borrow_mut();
            if rows.contains_key(&key) {
                return Err(StoreError::DuplicateKey {
                    principal: entry.principal,
                    date: entry.date,
                });
            }
            rows.insert(key, entry.value);
            Ok(*entry)
        }

        fn replace_entry_value(
            &self,
            principal: Principal,
            date: DateKey,
            value: EntryValue,
        ) -> StoreResult<Entry> {
            self.replace_calls.set(self.replace_calls.get() + 1);
            let mut rows = self.rows.borrow_mut();
            if self.lose_replace.get() {
                rows.remove(&(principal.id(), date));
            }
            match rows.get_mut(&(principal.id(), date)) {
                Some(stored) => {
                    *stored = value;
                    Ok(Entry::new(principal, date, value))
                }
                None => Err(StoreError::NotFound { principal, date }),
            }
        }
    }

    fn clock() -> FixedClock {
        FixedClock::ymd(2024, 11, 15).unwrap()
    }

    fn today() -> DateKey {
        DateKey::new(2024, 11, 15).unwrap()
    }

    #[test]
    fn first_submission_creates_and_second_replaces() {
        let store = ScriptedStore::default();
        let service = DayUpsertService::new(&store, clock());
        let principal = Principal::new(7);

        service.submit_today(principal, "5").unwrap();
        service.submit_today(principal, "5").unwrap();

        assert_eq!(store.rows.borrow().len(), 1);
        assert_eq!(store.create_calls.get(), 1);
        assert_eq!(store.replace_calls.get(), 1);
        let stored = store.find_entry(principal, today()).unwrap().unwrap();
        assert_eq!(stored.value.get(), 5);
    }

    #[test]
    fn lost_insert_race_falls_back_to_replace() {
        let store = ScriptedStore::default();
        let principal = Principal::new(7);
        store
            .create_entry(&Entry::new(principal, today(), EntryValue::new(3).unwrap()))
            .unwrap();
        store.hide_next_find.set(true);

        let service = DayUpsertService::new(&store, clock());
        let entry = service.submit_today(principal, "9").unwrap();

        assert_eq!(entry.value.get(), 9);
        assert_eq!(store.rows.borrow().len(), 1);
        assert_eq!(store.replace_calls.get(), 1);
    }

    #[test]
    fn not_found_from_replace_is_reported() {
        let store = ScriptedStore::default();
        let principal = Principal::new(7);
        store
            .create_entry(&Entry::new(principal, today(), EntryValue::new(3).unwrap()))
            .unwrap();
        store.lose_replace.set(true);

        let service = DayUpsertService::new(&store, clock());
        let err = service.submit_today(principal, "4").unwrap_err();

        assert!(matches!(
            err,
            SubmitError::Store(StoreError::NotFound { date, .. }) if date == today()
        ));
    }

    #[test]
    fn invalid_values_never_reach_the_store() {
        let store = ScriptedStore::default();
        let service = DayUpsertService::new(&store, clock());
        let principal = Principal::new(7);

        assert!(matches!(
            service.submit_today(principal, "abc"),
            Err(SubmitError::Validation(ValueValidationError::NotANumber(_)))
        ));
        assert!(matches!(
            service.submit_today(principal, "0"),
            Err(SubmitError::Validation(ValueValidationError::OutOfRange(_)))
        ));
        assert!(matches!(
            service.submit_today(principal, "10000"),
            Err(SubmitError::Validation(ValueValidationError::OutOfRange(_)))
        ));
        assert!(store.rows.borrow().is_empty());
        assert_eq!(store.create_calls.get(), 0);
    }
}
