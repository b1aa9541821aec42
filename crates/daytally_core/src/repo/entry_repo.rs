//! Entry store contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist one value per `(principal, year, month, day)`.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Every query is scoped to one principal.
//! - Uniqueness on `(year, month, day, user_id)` is enforced by the schema and
//!   reported as `StoreError::DuplicateKey`.
//! - Read paths reject invalid persisted rows instead of masking them.

use crate::db::{ensure_migrated, DbError};
use crate::model::date::{DateKey, YearMonth};
use crate::model::entry::{Entry, EntryValue, Principal};
use crate::repo::is_unique_violation;
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const ENTRY_SELECT_SQL: &str = "SELECT
    year,
    month,
    day,
    user_id,
    value
FROM entries";

pub type StoreResult<T> = Result<T, StoreError>;

/// Errors from entry store operations.
#[derive(Debug)]
pub enum StoreError {
    /// An entry already exists for this principal and day.
    DuplicateKey { principal: Principal, date: DateKey },
    /// No entry exists for this principal and day.
    NotFound { principal: Principal, date: DateKey },
    /// Underlying SQLite/bootstrap failure, including busy-timeout expiry.
    Db(DbError),
    /// Persisted row cannot be converted into a valid entry.
    InvalidData(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateKey { principal, date } => {
                write!(f, "entry already exists for user {principal} on {date}")
            }
            Self::NotFound { principal, date } => {
                write!(f, "entry not found for user {principal} on {date}")
            }
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted entry data: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::DuplicateKey { .. } | Self::NotFound { .. } | Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Data access operations the tracker core needs.
pub trait EntryStore {
    /// Returns the entry for one day, if any.
    fn find_entry(&self, principal: Principal, date: DateKey) -> StoreResult<Option<Entry>>;

    /// Returns all entries of one month ordered by day (possibly empty).
    fn find_entries_for_month(
        &self,
        principal: Principal,
        month: YearMonth,
    ) -> StoreResult<Vec<Entry>>;

    /// Returns the date of the principal's earliest entry, if any.
    fn find_earliest_entry(&self, principal: Principal) -> StoreResult<Option<DateKey>>;

    /// Inserts a new entry.
    ///
    /// Fails with `DuplicateKey` when the day already has a value.
    fn create_entry(&self, entry: &Entry) -> StoreResult<Entry>;

    /// Overwrites the value of an existing entry.
    ///
    /// Fails with `NotFound` when the day has no value yet.
    fn replace_entry_value(
        &self,
        principal: Principal,
        date: DateKey,
        value: EntryValue,
    ) -> StoreResult<Entry>;
}

impl<S: EntryStore + ?Sized> EntryStore for &S {
    fn find_entry(&self, principal: Principal, date: DateKey) -> StoreResult<Option<Entry>> {
        (**self).find_entry(principal, date)
    }

    fn find_entries_for_month(
        &self,
        principal: Principal,
        month: YearMonth,
    ) -> StoreResult<Vec<Entry>> {
        (**self).find_entries_for_month(principal, month)
    }

    fn find_earliest_entry(&self, principal: Principal) -> StoreResult<Option<DateKey>> {
        (**self).find_earliest_entry(principal)
    }

    fn create_entry(&self, entry: &Entry) -> StoreResult<Entry> {
        (**self).create_entry(entry)
    }

    fn replace_entry_value(
        &self,
        principal: Principal,
        date: DateKey,
        value: EntryValue,
    ) -> StoreResult<Entry> {
        (**self).replace_entry_value(principal, date, value)
    }
}

/// SQLite-backed entry store.
#[derive(Clone, Copy)]
pub struct SqliteEntryRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteEntryRepository<'conn> {
    /// Wraps a connection after checking it is fully migrated.
    pub fn try_new(conn: &'conn Connection) -> StoreResult<Self> {
        ensure_migrated(conn)?;
        Ok(Self { conn })
    }
}

impl EntryStore for SqliteEntryRepository<'_> {
    fn find_entry(&self, principal: Principal, date: DateKey) -> StoreResult<Option<Entry>> {
        let mut stmt = self.conn.prepare(&format!(
            "{ENTRY_SELECT_SQL}
             WHERE user_id = ?1
               AND year = ?2
               AND month = ?3
               AND day = ?4;"
        ))?;

        let mut rows = stmt.query(params![
            principal.id(),
            date.year(),
            date.month(),
            date.day()
        ])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_entry_row(row)?));
        }

        Ok(None)
    }

    fn find_entries_for_month(
        &self,
        principal: Principal,
        month: YearMonth,
    ) -> StoreResult<Vec<Entry>> {
        let mut stmt = self.conn.prepare(&format!(
            "{ENTRY_SELECT_SQL}
             WHERE user_id = ?1
               AND year = ?2
               AND month = ?3
             ORDER BY day ASC;"
        ))?;

        let mut rows = stmt.query(params![principal.id(), month.year(), month.month()])?;
        let mut entries = Vec::new();
        while let Some(row) = rows.next()? {
            entries.push(parse_entry_row(row)?);
        }

        Ok(entries)
    }

    fn find_earliest_entry(&self, principal: Principal) -> StoreResult<Option<DateKey>> {
        let mut stmt = self.conn.prepare(&format!(
            "{ENTRY_SELECT_SQL}
             WHERE user_id = ?1
             ORDER BY year ASC, month ASC, day ASC
             LIMIT 1;"
        ))?;

        let mut rows = stmt.query([principal.id()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_entry_row(row)?.date));
        }

        Ok(None)
    }

    fn create_entry(&self, entry: &Entry) -> StoreResult<Entry> {
        let result = self.conn.execute(
            "INSERT INTO entries (
                year,
                month,
                day,
                user_id,
                value
            ) VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                entry.date.year(),
                entry.date.month(),
                entry.date.day(),
                entry.principal.id(),
                entry.value.get(),
            ],
        );

        match result {
            Ok(_) => Ok(*entry),
            Err(err) if is_unique_violation(&err) => Err(StoreError::DuplicateKey {
                principal: entry.principal,
                date: entry.date,
            }),
            Err(err) => Err(err.into()),
        }
    }

    fn replace_entry_value(
        &self,
        principal: Principal,
        date: DateKey,
        value: EntryValue,
    ) -> StoreResult<Entry> {
        let changed = self.conn.execute(
            "UPDATE entries
             SET
                value = ?1,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE user_id = ?2
               AND year = ?3
               AND month = ?4
               AND day = ?5;",
            params![
                value.get(),
                principal.id(),
                date.year(),
                date.month(),
                date.day()
            ],
        )?;

        if changed == 0 {
            return Err(StoreError::NotFound { principal, date });
        }

        Ok(Entry::new(principal, date, value))
    }
}

fn parse_entry_row(row: &Row<'_>) -> StoreResult<Entry> {
    let year: i64 = row.get("year")?;
    let month: i64 = row.get("month")?;
    let day: i64 = row.get("day")?;
    let date = DateKey::new(year, month, day).map_err(|err| {
        StoreError::InvalidData(format!(
            "invalid date `{year}-{month}-{day}` in entries: {err}"
        ))
    })?;

    let value: i64 = row.get("value")?;
    let value = EntryValue::new(value).map_err(|err| {
        StoreError::InvalidData(format!("invalid value `{value}` in entries.value: {err}"))
    })?;

    Ok(Entry::new(Principal::new(row.get("user_id")?), date, value))
}
