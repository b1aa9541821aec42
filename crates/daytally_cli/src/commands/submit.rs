use anyhow::{bail, Result};
use daytally_core::db::Connection;
use daytally_core::{
    DayUpsertService, SqliteEntryRepository, StoreError, SubmitError, SystemClock,
};

use super::principal_for;

/// Record today's value for `username`.
pub fn run(conn: &Connection, username: &str, raw_value: &str) -> Result<()> {
    let principal = principal_for(conn, username)?;
    let service = DayUpsertService::new(SqliteEntryRepository::try_new(conn)?, SystemClock);

    let entry = match service.submit_today(principal, raw_value) {
        Ok(entry) => entry,
        Err(SubmitError::Store(StoreError::Db(err))) if err.is_busy() => {
            bail!("Database is locked by another writer, try again ({err})")
        }
        Err(err) => return Err(err.into()),
    };
    println!("Recorded {} for {}", entry.value, entry.date);
    Ok(())
}
