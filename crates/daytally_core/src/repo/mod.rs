//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts.
//! - Isolate SQLite query details from service/business orchestration.
//!
//! # Invariants
//! - Repository APIs return semantic errors (`DuplicateKey`, `NotFound`) in
//!   addition to DB transport errors.
//! - Repositories only accept connections at the latest schema version.

pub mod entry_repo;
pub mod user_repo;

use rusqlite::{ffi, ErrorCode};

/// True when a write was rejected by a PRIMARY KEY or UNIQUE constraint.
pub(crate) fn is_unique_violation(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(inner, _) => {
            inner.code == ErrorCode::ConstraintViolation
                && matches!(
                    inner.extended_code,
                    ffi::SQLITE_CONSTRAINT_PRIMARYKEY | ffi::SQLITE_CONSTRAINT_UNIQUE
                )
        }
        _ => false,
    }
}
