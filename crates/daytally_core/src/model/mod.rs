//! Domain model for the daily-value tracker.
//!
//! # Responsibility
//! - Define calendar keys, entries and the month read model.
//! - Validate every invariant at construction so downstream layers can rely
//!   on well-formed values.
//!
//! # Invariants
//! - One `Entry` per `(Principal, DateKey)`.
//! - Entries are never deleted by core logic.

pub mod date;
pub mod entry;
pub mod month_view;
