//! Core domain logic for daytally, a one-value-per-day tracker.
//! This crate is the single source of truth for calendar, navigation and
//! upsert invariants.

pub mod calendar;
pub mod clock;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use calendar::{days_in_month, today, CalendarInputError};
pub use clock::{Clock, FixedClock, SystemClock};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::date::{DateKey, YearMonth};
pub use model::entry::{Entry, EntryValue, Principal, ValueValidationError};
pub use model::month_view::{MonthRange, MonthView, ResolvedMonth};
pub use repo::entry_repo::{EntryStore, SqliteEntryRepository, StoreError, StoreResult};
pub use repo::user_repo::{
    SqliteUserRepository, UserRecord, UserRepoError, UserRepoResult, UserRepository,
};
pub use service::month_view_service::{MonthViewError, MonthViewService};
pub use service::range_resolver::{parse_requested_month, requested_month, resolve_month};
pub use service::upsert_service::{DayUpsertService, SubmitError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
