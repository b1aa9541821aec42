//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate calendar, clock and store calls into the two operations the
//!   request layer consumes: month navigation and today's upsert.
//! - Keep request-handling layers decoupled from storage details.

pub mod month_view_service;
pub mod range_resolver;
pub mod upsert_service;
