//! Month range resolution.
//!
//! # Responsibility
//! - Turn a possibly absent or malformed month request into the single month
//!   to display.
//! - Report the navigable `[floor, ceiling]` bounds alongside it.
//!
//! # Invariants
//! - `floor <= effective <= ceiling` by month ordinal, always.
//! - Bad input is clamped or replaced, never rejected.

use crate::model::date::YearMonth;
use crate::model::month_view::{MonthRange, ResolvedMonth};

/// Clamps `requested` into the principal's navigable range.
///
/// - `earliest`: month of the principal's earliest entry, if any.
/// - `requested`: caller-requested month; `None` when absent or unparseable.
/// - `current`: today's month, which is always the ceiling.
///
/// Without entries the floor is the requested month (first visit before any
/// data exists), falling back to the current month. The floor is capped at
/// the ceiling so the range never inverts.
pub fn resolve_month(
    earliest: Option<YearMonth>,
    requested: Option<YearMonth>,
    current: YearMonth,
) -> ResolvedMonth {
    let ceiling = current;
    let floor = earliest.or(requested).unwrap_or(ceiling).min(ceiling);
    let effective = requested
        .unwrap_or(ceiling)
        .clamp_between(floor, ceiling);

    ResolvedMonth {
        effective,
        range: MonthRange { floor, ceiling },
    }
}

/// Builds a requested month from optional numeric parts.
///
/// Returns `None` unless both parts are present and inside the calendar
/// domain; callers then fall back to the current month.
pub fn requested_month(year: Option<i64>, month: Option<i64>) -> Option<YearMonth> {
    YearMonth::new(year?, month?).ok()
}

/// Parses raw `/:year/:month` path segments into a requested month.
pub fn parse_requested_month(year: &str, month: &str) -> Option<YearMonth> {
    let year = year.trim().parse::<i64>().ok();
    let month = month.trim().parse::<i64>().ok();
    requested_month(year, month)
}

#[cfg(test)]
mod tests {
    use super::{parse_requested_month, requested_month, resolve_month};
    use crate::model::date::YearMonth;

    fn ym(year: i64, month: i64) -> YearMonth {
        YearMonth::new(year, month).unwrap()
    }

    #[test]
    fn no_entries_and_no_request_pins_everything_to_current() {
        let resolved = resolve_month(None, None, ym(2024, 11));
        assert_eq!(resolved.effective, ym(2024, 11));
        assert_eq!(resolved.range.floor, ym(2024, 11));
        assert_eq!(resolved.range.ceiling, ym(2024, 11));
    }

    #[test]
    fn no_entries_with_valid_request_uses_request_as_floor() {
        let resolved = resolve_month(None, Some(ym(2023, 5)), ym(2024, 11));
        assert_eq!(resolved.effective, ym(2023, 5));
        assert_eq!(resolved.range.floor, ym(2023, 5));
        assert_eq!(resolved.range.ceiling, ym(2024, 11));
    }

    #[test]
    fn no_entries_with_future_request_keeps_range_ordered() {
        let resolved = resolve_month(None, Some(ym(2030, 1)), ym(2024, 11));
        assert_eq!(resolved.effective, ym(2024, 11));
        assert_eq!(resolved.range.floor, ym(2024, 11));
        assert!(resolved.range.floor <= resolved.range.ceiling);
    }

    #[test]
    fn request_before_earliest_clamps_to_earliest_month() {
        let resolved = resolve_month(Some(ym(2022, 3)), Some(ym(2020, 1)), ym(2024, 11));
        assert_eq!(resolved.effective, ym(2022, 3));
    }

    #[test]
    fn request_after_current_clamps_to_current_month() {
        let resolved = resolve_month(Some(ym(2024, 4)), Some(ym(2025, 1)), ym(2024, 11));
        assert_eq!(resolved.effective, ym(2024, 11));

        let resolved = resolve_month(Some(ym(2024, 4)), Some(ym(2024, 2)), ym(2024, 11));
        assert_eq!(resolved.effective, ym(2024, 4));
    }

    #[test]
    fn request_inside_range_is_kept() {
        let resolved = resolve_month(Some(ym(2022, 3)), Some(ym(2023, 12)), ym(2024, 11));
        assert_eq!(resolved.effective, ym(2023, 12));
        assert!(resolved.range.contains(resolved.effective));
    }

    #[test]
    fn absent_request_shows_current_month() {
        let resolved = resolve_month(Some(ym(2022, 3)), None, ym(2024, 11));
        assert_eq!(resolved.effective, ym(2024, 11));
        assert_eq!(resolved.range.floor, ym(2022, 3));
    }

    #[test]
    fn partial_or_malformed_requests_are_dropped() {
        assert_eq!(requested_month(Some(2024), None), None);
        assert_eq!(requested_month(None, Some(4)), None);
        assert_eq!(requested_month(Some(2024), Some(13)), None);
        assert_eq!(requested_month(Some(999), Some(1)), None);
        assert_eq!(parse_requested_month("abc", "4"), None);
        assert_eq!(parse_requested_month("2024", ""), None);
        assert_eq!(parse_requested_month(" 2024 ", "04"), Some(ym(2024, 4)));
    }
}
