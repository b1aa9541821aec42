//! Month view read model handed to presentation.
//!
//! # Invariants
//! - `floor <= effective <= ceiling` by month ordinal.
//! - `entries` are sorted by day and all fall inside the effective month.

use crate::model::date::YearMonth;
use crate::model::entry::{Entry, EntryValue};
use serde::Serialize;

/// Navigable bounds for one principal, at month granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonthRange {
    /// Earliest navigable month.
    pub floor: YearMonth,
    /// Latest navigable month (the current month).
    pub ceiling: YearMonth,
}

impl MonthRange {
    pub fn contains(&self, month: YearMonth) -> bool {
        self.floor <= month && month <= self.ceiling
    }
}

/// Result of clamping a requested month into a principal's range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResolvedMonth {
    /// Month to display.
    pub effective: YearMonth,
    pub range: MonthRange,
}

/// One month of entries ready for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthView {
    /// Month actually displayed after clamping.
    pub effective: YearMonth,
    pub floor: YearMonth,
    pub ceiling: YearMonth,
    pub days_in_month: u32,
    /// Sparse: days without a stored value are absent.
    pub entries: Vec<Entry>,
}

impl MonthView {
    pub fn year(&self) -> i32 {
        self.effective.year()
    }

    pub fn month(&self) -> u32 {
        self.effective.month()
    }

    /// Whether navigating to an earlier month is allowed.
    pub fn has_previous(&self) -> bool {
        self.effective > self.floor
    }

    /// Whether navigating to a later month is allowed.
    pub fn has_next(&self) -> bool {
        self.effective < self.ceiling
    }

    /// Previous navigable month, if any.
    pub fn previous(&self) -> Option<YearMonth> {
        if !self.has_previous() {
            return None;
        }
        self.effective.previous()
    }

    /// Next navigable month, if any.
    pub fn next(&self) -> Option<YearMonth> {
        if !self.has_next() {
            return None;
        }
        self.effective.next()
    }

    pub fn value_for_day(&self, day: u32) -> Option<EntryValue> {
        self.entries
            .binary_search_by_key(&day, |entry| entry.date.day())
            .ok()
            .map(|index| self.entries[index].value)
    }

    /// Every day of the month paired with its value, in day order.
    pub fn days(&self) -> impl Iterator<Item = (u32, Option<EntryValue>)> + '_ {
        let mut entries = self.entries.iter().peekable();
        (1..=self.days_in_month).map(move |day| {
            let value = entries
                .next_if(|entry| entry.date.day() == day)
                .map(|entry| entry.value);
            (day, value)
        })
    }

    /// Sum of all values recorded in this month.
    pub fn total(&self) -> i64 {
        self.entries.iter().map(|entry| entry.value.get()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::MonthView;
    use crate::model::date::{DateKey, YearMonth};
    use crate::model::entry::{Entry, EntryValue, Principal};

    fn view(
        effective: (i64, i64),
        floor: (i64, i64),
        ceiling: (i64, i64),
        days: &[(u32, i64)],
    ) -> MonthView {
        let principal = Principal::new(1);
        let entries = days
            .iter()
            .map(|(day, value)| {
                Entry::new(
                    principal,
                    DateKey::new(effective.0, effective.1, i64::from(*day)).unwrap(),
                    EntryValue::new(*value).unwrap(),
                )
            })
            .collect();
        let month = YearMonth::new(effective.0, effective.1).unwrap();
        MonthView {
            effective: month,
            floor: YearMonth::new(floor.0, floor.1).unwrap(),
            ceiling: YearMonth::new(ceiling.0, ceiling.1).unwrap(),
            days_in_month: month.days(),
            entries,
        }
    }

    #[test]
    fn navigation_flags_follow_range_edges() {
        let at_floor = view((2024, 4), (2024, 4), (2024, 11), &[]);
        assert!(!at_floor.has_previous());
        assert!(at_floor.has_next());
        assert_eq!(at_floor.next(), Some(YearMonth::new(2024, 5).unwrap()));
        assert_eq!(at_floor.previous(), None);

        let at_ceiling = view((2024, 11), (2024, 4), (2024, 11), &[]);
        assert!(at_ceiling.has_previous());
        assert!(!at_ceiling.has_next());
        assert_eq!(at_ceiling.next(), None);
    }

    #[test]
    fn dense_days_fill_gaps_with_none() {
        let month = view((2024, 2), (2024, 1), (2024, 3), &[(2, 10), (29, 3)]);
        let days: Vec<_> = month.days().collect();
        assert_eq!(days.len(), 29);
        assert_eq!(days[0], (1, None));
        assert_eq!(days[1], (2, Some(EntryValue::new(10).unwrap())));
        assert_eq!(days[28], (29, Some(EntryValue::new(3).unwrap())));
        assert_eq!(month.value_for_day(29).map(|value| value.get()), Some(3));
        assert_eq!(month.value_for_day(15), None);
        assert_eq!(month.total(), 13);
    }
}
