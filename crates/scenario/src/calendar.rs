//! Days the cruise operates.

use std::collections::BTreeSet;

use chrono::NaiveDate;

/// Ordered, read-only set of event days loaded at startup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventCalendar {
    days: BTreeSet<NaiveDate>,
}

impl EventCalendar {
    pub fn new(days: impl IntoIterator<Item = NaiveDate>) -> Self {
        Self {
            days: days.into_iter().collect(),
        }
    }

    pub fn is_event_day(&self, date: NaiveDate) -> bool {
        self.days.contains(&date)
    }

    /// First event day on or after `date`.
    pub fn next_event_day(&self, date: NaiveDate) -> Option<NaiveDate> {
        self.days.range(date..).next().copied()
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

impl FromIterator<NaiveDate> for EventCalendar {
    fn from_iter<I: IntoIterator<Item = NaiveDate>>(iter: I) -> Self {
        Self::new(iter)
    }
}
