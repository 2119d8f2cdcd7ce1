//! Cumulative counts keyed by calendar date.

use chrono::NaiveDate;
use serde::ser::{Serialize, Serializer};
use std::collections::BTreeMap;

/// One observation of a cumulative count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct DatePoint {
    pub date: NaiveDate,
    pub count: u64,
}

/// Ordered mapping from date to cumulative count. Dates need not be
/// contiguous; a gap means the source had no row for that day.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimeSeries {
    points: BTreeMap<NaiveDate, u64>,
}

impl TimeSeries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `count` for `date`, replacing any earlier value for that day.
    pub fn insert(&mut self, date: NaiveDate, count: u64) {
        self.points.insert(date, count);
    }

    pub fn get(&self, date: NaiveDate) -> Option<u64> {
        self.points.get(&date).copied()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The entry with the greatest date, if any.
    pub fn latest(&self) -> Option<DatePoint> {
        self.points
            .last_key_value()
            .map(|(&date, &count)| DatePoint { date, count })
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.points.keys().next().copied()
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.points.keys().copied()
    }

    /// Points in ascending date order.
    pub fn iter(&self) -> impl Iterator<Item = DatePoint> + '_ {
        self.points
            .iter()
            .map(|(&date, &count)| DatePoint { date, count })
    }
}

impl FromIterator<(NaiveDate, u64)> for TimeSeries {
    fn from_iter<I: IntoIterator<Item = (NaiveDate, u64)>>(iter: I) -> Self {
        Self {
            points: iter.into_iter().collect(),
        }
    }
}

/// Serialized as a sequence of `{date, count}` objects, oldest first.
impl Serialize for TimeSeries {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}
