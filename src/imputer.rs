//! Gap filling over a shared date axis.

use chrono::NaiveDate;
use std::collections::BTreeSet;

use crate::series::TimeSeries;

/// Sorted, de-duplicated union of every date in `series`.
pub fn union_dates<'a>(series: impl IntoIterator<Item = &'a TimeSeries>) -> Vec<NaiveDate> {
    series
        .into_iter()
        .flat_map(TimeSeries::dates)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Walks `axis` (ascending) once and returns one value per date: the
/// series' own value where present, otherwise the last value seen so far,
/// or 0 before the series' first date.
pub fn forward_fill(series: &TimeSeries, axis: &[NaiveDate]) -> Vec<u64> {
    let mut previous = 0;
    axis.iter()
        .map(|&date| {
            if let Some(count) = series.get(date) {
                previous = count;
            }
            previous
        })
        .collect()
}

/// Sums the forward-filled members over the union of their dates.
pub fn sum_forward_filled(members: &[&TimeSeries]) -> TimeSeries {
    let axis = union_dates(members.iter().copied());
    let mut totals = vec![0u64; axis.len()];

    for member in members {
        for (total, value) in totals.iter_mut().zip(forward_fill(member, &axis)) {
            *total = total.saturating_add(value);
        }
    }

    axis.into_iter().zip(totals).collect()
}
