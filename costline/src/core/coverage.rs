//! Day coverage across a server's deployment intervals.

use std::collections::HashSet;

use crate::core::interval::NormalizedInterval;

/// Count distinct calendar days covered by the union of `intervals`.
///
/// Days covered by several overlapping intervals count once. Empty and
/// reversed intervals contribute nothing. Cost is proportional to the total
/// number of days spanned, which stays small for month- to year-scale plans.
pub fn active_days(intervals: &[NormalizedInterval]) -> usize {
    let mut days = HashSet::new();
    for interval in intervals {
        days.extend(interval.days());
    }
    days.len()
}

/// The union of `intervals` as sorted, disjoint, non-touching day ranges.
///
/// The summed length of the returned ranges equals [`active_days`].
pub fn covered_ranges(intervals: &[NormalizedInterval]) -> Vec<NormalizedInterval> {
    let mut sorted: Vec<NormalizedInterval> = intervals
        .iter()
        .copied()
        .filter(|interval| !interval.is_empty())
        .collect();
    sorted.sort();

    let mut merged: Vec<NormalizedInterval> = Vec::with_capacity(sorted.len());
    for interval in sorted {
        match merged.last_mut() {
            Some(last) if interval.start_day <= last.end_day => {
                last.end_day = last.end_day.max(interval.end_day);
            }
            _ => merged.push(interval),
        }
    }
    merged
}
