//! Deployment episodes: runs of intervals with no real break between them.
//!
//! A server that finishes one deployment on day D and starts the next on D
//! or D+1 is treated as continuously allocated, so no extra
//! allocation/deallocation is charged. Only a larger gap starts a new episode.

use serde::{Deserialize, Serialize};

use crate::core::day::CalendarDay;
use crate::core::interval::NormalizedInterval;

/// Largest distance in days from an episode's running end to the next start
/// that still merges the two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GapThreshold(u32);

impl GapThreshold {
    /// A one-day gap still counts as the same episode.
    pub const DEFAULT: GapThreshold = GapThreshold(1);

    pub const fn days(days: u32) -> Self {
        Self(days)
    }

    pub fn as_days(self) -> u32 {
        self.0
    }

    fn splits(self, current_end: CalendarDay, next_start: CalendarDay) -> bool {
        next_start.days_since(current_end) > i64::from(self.0)
    }
}

impl Default for GapThreshold {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// A maximal group of merged intervals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Episode {
    pub start_day: CalendarDay,
    /// Furthest `end_day` of any member interval.
    pub end_day: CalendarDay,
    /// Number of intervals merged into this episode.
    pub intervals: usize,
}

impl Episode {
    fn open(interval: &NormalizedInterval) -> Self {
        Self {
            start_day: interval.start_day,
            end_day: interval.end_day,
            intervals: 1,
        }
    }

    pub fn span(&self) -> NormalizedInterval {
        NormalizedInterval::new(self.start_day, self.end_day)
    }
}

/// Sort `intervals` by start and merge them into episodes.
///
/// A new episode opens whenever the next start lies more than `threshold`
/// days after the furthest end seen so far; otherwise the interval extends
/// the current episode.
pub fn merge_episodes(intervals: &[NormalizedInterval], threshold: GapThreshold) -> Vec<Episode> {
    // Ties on start are broken by end so reversed intervals merge the same
    // way whatever order they arrive in.
    let mut sorted = intervals.to_vec();
    sorted.sort_unstable();

    let mut episodes: Vec<Episode> = Vec::new();
    for interval in &sorted {
        match episodes.last_mut() {
            Some(current) if !threshold.splits(current.end_day, interval.start_day) => {
                current.end_day = current.end_day.max(interval.end_day);
                current.intervals += 1;
            }
            _ => episodes.push(Episode::open(interval)),
        }
    }
    episodes
}

/// Number of episodes: 0 for no intervals, otherwise between 1 and
/// `intervals.len()`. Independent of input order.
pub fn count_episodes(intervals: &[NormalizedInterval], threshold: GapThreshold) -> usize {
    merge_episodes(intervals, threshold).len()
}
