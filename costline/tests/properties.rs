//! Order and duplication invariants of the timeline counters.

use proptest::collection::vec;
use proptest::prelude::*;

use costline::core::coverage::{active_days, covered_ranges};
use costline::core::day::CalendarDay;
use costline::core::episodes::{GapThreshold, count_episodes};
use costline::core::interval::NormalizedInterval;

/// 2024-01-01 as a day index.
const BASE: i32 = 738_886;

fn interval() -> impl Strategy<Value = NormalizedInterval> {
    (0i32..90, -3i32..20).prop_map(|(offset, len)| {
        NormalizedInterval::new(
            CalendarDay::from_index(BASE + offset),
            CalendarDay::from_index(BASE + offset + len),
        )
    })
}

fn intervals_and_shuffle() -> impl Strategy<Value = (Vec<NormalizedInterval>, Vec<NormalizedInterval>)> {
    vec(interval(), 0..12).prop_flat_map(|intervals| {
        let shuffled = Just(intervals.clone()).prop_shuffle();
        (Just(intervals), shuffled)
    })
}

/// Days in the union, found by probing every day in the bounding window.
fn brute_force_days(intervals: &[NormalizedInterval]) -> usize {
    (BASE - 5..BASE + 120)
        .map(CalendarDay::from_index)
        .filter(|day| {
            intervals
                .iter()
                .any(|interval| interval.start_day <= *day && *day < interval.end_day)
        })
        .count()
}

proptest! {
    #[test]
    fn coverage_matches_union_of_days(intervals in vec(interval(), 0..12)) {
        let counted = active_days(&intervals);
        prop_assert_eq!(counted, brute_force_days(&intervals));
        let ranged: u64 = covered_ranges(&intervals).iter().map(NormalizedInterval::len_days).sum();
        prop_assert_eq!(counted as u64, ranged);
    }

    #[test]
    fn coverage_ignores_order_and_duplicates((intervals, shuffled) in intervals_and_shuffle()) {
        prop_assert_eq!(active_days(&intervals), active_days(&shuffled));
        let mut doubled = intervals.clone();
        doubled.extend(intervals.iter().copied());
        prop_assert_eq!(active_days(&doubled), active_days(&intervals));
    }

    #[test]
    fn episodes_ignore_order((intervals, shuffled) in intervals_and_shuffle()) {
        prop_assert_eq!(
            count_episodes(&intervals, GapThreshold::DEFAULT),
            count_episodes(&shuffled, GapThreshold::DEFAULT)
        );
    }

    #[test]
    fn episode_count_is_bounded(intervals in vec(interval(), 0..12)) {
        let count = count_episodes(&intervals, GapThreshold::DEFAULT);
        prop_assert!(count <= intervals.len());
        prop_assert_eq!(count == 0, intervals.is_empty());
    }

    #[test]
    fn single_interval_is_one_episode(single in interval()) {
        prop_assert_eq!(count_episodes(&[single], GapThreshold::DEFAULT), 1);
    }

    #[test]
    fn wider_threshold_never_adds_episodes(intervals in vec(interval(), 0..12), gap in 0u32..5) {
        let narrow = count_episodes(&intervals, GapThreshold::days(gap));
        let wide = count_episodes(&intervals, GapThreshold::days(gap + 1));
        prop_assert!(wide <= narrow);
    }
}
