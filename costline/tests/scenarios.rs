//! Reference scenarios for day coverage, episode counting, and cost.

use costline::core::cost::{CostBreakdown, CostRates};
use costline::core::coverage::active_days;
use costline::core::episodes::{GapThreshold, count_episodes};
use costline::core::interval::NormalizedInterval;
use costline::test_support::span;

fn counts(intervals: &[NormalizedInterval]) -> (usize, usize) {
    (
        active_days(intervals),
        count_episodes(intervals, GapThreshold::DEFAULT),
    )
}

#[test]
fn single_interval() {
    assert_eq!(counts(&[span("2024-01-01", "2024-01-04")]), (3, 1));
}

#[test]
fn touching_intervals_form_one_episode() {
    let intervals = [
        span("2024-01-01", "2024-01-04"),
        span("2024-01-04", "2024-01-06"),
    ];
    assert_eq!(counts(&intervals), (5, 1));
}

#[test]
fn large_gap_forms_two_episodes() {
    let intervals = [
        span("2024-01-01", "2024-01-03"),
        span("2024-01-10", "2024-01-12"),
    ];
    assert_eq!(counts(&intervals), (4, 2));
}

#[test]
fn out_of_order_with_one_empty_day_between() {
    let intervals = [
        span("2024-01-05", "2024-01-07"),
        span("2024-01-01", "2024-01-03"),
    ];
    assert_eq!(counts(&intervals), (4, 2));
}

#[test]
fn empty_list_has_no_cost_line() {
    let (days, episodes) = counts(&[]);
    assert_eq!((days, episodes), (0, 0));
    let rates = CostRates::new(10.0, 5.0, 2.0);
    let breakdown = CostBreakdown::reconstruct(days, episodes, &rates);
    assert!(breakdown.cost_line(&rates).is_none());
}

#[test]
fn cost_for_single_interval() {
    let (days, episodes) = counts(&[span("2024-01-01", "2024-01-04")]);
    let rates = CostRates::new(10.0, 5.0, 2.0);
    let breakdown = CostBreakdown::reconstruct(days, episodes, &rates);
    assert_eq!(breakdown.day_cost_total, 30.0);
    assert_eq!(breakdown.episode_cost_total, 7.0);
}

#[test]
fn same_day_deployment_costs_no_days() {
    // Start and end on the same day: the half-open range is empty.
    assert_eq!(counts(&[span("2024-01-01", "2024-01-01")]), (0, 1));
}
