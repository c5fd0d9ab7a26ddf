//! Cost reconstruction from active days and episodes.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Per-server cost rates as supplied by the job document. Missing rates read
/// as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostRates {
    pub daily: f64,
    pub allocation: f64,
    pub deallocation: f64,
}

impl CostRates {
    pub fn new(daily: f64, allocation: f64, deallocation: f64) -> Self {
        Self {
            daily,
            allocation,
            deallocation,
        }
    }

    /// What one episode costs: allocating the server once and releasing it once.
    pub fn episode_rate(&self) -> f64 {
        self.allocation + self.deallocation
    }
}

/// Reconstructed cost of one server.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CostBreakdown {
    pub active_days: usize,
    pub episode_count: usize,
    pub day_cost_total: f64,
    pub episode_cost_total: f64,
}

impl CostBreakdown {
    pub fn reconstruct(active_days: usize, episode_count: usize, rates: &CostRates) -> Self {
        Self {
            active_days,
            episode_count,
            day_cost_total: active_days as f64 * rates.daily,
            episode_cost_total: episode_count as f64 * rates.episode_rate(),
        }
    }

    pub fn total(&self) -> f64 {
        self.day_cost_total + self.episode_cost_total
    }

    /// The line shown next to a server, or `None` when it was never active.
    ///
    /// A server without active days shows no cost at all rather than a zero.
    pub fn cost_line(&self, rates: &CostRates) -> Option<CostLine> {
        if self.active_days == 0 {
            return None;
        }
        Some(CostLine {
            day_cost_total: self.day_cost_total,
            episode_rate: rates.episode_rate(),
            episode_count: self.episode_count,
        })
    }
}

/// Displayable cost expression: `day_cost_total + episode_rate * episode_count`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CostLine {
    pub day_cost_total: f64,
    pub episode_rate: f64,
    pub episode_count: usize,
}

impl fmt::Display for CostLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} + {} * {}",
            self.day_cost_total, self.episode_rate, self.episode_count
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reconstructs_day_and_episode_totals() {
        let rates = CostRates::new(10.0, 5.0, 2.0);
        let breakdown = CostBreakdown::reconstruct(3, 1, &rates);
        assert_eq!(breakdown.day_cost_total, 30.0);
        assert_eq!(breakdown.episode_cost_total, 7.0);
        assert_eq!(breakdown.total(), 37.0);
    }

    #[test]
    fn cost_line_formats_rate_expression() {
        let rates = CostRates::new(10.0, 5.0, 2.0);
        let breakdown = CostBreakdown::reconstruct(5, 2, &rates);
        let line = breakdown.cost_line(&rates).expect("active server has a line");
        assert_eq!(line.to_string(), "50 + 7 * 2");
    }

    #[test]
    fn inactive_server_has_no_cost_line() {
        let rates = CostRates::new(10.0, 5.0, 2.0);
        let breakdown = CostBreakdown::reconstruct(0, 0, &rates);
        assert_eq!(breakdown.cost_line(&rates), None);
        assert_eq!(breakdown.total(), 0.0);
    }

    #[test]
    fn episodes_without_active_days_still_total_but_show_no_line() {
        // Same-day deployments form an episode yet cover zero days.
        let rates = CostRates::new(10.0, 5.0, 2.0);
        let breakdown = CostBreakdown::reconstruct(0, 1, &rates);
        assert_eq!(breakdown.episode_cost_total, 7.0);
        assert!(breakdown.cost_line(&rates).is_none());
    }

    #[test]
    fn fractional_rates_keep_precision() {
        let rates = CostRates::new(1.5, 0.25, 0.25);
        let breakdown = CostBreakdown::reconstruct(4, 3, &rates);
        assert_eq!(breakdown.day_cost_total, 6.0);
        assert_eq!(breakdown.episode_cost_total, 1.5);
        assert_eq!(breakdown.cost_line(&rates).unwrap().to_string(), "6 + 0.5 * 3");
    }
}
