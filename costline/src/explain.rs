//! Per-server cost explanations for a loaded job document.
//!
//! For each server: take its active deployments, admit their intervals under
//! the configured [`DatePolicy`](crate::core::interval::DatePolicy), normalize
//! them to calendar days, then count active days and episodes and
//! reconstruct the cost.

use std::collections::BTreeSet;

use anyhow::{Result, anyhow};
use serde::Serialize;
use tracing::{debug, instrument, warn};

use crate::core::cost::{CostBreakdown, CostRates};
use crate::core::coverage::{active_days, covered_ranges};
use crate::core::episodes::{Episode, GapThreshold, merge_episodes};
use crate::core::interval::{Admission, InvalidInterval, NormalizedInterval, normalize_all};
use crate::io::config::Settings;
use crate::io::job::{JobDocument, ServerId, ServerRecord};

/// Cost breakdown of a single server plus the timeline it was derived from.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerExplanation {
    pub server_id: ServerId,
    pub server_name: Option<String>,
    pub rates: CostRates,
    #[serde(flatten)]
    pub breakdown: CostBreakdown,
    /// `None` when the server has no active days.
    pub cost_line: Option<String>,
    pub episodes: Vec<Episode>,
    pub covered_ranges: Vec<NormalizedInterval>,
    /// Records dropped under the permissive policy.
    pub skipped: usize,
    /// Records refused under the strict policy.
    pub rejected: Vec<RejectedRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectedRecord {
    pub deployment_id: Option<i64>,
    pub message: String,
    pub error: InvalidInterval,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobTotals {
    pub day_cost_total: f64,
    pub episode_cost_total: f64,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobExplanation {
    pub servers: Vec<ServerExplanation>,
    pub totals: JobTotals,
}

impl JobExplanation {
    pub fn rejected_count(&self) -> usize {
        self.servers.iter().map(|server| server.rejected.len()).sum()
    }
}

/// Count active days and episodes of already normalized intervals and price them.
pub fn breakdown_for(
    intervals: &[NormalizedInterval],
    rates: &CostRates,
    gap: GapThreshold,
) -> CostBreakdown {
    let days = active_days(intervals);
    let episodes = merge_episodes(intervals, gap).len();
    CostBreakdown::reconstruct(days, episodes, rates)
}

/// Explain one server of `job`.
#[instrument(skip_all, fields(server = %server.id))]
pub fn explain_server(job: &JobDocument, server: &ServerRecord, settings: &Settings) -> ServerExplanation {
    let mut intervals = Vec::new();
    let mut skipped = 0;
    let mut rejected = Vec::new();

    for deployment in job.active_deployments_on(server.id) {
        match settings
            .policy
            .admit(deployment.date_from.as_ref(), deployment.date_to.as_ref())
        {
            Admission::Accepted(interval) => intervals.push(interval),
            Admission::Skipped(err) => {
                warn!(deployment = ?deployment.id, error = %err, "skipping deployment");
                skipped += 1;
            }
            Admission::Rejected(err) => {
                debug!(deployment = ?deployment.id, error = %err, "rejecting deployment");
                rejected.push(RejectedRecord {
                    deployment_id: deployment.id,
                    message: err.to_string(),
                    error: err,
                });
            }
        }
    }

    let normalized = normalize_all(&settings.frame, &intervals);
    let rates = server.rates();
    let breakdown = breakdown_for(&normalized, &rates, settings.gap);
    debug!(
        intervals = normalized.len(),
        active_days = breakdown.active_days,
        episodes = breakdown.episode_count,
        "server explained"
    );

    ServerExplanation {
        server_id: server.id,
        server_name: server.name.clone(),
        rates,
        cost_line: breakdown.cost_line(&rates).map(|line| line.to_string()),
        breakdown,
        episodes: merge_episodes(&normalized, settings.gap),
        covered_ranges: covered_ranges(&normalized),
        skipped,
        rejected,
    }
}

/// Explain the server with id `id`.
pub fn explain_server_by_id(job: &JobDocument, id: ServerId, settings: &Settings) -> Result<ServerExplanation> {
    let server = job
        .server(id)
        .ok_or_else(|| anyhow!("server {id} not found in job"))?;
    Ok(explain_server(job, server, settings))
}

/// Explain every server of `job`, ordered by id.
#[instrument(skip_all)]
pub fn explain_job(job: &JobDocument, settings: &Settings) -> JobExplanation {
    let known: BTreeSet<ServerId> = job.server_list.iter().map(|server| server.id).collect();
    for deployment in &job.deployments {
        if let Some(server) = deployment.server
            && deployment.active
            && !known.contains(&server)
        {
            warn!(deployment = ?deployment.id, %server, "active deployment on unknown server");
        }
    }

    let mut servers: Vec<ServerExplanation> = job
        .server_list
        .iter()
        .map(|server| explain_server(job, server, settings))
        .collect();
    servers.sort_by_key(|server| server.server_id);

    let mut totals = JobTotals::default();
    for server in &servers {
        totals.day_cost_total += server.breakdown.day_cost_total;
        totals.episode_cost_total += server.breakdown.episode_cost_total;
    }
    totals.total = totals.day_cost_total + totals.episode_cost_total;

    JobExplanation { servers, totals }
}
