//! Text and JSON presentation of explanations.

use std::fmt::Write as _;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::explain::{JobExplanation, ServerExplanation};

/// One summary line per server followed by job totals.
pub fn render_job_text(job: &JobExplanation) -> String {
    let mut out = String::new();
    for server in &job.servers {
        out.push_str(&render_server_text(server));
    }
    let _ = writeln!(
        out,
        "total: day_cost={} episode_cost={} total={}",
        job.totals.day_cost_total, job.totals.episode_cost_total, job.totals.total
    );
    out
}

/// Summary line for one server, plus one line per rejected record.
pub fn render_server_text(server: &ServerExplanation) -> String {
    let mut out = String::new();
    let name = server.server_name.as_deref().unwrap_or("-");
    let breakdown = &server.breakdown;
    match &server.cost_line {
        Some(line) => {
            let _ = write!(
                out,
                "server {} {}: active_days={} episodes={} cost={} total={}",
                server.server_id,
                name,
                breakdown.active_days,
                breakdown.episode_count,
                line,
                breakdown.total()
            );
        }
        None => {
            let _ = write!(out, "server {} {}: not active", server.server_id, name);
        }
    }
    if server.skipped > 0 {
        let _ = write!(out, " skipped={}", server.skipped);
    }
    out.push('\n');
    for rejected in &server.rejected {
        let deployment = rejected
            .deployment_id
            .map_or_else(|| "?".to_string(), |id| id.to_string());
        let _ = writeln!(out, "  rejected deployment={}: {}", deployment, rejected.message);
    }
    out
}

/// Episode and coverage listing for one server.
///
/// Ranges are half-open: the end day itself is not active.
pub fn render_episodes_text(server: &ServerExplanation) -> String {
    let mut out = render_server_text(server);
    for (index, episode) in server.episodes.iter().enumerate() {
        let _ = writeln!(
            out,
            "  episode {}: [{}, {}) deployments={}",
            index + 1,
            episode.start_day,
            episode.end_day,
            episode.intervals
        );
    }
    for range in &server.covered_ranges {
        let _ = writeln!(
            out,
            "  active: [{}, {}) days={}",
            range.start_day,
            range.end_day,
            range.len_days()
        );
    }
    out
}

/// Pretty JSON with a trailing newline.
pub fn render_json<T: Serialize>(value: &T) -> Result<String> {
    let mut payload = serde_json::to_string_pretty(value).context("serialize json")?;
    payload.push('\n');
    Ok(payload)
}
