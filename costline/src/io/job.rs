//! Solved job documents as produced by the scheduling backend.
//!
//! Only the fields needed for cost reconstruction are modelled; everything
//! else in the document (services, requests, score, solver status) is ignored.

use std::fmt;
use std::fs;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::core::cost::CostRates;
use crate::core::interval::RawInstant;

/// Server identifier as used in `serverList[].id` and `deployments[].server`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServerId(pub i64);

impl fmt::Display for ServerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The subset of a solved job document consumed here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobDocument {
    #[serde(default)]
    pub server_list: Vec<ServerRecord>,
    #[serde(default)]
    pub deployments: Vec<DeploymentRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerRecord {
    pub id: ServerId,
    #[serde(default)]
    pub name: Option<String>,
    /// Missing cost means the server is free to run.
    #[serde(default)]
    pub cost: Option<CostRates>,
}

impl ServerRecord {
    pub fn rates(&self) -> CostRates {
        self.cost.unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentRecord {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub server: Option<ServerId>,
    #[serde(default)]
    pub service: Option<i64>,
    #[serde(default)]
    pub date_from: Option<RawInstant>,
    #[serde(default)]
    pub date_to: Option<RawInstant>,
    #[serde(default)]
    pub active: bool,
}

impl JobDocument {
    pub fn server(&self, id: ServerId) -> Option<&ServerRecord> {
        self.server_list.iter().find(|server| server.id == id)
    }

    /// Active deployments placed on `id`, in document order.
    pub fn active_deployments_on(&self, id: ServerId) -> impl Iterator<Item = &DeploymentRecord> {
        self.deployments
            .iter()
            .filter(move |deployment| deployment.active && deployment.server == Some(id))
    }
}

/// Parse a job document from JSON text.
pub fn parse_job(contents: &str) -> Result<JobDocument> {
    serde_json::from_str(contents).context("parse job document")
}

/// Load a job document from `path`, or from stdin when `path` is `-`.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn load_job(path: &Path) -> Result<JobDocument> {
    let contents = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("read job document from stdin")?;
        buf
    } else {
        fs::read_to_string(path).with_context(|| format!("read job {}", path.display()))?
    };
    let job = parse_job(&contents).with_context(|| format!("load job {}", path.display()))?;
    debug!(
        servers = job.server_list.len(),
        deployments = job.deployments.len(),
        "job document loaded"
    );
    Ok(job)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOLVED_JOB: &str = r#"{
        "solverStatus": "NOT_SOLVING",
        "score": "0hard/-123soft",
        "serverList": [
            {"id": 1, "name": "edge-riga", "cpuCores": 8, "region": "EU",
             "cost": {"id": 4, "daily": 10.0, "allocation": 5.0, "deallocation": 2.0}},
            {"id": 2, "name": "edge-tallinn"}
        ],
        "serviceList": [{"id": 3, "name": "auth"}],
        "deployments": [
            {"id": 7, "server": 1, "service": 3, "dateFrom": "2024-01-01T00:00:00.000+00:00",
             "dateTo": "2024-01-04T00:00:00.000+00:00", "active": true, "requests": [11]},
            {"id": 8, "server": 1, "service": null, "dateFrom": 1704067200000,
             "dateTo": null, "active": false},
            {"id": 9, "server": null, "service": 3, "active": false}
        ]
    }"#;

    #[test]
    fn parses_solved_job_ignoring_unknown_fields() {
        let job = parse_job(SOLVED_JOB).expect("job parses");
        assert_eq!(job.server_list.len(), 2);
        assert_eq!(job.deployments.len(), 3);

        let deployment = &job.deployments[1];
        assert_eq!(deployment.date_from, Some(RawInstant::EpochMillis(1_704_067_200_000)));
        assert_eq!(deployment.date_to, None);
        assert_eq!(job.deployments[2].server, None);
    }

    #[test]
    fn missing_cost_reads_as_zero_rates() {
        let job = parse_job(SOLVED_JOB).expect("job parses");
        let riga = job.server(ServerId(1)).expect("server 1");
        assert_eq!(riga.rates(), CostRates::new(10.0, 5.0, 2.0));
        let tallinn = job.server(ServerId(2)).expect("server 2");
        assert_eq!(tallinn.rates(), CostRates::default());
        assert_eq!(tallinn.name.as_deref(), Some("edge-tallinn"));
    }

    #[test]
    fn filters_active_deployments_per_server() {
        let job = parse_job(SOLVED_JOB).expect("job parses");
        let ids: Vec<_> = job
            .active_deployments_on(ServerId(1))
            .map(|deployment| deployment.id)
            .collect();
        assert_eq!(ids, vec![Some(7)]);
        assert_eq!(job.active_deployments_on(ServerId(2)).count(), 0);
    }

    #[test]
    fn odd_date_values_do_not_fail_the_document() {
        let contents = r#"{
            "serverList": [{"id": 1, "cost": {"daily": 10, "allocation": 5, "deallocation": 2}}],
            "deployments": [
                {"id": 1, "server": 1, "dateFrom": "2024-01-01", "dateTo": "2024-01-04", "active": true},
                {"id": 2, "server": 1, "dateFrom": 1704067200000.0, "dateTo": "2024-01-20", "active": true},
                {"id": 3, "server": 1, "dateFrom": true, "dateTo": {"at": "2024-02-01"}, "active": true}
            ]
        }"#;
        let job = parse_job(contents).expect("job parses despite odd dates");
        assert!(matches!(job.deployments[1].date_from, Some(RawInstant::Other(_))));
        assert_eq!(job.deployments[2].date_from.as_ref().and_then(RawInstant::parse), None);

        let explanation = crate::explain::explain_server_by_id(
            &job,
            ServerId(1),
            &crate::io::config::Settings::default(),
        )
        .expect("server exists");
        assert_eq!(explanation.skipped, 2);
        assert_eq!(explanation.breakdown.active_days, 3);
        assert_eq!(explanation.breakdown.episode_count, 1);
    }

    #[test]
    fn load_reports_path_on_parse_failure() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("job.json");
        fs::write(&path, "{not json").expect("write");
        let err = load_job(&path).expect_err("invalid json");
        assert!(format!("{err:#}").contains("job.json"));
    }

    #[test]
    fn load_reads_file() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("job.json");
        fs::write(&path, SOLVED_JOB).expect("write");
        let job = load_job(&path).expect("load");
        assert_eq!(job.server_list[0].name.as_deref(), Some("edge-riga"));
    }
}
