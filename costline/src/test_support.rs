//! Test-only builders for intervals and job documents.

use chrono::NaiveDate;

use crate::core::cost::CostRates;
use crate::core::day::CalendarDay;
use crate::core::interval::{NormalizedInterval, RawInstant};
use crate::io::job::{DeploymentRecord, JobDocument, ServerId, ServerRecord};

/// Parse a `YYYY-MM-DD` date into a calendar day.
pub fn day(date: &str) -> CalendarDay {
    let parsed = NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .unwrap_or_else(|err| panic!("bad test date {date}: {err}"));
    CalendarDay::from_date(parsed)
}

/// Half-open day range `[from, to)` from two `YYYY-MM-DD` dates.
pub fn span(from: &str, to: &str) -> NormalizedInterval {
    NormalizedInterval::new(day(from), day(to))
}

/// A named server with the given rates.
pub fn server(id: i64, daily: f64, allocation: f64, deallocation: f64) -> ServerRecord {
    ServerRecord {
        id: ServerId(id),
        name: Some(format!("server-{id}")),
        cost: Some(CostRates::new(daily, allocation, deallocation)),
    }
}

/// An active deployment of service 1 on `server`. Dates are passed through
/// verbatim as document text.
pub fn deployment(id: i64, server: i64, date_from: &str, date_to: &str) -> DeploymentRecord {
    DeploymentRecord {
        id: Some(id),
        server: Some(ServerId(server)),
        service: Some(1),
        date_from: Some(RawInstant::Text(date_from.to_string())),
        date_to: Some(RawInstant::Text(date_to.to_string())),
        active: true,
    }
}

pub fn job(servers: Vec<ServerRecord>, deployments: Vec<DeploymentRecord>) -> JobDocument {
    JobDocument {
        server_list: servers,
        deployments,
    }
}
