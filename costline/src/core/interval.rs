//! Deployment intervals and their day-granular normalization.

use std::fmt;
use std::iter::successors;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::day::{CalendarDay, DayFrame};

/// An instant as it appears in a job document: ISO-8601 text or epoch
/// milliseconds, depending on how the producing backend serialized dates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawInstant {
    EpochMillis(i64),
    Text(String),
    /// Any other JSON value (fractional epoch, boolean, object). Never parses,
    /// so the record fails on its own instead of the whole document.
    Other(serde_json::Value),
}

impl RawInstant {
    /// Parse into a UTC instant.
    ///
    /// Accepts RFC 3339, `%z` offsets without a colon, offset-less date-times
    /// and bare dates. The last two are read as UTC.
    pub fn parse(&self) -> Option<DateTime<Utc>> {
        match self {
            RawInstant::EpochMillis(millis) => DateTime::from_timestamp_millis(*millis),
            RawInstant::Text(text) => parse_instant_text(text.trim()),
            RawInstant::Other(_) => None,
        }
    }
}

impl fmt::Display for RawInstant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawInstant::EpochMillis(millis) => write!(f, "{millis}"),
            RawInstant::Text(text) => f.write_str(text),
            RawInstant::Other(value) => write!(f, "{value}"),
        }
    }
}

fn parse_instant_text(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(parsed) = DateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f%z") {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Which end of a deployment a problem refers to, named as in the job document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Boundary {
    DateFrom,
    DateTo,
}

impl fmt::Display for Boundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Boundary::DateFrom => f.write_str("dateFrom"),
            Boundary::DateTo => f.write_str("dateTo"),
        }
    }
}

/// Why a deployment record could not be turned into a usable interval.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InvalidInterval {
    #[error("{field} is missing")]
    Missing { field: Boundary },
    #[error("{field} '{value}' is not a valid instant")]
    Unparsable { field: Boundary, value: String },
    #[error("dateTo {end} is before dateFrom {start}")]
    Reversed { start: String, end: String },
}

/// How records with broken dates are treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatePolicy {
    /// Skip records whose dates cannot be read and keep reversed intervals,
    /// which then cover no days.
    #[default]
    Permissive,
    /// Reject unreadable and reversed records, reporting each one.
    Strict,
}

/// What a [`DatePolicy`] decided for one deployment record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    Accepted(Interval),
    /// Left out silently apart from a log line.
    Skipped(InvalidInterval),
    /// Left out and reported back to the caller.
    Rejected(InvalidInterval),
}

impl DatePolicy {
    pub fn admit(self, date_from: Option<&RawInstant>, date_to: Option<&RawInstant>) -> Admission {
        let parsed = Interval::from_raw(date_from, date_to);
        match self {
            DatePolicy::Permissive => match parsed {
                Ok(interval) => Admission::Accepted(interval),
                Err(err) => Admission::Skipped(err),
            },
            DatePolicy::Strict => match parsed.and_then(Interval::ensure_ordered) {
                Ok(interval) => Admission::Accepted(interval),
                Err(err) => Admission::Rejected(err),
            },
        }
    }
}

/// One deployment's active period on a server.
///
/// `start <= end` is expected but not enforced; see [`Interval::ensure_ordered`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Interval {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Build an interval from the raw `dateFrom`/`dateTo` of a deployment.
    pub fn from_raw(
        date_from: Option<&RawInstant>,
        date_to: Option<&RawInstant>,
    ) -> Result<Self, InvalidInterval> {
        let start = parse_boundary(date_from, Boundary::DateFrom)?;
        let end = parse_boundary(date_to, Boundary::DateTo)?;
        Ok(Self::new(start, end))
    }

    pub fn is_reversed(&self) -> bool {
        self.end < self.start
    }

    /// Reject intervals that end before they start.
    pub fn ensure_ordered(self) -> Result<Self, InvalidInterval> {
        if self.is_reversed() {
            return Err(InvalidInterval::Reversed {
                start: self.start.to_rfc3339(),
                end: self.end.to_rfc3339(),
            });
        }
        Ok(self)
    }

    /// Truncate both ends to their calendar day in `frame`.
    ///
    /// No clamping or reordering: a reversed interval stays reversed.
    pub fn normalize(&self, frame: &DayFrame) -> NormalizedInterval {
        NormalizedInterval::new(frame.day_of(&self.start), frame.day_of(&self.end))
    }
}

fn parse_boundary(
    raw: Option<&RawInstant>,
    field: Boundary,
) -> Result<DateTime<Utc>, InvalidInterval> {
    let raw = raw.ok_or(InvalidInterval::Missing { field })?;
    raw.parse().ok_or_else(|| InvalidInterval::Unparsable {
        field,
        value: raw.to_string(),
    })
}

/// Normalize every interval through the same frame.
pub fn normalize_all(frame: &DayFrame, intervals: &[Interval]) -> Vec<NormalizedInterval> {
    intervals
        .iter()
        .map(|interval| interval.normalize(frame))
        .collect()
}

/// Day-granular interval covering the half-open range `[start_day, end_day)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedInterval {
    pub start_day: CalendarDay,
    pub end_day: CalendarDay,
}

impl NormalizedInterval {
    pub fn new(start_day: CalendarDay, end_day: CalendarDay) -> Self {
        Self { start_day, end_day }
    }

    /// Days covered, in order. Empty when `end_day <= start_day`.
    pub fn days(&self) -> impl Iterator<Item = CalendarDay> + use<> {
        let end_day = self.end_day;
        successors(Some(self.start_day), |day| Some(day.succ())).take_while(move |day| *day < end_day)
    }

    /// Number of days covered; zero for empty or reversed intervals.
    pub fn len_days(&self) -> u64 {
        u64::try_from(self.end_day.days_since(self.start_day)).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len_days() == 0
    }
}
