//! Calendar days in a fixed reference offset.

use std::fmt;

use anyhow::{Result, anyhow, bail};
use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, Offset, TimeZone, Utc};
use serde::{Serialize, Serializer};

/// A calendar day stored as a day index (days from the common era, where
/// 0001-01-01 is day 1).
///
/// Only meaningful relative to the [`DayFrame`] that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarDay(i32);

impl CalendarDay {
    pub fn from_date(date: NaiveDate) -> Self {
        Self(date.num_days_from_ce())
    }

    pub fn from_index(index: i32) -> Self {
        Self(index)
    }

    pub fn index(self) -> i32 {
        self.0
    }

    /// The date this day denotes, if it is within chrono's supported range.
    pub fn to_date(self) -> Option<NaiveDate> {
        NaiveDate::from_num_days_from_ce_opt(self.0)
    }

    /// The following day.
    pub fn succ(self) -> Self {
        Self(self.0.saturating_add(1))
    }

    /// Signed number of days from `earlier` to `self`.
    pub fn days_since(self, earlier: CalendarDay) -> i64 {
        i64::from(self.0) - i64::from(earlier.0)
    }
}

impl fmt::Display for CalendarDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_date() {
            Some(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            None => write!(f, "day#{}", self.0),
        }
    }
}

impl Serialize for CalendarDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// The single reference offset every instant is truncated in.
///
/// Both boundaries of an interval, and every interval compared with it, must
/// go through the same frame or day comparisons are meaningless.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayFrame {
    offset: FixedOffset,
}

impl DayFrame {
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    pub fn utc() -> Self {
        Self::new(Utc.fix())
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// Truncate an instant to the calendar day it falls on in this frame.
    pub fn day_of<Tz: TimeZone>(&self, instant: &DateTime<Tz>) -> CalendarDay {
        CalendarDay::from_date(instant.with_timezone(&self.offset).date_naive())
    }
}

impl Default for DayFrame {
    fn default() -> Self {
        Self::utc()
    }
}

/// Parse a UTC offset such as `+02:00`, `-0530`, `+03`, `Z`, or `UTC`.
pub fn parse_utc_offset(raw: &str) -> Result<FixedOffset> {
    let trimmed = raw.trim();
    if trimmed.eq_ignore_ascii_case("z") || trimmed.eq_ignore_ascii_case("utc") {
        return Ok(Utc.fix());
    }

    let (sign, rest) = match trimmed.chars().next() {
        Some('+') => (1, &trimmed[1..]),
        Some('-') => (-1, &trimmed[1..]),
        _ => bail!("utc offset '{raw}' must start with '+' or '-'"),
    };
    let (hours, minutes) = match rest.as_bytes() {
        [h1, h2] if h1.is_ascii_digit() && h2.is_ascii_digit() => (&rest[..2], "00"),
        [h1, h2, m1, m2] if [h1, h2, m1, m2].iter().all(|b| b.is_ascii_digit()) => {
            (&rest[..2], &rest[2..])
        }
        [h1, h2, b':', m1, m2] if [h1, h2, m1, m2].iter().all(|b| b.is_ascii_digit()) => {
            (&rest[..2], &rest[3..])
        }
        _ => bail!("utc offset '{raw}' must look like +HH, +HHMM, or +HH:MM"),
    };
    let hours: i32 = hours.parse()?;
    let minutes: i32 = minutes.parse()?;
    if hours > 23 || minutes > 59 {
        bail!("utc offset '{raw}' is out of range");
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
        .ok_or_else(|| anyhow!("utc offset '{raw}' is out of range"))
}
