//! CF-convention time axes ("hours since 1800-01-01 00:00:0.0").

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Unit of a CF time offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeUnit {
    Seconds,
    Minutes,
    Hours,
    Days,
}

impl TimeUnit {
    fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "s" | "sec" | "secs" | "second" | "seconds" => Some(TimeUnit::Seconds),
            "min" | "mins" | "minute" | "minutes" => Some(TimeUnit::Minutes),
            "h" | "hr" | "hrs" | "hour" | "hours" => Some(TimeUnit::Hours),
            "d" | "day" | "days" => Some(TimeUnit::Days),
            _ => None,
        }
    }

    fn milliseconds(self) -> f64 {
        match self {
            TimeUnit::Seconds => 1_000.0,
            TimeUnit::Minutes => 60_000.0,
            TimeUnit::Hours => 3_600_000.0,
            TimeUnit::Days => 86_400_000.0,
        }
    }
}

/// A decoded time coordinate: epoch, unit and raw offsets.
#[derive(Debug, Clone, PartialEq)]
pub struct CfTimeAxis {
    pub unit: TimeUnit,
    pub epoch: DateTime<Utc>,
    pub offsets: Vec<f64>,
}

impl CfTimeAxis {
    /// Parse a CF `units` attribute and attach the raw offsets.
    pub fn parse(units: &str, offsets: Vec<f64>) -> Result<Self, TimeParseError> {
        let (unit_str, epoch_str) = units
            .split_once(" since ")
            .ok_or_else(|| TimeParseError::InvalidFormat(units.to_string()))?;

        let unit = TimeUnit::parse(unit_str.trim())
            .ok_or_else(|| TimeParseError::UnsupportedUnit(unit_str.trim().to_string()))?;
        let epoch = parse_epoch(epoch_str.trim())?;

        Ok(Self {
            unit,
            epoch,
            offsets,
        })
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// Calendar time of step `index`, `None` when out of bounds.
    pub fn datetime(&self, index: usize) -> Option<DateTime<Utc>> {
        let offset = *self.offsets.get(index)?;
        let millis = offset * self.unit.milliseconds();
        if !millis.is_finite() {
            return None;
        }
        let delta = Duration::try_milliseconds(millis.round() as i64)?;
        self.epoch.checked_add_signed(delta)
    }
}

/// Title text for a time step, e.g. `2019-03-28 06:00`.
pub fn format_title(time: &DateTime<Utc>) -> String {
    time.format("%Y-%m-%d %H:%M").to_string()
}

/// Parse the reference date of a CF units string.
///
/// Accepts unpadded fields and fractional seconds (`1800-1-1 00:00:0.0`),
/// ISO `T` separators and a trailing `Z` / `UTC`.
fn parse_epoch(s: &str) -> Result<DateTime<Utc>, TimeParseError> {
    let cleaned = s
        .trim_end_matches('Z')
        .trim_end_matches("UTC")
        .trim_end_matches("+00:00")
        .trim()
        .replace('T', " ");

    let mut parts = cleaned.split_whitespace();
    let date_part = parts
        .next()
        .ok_or_else(|| TimeParseError::InvalidFormat(s.to_string()))?;
    let time_part = parts.next();

    let mut ymd = date_part.split('-');
    let mut next_num = |name: &str| -> Result<u32, TimeParseError> {
        ymd.next()
            .and_then(|v| v.parse::<u32>().ok())
            .ok_or_else(|| TimeParseError::InvalidFormat(format!("{}: bad {}", s, name)))
    };
    let year = next_num("year")? as i32;
    let month = next_num("month")?;
    let day = next_num("day")?;
    let date = NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| TimeParseError::InvalidFormat(s.to_string()))?;

    let time = match time_part {
        None => NaiveTime::MIN,
        Some(t) => parse_clock(t).ok_or_else(|| TimeParseError::InvalidFormat(s.to_string()))?,
    };

    Ok(Utc.from_utc_datetime(&NaiveDateTime::new(date, time)))
}

fn parse_clock(t: &str) -> Option<NaiveTime> {
    let mut fields = t.split(':');
    let hour: u32 = fields.next()?.parse().ok()?;
    let minute: u32 = fields.next().map(|m| m.parse().ok()).unwrap_or(Some(0))?;
    let seconds: f64 = fields.next().map(|s| s.parse().ok()).unwrap_or(Some(0.0))?;
    let whole = seconds.trunc() as u32;
    let nanos = ((seconds - seconds.trunc()) * 1e9).round() as u32;
    NaiveTime::from_hms_nano_opt(hour, minute, whole, nanos)
}

#[derive(Debug, thiserror::Error)]
pub enum TimeParseError {
    #[error("Invalid time units format: {0}")]
    InvalidFormat(String),

    #[error("Unsupported time unit: {0}")]
    UnsupportedUnit(String),
}
