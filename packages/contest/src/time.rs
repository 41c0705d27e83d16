use std::fmt;

use chrono::{DateTime, FixedOffset, Timelike, Utc};
use serde::Serialize;

/// Contest times are entered and displayed in JST.
pub const CONTEST_UTC_OFFSET_SECS: i32 = 9 * 3600;
const CONTEST_UTC_OFFSET: &str = "+09:00";

/// Choices offered by the hour selector.
pub const HOUR_OPTIONS: std::ops::Range<u32> = 0..24;
/// Minute selector step.
pub const MINUTE_STEP: u32 = 5;

pub fn minute_options() -> Vec<u32> {
    (0..60).step_by(MINUTE_STEP as usize).collect()
}

/// Which end of the contest window a field group describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Endpoint {
    Start,
    End,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Start => "Start",
            Self::End => "End",
        })
    }
}

/// The date / hour / minute inputs for one end of the contest window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateTimeFields {
    /// `YYYY-MM-DD` as typed into the date input.
    pub date: String,
    pub hour: u32,
    pub minute: u32,
}

impl DateTimeFields {
    pub fn new(date: impl Into<String>, hour: u32, minute: u32) -> Self {
        Self {
            date: date.into(),
            hour,
            minute,
        }
    }

    /// Split an epoch second back into JST fields.
    pub fn from_unix_second(second: i64) -> Option<Self> {
        let offset = FixedOffset::east_opt(CONTEST_UTC_OFFSET_SECS)?;
        let local = DateTime::from_timestamp(second, 0)?.with_timezone(&offset);
        Some(Self {
            date: local.format("%Y-%m-%d").to_string(),
            hour: local.hour(),
            minute: local.minute(),
        })
    }

    /// Midnight of the current JST date.
    pub fn today() -> Self {
        let date = FixedOffset::east_opt(CONTEST_UTC_OFFSET_SECS)
            .map(|offset| Utc::now().with_timezone(&offset).format("%Y-%m-%d").to_string())
            .unwrap_or_default();
        Self::new(date, 0, 0)
    }

    /// `{date}T{hh}:{mm}:00+09:00`, hour and minute zero-padded.
    pub fn timestamp(&self) -> String {
        compose_timestamp(&self.date, self.hour, self.minute)
    }

    pub fn unix_second(&self) -> Option<i64> {
        to_unix_second(&self.date, self.hour, self.minute)
    }
}

pub fn compose_timestamp(date: &str, hour: u32, minute: u32) -> String {
    format!("{date}T{hour:02}:{minute:02}:00{CONTEST_UTC_OFFSET}")
}

/// Epoch seconds of the composed timestamp, or `None` if it does not parse
/// (empty or malformed date, hour past 23, minute past 59).
pub fn to_unix_second(date: &str, hour: u32, minute: u32) -> Option<i64> {
    DateTime::parse_from_rfc3339(&compose_timestamp(date, hour, minute))
        .ok()
        .map(|dt| dt.timestamp())
}
