// src/audio/timecode.rs

use std::str::FromStr;

use crate::audio::types::TimeRange;
use crate::error::{AudioError, Result};

/// Parse a user time value into seconds
///
/// Accepts plain seconds (`"12.5"`), `MM:SS[.mmm]` and `HH:MM:SS[.mmm]`.
/// An empty value means 0, like a cleared input field.
///
/// # Example
/// ```
/// use trimo_lib::audio::parse_time;
///
/// assert_eq!(parse_time("01:05.250").unwrap(), 65.25);
/// assert_eq!(parse_time("1:00:00").unwrap(), 3600.0);
/// ```
pub fn parse_time(value: &str) -> Result<f64> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(0.0);
    }

    let invalid = || AudioError::InvalidTimecode(value.to_string());

    let parts: Vec<&str> = value.split(':').collect();
    if parts.len() > 3 {
        return Err(invalid());
    }

    let (whole, seconds) = parts.split_at(parts.len() - 1);
    let seconds = parse_component(seconds[0]).ok_or_else(invalid)?;
    if !whole.is_empty() && seconds >= 60.0 {
        return Err(invalid());
    }

    let mut total = 0.0;
    for (index, part) in whole.iter().enumerate() {
        if part.contains('.') {
            return Err(invalid());
        }
        let unit = parse_component(part).ok_or_else(invalid)?;
        // Minutes are bounded when hours are given
        if index > 0 && unit >= 60.0 {
            return Err(invalid());
        }
        total = total * 60.0 + unit;
    }

    Ok(total * 60.0 + seconds)
}

fn parse_component(part: &str) -> Option<f64> {
    if part.is_empty() || !part.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return None;
    }
    f64::from_str(part).ok().filter(|v| v.is_finite())
}

/// Parse a `START-END` range spec, each side a time value
pub fn parse_range(spec: &str) -> Result<TimeRange> {
    let (start, end) = spec
        .trim()
        .split_once('-')
        .ok_or_else(|| AudioError::InvalidRangeSpec(spec.to_string()))?;

    if start.trim().is_empty() || end.trim().is_empty() {
        return Err(AudioError::InvalidRangeSpec(spec.to_string()));
    }

    Ok(TimeRange::new(parse_time(start)?, parse_time(end)?))
}

impl FromStr for TimeRange {
    type Err = AudioError;

    fn from_str(s: &str) -> Result<Self> {
        parse_range(s)
    }
}

/// Format seconds as `MM:SS.mmm` (minutes keep counting past 59)
pub fn format_timestamp(seconds: f64) -> String {
    let millis = (seconds.max(0.0) * 1000.0).round() as u64;
    let minutes = millis / 60_000;
    let secs = (millis % 60_000) / 1000;
    let ms = millis % 1000;
    format!("{:02}:{:02}.{:03}", minutes, secs, ms)
}
