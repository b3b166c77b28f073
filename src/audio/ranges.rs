// src/audio/ranges.rs

use tracing::debug;

use crate::audio::types::{RangeSet, TimeRange};

/// Turn user-entered cut ranges into a canonical removal plan
///
/// Ranges that end past `duration`, start past `duration`, or have
/// `start >= end` are dropped without an error. The survivors are sorted
/// by start (then end) and overlapping or touching ranges are merged.
///
/// # Example
/// ```
/// use trimo_lib::audio::{normalize, TimeRange};
///
/// let plan = normalize(&[TimeRange::new(3.0, 5.0), TimeRange::new(2.0, 4.0)], 10.0);
/// assert_eq!(plan.as_slice(), &[TimeRange::new(2.0, 5.0)]);
/// ```
pub fn normalize(ranges: &[TimeRange], duration: f64) -> RangeSet {
    let mut valid: Vec<TimeRange> = ranges
        .iter()
        .copied()
        .filter(|range| {
            let keep = range.is_valid_within(duration);
            if !keep {
                debug!(start = range.start, end = range.end, duration, "Dropping invalid range");
            }
            keep
        })
        .collect();

    valid.sort_by(|a, b| a.start.total_cmp(&b.start).then(a.end.total_cmp(&b.end)));

    let mut merged: Vec<TimeRange> = Vec::with_capacity(valid.len());
    let mut iter = valid.into_iter();

    if let Some(first) = iter.next() {
        let mut current = first;
        for range in iter {
            if range.start <= current.end {
                current.end = current.end.max(range.end);
            } else {
                merged.push(current);
                current = range;
            }
        }
        merged.push(current);
    }

    RangeSet { ranges: merged }
}

impl RangeSet {
    /// Total seconds this plan removes
    pub fn total_seconds(&self) -> f64 {
        self.ranges.iter().map(TimeRange::length).sum()
    }

    /// The complement of the plan over `[0, duration]`: what survives the cut
    pub fn keep_ranges(&self, duration: f64) -> Vec<TimeRange> {
        let mut keep = Vec::with_capacity(self.ranges.len() + 1);
        let mut cursor = 0.0_f64;

        for range in &self.ranges {
            if range.start > cursor {
                keep.push(TimeRange::new(cursor, range.start));
            }
            cursor = cursor.max(range.end);
        }

        if cursor < duration {
            keep.push(TimeRange::new(cursor, duration));
        }

        keep
    }
}
