// src/audio/splice.rs

use tracing::{debug, warn};

use crate::audio::types::{RangeSet, SampleBuffer};

/// Remove every range in `removals` from `source` and join what is left
///
/// Range bounds become sample indices via `floor(seconds * sample_rate)`.
/// A range whose indices fall outside the buffer, or collapse to nothing,
/// is skipped with a warning and the cursor stays where it was.
///
/// # Example
/// ```
/// use trimo_lib::audio::{normalize, splice, SampleBuffer, TimeRange};
///
/// // 10 seconds of mono audio at 8kHz
/// let source = SampleBuffer::mono(vec![0.5; 80_000], 8_000);
///
/// let plan = normalize(&[TimeRange::new(2.0, 4.0), TimeRange::new(3.0, 5.0)], 10.0);
/// let spliced = splice(&source, &plan);
///
/// assert_eq!(spliced.duration_seconds(), 7.0);
/// assert_eq!(spliced.sample_rate(), 8_000);
/// ```
pub fn splice(source: &SampleBuffer, removals: &RangeSet) -> SampleBuffer {
    let samples = source.samples();
    let total_samples = samples.len();
    let sample_rate = source.sample_rate() as f64;

    // Kept slices, borrowed until the final copy
    let mut kept: Vec<&[f32]> = Vec::with_capacity(removals.len() + 1);
    let mut cursor = 0usize;

    for range in removals {
        let start_sample = (range.start * sample_rate).floor() as i64;
        let end_sample = (range.end * sample_rate).floor() as i64;

        if start_sample < 0 || end_sample > total_samples as i64 || start_sample >= end_sample {
            warn!(
                start = range.start,
                end = range.end,
                start_sample,
                end_sample,
                total_samples,
                "Skipping range that does not map onto the buffer"
            );
            continue;
        }

        let start_sample = start_sample as usize;
        if cursor < start_sample {
            kept.push(&samples[cursor..start_sample]);
        }

        cursor = end_sample as usize;
    }

    if cursor < total_samples {
        kept.push(&samples[cursor..]);
    }

    let output_len: usize = kept.iter().map(|segment| segment.len()).sum();
    let mut output = Vec::with_capacity(output_len);
    for segment in kept {
        output.extend_from_slice(segment);
    }

    debug!(
        input_samples = total_samples,
        output_samples = output.len(),
        "Spliced buffer"
    );

    SampleBuffer::mono(output, source.sample_rate())
}
