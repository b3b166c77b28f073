use serde::{Deserialize, Serialize};

/// A span of audio, in seconds, that the user wants removed
///
/// Ranges come straight from user input and may be invalid
/// (`start >= end`, past the end of the file, ...). They are only
/// checked when handed to [`normalize`](crate::audio::normalize).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeRange {
    /// Start time in seconds
    pub start: f64,

    /// End time in seconds
    pub end: f64,
}

impl TimeRange {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// Whether this range survives normalization against `duration`
    ///
    /// A zero-length range is not valid: the default `{0, 0}` placeholder
    /// means "trim nothing".
    pub fn is_valid_within(&self, duration: f64) -> bool {
        self.end <= duration && self.start <= duration && self.start < self.end
    }

    /// Length of the range in seconds
    pub fn length(&self) -> f64 {
        self.end - self.start
    }
}

impl Default for TimeRange {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

/// Canonical removal plan: ascending, non-overlapping, fully merged
///
/// Only [`normalize`](crate::audio::normalize) builds one, so every
/// instance upholds the ordering invariant.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RangeSet {
    pub(crate) ranges: Vec<TimeRange>,
}

impl RangeSet {
    /// An empty plan, meaning "remove nothing"
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TimeRange> {
        self.ranges.iter()
    }

    pub fn as_slice(&self) -> &[TimeRange] {
        &self.ranges
    }
}

impl<'a> IntoIterator for &'a RangeSet {
    type Item = &'a TimeRange;
    type IntoIter = std::slice::Iter<'a, TimeRange>;

    fn into_iter(self) -> Self::IntoIter {
        self.ranges.iter()
    }
}

/// Decoded single-channel audio held in memory
///
/// Samples are 32-bit floats in the range [-1.0, 1.0]. The buffer is
/// immutable once built; splicing produces a new one.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleBuffer {
    samples: Vec<f32>,
    sample_rate: u32,
    channels: u16,
}

impl SampleBuffer {
    /// Build a mono buffer
    pub fn mono(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
            channels: 1,
        }
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Sample rate in Hz (e.g., 44100, 48000)
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Always 1
    pub fn channels(&self) -> u16 {
        self.channels
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Total duration of the audio in seconds
    pub fn duration_seconds(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64
    }
}

/// Compressed output, kept as the chunks the codec emitted, in order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EncodedStream {
    chunks: Vec<Vec<u8>>,
}

impl EncodedStream {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one codec output chunk. Empty chunks carry nothing and are skipped.
    pub fn push_chunk(&mut self, chunk: Vec<u8>) {
        if !chunk.is_empty() {
            self.chunks.push(chunk);
        }
    }

    pub fn chunks(&self) -> &[Vec<u8>] {
        &self.chunks
    }

    /// Total payload size in bytes
    pub fn len(&self) -> usize {
        self.chunks.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Concatenate every chunk into the final payload
    pub fn into_bytes(self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.len());
        for chunk in self.chunks {
            bytes.extend_from_slice(&chunk);
        }
        bytes
    }
}

/// Metadata about an audio file without loading all samples
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioInfo {
    /// Total duration in seconds (0.0 when the container does not say)
    pub duration_seconds: f64,

    /// Sample rate in Hz
    pub sample_rate: u32,

    /// Number of channels in the source (only the first is trimmed)
    pub channels: u16,

    /// Audio format/codec name (e.g., "MP3", "FLAC", "Vorbis")
    pub format: String,

    /// Bit depth if available (e.g., 16, 24)
    pub bit_depth: Option<u16>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_range_is_invalid() {
        assert!(!TimeRange::default().is_valid_within(10.0));
    }

    #[test]
    fn test_range_validity() {
        assert!(TimeRange::new(2.0, 4.0).is_valid_within(10.0));
        assert!(TimeRange::new(0.0, 10.0).is_valid_within(10.0));
        assert!(!TimeRange::new(6.0, 4.0).is_valid_within(10.0));
        assert!(!TimeRange::new(5.0, 11.0).is_valid_within(10.0));
        assert!(!TimeRange::new(11.0, 12.0).is_valid_within(10.0));
    }

    #[test]
    fn test_buffer_duration() {
        let buffer = SampleBuffer::mono(vec![0.0; 88200], 44100);
        assert_eq!(buffer.duration_seconds(), 2.0);
        assert_eq!(buffer.channels(), 1);
    }

    #[test]
    fn test_stream_skips_empty_chunks() {
        let mut stream = EncodedStream::new();
        stream.push_chunk(vec![1, 2]);
        stream.push_chunk(Vec::new());
        stream.push_chunk(vec![3]);

        assert_eq!(stream.chunks().len(), 2);
        assert_eq!(stream.len(), 3);
        assert_eq!(stream.into_bytes(), vec![1, 2, 3]);
    }

    #[test]
    fn test_ranges_deserialize_from_json() {
        let ranges: Vec<TimeRange> =
            serde_json::from_str(r#"[{"start": 0, "end": 0}, {"start": 1.5, "end": 3}]"#).unwrap();
        assert_eq!(ranges, vec![TimeRange::new(0.0, 0.0), TimeRange::new(1.5, 3.0)]);
    }
}
