// src/audio/pipeline.rs

use std::sync::Arc;

use tracing::info;

use crate::audio::decoder::AudioDecoder;
use crate::audio::encoder::CodecFactory;
use crate::audio::ranges::normalize;
use crate::audio::splice::splice;
use crate::audio::types::{RangeSet, SampleBuffer, TimeRange};
use crate::audio::worker::{EncodeRequest, EncodeWorker};
use crate::error::{AudioError, Result};

/// Result of one trim request
#[derive(Debug, Clone)]
pub struct TrimOutput {
    /// The re-encoded audio, ready to be written out
    pub encoded: Vec<u8>,

    /// The removal plan that was applied
    pub removed: RangeSet,

    /// Duration of the spliced audio in seconds
    pub duration_seconds: f64,

    /// Sample rate of the output in Hz
    pub sample_rate: u32,
}

/// Decode, cut, and re-encode audio with injected capabilities
///
/// Runs one request at a time per call; concurrent calls on the same
/// source are not coordinated.
#[derive(Clone)]
pub struct Trimmer {
    decoder: Arc<dyn AudioDecoder>,
    worker: EncodeWorker,
}

impl Trimmer {
    pub fn new(decoder: Arc<dyn AudioDecoder>, codec: Arc<dyn CodecFactory>) -> Self {
        Self {
            decoder,
            worker: EncodeWorker::new(codec),
        }
    }

    /// File extension of what this trimmer produces
    pub fn extension(&self) -> &'static str {
        self.worker.factory().extension()
    }

    /// Decode source bytes off the async executor
    pub async fn decode(&self, bytes: Vec<u8>) -> Result<SampleBuffer> {
        let decoder = Arc::clone(&self.decoder);

        tokio::task::spawn_blocking(move || decoder.decode(bytes))
            .await
            .map_err(|e| AudioError::DecodeFailed(format!("Decode task join error: {}", e)))?
    }

    /// Full request: decode the bytes, then cut and encode
    ///
    /// `duration` is the length the ranges were chosen against; `None`
    /// falls back to the decoded length. A decode failure aborts before
    /// anything is spliced.
    ///
    /// # Example
    /// ```no_run
    /// use std::sync::Arc;
    /// use trimo_lib::audio::{EncoderSettings, SymphoniaDecoder, TimeRange, Trimmer};
    ///
    /// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
    /// let trimmer = Trimmer::new(
    ///     Arc::new(SymphoniaDecoder::new()),
    ///     Arc::new(EncoderSettings::default()),
    /// );
    /// let bytes = std::fs::read("interview.mp3")?;
    /// let output = trimmer.trim(bytes, &[TimeRange::new(12.0, 30.5)], None).await?;
    /// std::fs::write("trimmed_audio.mp3", &output.encoded)?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn trim(
        &self,
        bytes: Vec<u8>,
        ranges: &[TimeRange],
        duration: Option<f64>,
    ) -> Result<TrimOutput> {
        let source = self.decode(bytes).await?;
        let duration = duration.unwrap_or_else(|| source.duration_seconds());
        self.trim_decoded(source, ranges, duration).await
    }

    /// Cut and encode audio that is already decoded
    ///
    /// Takes the source by value: it is dropped once spliced, and the
    /// spliced buffer moves to the encode worker.
    pub async fn trim_decoded(
        &self,
        source: SampleBuffer,
        ranges: &[TimeRange],
        duration: f64,
    ) -> Result<TrimOutput> {
        let removed = normalize(ranges, duration);
        info!(
            requested = ranges.len(),
            merged = removed.len(),
            seconds = removed.total_seconds(),
            "Normalized cut ranges"
        );

        let spliced = splice(&source, &removed);
        drop(source);

        let duration_seconds = spliced.duration_seconds();
        let sample_rate = spliced.sample_rate();

        let stream = self
            .worker
            .submit(EncodeRequest { samples: spliced })?
            .wait()
            .await?;

        info!(bytes = stream.len(), duration_seconds, "Encoded trimmed audio");

        Ok(TrimOutput {
            encoded: stream.into_bytes(),
            removed,
            duration_seconds,
            sample_rate,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::encoder::{EncoderSettings, OutputFormat};
    use approx::assert_relative_eq;

    /// Ignores the bytes and hands back a fixed 10 second buffer
    struct FixedDecoder;

    impl AudioDecoder for FixedDecoder {
        fn decode(&self, _bytes: Vec<u8>) -> Result<SampleBuffer> {
            Ok(SampleBuffer::mono(vec![0.2; 80_000], 8_000))
        }
    }

    struct FailingDecoder;

    impl AudioDecoder for FailingDecoder {
        fn decode(&self, _bytes: Vec<u8>) -> Result<SampleBuffer> {
            Err(AudioError::DecodeFailed("not audio".to_string()))
        }
    }

    fn wav_trimmer(decoder: Arc<dyn AudioDecoder>) -> Trimmer {
        Trimmer::new(decoder, Arc::new(EncoderSettings::new(OutputFormat::Wav)))
    }

    #[test]
    fn test_extension_follows_codec() {
        assert_eq!(wav_trimmer(Arc::new(FixedDecoder)).extension(), "wav");

        let mp3 = Trimmer::new(Arc::new(FixedDecoder), Arc::new(EncoderSettings::default()));
        assert_eq!(mp3.extension(), "mp3");
    }

    #[tokio::test]
    async fn test_default_range_keeps_everything() {
        let trimmer = wav_trimmer(Arc::new(FixedDecoder));
        let output = trimmer.trim(Vec::new(), &[TimeRange::default()], Some(10.0)).await.unwrap();

        assert!(output.removed.is_empty());
        assert_relative_eq!(output.duration_seconds, 10.0);
        assert_eq!(output.encoded.len(), 44 + 80_000 * 2);
    }

    #[tokio::test]
    async fn test_overlapping_ranges_cut_three_seconds() {
        let trimmer = wav_trimmer(Arc::new(FixedDecoder));
        let output = trimmer
            .trim(Vec::new(), &[TimeRange::new(2.0, 4.0), TimeRange::new(3.0, 5.0)], Some(10.0))
            .await
            .unwrap();

        assert_eq!(output.removed.as_slice(), &[TimeRange::new(2.0, 5.0)]);
        assert_relative_eq!(output.duration_seconds, 7.0);
    }

    #[tokio::test]
    async fn test_duration_falls_back_to_decoded_length() {
        let trimmer = wav_trimmer(Arc::new(FixedDecoder));
        let output = trimmer.trim(Vec::new(), &[TimeRange::new(9.0, 10.0)], None).await.unwrap();

        assert_relative_eq!(output.duration_seconds, 9.0);
    }

    #[tokio::test]
    async fn test_decode_failure_aborts() {
        let trimmer = wav_trimmer(Arc::new(FailingDecoder));
        let result = trimmer.trim(vec![1, 2, 3], &[TimeRange::new(1.0, 2.0)], Some(10.0)).await;

        assert!(matches!(result, Err(AudioError::DecodeFailed(_))));
    }

    #[tokio::test]
    async fn test_encoder_init_failure_is_surfaced() {
        let settings = EncoderSettings {
            format: OutputFormat::Mp3,
            bitrate_kbps: 1,
        };
        let trimmer = Trimmer::new(Arc::new(FixedDecoder), Arc::new(settings));
        let result = trimmer.trim(Vec::new(), &[], Some(10.0)).await;

        assert!(matches!(result, Err(AudioError::EncoderInit(_))));
    }
}
