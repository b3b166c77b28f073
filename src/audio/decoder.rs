// src/audio/decoder.rs

use std::fs::File;
use std::io::{Cursor, ErrorKind};
use std::path::Path;

use symphonia::core::audio::{AudioBufferRef, Signal};
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::{FormatOptions, FormatReader};
use symphonia::core::io::{MediaSource, MediaSourceStream};
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::{debug, warn};

use crate::audio::types::{AudioInfo, SampleBuffer};
use crate::error::{AudioError, Result};

/// Something that can turn encoded file bytes into a mono sample buffer
///
/// The pipeline only talks to this trait, so tests can hand it
/// synthetic audio without going through a real container.
pub trait AudioDecoder: Send + Sync {
    fn decode(&self, bytes: Vec<u8>) -> Result<SampleBuffer>;
}

/// Decoder backed by symphonia
///
/// Supports: MP3, FLAC, WAV, OGG Vorbis, AAC, and more. Only the first
/// channel of multi-channel sources is kept.
#[derive(Debug, Clone, Default)]
pub struct SymphoniaDecoder {
    extension_hint: Option<String>,
}

impl SymphoniaDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Help format detection with the source file's extension (e.g. "mp3")
    pub fn with_extension_hint(mut self, extension: impl Into<String>) -> Self {
        self.extension_hint = Some(extension.into());
        self
    }

    fn hint(&self) -> Hint {
        let mut hint = Hint::new();
        if let Some(extension) = &self.extension_hint {
            hint.with_extension(extension);
        }
        hint
    }

    fn open(&self, source: Box<dyn MediaSource>) -> std::result::Result<Box<dyn FormatReader>, SymphoniaError> {
        let mss = MediaSourceStream::new(source, Default::default());

        let probed = symphonia::default::get_probe().format(
            &self.hint(),
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )?;

        Ok(probed.format)
    }

    /// Read container metadata without decoding any samples
    ///
    /// Only the headers are read from disk.
    ///
    /// # Example
    /// ```no_run
    /// use trimo_lib::audio::SymphoniaDecoder;
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let info = SymphoniaDecoder::new().with_extension_hint("mp3").probe_info("podcast.mp3")?;
    /// println!("Duration: {:.2} minutes", info.duration_seconds / 60.0);
    /// # Ok(())
    /// # }
    /// ```
    pub fn probe_info<P: AsRef<Path>>(&self, path: P) -> Result<AudioInfo> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| AudioError::FileOpen {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;

        let format = self
            .open(Box::new(file))
            .map_err(|e| AudioError::UnsupportedFormat(format!("Failed to probe format: {}", e)))?;

        let track = format
            .tracks()
            .iter()
            .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
            .ok_or_else(|| AudioError::DecodeFailed("No audio track".to_string()))?;

        let params = &track.codec_params;
        let sample_rate = params.sample_rate.unwrap_or(0);
        let channels = params.channels.map(|c| c.count() as u16).unwrap_or(0);

        let duration_seconds = match (params.n_frames, params.sample_rate) {
            (Some(n_frames), Some(sr)) if sr > 0 => n_frames as f64 / sr as f64,
            _ => 0.0,
        };

        let format_name = symphonia::default::get_codecs()
            .get_codec(params.codec)
            .map(|descriptor| descriptor.short_name.to_uppercase())
            .unwrap_or_else(|| format!("{:?}", params.codec));

        Ok(AudioInfo {
            duration_seconds,
            sample_rate,
            channels,
            format: format_name,
            bit_depth: params.bits_per_sample.map(|b| b as u16),
        })
    }
}

impl AudioDecoder for SymphoniaDecoder {
    fn decode(&self, bytes: Vec<u8>) -> Result<SampleBuffer> {
        // Bytes that no reader recognizes cannot be decoded
        let mut format = self
            .open(Box::new(Cursor::new(bytes)))
            .map_err(|e| AudioError::DecodeFailed(format!("Unrecognized audio data: {}", e)))?;

        // Find the default audio track (skip video/subtitle tracks)
        let track = format
            .tracks()
            .iter()
            .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
            .ok_or_else(|| AudioError::DecodeFailed("No audio track found in file".to_string()))?;

        let track_id = track.id;
        let mut sample_rate = track.codec_params.sample_rate;

        let mut decoder = symphonia::default::get_codecs()
            .make(&track.codec_params, &DecoderOptions::default())
            .map_err(|e| AudioError::DecodeFailed(format!("Failed to create decoder: {}", e)))?;

        let mut samples = Vec::new();

        loop {
            let packet = match format.next_packet() {
                Ok(packet) => packet,
                Err(SymphoniaError::IoError(e)) if e.kind() == ErrorKind::UnexpectedEof => break,
                Err(SymphoniaError::ResetRequired) => break,
                Err(e) => return Err(AudioError::DecodeFailed(format!("Failed to read packet: {}", e))),
            };

            // Skip packets from other tracks (e.g., video, album art)
            if packet.track_id() != track_id {
                continue;
            }

            let decoded = match decoder.decode(&packet) {
                Ok(decoded) => decoded,
                Err(SymphoniaError::DecodeError(e)) => {
                    warn!("Skipping corrupt packet: {}", e);
                    continue;
                }
                Err(e) => return Err(AudioError::DecodeFailed(format!("Decode error: {}", e))),
            };

            // MP3 streams may not advertise a rate until the first frame
            if sample_rate.is_none() {
                sample_rate = Some(decoded.spec().rate);
            }

            append_first_channel(&decoded, &mut samples);
        }

        let sample_rate = sample_rate
            .filter(|&rate| rate > 0)
            .ok_or_else(|| AudioError::DecodeFailed("Sample rate not found".to_string()))?;

        debug!(samples = samples.len(), sample_rate, "Decoded source audio");

        Ok(SampleBuffer::mono(samples, sample_rate))
    }
}

/// Append channel 0 of a decoded packet as f32 in [-1.0, 1.0]
fn append_first_channel(buffer: &AudioBufferRef, output: &mut Vec<f32>) {
    if buffer.spec().channels.count() == 0 {
        return;
    }

    match buffer {
        // Already f32 - just copy
        AudioBufferRef::F32(buf) => output.extend_from_slice(buf.chan(0)),
        AudioBufferRef::F64(buf) => output.extend(buf.chan(0).iter().map(|&s| s as f32)),

        // Signed integers
        AudioBufferRef::S8(buf) => output.extend(buf.chan(0).iter().map(|&s| s as f32 / 128.0)),
        AudioBufferRef::S16(buf) => {
            output.extend(buf.chan(0).iter().map(|&s| s as f32 / 32768.0))
        }
        AudioBufferRef::S24(buf) => {
            output.extend(buf.chan(0).iter().map(|&s| s.inner() as f32 / 8388608.0))
        }
        AudioBufferRef::S32(buf) => {
            output.extend(buf.chan(0).iter().map(|&s| s as f32 / 2147483648.0))
        }

        // Unsigned integers are offset by half their range
        AudioBufferRef::U8(buf) => {
            output.extend(buf.chan(0).iter().map(|&s| (s as f32 - 128.0) / 128.0))
        }
        AudioBufferRef::U16(buf) => {
            output.extend(buf.chan(0).iter().map(|&s| (s as f32 - 32768.0) / 32768.0))
        }
        AudioBufferRef::U24(buf) => output.extend(
            buf.chan(0)
                .iter()
                .map(|&s| (s.inner() as f32 - 8388608.0) / 8388608.0),
        ),
        AudioBufferRef::U32(buf) => output.extend(
            buf.chan(0)
                .iter()
                .map(|&s| (s as f64 - 2147483648.0) as f32 / 2147483648.0),
        ),
    }
}
