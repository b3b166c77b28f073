// src/audio/encoder.rs

use std::io::Cursor;

use hound::{SampleFormat, WavSpec, WavWriter};
use mp3lame_encoder::{max_required_buffer_size, Bitrate, Builder, FlushGap, MonoPcm};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::audio::types::{EncodedStream, SampleBuffer};
use crate::error::{AudioError, Result};

/// Samples handed to the codec per call
pub const FRAME_SIZE: usize = 1152;

/// Bitrate used for MP3 output
pub const DEFAULT_BITRATE_KBPS: u32 = 128;

/// Quantize one float sample to signed 16-bit
///
/// The sample is clamped to [-1.0, 1.0], then negative values scale by
/// 32768 and non-negative values by 32767, so both ends land exactly on
/// `i16::MIN` and `i16::MAX`.
pub fn quantize_sample(sample: f32) -> i16 {
    let s = sample.clamp(-1.0, 1.0);
    if s < 0.0 {
        (s * 32768.0) as i16
    } else {
        (s * 32767.0) as i16
    }
}

/// A compressed-audio encoder fed one frame at a time
///
/// `encode_frame` may return nothing while the codec buffers internally;
/// `flush` drains whatever is left.
pub trait FrameCodec {
    fn encode_frame(&mut self, frame: &[i16]) -> Result<Vec<u8>>;

    fn flush(&mut self) -> Result<Vec<u8>>;
}

/// Builds a codec for a given sample rate
///
/// Codecs are built on the encode worker, so only the factory has to
/// cross threads.
pub trait CodecFactory: Send + Sync {
    fn create(&self, sample_rate: u32) -> Result<Box<dyn FrameCodec>>;

    /// File extension for the produced stream (without the dot)
    fn extension(&self) -> &'static str;
}

/// Output container/codec choice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// MPEG-1 Layer III via LAME
    #[default]
    Mp3,
    /// 16-bit PCM WAV
    Wav,
}

/// Encoder configuration: mono, fixed bitrate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EncoderSettings {
    pub format: OutputFormat,
    pub bitrate_kbps: u32,
}

impl Default for EncoderSettings {
    fn default() -> Self {
        Self {
            format: OutputFormat::Mp3,
            bitrate_kbps: DEFAULT_BITRATE_KBPS,
        }
    }
}

impl EncoderSettings {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            ..Self::default()
        }
    }
}

impl CodecFactory for EncoderSettings {
    fn create(&self, sample_rate: u32) -> Result<Box<dyn FrameCodec>> {
        match self.format {
            OutputFormat::Mp3 => Ok(Box::new(Mp3Codec::new(sample_rate, self.bitrate_kbps)?)),
            OutputFormat::Wav => Ok(Box::new(WavCodec::new(sample_rate)?)),
        }
    }

    fn extension(&self) -> &'static str {
        match self.format {
            OutputFormat::Mp3 => "mp3",
            OutputFormat::Wav => "wav",
        }
    }
}

/// Encode a buffer by streaming fixed-size frames through `codec`
///
/// Every frame is [`FRAME_SIZE`] samples except possibly the last.
/// Codec output is kept in call order, followed by the flush output.
///
/// # Example
/// ```
/// use trimo_lib::audio::{encode, EncoderSettings, CodecFactory, OutputFormat, SampleBuffer};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let audio = SampleBuffer::mono(vec![0.0, 0.5, -0.5, 1.0, -1.0], 44100);
///
/// let mut codec = EncoderSettings::new(OutputFormat::Wav).create(audio.sample_rate())?;
/// let stream = encode(&audio, codec.as_mut())?;
/// assert_eq!(&stream.into_bytes()[..4], b"RIFF");
/// # Ok(())
/// # }
/// ```
pub fn encode(samples: &SampleBuffer, codec: &mut dyn FrameCodec) -> Result<EncodedStream> {
    let quantized: Vec<i16> = samples.samples().iter().map(|&s| quantize_sample(s)).collect();

    let mut stream = EncodedStream::new();
    let mut frames = 0usize;

    for frame in quantized.chunks(FRAME_SIZE) {
        stream.push_chunk(codec.encode_frame(frame)?);
        frames += 1;
    }

    stream.push_chunk(codec.flush()?);

    debug!(frames, bytes = stream.len(), "Encoded stream");

    Ok(stream)
}

/// MP3 encoder over LAME: one channel, constant bitrate
pub struct Mp3Codec {
    encoder: mp3lame_encoder::Encoder,
}

impl Mp3Codec {
    pub fn new(sample_rate: u32, bitrate_kbps: u32) -> Result<Self> {
        let bitrate = bitrate_from_kbps(bitrate_kbps)?;

        let mut builder = Builder::new()
            .ok_or_else(|| AudioError::EncoderInit("LAME could not allocate an encoder".to_string()))?;
        builder
            .set_num_channels(1)
            .map_err(|e| AudioError::EncoderInit(format!("Failed to set channels: {:?}", e)))?;
        builder
            .set_sample_rate(sample_rate)
            .map_err(|e| AudioError::EncoderInit(format!("Unsupported sample rate {}: {:?}", sample_rate, e)))?;
        builder
            .set_brate(bitrate)
            .map_err(|e| AudioError::EncoderInit(format!("Failed to set bitrate: {:?}", e)))?;

        let encoder = builder
            .build()
            .map_err(|e| AudioError::EncoderInit(format!("Failed to initialize LAME: {:?}", e)))?;

        Ok(Self { encoder })
    }
}

fn bitrate_from_kbps(kbps: u32) -> Result<Bitrate> {
    let bitrate = match kbps {
        64 => Bitrate::Kbps64,
        96 => Bitrate::Kbps96,
        128 => Bitrate::Kbps128,
        160 => Bitrate::Kbps160,
        192 => Bitrate::Kbps192,
        256 => Bitrate::Kbps256,
        320 => Bitrate::Kbps320,
        other => {
            return Err(AudioError::EncoderInit(format!("Unsupported MP3 bitrate: {} kbps", other)))
        }
    };
    Ok(bitrate)
}

impl FrameCodec for Mp3Codec {
    fn encode_frame(&mut self, frame: &[i16]) -> Result<Vec<u8>> {
        let mut output = Vec::with_capacity(max_required_buffer_size(frame.len()));
        self.encoder
            .encode_to_vec(MonoPcm(frame), &mut output)
            .map_err(|e| AudioError::EncodeFailed(format!("LAME rejected frame: {:?}", e)))?;
        Ok(output)
    }

    fn flush(&mut self) -> Result<Vec<u8>> {
        // Pads and encodes the samples LAME still holds; at most 7200 bytes
        let mut output = Vec::with_capacity(7200);
        self.encoder
            .flush_to_vec::<FlushGap>(&mut output)
            .map_err(|e| AudioError::EncodeFailed(format!("LAME flush failed: {:?}", e)))?;
        Ok(output)
    }
}

/// 16-bit PCM WAV "codec"
///
/// WAV needs its final size in the header, so frames are held until
/// `flush`, which returns the whole file.
pub struct WavCodec {
    spec: WavSpec,
    pending: Vec<i16>,
    flushed: bool,
}

impl WavCodec {
    pub fn new(sample_rate: u32) -> Result<Self> {
        if sample_rate == 0 {
            return Err(AudioError::EncoderInit("Sample rate must be positive".to_string()));
        }

        Ok(Self {
            spec: WavSpec {
                channels: 1,
                sample_rate,
                bits_per_sample: 16,
                sample_format: SampleFormat::Int,
            },
            pending: Vec::new(),
            flushed: false,
        })
    }
}

impl FrameCodec for WavCodec {
    fn encode_frame(&mut self, frame: &[i16]) -> Result<Vec<u8>> {
        self.pending.extend_from_slice(frame);
        Ok(Vec::new())
    }

    fn flush(&mut self) -> Result<Vec<u8>> {
        if self.flushed {
            return Ok(Vec::new());
        }
        self.flushed = true;

        let mut cursor = Cursor::new(Vec::with_capacity(44 + self.pending.len() * 2));
        {
            let mut writer = WavWriter::new(&mut cursor, self.spec)?;
            for &sample in &self.pending {
                writer.write_sample(sample)?;
            }
            writer.finalize()?;
        }
        self.pending.clear();

        Ok(cursor.into_inner())
    }
}
