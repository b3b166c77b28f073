// src/audio/mod.rs

pub mod decoder;
pub mod encoder;
pub mod pipeline;
pub mod ranges;
pub mod splice;
pub mod timecode;
pub mod types;
pub mod worker;

// Re-export commonly used items
pub use decoder::{AudioDecoder, SymphoniaDecoder};
pub use encoder::{
    encode, quantize_sample, CodecFactory, EncoderSettings, FrameCodec, Mp3Codec, OutputFormat,
    WavCodec, DEFAULT_BITRATE_KBPS, FRAME_SIZE,
};
pub use pipeline::{TrimOutput, Trimmer};
pub use ranges::normalize;
pub use splice::splice;
pub use timecode::{format_timestamp, parse_range, parse_time};
pub use types::{AudioInfo, EncodedStream, RangeSet, SampleBuffer, TimeRange};
pub use worker::{EncodeJob, EncodeRequest, EncodeWorker};
