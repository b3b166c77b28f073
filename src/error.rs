use thiserror::Error;

/// All possible errors that can occur while trimming audio
#[derive(Debug, Error)]
pub enum AudioError {
    /// Failed to open or read the audio file from disk
    #[error("Failed to open audio file '{path}': {source}")]
    FileOpen {
        path: String,
        source: std::io::Error,
    },

    /// The audio format is not supported by symphonia
    #[error("Unsupported audio format: {0}")]
    UnsupportedFormat(String),

    /// The source bytes could not be decoded into samples
    #[error("Audio decoding failed: {0}")]
    DecodeFailed(String),

    /// The codec could not be constructed for the requested settings
    #[error("Encoder initialization failed: {0}")]
    EncoderInit(String),

    /// The codec rejected a frame or the flush
    #[error("Audio encoding failed: {0}")]
    EncodeFailed(String),

    /// A time value could not be parsed (e.g. "1:xx")
    #[error("Invalid time value '{0}'")]
    InvalidTimecode(String),

    /// A range spec was not of the form START-END
    #[error("Invalid range '{0}', expected START-END")]
    InvalidRangeSpec(String),

    /// The encode worker went away without replying
    #[error("Encode worker failed: {0}")]
    Worker(String),

    /// Generic I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error from hound WAV encoder
    #[error("Hound WAV error: {0}")]
    Hound(#[from] hound::Error),

    /// Malformed ranges file
    #[error("Invalid ranges JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenient Result type that uses our AudioError
pub type Result<T> = std::result::Result<T, AudioError>;
