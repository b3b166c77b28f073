// src/audio/worker.rs
//! Off-thread encoding
//!
//! A request owns its [`SampleBuffer`]; submitting it moves the buffer to a
//! dedicated encode thread, so the caller cannot touch it afterwards. The
//! thread answers exactly once with the whole stream or an error. There is
//! no cancellation: dropping the [`EncodeJob`] only discards the answer.

use std::sync::Arc;
use std::thread;

use tokio::sync::oneshot;
use tracing::{debug, error};

use crate::audio::encoder::{encode, CodecFactory};
use crate::audio::types::{EncodedStream, SampleBuffer};
use crate::error::{AudioError, Result};

/// The single message sent to the encode thread
#[derive(Debug)]
pub struct EncodeRequest {
    pub samples: SampleBuffer,
}

/// Spawns one encode thread per request
#[derive(Clone)]
pub struct EncodeWorker {
    factory: Arc<dyn CodecFactory>,
}

impl EncodeWorker {
    pub fn new(factory: Arc<dyn CodecFactory>) -> Self {
        Self { factory }
    }

    pub fn factory(&self) -> &dyn CodecFactory {
        self.factory.as_ref()
    }

    /// Hand the request to a fresh encode thread
    pub fn submit(&self, request: EncodeRequest) -> Result<EncodeJob> {
        let (reply_tx, reply_rx) = oneshot::channel();
        let factory = Arc::clone(&self.factory);

        thread::Builder::new()
            .name("trimo-encode".to_string())
            .spawn(move || {
                let EncodeRequest { samples } = request;
                debug!(samples = samples.len(), "Encode worker started");

                // The codec is built here so it never leaves this thread
                let result = factory
                    .create(samples.sample_rate())
                    .and_then(|mut codec| encode(&samples, codec.as_mut()));

                if let Err(e) = &result {
                    error!("Encode worker failed: {}", e);
                }

                // Nobody listening is fine; the job just finishes
                let _ = reply_tx.send(result);
            })
            .map_err(|e| AudioError::Worker(format!("Failed to spawn encode thread: {}", e)))?;

        Ok(EncodeJob { reply: reply_rx })
    }
}

/// Handle to the single reply of a submitted request
#[derive(Debug)]
pub struct EncodeJob {
    reply: oneshot::Receiver<Result<EncodedStream>>,
}

impl EncodeJob {
    /// Wait for the encoded stream
    pub async fn wait(self) -> Result<EncodedStream> {
        self.reply
            .await
            .map_err(|_| AudioError::Worker("Encode thread exited without replying".to_string()))?
    }

    /// Blocking variant for callers outside an async runtime
    pub fn wait_blocking(self) -> Result<EncodedStream> {
        self.reply
            .blocking_recv()
            .map_err(|_| AudioError::Worker("Encode thread exited without replying".to_string()))?
    }
}
