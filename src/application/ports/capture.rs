//! Media capture port interfaces

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::media::MediaMimeType;

/// Capture errors
#[derive(Debug, Clone, Error)]
pub enum CaptureError {
    #[error("Capture access denied. Please grant microphone permission.")]
    PermissionDenied,

    #[error("Audio capture is not supported in this environment")]
    Unsupported,

    #[error("No audio input device available")]
    NoDevice,

    #[error("Failed to open capture stream: {0}")]
    OpenFailed(String),

    #[error("Capture stream failed: {0}")]
    StreamFailed(String),
}

/// Finalized output of one recording session: data chunks in arrival
/// order plus the negotiated media type, when the environment reported
/// one.
#[derive(Debug, Clone)]
pub struct CapturedAudio {
    pub chunks: Vec<Vec<u8>>,
    pub mime_type: Option<MediaMimeType>,
}

impl CapturedAudio {
    /// Concatenate the chunks into one contiguous byte buffer
    pub fn into_bytes(self) -> Vec<u8> {
        self.chunks.concat()
    }
}

/// Port for opening live capture streams
#[async_trait]
pub trait CaptureSource: Send + Sync {
    /// Whether the environment supports audio capture at all.
    /// Used for the advisory banner; never blocks other functionality.
    fn is_supported(&self) -> bool;

    /// Open a live capture stream.
    ///
    /// # Returns
    /// A stream handle accumulating data chunks, or an error
    async fn open(&self) -> Result<Box<dyn CaptureStream>, CaptureError>;
}

/// A live recording session.
/// Owned by the session controller between start and stop; must release
/// the underlying device when finished or aborted.
#[async_trait]
pub trait CaptureStream: Send {
    /// Stop capturing, release the device, and return the accumulated
    /// chunks in arrival order.
    async fn finish(&mut self) -> Result<CapturedAudio, CaptureError>;

    /// Release the device without producing data (teardown path).
    async fn abort(&mut self);
}
