//! Sound system error types.

use thiserror::Error;

/// Errors that can occur in the sound playback system.
#[derive(Debug, Error)]
pub enum SoundError {
    /// Audio device is not available (e.g., no speakers connected).
    #[error("audio device not available: {0}")]
    DeviceNotAvailable(String),

    /// Failed to create the audio output stream or sink.
    #[error("failed to open audio stream: {0}")]
    StreamError(String),

    /// The playback worker has stopped.
    #[error("sound worker is not running")]
    WorkerStopped,

    /// Generic sound playback error.
    #[error("sound playback error: {0}")]
    PlaybackError(String),
}

impl SoundError {
    /// Returns a user-friendly suggestion for resolving this error.
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::DeviceNotAvailable(_) => "connect an audio device or run with --no-sound",
            Self::StreamError(_) => "check the system audio settings",
            Self::WorkerStopped => "restart the session",
            Self::PlaybackError(_) => "run with --verbose for details",
        }
    }
}
