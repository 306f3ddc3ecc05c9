use lexi_types::{CaptureErrorReason, LookupFailure};

/// User-visible failures; the interaction state shows at most one at a time
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AppError {
    /// `NotFound` or `TransportError` from a lookup
    #[error(transparent)]
    Lookup(#[from] LookupFailure),

    #[error("Speech recognition is not supported on this system.")]
    CaptureUnsupported,

    #[error("Couldn't recognize speech. Please try again.")]
    Capture(CaptureErrorReason),

    /// No audio cue, nothing to speak, or the output device refused
    #[error("{0}")]
    PlaybackUnavailable(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Invalid dictionary endpoint {endpoint}: {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    #[error("Failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("No speech recognizer available")]
    Unavailable,

    #[error("Failed to start recognizer: {0}")]
    Start(String),
}

#[derive(Debug, thiserror::Error)]
pub enum SynthesisError {
    #[error("No speech synthesizer available")]
    Unavailable,

    #[error("Failed to start synthesizer: {0}")]
    Start(String),
}

#[derive(Debug, thiserror::Error)]
pub enum AudioError {
    #[error("No audio player available")]
    Unavailable,

    #[error("Failed to start audio player: {0}")]
    Start(#[from] std::io::Error),

    #[error("Audio player exited with {0}")]
    Exit(String),
}
