use std::fmt;

use uuid::Uuid;

use crate::types::LookupOutcome;

/// Identifies one capture or playback session
pub type SessionId = Uuid;

/// Everything the interaction loop reacts to: user commands and async completions
#[derive(Debug, Clone)]
pub enum AppEvent {
    Search(String),
    ToggleVoiceInput,
    PlayPronunciation,
    ToggleMeaningPlayback,
    /// Exit now, releasing every session
    Shutdown,
    /// No more user input; exit once outstanding work has settled
    InputClosed,
    LookupResolved {
        seq: u64,
        word: String,
        outcome: LookupOutcome,
    },
    Capture(CaptureEvent),
    Playback(PlaybackEvent),
    /// Pronunciation playback failed for the result of lookup `seq`
    CueFailed {
        seq: u64,
        url: String,
        reason: String,
    },
}

/// Recognizer callback, tagged with the session that produced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureEvent {
    pub session: SessionId,
    pub kind: CaptureEventKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureEventKind {
    /// Final transcript of the single utterance
    Transcript(String),
    Error(CaptureErrorReason),
    End,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureErrorReason {
    NoMatch,
    PermissionDenied,
    Device(String),
}

impl fmt::Display for CaptureErrorReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureErrorReason::NoMatch => write!(f, "no-match"),
            CaptureErrorReason::PermissionDenied => write!(f, "not-allowed"),
            CaptureErrorReason::Device(detail) => write!(f, "audio-capture: {detail}"),
        }
    }
}

/// Synthesizer callback
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackEvent {
    /// The narration finished on its own
    Ended { session: SessionId },
}
