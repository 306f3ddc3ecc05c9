//! Voice capture session lifecycle.
//!
//! ```text
//! Idle --toggle--> Listening --toggle--> Stopping --End--> Idle
//!                      |                     |
//!                      +--Transcript/Error/End--> Idle
//! ```
//!
//! A session counts as open (and `listening` as true) from a successful
//! start until the recognizer reports its terminal event or the session is
//! aborted. Events from any other session are rejected.

use std::fmt;
use std::sync::Arc;

use lexi_types::{CaptureEvent, CaptureEventKind, CaptureErrorReason, SessionId};
use uuid::Uuid;

use crate::error::{AppError, CaptureError};
use crate::sink::EventSink;

/// Recognition settings passed to the platform engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureOptions {
    pub continuous: bool,
    pub interim_results: bool,
    pub locale: String,
}

impl CaptureOptions {
    /// One final transcript of a single utterance
    pub fn single_utterance(locale: impl Into<String>) -> Self {
        Self {
            continuous: false,
            interim_results: false,
            locale: locale.into(),
        }
    }
}

/// Speech recognition engine
pub trait SpeechRecognizer: Send + Sync {
    fn is_available(&self) -> bool;

    /// Open a session. Every event it produces must carry `session`
    fn start(
        &self,
        session: SessionId,
        options: &CaptureOptions,
        sink: EventSink,
    ) -> Result<Box<dyn CaptureHandle>, CaptureError>;
}

/// Handle to an open recognition session
pub trait CaptureHandle: Send {
    /// Finish gracefully; the engine still reports a terminal event
    fn stop(&mut self);

    /// Release the microphone now; no further events are expected
    fn abort(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapturePhase {
    Idle,
    Listening,
    Stopping,
}

impl fmt::Display for CapturePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CapturePhase::Idle => write!(f, "Idle"),
            CapturePhase::Listening => write!(f, "Listening"),
            CapturePhase::Stopping => write!(f, "Stopping"),
        }
    }
}

/// Result of a toggle or an accepted recognizer event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureOutcome {
    Started,
    Stopping,
    Aborted,
    Recognized(String),
    Failed(AppError),
    Ended,
}

struct ActiveCapture {
    id: SessionId,
    handle: Box<dyn CaptureHandle>,
    stopping: bool,
}

pub struct VoiceCaptureController {
    recognizer: Arc<dyn SpeechRecognizer>,
    options: CaptureOptions,
    sink: EventSink,
    session: Option<ActiveCapture>,
}

impl VoiceCaptureController {
    pub fn new(recognizer: Arc<dyn SpeechRecognizer>, options: CaptureOptions, sink: EventSink) -> Self {
        Self {
            recognizer,
            options,
            sink,
            session: None,
        }
    }

    pub fn phase(&self) -> CapturePhase {
        match &self.session {
            None => CapturePhase::Idle,
            Some(active) if active.stopping => CapturePhase::Stopping,
            Some(_) => CapturePhase::Listening,
        }
    }

    pub fn is_listening(&self) -> bool {
        self.session.is_some()
    }

    /// Start when idle, stop gracefully when listening, abort when already stopping
    pub fn toggle(&mut self) -> Result<CaptureOutcome, AppError> {
        match self.session.as_mut() {
            None => self.start(),
            Some(active) if !active.stopping => {
                tracing::debug!(session = %active.id, "Stopping capture session");
                active.handle.stop();
                active.stopping = true;
                Ok(CaptureOutcome::Stopping)
            }
            Some(_) => {
                self.abort();
                Ok(CaptureOutcome::Aborted)
            }
        }
    }

    fn start(&mut self) -> Result<CaptureOutcome, AppError> {
        if !self.recognizer.is_available() {
            return Err(AppError::CaptureUnsupported);
        }

        let id = Uuid::new_v4();
        let handle = self
            .recognizer
            .start(id, &self.options, self.sink.clone())
            .map_err(|e| {
                tracing::warn!("Failed to open capture session: {}", e);
                match e {
                    CaptureError::Unavailable => AppError::CaptureUnsupported,
                    other => AppError::Capture(CaptureErrorReason::Device(other.to_string())),
                }
            })?;

        tracing::debug!(session = %id, locale = %self.options.locale, "Capture session opened");
        self.session = Some(ActiveCapture {
            id,
            handle,
            stopping: false,
        });
        Ok(CaptureOutcome::Started)
    }

    /// Force-close any open session
    pub fn abort(&mut self) {
        if let Some(mut active) = self.session.take() {
            tracing::debug!(session = %active.id, "Aborting capture session");
            active.handle.abort();
        }
    }

    /// Apply a recognizer event. Returns `None` when the event is rejected
    pub fn on_event(&mut self, event: CaptureEvent) -> Option<CaptureOutcome> {
        let Some(active) = &self.session else {
            tracing::debug!(session = %event.session, "Ignoring capture event while idle");
            return None;
        };

        if active.id != event.session {
            tracing::debug!(
                session = %event.session,
                current = %active.id,
                "Ignoring event from a stale capture session"
            );
            return None;
        }

        // Single-shot capture: every accepted event closes the session
        self.session = None;

        let outcome = match event.kind {
            CaptureEventKind::Transcript(text) => {
                let text = text.trim();
                if text.is_empty() {
                    CaptureOutcome::Ended
                } else {
                    CaptureOutcome::Recognized(text.to_string())
                }
            }
            CaptureEventKind::Error(reason) => {
                tracing::warn!(session = %event.session, "Speech recognition error: {}", reason);
                CaptureOutcome::Failed(AppError::Capture(reason))
            }
            CaptureEventKind::End => CaptureOutcome::Ended,
        };

        tracing::debug!(session = %event.session, "Capture session closed: {:?}", outcome);
        Some(outcome)
    }
}

impl Drop for VoiceCaptureController {
    fn drop(&mut self) {
        self.abort();
    }
}
