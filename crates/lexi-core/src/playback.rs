use std::fmt::Write;
use std::sync::Arc;

use lexi_types::{Meaning, PlaybackEvent, SessionId};
use uuid::Uuid;

use crate::error::{AppError, SynthesisError};
use crate::sink::EventSink;

pub const NOTHING_TO_SPEAK: &str = "No meaning to speak.";

/// Text-to-speech engine
pub trait SpeechSynthesizer: Send + Sync {
    /// Begin narrating `text`; natural completion is reported as `PlaybackEvent::Ended`
    fn speak(
        &self,
        session: SessionId,
        text: &str,
        sink: EventSink,
    ) -> Result<Box<dyn PlaybackHandle>, SynthesisError>;
}

/// Handle to an utterance in progress
pub trait PlaybackHandle: Send {
    /// Silence the utterance immediately
    fn cancel(&mut self);
}

/// Build the narration read back for a list of meanings
pub fn compose_narration(meanings: &[Meaning]) -> String {
    let mut text = String::new();
    for meaning in meanings {
        let _ = write!(text, "Part of speech: {}. ", meaning.part_of_speech);
        for (index, definition) in meaning.definitions.iter().enumerate() {
            let _ = write!(text, "Definition {}: {}. ", index + 1, definition.text);
            if let Some(example) = &definition.example {
                let _ = write!(text, "Example: {}. ", example);
            }
        }
    }
    text
}

struct ActivePlayback {
    id: SessionId,
    handle: Box<dyn PlaybackHandle>,
}

pub struct SpeechPlaybackController {
    synthesizer: Arc<dyn SpeechSynthesizer>,
    sink: EventSink,
    session: Option<ActivePlayback>,
}

impl SpeechPlaybackController {
    pub fn new(synthesizer: Arc<dyn SpeechSynthesizer>, sink: EventSink) -> Self {
        Self {
            synthesizer,
            sink,
            session: None,
        }
    }

    pub fn is_speaking(&self) -> bool {
        self.session.is_some()
    }

    /// Narrate `meanings`, cancelling any utterance already in progress
    pub fn speak(&mut self, meanings: &[Meaning]) -> Result<SessionId, AppError> {
        if meanings.is_empty() {
            return Err(AppError::PlaybackUnavailable(NOTHING_TO_SPEAK.to_string()));
        }

        self.stop();

        let narration = compose_narration(meanings);
        let id = Uuid::new_v4();
        let handle = self
            .synthesizer
            .speak(id, &narration, self.sink.clone())
            .map_err(|e| {
                tracing::warn!("Failed to start narration: {}", e);
                AppError::PlaybackUnavailable(format!("Couldn't speak meaning: {e}"))
            })?;

        tracing::debug!(session = %id, chars = narration.len(), "Playback session opened");
        self.session = Some(ActivePlayback { id, handle });
        Ok(id)
    }

    /// Cancel the active utterance. Returns whether one was open
    pub fn stop(&mut self) -> bool {
        let Some(mut active) = self.session.take() else {
            return false;
        };

        tracing::debug!(session = %active.id, "Cancelling playback session");
        active.handle.cancel();
        true
    }

    /// Apply a synthesizer event. Returns `false` when the event is rejected
    pub fn on_event(&mut self, event: PlaybackEvent) -> bool {
        match event {
            PlaybackEvent::Ended { session } => {
                if self.session.as_ref().is_some_and(|active| active.id == session) {
                    tracing::debug!(session = %session, "Narration finished");
                    self.session = None;
                    true
                } else {
                    tracing::debug!(session = %session, "Ignoring end of inactive narration");
                    false
                }
            }
        }
    }
}

impl Drop for SpeechPlaybackController {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use lexi_types::Definition;

    use super::*;
    use crate::tests::fakes::{FakeSynthesizer, sink_pair};

    fn meanings() -> Vec<Meaning> {
        vec![
            Meaning {
                part_of_speech: "noun".to_string(),
                definitions: vec![
                    Definition {
                        text: "a small feline".to_string(),
                        example: Some("the cat purred".to_string()),
                    },
                    Definition {
                        text: "a jazz enthusiast".to_string(),
                        example: None,
                    },
                ],
            },
            Meaning {
                part_of_speech: "verb".to_string(),
                definitions: vec![Definition {
                    text: "to hoist an anchor".to_string(),
                    example: None,
                }],
            },
        ]
    }

    fn controller(synthesizer: Arc<FakeSynthesizer>) -> SpeechPlaybackController {
        let (sink, _rx) = sink_pair();
        SpeechPlaybackController::new(synthesizer, sink)
    }

    #[test]
    fn narration_lists_meanings_in_order() {
        assert_eq!(
            compose_narration(&meanings()),
            "Part of speech: noun. \
             Definition 1: a small feline. Example: the cat purred. \
             Definition 2: a jazz enthusiast. \
             Part of speech: verb. \
             Definition 1: to hoist an anchor. "
        );
    }

    #[test]
    fn empty_meanings_are_unavailable() {
        let synthesizer = Arc::new(FakeSynthesizer::new());
        let mut playback = controller(synthesizer.clone());

        assert_eq!(
            playback.speak(&[]),
            Err(AppError::PlaybackUnavailable(NOTHING_TO_SPEAK.to_string()))
        );
        assert!(!playback.is_speaking());
        assert!(synthesizer.narrations().is_empty());
    }

    #[test]
    fn speaking_again_cancels_previous_first() {
        let synthesizer = Arc::new(FakeSynthesizer::new());
        let mut playback = controller(synthesizer.clone());

        let first = playback.speak(&meanings()).unwrap();
        let second = playback.speak(&meanings()).unwrap();

        assert_ne!(first, second);
        assert_eq!(synthesizer.cancels(), 1);
        assert_eq!(synthesizer.max_open(), 1);
        assert_eq!(synthesizer.open(), 1);

        // The cancelled session's late end event must not close the new one
        assert!(!playback.on_event(PlaybackEvent::Ended { session: first }));
        assert!(playback.is_speaking());
        assert!(playback.on_event(PlaybackEvent::Ended { session: second }));
        assert!(!playback.is_speaking());
    }

    #[test]
    fn stop_is_noop_when_idle() {
        let synthesizer = Arc::new(FakeSynthesizer::new());
        let mut playback = controller(synthesizer.clone());

        assert!(!playback.stop());
        assert_eq!(synthesizer.cancels(), 0);
    }

    #[test]
    fn start_failure_reports_unavailable() {
        let synthesizer = Arc::new(FakeSynthesizer::failing_start());
        let mut playback = controller(synthesizer);

        assert!(matches!(
            playback.speak(&meanings()),
            Err(AppError::PlaybackUnavailable(_))
        ));
        assert!(!playback.is_speaking());
    }

    #[test]
    fn drop_cancels_active_narration() {
        let synthesizer = Arc::new(FakeSynthesizer::new());
        let mut playback = controller(synthesizer.clone());
        playback.speak(&meanings()).unwrap();

        drop(playback);
        assert_eq!(synthesizer.cancels(), 1);
        assert_eq!(synthesizer.open(), 0);
    }
}
