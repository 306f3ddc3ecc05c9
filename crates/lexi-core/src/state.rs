//! The interaction state machine.
//!
//! `InteractionState` owns the current query, the displayed result, the
//! single error slot and the three session controllers. It is driven from
//! one task: user commands and async completions both arrive as
//! [`AppEvent`]s and are applied in order through [`InteractionState::handle`].
//!
//! Lookups are tagged with a sequence number. Only the resolution of the
//! most recently requested lookup is applied; earlier ones are dropped even
//! if they resolve later.
//!
//! Once input is closed the state keeps applying events until no lookup is
//! pending and both sessions are idle, then asks the caller to stop.

use std::ops::ControlFlow;
use std::sync::Arc;

use lexi_types::{AppEvent, CaptureEvent, LookupOutcome, LookupResult, PlaybackEvent};

use crate::capture::{CaptureOutcome, CapturePhase, VoiceCaptureController};
use crate::cue::AudioCueController;
use crate::error::AppError;
use crate::lookup::DictionaryLookup;
use crate::playback::SpeechPlaybackController;
use crate::sink::EventSink;

/// Observable view of the state, compared between events to decide on redraws
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateSnapshot {
    pub query: String,
    pub result: Option<LookupResult>,
    pub error: Option<AppError>,
    pub capture: CapturePhase,
    pub speaking: bool,
    pub lookup_pending: bool,
}

pub struct InteractionState {
    query: String,
    result: Option<LookupResult>,
    error: Option<AppError>,
    /// Sequence number of the most recently issued lookup
    latest_seq: u64,
    /// Sequence number of the last lookup whose outcome was applied
    applied_seq: u64,
    input_closed: bool,
    lookup: Arc<dyn DictionaryLookup>,
    capture: VoiceCaptureController,
    playback: SpeechPlaybackController,
    cue: AudioCueController,
    sink: EventSink,
}

impl InteractionState {
    pub fn new(
        lookup: Arc<dyn DictionaryLookup>,
        capture: VoiceCaptureController,
        playback: SpeechPlaybackController,
        cue: AudioCueController,
        sink: EventSink,
    ) -> Self {
        Self {
            query: String::new(),
            result: None,
            error: None,
            latest_seq: 0,
            applied_seq: 0,
            input_closed: false,
            lookup,
            capture,
            playback,
            cue,
            sink,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn result(&self) -> Option<&LookupResult> {
        self.result.as_ref()
    }

    pub fn error(&self) -> Option<&AppError> {
        self.error.as_ref()
    }

    pub fn is_listening(&self) -> bool {
        self.capture.is_listening()
    }

    pub fn is_speaking(&self) -> bool {
        self.playback.is_speaking()
    }

    pub fn is_lookup_pending(&self) -> bool {
        self.latest_seq != self.applied_seq
    }

    /// No lookup in flight and neither session open
    pub fn is_settled(&self) -> bool {
        !self.is_lookup_pending() && !self.is_listening() && !self.is_speaking()
    }

    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            query: self.query.clone(),
            result: self.result.clone(),
            error: self.error.clone(),
            capture: self.capture.phase(),
            speaking: self.playback.is_speaking(),
            lookup_pending: self.is_lookup_pending(),
        }
    }

    /// Apply one event. Breaks after `Shutdown`, or once settled after `InputClosed`
    pub fn handle(&mut self, event: AppEvent) -> ControlFlow<()> {
        match event {
            AppEvent::Search(word) => {
                self.search(&word);
            }
            AppEvent::ToggleVoiceInput => self.toggle_voice_input(),
            AppEvent::PlayPronunciation => self.play_pronunciation(),
            AppEvent::ToggleMeaningPlayback => self.toggle_meaning_playback(),
            AppEvent::LookupResolved { seq, word, outcome } => {
                self.apply_lookup(seq, &word, outcome);
            }
            AppEvent::Capture(event) => self.on_capture_event(event),
            AppEvent::Playback(event) => self.on_playback_event(event),
            AppEvent::CueFailed { seq, url, reason } => self.on_cue_failed(seq, &url, &reason),
            AppEvent::Shutdown => {
                self.shutdown();
                return ControlFlow::Break(());
            }
            AppEvent::InputClosed => {
                tracing::info!("Input closed, finishing outstanding work");
                self.input_closed = true;
            }
        }

        if self.input_closed && self.is_settled() {
            self.shutdown();
            return ControlFlow::Break(());
        }
        ControlFlow::Continue(())
    }

    /// Start a lookup for `word`. Blank input is ignored and returns `None`
    pub fn search(&mut self, word: &str) -> Option<u64> {
        let word = word.trim();
        if word.is_empty() {
            tracing::debug!("Ignoring blank search");
            return None;
        }

        self.query = word.to_string();
        self.error = None;
        self.latest_seq += 1;
        let seq = self.latest_seq;

        tracing::info!(seq, "Looking up '{}'", word);

        let lookup = self.lookup.clone();
        let sink = self.sink.clone();
        let word = word.to_string();
        tokio::spawn(async move {
            let outcome = lookup.lookup(&word).await;
            sink.send(AppEvent::LookupResolved { seq, word, outcome }).await;
        });

        Some(seq)
    }

    /// Apply a lookup resolution if it belongs to the latest search
    pub fn apply_lookup(&mut self, seq: u64, word: &str, outcome: LookupOutcome) -> bool {
        if seq != self.latest_seq {
            tracing::debug!(seq, latest = self.latest_seq, "Discarding superseded lookup for '{}'", word);
            return false;
        }

        self.applied_seq = seq;
        match outcome {
            Ok(result) => {
                tracing::info!(seq, "Found '{}' with {} meanings", result.headword, result.meanings.len());
                self.result = Some(result);
                self.error = None;
            }
            Err(failure) => {
                tracing::info!(seq, "Lookup for '{}' failed: {}", word, failure);
                self.result = None;
                self.error = Some(failure.into());
            }
        }
        true
    }

    pub fn toggle_voice_input(&mut self) {
        match self.capture.toggle() {
            Ok(CaptureOutcome::Started) => self.error = None,
            Ok(outcome) => tracing::debug!("Voice input toggled: {:?}", outcome),
            Err(e) => self.error = Some(e),
        }
    }

    pub fn on_capture_event(&mut self, event: CaptureEvent) {
        match self.capture.on_event(event) {
            Some(CaptureOutcome::Recognized(text)) => {
                self.search(&text);
            }
            Some(CaptureOutcome::Failed(e)) => self.error = Some(e),
            _ => {}
        }
    }

    pub fn play_pronunciation(&mut self) {
        let outcome = match &self.result {
            Some(result) => self.cue.play(result, self.applied_seq),
            None => Err(AppError::PlaybackUnavailable(crate::cue::NO_AUDIO.to_string())),
        };

        match outcome {
            Ok(()) => self.error = None,
            Err(e) => self.error = Some(e),
        }
    }

    /// Report a failed pronunciation unless its result has been replaced since
    pub fn on_cue_failed(&mut self, seq: u64, url: &str, reason: &str) {
        if seq != self.applied_seq || self.result.is_none() {
            tracing::debug!(
                seq,
                applied = self.applied_seq,
                %url,
                "Ignoring cue failure for a replaced result"
            );
            return;
        }

        tracing::debug!(%url, "Reporting cue failure");
        self.error = Some(AppError::PlaybackUnavailable(format!(
            "Couldn't play pronunciation: {reason}"
        )));
    }

    /// Stop narration if speaking, otherwise narrate the current meanings
    pub fn toggle_meaning_playback(&mut self) {
        if self.playback.stop() {
            return;
        }

        let meanings = self
            .result
            .as_ref()
            .map(|r| r.meanings.as_slice())
            .unwrap_or_default();

        match self.playback.speak(meanings) {
            Ok(_) => self.error = None,
            Err(e) => self.error = Some(e),
        }
    }

    pub fn on_playback_event(&mut self, event: PlaybackEvent) {
        self.playback.on_event(event);
    }

    /// Release the microphone and the synthesizer
    pub fn shutdown(&mut self) {
        tracing::info!("Releasing capture and playback sessions");
        self.capture.abort();
        self.playback.stop();
    }
}
