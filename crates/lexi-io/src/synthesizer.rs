use std::process::Stdio;

use lexi_core::{EventSink, PlaybackHandle, SpeechSynthesizer, SynthesisError};
use lexi_types::{AppEvent, PlaybackEvent, SessionId};
use tokio::process::Child;
use tokio_util::sync::CancellationToken;

use crate::process::{CommandLine, kill};

/// Used when no synthesizer is configured
pub struct UnavailableSynthesizer;

impl SpeechSynthesizer for UnavailableSynthesizer {
    fn speak(
        &self,
        _session: SessionId,
        _text: &str,
        _sink: EventSink,
    ) -> Result<Box<dyn PlaybackHandle>, SynthesisError> {
        Err(SynthesisError::Unavailable)
    }
}

/// Narrates by running a program (e.g. `espeak`) with the text as last argument
pub struct CommandSynthesizer {
    command: CommandLine,
}

impl CommandSynthesizer {
    pub fn new(parts: &[String]) -> Self {
        Self {
            command: CommandLine::new(parts),
        }
    }
}

impl SpeechSynthesizer for CommandSynthesizer {
    fn speak(
        &self,
        session: SessionId,
        text: &str,
        sink: EventSink,
    ) -> Result<Box<dyn PlaybackHandle>, SynthesisError> {
        let child = self
            .command
            .command()
            .arg(text)
            .stdout(Stdio::null())
            .spawn()
            .map_err(|e| SynthesisError::Start(format!("{}: {}", self.command.program, e)))?;

        let cancel = CancellationToken::new();
        tokio::spawn(run_utterance(session, child, cancel.clone(), sink));

        Ok(Box::new(CommandPlaybackHandle { cancel }))
    }
}

struct CommandPlaybackHandle {
    cancel: CancellationToken,
}

impl PlaybackHandle for CommandPlaybackHandle {
    fn cancel(&mut self) {
        self.cancel.cancel();
    }
}

async fn run_utterance(
    session: SessionId,
    mut child: Child,
    cancel: CancellationToken,
    sink: EventSink,
) {
    tokio::select! {
        status = child.wait() => {
            match status {
                Ok(status) if !status.success() => {
                    tracing::warn!(%session, "Synthesizer exited with {}", status);
                }
                Err(e) => tracing::warn!(%session, "Failed to wait for synthesizer: {}", e),
                Ok(_) => {}
            }
            sink.emit(AppEvent::Playback(PlaybackEvent::Ended { session }));
        }
        _ = cancel.cancelled() => {
            kill(&mut child).await;
            tracing::debug!(%session, "Narration cancelled");
        }
    }
}
