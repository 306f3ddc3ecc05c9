use std::sync::Arc;

use async_trait::async_trait;
use lexi_types::{AppEvent, LookupResult};

use crate::error::{AppError, AudioError};
use crate::sink::EventSink;

pub const NO_AUDIO: &str = "No audio available for this word.";

/// Plays a pronunciation clip by URL
#[async_trait]
pub trait AudioPlayer: Send + Sync {
    async fn play(&self, url: &str) -> Result<(), AudioError>;
}

/// Fires pronunciation playback for the current result.
///
/// Playback runs detached; overlapping invocations may overlap audibly.
/// Failures come back as [`AppEvent::CueFailed`].
pub struct AudioCueController {
    player: Arc<dyn AudioPlayer>,
    sink: EventSink,
}

impl AudioCueController {
    pub fn new(player: Arc<dyn AudioPlayer>, sink: EventSink) -> Self {
        Self { player, sink }
    }

    /// Issue one playback request for the first pronunciation that has audio.
    /// `seq` is the lookup that produced `result`; a failure report carries it back
    pub fn play(&self, result: &LookupResult, seq: u64) -> Result<(), AppError> {
        let Some(url) = result.audio_ref() else {
            return Err(AppError::PlaybackUnavailable(NO_AUDIO.to_string()));
        };

        let url = url.to_string();
        let player = self.player.clone();
        let sink = self.sink.clone();

        tracing::debug!(%url, "Playing pronunciation");
        tokio::spawn(async move {
            if let Err(e) = player.play(&url).await {
                tracing::warn!(%url, "Pronunciation playback failed: {}", e);
                sink.send(AppEvent::CueFailed {
                    seq,
                    url,
                    reason: e.to_string(),
                })
                .await;
            }
        });

        Ok(())
    }
}
