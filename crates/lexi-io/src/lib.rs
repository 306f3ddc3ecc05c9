use std::sync::Arc;

use lexi_config::Config;
use lexi_core::{AudioPlayer, SpeechRecognizer, SpeechSynthesizer};

pub mod audio;
pub mod process;
pub mod recognizer;
pub mod synthesizer;

pub use audio::{CommandPlayer, UnavailablePlayer};
pub use recognizer::{CommandRecognizer, UnsupportedRecognizer};
pub use synthesizer::{CommandSynthesizer, UnavailableSynthesizer};

/// Platform engines selected from config
pub struct Engines {
    pub recognizer: Arc<dyn SpeechRecognizer>,
    pub synthesizer: Arc<dyn SpeechSynthesizer>,
    pub player: Arc<dyn AudioPlayer>,
}

impl Engines {
    pub fn from_config(config: &Config) -> Self {
        let recognizer: Arc<dyn SpeechRecognizer> = match &config.voice.command {
            Some(command) => Arc::new(CommandRecognizer::new(command)),
            None => {
                tracing::info!("No recognizer configured, voice input unsupported");
                Arc::new(UnsupportedRecognizer)
            }
        };

        let synthesizer: Arc<dyn SpeechSynthesizer> = match &config.speech.command {
            Some(command) => Arc::new(CommandSynthesizer::new(command)),
            None => {
                tracing::info!("No synthesizer configured, meaning playback unavailable");
                Arc::new(UnavailableSynthesizer)
            }
        };

        let player: Arc<dyn AudioPlayer> = match &config.audio.command {
            Some(command) => Arc::new(CommandPlayer::new(command)),
            None => {
                tracing::info!("No audio player configured, pronunciations unavailable");
                Arc::new(UnavailablePlayer)
            }
        };

        Self {
            recognizer,
            synthesizer,
            player,
        }
    }
}
