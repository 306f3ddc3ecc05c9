use std::env;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use self::audio::AudioConfig;
use self::lookup::LookupConfig;
use self::speech::SpeechConfig;
use self::voice::VoiceConfig;

pub mod audio;
pub mod lookup;
pub mod speech;
pub mod voice;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub lookup: LookupConfig,
    pub voice: VoiceConfig,
    pub speech: SpeechConfig,
    pub audio: AudioConfig,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("Invalid config {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
}

impl Config {
    /// Load a JSON profile if given, then apply environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| env::var(key).ok());
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        tracing::info!("Loading config from {}", path.display());
        let data = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        serde_json::from_str(&data).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// Override fields from `LEXI_*` variables resolved through `var`
    pub fn apply_env<F>(&mut self, var: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(endpoint) = var("LEXI_ENDPOINT") {
            self.lookup.endpoint = endpoint;
        }

        if let Some(timeout) = var("LEXI_TIMEOUT_SECONDS") {
            match timeout.parse() {
                Ok(seconds) => self.lookup.timeout_seconds = Some(seconds),
                Err(_) => tracing::warn!("Ignoring invalid LEXI_TIMEOUT_SECONDS: {timeout}"),
            }
        }

        if let Some(locale) = var("LEXI_LOCALE") {
            self.voice.locale = locale;
        }

        if let Some(command) = var("LEXI_RECOGNIZER") {
            self.voice.command = split_command(&command);
        }

        if let Some(command) = var("LEXI_SYNTHESIZER") {
            self.speech.command = split_command(&command);
        }

        if let Some(command) = var("LEXI_PLAYER") {
            self.audio.command = split_command(&command);
        }
    }
}

/// Whitespace-split program line; empty means "not configured"
pub fn split_command(line: &str) -> Option<Vec<String>> {
    let parts: Vec<String> = line.split_whitespace().map(str::to_string).collect();
    if parts.is_empty() { None } else { Some(parts) }
}
