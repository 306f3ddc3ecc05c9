use std::process::Stdio;

use async_trait::async_trait;
use lexi_core::{AudioError, AudioPlayer};

use crate::process::CommandLine;

/// Used when no player is configured
pub struct UnavailablePlayer;

#[async_trait]
impl AudioPlayer for UnavailablePlayer {
    async fn play(&self, _url: &str) -> Result<(), AudioError> {
        Err(AudioError::Unavailable)
    }
}

/// Plays a clip by running a program (e.g. `mpv --no-video`) with the URL as last argument
pub struct CommandPlayer {
    command: CommandLine,
}

impl CommandPlayer {
    pub fn new(parts: &[String]) -> Self {
        Self {
            command: CommandLine::new(parts),
        }
    }
}

#[async_trait]
impl AudioPlayer for CommandPlayer {
    async fn play(&self, url: &str) -> Result<(), AudioError> {
        let status = self
            .command
            .command()
            .arg(url)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await?;
        if !status.success() {
            return Err(AudioError::Exit(status.to_string()));
        }
        Ok(())
    }
}
