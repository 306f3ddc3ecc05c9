use serde::{Deserialize, Serialize};

fn default_locale() -> String {
    "en-US".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceConfig {
    /// Recognition locale
    #[serde(default = "default_locale")]
    pub locale: String,
    /// Recognizer program and args, prints the transcript on stdout
    pub command: Option<Vec<String>>,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            locale: default_locale(),
            command: None,
        }
    }
}
