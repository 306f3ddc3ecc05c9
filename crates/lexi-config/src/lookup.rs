use serde::{Deserialize, Serialize};

fn default_endpoint() -> String {
    "https://api.dictionaryapi.dev/api/v2/entries/en".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupConfig {
    /// Base URL; the word is appended as the last path segment
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Request timeout, none by default
    pub timeout_seconds: Option<u64>,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout_seconds: None,
        }
    }
}
