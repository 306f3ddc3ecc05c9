use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Player program and args; the clip URL is passed as the last argument
    pub command: Option<Vec<String>>,
}
