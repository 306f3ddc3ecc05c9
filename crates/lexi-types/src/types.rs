use serde::{Deserialize, Serialize};

/// Display-ready dictionary entry for a single headword
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupResult {
    pub headword: String,
    pub phonetic: Option<String>,
    pub pronunciations: Vec<Pronunciation>,
    pub meanings: Vec<Meaning>,
}

impl LookupResult {
    /// First pronunciation clip, if any entry carries one
    pub fn audio_ref(&self) -> Option<&str> {
        self.pronunciations
            .iter()
            .find_map(|p| p.audio_ref.as_deref())
    }

    pub fn has_audio(&self) -> bool {
        self.audio_ref().is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pronunciation {
    pub audio_ref: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meaning {
    pub part_of_speech: String,
    pub definitions: Vec<Definition>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Definition {
    pub text: String,
    pub example: Option<String>,
}

/// Why a lookup produced no result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum LookupFailure {
    /// The service has no entry for the word
    #[error("{0}")]
    NotFound(String),

    /// Network failure or an unreadable response body
    #[error("{0}")]
    TransportError(String),
}

pub type LookupOutcome = Result<LookupResult, LookupFailure>;

#[cfg(test)]
mod tests {
    use super::*;

    fn result_with(pronunciations: Vec<Pronunciation>) -> LookupResult {
        LookupResult {
            headword: "cat".to_string(),
            phonetic: None,
            pronunciations,
            meanings: vec![],
        }
    }

    #[test]
    fn audio_ref_skips_entries_without_audio() {
        let result = result_with(vec![
            Pronunciation { audio_ref: None },
            Pronunciation {
                audio_ref: Some("https://example.org/cat.mp3".to_string()),
            },
        ]);

        assert_eq!(result.audio_ref(), Some("https://example.org/cat.mp3"));
        assert!(result.has_audio());
    }

    #[test]
    fn no_audio_when_pronunciations_empty() {
        assert!(!result_with(vec![]).has_audio());
    }

    #[test]
    fn serializes_optional_fields_as_null() {
        let json = serde_json::to_value(result_with(vec![])).unwrap();
        assert_eq!(json["headword"], "cat");
        assert!(json["phonetic"].is_null());
    }
}
