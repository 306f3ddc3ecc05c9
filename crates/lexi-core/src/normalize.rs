//! Projection of dictionary service payloads onto [`LookupResult`].
//!
//! The service answers with either an array of entries or an object whose
//! `title` field signals that the word is unknown. Only the first entry is
//! kept. Empty strings are treated the same as missing values.

use lexi_types::{Definition, LookupFailure, LookupOutcome, LookupResult, Meaning, Pronunciation};
use serde::Deserialize;

pub const NOT_FOUND_MESSAGE: &str = "Word not found.";

/// Parsed response body of the dictionary service
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum LookupPayload {
    Entries(Vec<RawEntry>),
    Missing(MissingEntry),
}

#[derive(Debug, Clone, Deserialize)]
pub struct MissingEntry {
    pub title: String,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawEntry {
    pub word: String,
    #[serde(default)]
    pub phonetic: Option<String>,
    #[serde(default)]
    pub phonetics: Option<Vec<RawPhonetic>>,
    #[serde(default)]
    pub meanings: Option<Vec<RawMeaning>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawPhonetic {
    #[serde(default)]
    pub audio: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMeaning {
    #[serde(default)]
    pub part_of_speech: Option<String>,
    #[serde(default)]
    pub definitions: Option<Vec<RawDefinition>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawDefinition {
    pub definition: String,
    #[serde(default)]
    pub example: Option<String>,
}

/// Map a structurally valid payload to a result or `NotFound`
pub fn normalize(payload: LookupPayload) -> LookupOutcome {
    let entries = match payload {
        LookupPayload::Missing(missing) => {
            tracing::debug!(
                title = %missing.title,
                detail = missing.message.as_deref().unwrap_or_default(),
                "Service reported no definitions"
            );
            return Err(LookupFailure::NotFound(NOT_FOUND_MESSAGE.to_string()));
        }
        LookupPayload::Entries(entries) => entries,
    };

    let Some(entry) = entries.into_iter().next() else {
        tracing::debug!("Service returned an empty entry list");
        return Err(LookupFailure::NotFound(NOT_FOUND_MESSAGE.to_string()));
    };

    Ok(project(entry))
}

fn project(entry: RawEntry) -> LookupResult {
    let pronunciations = entry
        .phonetics
        .unwrap_or_default()
        .into_iter()
        .filter_map(|p| non_empty(p.audio))
        .map(|audio| Pronunciation {
            audio_ref: Some(audio),
        })
        .collect();

    let meanings = entry
        .meanings
        .unwrap_or_default()
        .into_iter()
        .map(|m| Meaning {
            part_of_speech: m.part_of_speech.unwrap_or_default(),
            definitions: m
                .definitions
                .unwrap_or_default()
                .into_iter()
                .map(|d| Definition {
                    text: d.definition,
                    example: non_empty(d.example),
                })
                .collect(),
        })
        .collect();

    LookupResult {
        headword: entry.word,
        phonetic: non_empty(entry.phonetic),
        pronunciations,
        meanings,
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> LookupPayload {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn title_payload_is_not_found() {
        let outcome = normalize(parse(r#"{"title": "No Definitions Found"}"#));
        assert_eq!(
            outcome,
            Err(LookupFailure::NotFound(NOT_FOUND_MESSAGE.to_string()))
        );
    }

    #[test]
    fn first_entry_is_projected() {
        let outcome = normalize(parse(
            r#"[{
                "word": "cat",
                "phonetics": [{"audio": "u1"}],
                "meanings": [{"partOfSpeech": "noun", "definitions": [{"definition": "a feline"}]}]
            }]"#,
        ));

        let result = outcome.unwrap();
        assert_eq!(result.headword, "cat");
        assert_eq!(result.phonetic, None);
        assert_eq!(
            result.pronunciations,
            vec![Pronunciation {
                audio_ref: Some("u1".to_string())
            }]
        );
        assert_eq!(result.meanings.len(), 1);
        assert_eq!(result.meanings[0].part_of_speech, "noun");
        assert_eq!(
            result.meanings[0].definitions,
            vec![Definition {
                text: "a feline".to_string(),
                example: None
            }]
        );
    }

    #[test]
    fn later_entries_are_ignored() {
        let result = normalize(parse(r#"[{"word": "lead"}, {"word": "lead2"}]"#)).unwrap();
        assert_eq!(result.headword, "lead");
    }

    #[test]
    fn phonetics_without_audio_are_dropped() {
        let result = normalize(parse(
            r#"[{
                "word": "hello",
                "phonetic": "həˈləʊ",
                "phonetics": [
                    {"text": "həˈləʊ", "audio": ""},
                    {"text": "həˈloʊ"},
                    {"audio": "https://example.org/hello-us.mp3"}
                ]
            }]"#,
        ))
        .unwrap();

        assert_eq!(result.phonetic.as_deref(), Some("həˈləʊ"));
        assert_eq!(result.pronunciations.len(), 1);
        assert_eq!(
            result.audio_ref(),
            Some("https://example.org/hello-us.mp3")
        );
    }

    #[test]
    fn missing_and_null_fields_map_to_absent() {
        let result = normalize(parse(
            r#"[{
                "word": "run",
                "phonetic": null,
                "phonetics": null,
                "meanings": [
                    {"partOfSpeech": "verb", "definitions": [
                        {"definition": "move quickly", "example": "run home"},
                        {"definition": "operate", "example": ""}
                    ]},
                    {"definitions": null}
                ]
            }]"#,
        ))
        .unwrap();

        assert!(result.pronunciations.is_empty());
        assert_eq!(result.meanings.len(), 2);
        assert_eq!(
            result.meanings[0].definitions[0].example.as_deref(),
            Some("run home")
        );
        assert_eq!(result.meanings[0].definitions[1].example, None);
        assert_eq!(result.meanings[1].part_of_speech, "");
        assert!(result.meanings[1].definitions.is_empty());
    }

    #[test]
    fn empty_entry_list_is_not_found() {
        assert!(matches!(
            normalize(parse("[]")),
            Err(LookupFailure::NotFound(_))
        ));
    }

    #[test]
    fn object_without_title_does_not_parse() {
        assert!(serde_json::from_str::<LookupPayload>(r#"{"error": "boom"}"#).is_err());
    }
}
