use std::fmt::Write;

use lexi_core::{CapturePhase, StateSnapshot};
use lexi_types::LookupResult;

/// Text rendering of one result card
pub fn render_card(result: &LookupResult) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{}", result.headword);
    let _ = writeln!(
        out,
        "{}",
        result.phonetic.as_deref().unwrap_or("No phonetic available")
    );
    if result.has_audio() {
        let _ = writeln!(out, "[audio available: :play]");
    }

    let _ = writeln!(out, "Meaning:");
    if result.meanings.is_empty() {
        let _ = writeln!(out, "  No meanings found.");
    }
    for meaning in &result.meanings {
        let _ = writeln!(out, "  {}", meaning.part_of_speech);
        for definition in &meaning.definitions {
            let _ = writeln!(out, "    - {}", definition.text);
            if let Some(example) = &definition.example {
                let _ = writeln!(out, "      Example: {}", example);
            }
        }
    }

    out
}

/// Full screen for a state snapshot
pub fn render(snapshot: &StateSnapshot) -> String {
    let mut out = String::new();

    match snapshot.capture {
        CapturePhase::Listening => {
            let _ = writeln!(out, "Listening... Speak now");
        }
        CapturePhase::Stopping => {
            let _ = writeln!(out, "Stopping voice input...");
        }
        CapturePhase::Idle => {}
    }

    if snapshot.lookup_pending {
        let _ = writeln!(out, "Searching for '{}'...", snapshot.query);
    }

    if let Some(error) = &snapshot.error {
        let _ = writeln!(out, "Error: {}", error);
    }

    if let Some(result) = &snapshot.result {
        out.push_str(&render_card(result));
        if snapshot.speaking {
            let _ = writeln!(out, "Speaking... (:speak to stop)");
        }
    }

    let _ = writeln!(out);
    out
}

#[cfg(test)]
mod tests {
    use lexi_core::AppError;
    use lexi_types::{Definition, LookupFailure, Meaning, Pronunciation};

    use super::*;

    fn cat() -> LookupResult {
        LookupResult {
            headword: "cat".to_string(),
            phonetic: Some("/kæt/".to_string()),
            pronunciations: vec![Pronunciation {
                audio_ref: Some("u1".to_string()),
            }],
            meanings: vec![Meaning {
                part_of_speech: "noun".to_string(),
                definitions: vec![Definition {
                    text: "a feline".to_string(),
                    example: Some("the cat sat".to_string()),
                }],
            }],
        }
    }

    fn snapshot() -> StateSnapshot {
        StateSnapshot {
            query: "cat".to_string(),
            result: None,
            error: None,
            capture: CapturePhase::Idle,
            speaking: false,
            lookup_pending: false,
        }
    }

    #[test]
    fn card_lists_meanings_and_audio_hint() {
        assert_eq!(
            render_card(&cat()),
            "cat\n/kæt/\n[audio available: :play]\nMeaning:\n  noun\n    - a feline\n      Example: the cat sat\n"
        );
    }

    #[test]
    fn card_placeholders_for_missing_data() {
        let bare = LookupResult {
            headword: "zyx".to_string(),
            phonetic: None,
            pronunciations: vec![],
            meanings: vec![],
        };
        let card = render_card(&bare);

        assert!(card.contains("No phonetic available"));
        assert!(card.contains("No meanings found."));
        assert!(!card.contains(":play"));
    }

    #[test]
    fn screen_shows_status_and_error() {
        let screen = render(&StateSnapshot {
            capture: CapturePhase::Listening,
            error: Some(AppError::Lookup(LookupFailure::NotFound(
                "Word not found.".to_string(),
            ))),
            ..snapshot()
        });

        assert!(screen.contains("Listening... Speak now"));
        assert!(screen.contains("Error: Word not found."));
        assert!(!screen.contains("Meaning:"));
    }

    #[test]
    fn speaking_hint_follows_card() {
        let screen = render(&StateSnapshot {
            result: Some(cat()),
            speaking: true,
            lookup_pending: true,
            ..snapshot()
        });

        assert!(screen.starts_with("Searching for 'cat'..."));
        assert!(screen.contains("Speaking... (:speak to stop)"));
    }
}
