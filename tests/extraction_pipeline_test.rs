//! Integration tests for entity extraction and recognizer loading

use anonymap::anonymization::{extract_entities, LabelSelection};
use anonymap::config::{RecognizerBackend, RecognizerConfig};
use anonymap::domain::{AnonymapError, EntityDetection, RecognizerError};
use anonymap::recognizer::{load_recognizer, EntityRecognizer, PatternRecognizer};
use std::io::Write;
use tempfile::NamedTempFile;

struct ScriptedRecognizer(Vec<EntityDetection>);

impl EntityRecognizer for ScriptedRecognizer {
    fn model_id(&self) -> &str {
        "scripted"
    }

    fn detect(&self, _text: &str) -> Result<Vec<EntityDetection>, RecognizerError> {
        Ok(self.0.clone())
    }
}

#[test]
fn test_filtering_and_numbering() {
    let recognizer = ScriptedRecognizer(vec![
        EntityDetection::new("Jane Doe", "PERSON"),
        EntityDetection::new("Oslo", "GPE"),
        EntityDetection::new("Jane Doe", "PERSON"),
        EntityDetection::new("J", "PERSON"),
        EntityDetection::new("2024", "DATE"),
        EntityDetection::new("42", "CARDINAL"),
        EntityDetection::new("Norwegian", "NORP"),
        EntityDetection::new("  John Roe ", "PERSON"),
        EntityDetection::new("Acme", "ORG"),
    ]);
    let selection = LabelSelection::parse_list("PERSON,GPE,DATE,NORP,OTHER");

    let result = extract_entities("Some text.", &recognizer, &selection).unwrap();

    let entries: Vec<(&str, &str)> = result
        .entries
        .iter()
        .map(|e| (e.placeholder.as_str(), e.real_entity.as_str()))
        .collect();
    assert_eq!(
        entries,
        vec![
            ("person_001", "Jane Doe"),
            ("place_001", "Oslo"),
            ("misc_001", "2024"),
            ("misc_002", "42"),
            ("group_001", "Norwegian"),
            ("person_002", "John Roe"),
        ]
    );
    assert_eq!(result.detections, 9);
    assert_eq!(result.duplicates, 1);
    assert_eq!(result.not_selected, 1);
    assert_eq!(result.filtered, 1);
}

#[test]
fn test_empty_after_normalization() {
    let recognizer = ScriptedRecognizer(vec![EntityDetection::new("Jane Doe", "PERSON")]);
    let result = extract_entities("<!-- only a comment -->", &recognizer, &LabelSelection::default());
    assert!(matches!(result, Err(AnonymapError::EmptyInput)));
}

#[test]
fn test_custom_pattern_library() {
    let mut library = NamedTempFile::new().unwrap();
    library
        .write_all(
            br#"
[patterns.case_number]
label = "LAW"
patterns = ['\bCase (?P<entity>[A-Z]{2}-\d{4})\b']
"#,
        )
        .unwrap();
    library.flush().unwrap();

    let config = RecognizerConfig {
        backend: RecognizerBackend::Patterns,
        pattern_library: Some(library.path().to_path_buf()),
        ..RecognizerConfig::default()
    };
    let recognizer = load_recognizer(&config).unwrap();
    assert!(recognizer.model_id().starts_with("patterns:"));

    let result = extract_entities(
        "See Case AB-1234 and Case CD-5678.",
        recognizer.as_ref(),
        &LabelSelection::parse_list("OTHER"),
    )
    .unwrap();
    let values: Vec<&str> = result.entries.iter().map(|e| e.real_entity.as_str()).collect();
    assert_eq!(values, vec!["AB-1234", "CD-5678"]);
    assert_eq!(result.entries[0].placeholder.as_str(), "thing_001");
}

#[test]
fn test_default_selection_keeps_people_only() {
    let recognizer = PatternRecognizer::default_patterns().unwrap();
    let result = extract_entities(
        "Prof. Ada Lovelace wrote to Babbage Institute on 2024-05-01.",
        &recognizer,
        &LabelSelection::default(),
    )
    .unwrap();
    assert_eq!(result.entries.len(), 1);
    assert_eq!(result.entries[0].real_entity, "Ada Lovelace");
}

#[cfg(unix)]
mod command_backend {
    use super::*;

    /// Shell recognizer that only knows the `en_core_web_sm` model
    fn shell_config() -> RecognizerConfig {
        let script = r#"
if [ "$0" != "en_core_web_sm" ]; then echo "model $0 not installed" >&2; exit 1; fi
cat > /dev/null
echo '[{"text": "Jane Doe", "label": "PERSON"}, {"text": "Oslo", "label_": "GPE"}]'
"#;
        RecognizerConfig {
            backend: RecognizerBackend::Command,
            command: Some("sh".to_string()),
            args: vec!["-c".to_string(), script.to_string(), "{model}".to_string()],
            ..RecognizerConfig::default()
        }
    }

    #[test]
    fn test_falls_back_to_available_model() {
        let recognizer = load_recognizer(&shell_config()).unwrap();
        assert_eq!(recognizer.model_id(), "en_core_web_sm");

        let result = extract_entities(
            "Jane Doe lives in Oslo.",
            recognizer.as_ref(),
            &LabelSelection::parse_list("PERSON,GPE"),
        )
        .unwrap();
        assert_eq!(result.model, "en_core_web_sm");
        assert_eq!(result.entries.len(), 2);
    }

    #[test]
    fn test_no_model_available() {
        let config = RecognizerConfig {
            fallback_models: vec!["en_core_web_md".to_string()],
            ..shell_config()
        };
        match load_recognizer(&config) {
            Err(RecognizerError::NoModelAvailable { tried }) => {
                assert!(tried.contains("en_core_web_lg"));
                assert!(tried.contains("en_core_web_md"));
            }
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("expected no model to load"),
        }
    }
}
