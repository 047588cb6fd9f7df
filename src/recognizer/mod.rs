//! Entity recognizer adapters
//!
//! A recognizer turns plain text into `(text, label)` detections. Its output
//! is treated as untrusted: the assigner filters and deduplicates whatever
//! comes back.
//!
//! Two adapters are provided:
//! - [`CommandRecognizer`] runs an external NER program that reads text on
//!   stdin and prints a JSON array of detections
//! - [`PatternRecognizer`] matches a TOML library of regular expressions
//!
//! Loaded recognizers are kept in a [`ModelCache`], which also walks the
//! configured fallback models.

pub mod cache;
pub mod command;
pub mod patterns;

pub use cache::{ModelCache, SharedRecognizer};
pub use command::CommandRecognizer;
pub use patterns::PatternRecognizer;

use crate::config::{RecognizerBackend, RecognizerConfig};
use crate::domain::{EntityDetection, RecognizerError};
use std::sync::Arc;

/// Named-entity recognizer
///
/// Implementations must be safe to call from a blocking worker thread.
pub trait EntityRecognizer: Send + Sync {
    /// Identifier of the loaded model
    fn model_id(&self) -> &str;

    /// Detect entities in `text`, in document order
    fn detect(&self, text: &str) -> Result<Vec<EntityDetection>, RecognizerError>;
}

/// Build a model cache whose loader matches the configured backend
pub fn model_cache_for(config: &RecognizerConfig) -> ModelCache {
    match config.backend {
        RecognizerBackend::Command => {
            let program = config.command.clone().unwrap_or_default();
            let args = config.args.clone();
            ModelCache::new(move |model: &str| {
                let recognizer = CommandRecognizer::load(model, &program, &args)?;
                Ok(Arc::new(recognizer) as SharedRecognizer)
            })
        }
        RecognizerBackend::Patterns => {
            let library = config.pattern_library.clone();
            ModelCache::new(move |_model: &str| {
                let recognizer = match &library {
                    Some(path) => PatternRecognizer::from_file(path)?,
                    None => PatternRecognizer::default_patterns()?,
                };
                Ok(Arc::new(recognizer) as SharedRecognizer)
            })
        }
    }
}

/// Models to try, in order, for the configured backend
///
/// The patterns backend has a single library, so it is loaded once under its
/// own identifier regardless of the configured model names.
pub fn candidate_models(config: &RecognizerConfig) -> Vec<String> {
    match config.backend {
        RecognizerBackend::Command => config.candidate_models(),
        RecognizerBackend::Patterns => vec![patterns::library_id(config.pattern_library.as_deref())],
    }
}

/// Load the first available recognizer for `config`
pub fn load_recognizer(config: &RecognizerConfig) -> Result<SharedRecognizer, RecognizerError> {
    let mut cache = model_cache_for(config);
    cache.get_or_load_first(&candidate_models(config))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patterns_backend_loads_builtin_library() {
        let config = RecognizerConfig::default();
        let recognizer = load_recognizer(&config).unwrap();
        assert_eq!(recognizer.model_id(), "patterns:builtin");
    }

    #[test]
    fn test_command_backend_candidates_follow_config() {
        let config = RecognizerConfig {
            backend: RecognizerBackend::Command,
            command: Some("ner".to_string()),
            ..RecognizerConfig::default()
        };
        assert_eq!(
            candidate_models(&config),
            vec!["en_core_web_lg", "en_core_web_md", "en_core_web_sm"]
        );
    }

    #[test]
    fn test_command_backend_without_program_fails() {
        let config = RecognizerConfig {
            backend: RecognizerBackend::Command,
            command: Some("anonymap-missing-ner-binary".to_string()),
            ..RecognizerConfig::default()
        };
        let err = load_recognizer(&config).err().unwrap();
        assert!(matches!(err, RecognizerError::NoModelAvailable { .. }));
    }
}
