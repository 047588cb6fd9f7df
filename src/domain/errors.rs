//! Domain error types
//!
//! Fatal, file- and resource-level failures are variants of [`AnonymapError`] and
//! abort the current operation. Content-level anomalies (one bad mapping row, one
//! bad entry pattern, one unknown placeholder prefix) are described by
//! [`SubstitutionIssue`] and the mapping loader's warnings; they are recorded and
//! skipped, never propagated.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Main Anonymap error type
#[derive(Debug, Error)]
pub enum AnonymapError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The entity recognizer could not be loaded or failed while running
    #[error("Recognizer unavailable: {0}")]
    RecognizerUnavailable(#[from] RecognizerError),

    /// Text was empty after normalization, nothing to run detection on
    #[error("Input text is empty after normalization")]
    EmptyInput,

    /// Mapping file errors
    #[error("Mapping error: {0}")]
    Mapping(#[from] MappingError),

    /// Document reading errors
    #[error("Document error: {0}")]
    Document(#[from] DocumentError),

    /// The operation was cancelled before it produced a result
    #[error("Operation cancelled during {0}")]
    Cancelled(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),
}

/// Recognizer adapter errors
///
/// Any of these aborts extraction: a partial entity list is never produced.
#[derive(Debug, Error)]
pub enum RecognizerError {
    /// None of the requested models could be loaded
    #[error("no model could be loaded (tried: {tried})")]
    NoModelAvailable { tried: String },

    /// Model failed to load
    #[error("model '{model}' failed to load: {reason}")]
    ModelLoad { model: String, reason: String },

    /// External recognizer process could not be started
    #[error("failed to start '{program}': {reason}")]
    Spawn { program: String, reason: String },

    /// External recognizer process exited unsuccessfully
    #[error("recognizer for model '{model}' exited with {status}: {stderr}")]
    ProcessFailed {
        model: String,
        status: String,
        stderr: String,
    },

    /// Recognizer output could not be parsed
    #[error("invalid recognizer output: {0}")]
    InvalidOutput(String),

    /// Pattern library could not be read or compiled
    #[error("pattern library error: {0}")]
    PatternLibrary(String),
}

/// Mapping store errors
#[derive(Debug, Error)]
pub enum MappingError {
    /// Mapping file unreadable (missing, permission, not UTF-8)
    #[error("failed to load mapping {}: {reason}", .path.display())]
    Load { path: PathBuf, reason: String },

    /// Mapping file could not be written
    #[error("failed to save mapping {}: {reason}", .path.display())]
    Save { path: PathBuf, reason: String },
}

/// Document reader errors
#[derive(Debug, Error)]
pub enum DocumentError {
    /// Input file does not exist
    #[error("document not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Input file could not be read
    #[error("failed to read {}: {reason}", .path.display())]
    Read { path: PathBuf, reason: String },

    /// Format is recognized but not supported, or content is binary
    #[error("unsupported document format for {}: {reason}", .path.display())]
    Unsupported { path: PathBuf, reason: String },

    /// Container or XML part of a rich document is damaged
    #[error("malformed document {}: {reason}", .path.display())]
    Malformed { path: PathBuf, reason: String },

    /// Output file could not be written
    #[error("failed to write {}: {reason}", .path.display())]
    Write { path: PathBuf, reason: String },
}

/// Content-level anomaly recovered during substitution
///
/// These are recorded in the substitution report and logged; the affected
/// entry is skipped or handled by a fallback, and processing continues.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SubstitutionIssue {
    /// The replacement pattern for one entry could not be compiled
    #[error("pattern for '{placeholder}' could not be built: {reason}")]
    PatternConstruction { placeholder: String, reason: String },

    /// Placeholder prefix is not a known category, uniform replacement applied
    #[error("unknown placeholder category for '{placeholder}', applied uniform replacement")]
    UnknownPlaceholderCategory { placeholder: String },
}

impl From<std::io::Error> for AnonymapError {
    fn from(err: std::io::Error) -> Self {
        AnonymapError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for AnonymapError {
    fn from(err: serde_json::Error) -> Self {
        AnonymapError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for AnonymapError {
    fn from(err: toml::de::Error) -> Self {
        AnonymapError::Configuration(format!("TOML parse error: {err}"))
    }
}

impl AnonymapError {
    /// Short name of the stage that failed, for user-facing reports
    pub fn stage(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "configuration",
            Self::RecognizerUnavailable(_) => "entity recognition",
            Self::EmptyInput => "normalization",
            Self::Mapping(MappingError::Load { .. }) => "mapping load",
            Self::Mapping(MappingError::Save { .. }) => "mapping save",
            Self::Document(DocumentError::Write { .. }) => "output write",
            Self::Document(_) => "document read",
            Self::Cancelled(_) => "cancellation",
            Self::Serialization(_) => "serialization",
            Self::Io(_) => "i/o",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anonymap_error_display() {
        let err = AnonymapError::Configuration("Invalid config".to_string());
        assert_eq!(err.to_string(), "Configuration error: Invalid config");
    }

    #[test]
    fn test_recognizer_error_conversion() {
        let err: AnonymapError = RecognizerError::NoModelAvailable {
            tried: "en_core_web_md".to_string(),
        }
        .into();
        assert!(matches!(err, AnonymapError::RecognizerUnavailable(_)));
        assert_eq!(err.stage(), "entity recognition");
    }

    #[test]
    fn test_mapping_error_stage() {
        let err: AnonymapError = MappingError::Load {
            path: PathBuf::from("map.csv"),
            reason: "not found".to_string(),
        }
        .into();
        assert_eq!(err.stage(), "mapping load");
        assert!(err.to_string().contains("map.csv"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let err: AnonymapError = io_err.into();
        assert!(matches!(err, AnonymapError::Io(_)));
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_err = toml::from_str::<toml::Value>("invalid = toml = syntax").unwrap_err();
        let err: AnonymapError = toml_err.into();
        assert!(matches!(err, AnonymapError::Configuration(_)));
        assert!(err.to_string().contains("TOML parse error"));
    }

    #[test]
    fn test_substitution_issue_display() {
        let issue = SubstitutionIssue::UnknownPlaceholderCategory {
            placeholder: "xyz_001".to_string(),
        };
        assert!(issue.to_string().contains("xyz_001"));
    }
}
