//! Configuration schema types
//!
//! Every section has defaults, so an empty file (or no file at all) is a
//! valid configuration.

use crate::anonymization::{Exclusions, LabelSelection};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Recognizer backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RecognizerBackend {
    /// External program speaking the JSON detection protocol
    Command,
    /// Built-in or user-supplied regex pattern library
    #[default]
    Patterns,
}

impl std::str::FromStr for RecognizerBackend {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "command" => Ok(Self::Command),
            "patterns" => Ok(Self::Patterns),
            other => Err(format!(
                "Invalid recognizer backend '{other}'. Must be one of: command, patterns"
            )),
        }
    }
}

/// Main Anonymap configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnonymapConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Entity recognizer settings
    #[serde(default)]
    pub recognizer: RecognizerConfig,

    /// Entity extraction settings
    #[serde(default)]
    pub extraction: ExtractionConfig,

    /// Anonymization settings
    #[serde(default)]
    pub anonymization: AnonymizationConfig,

    /// Mapping file settings
    #[serde(default)]
    pub mapping: MappingConfig,

    /// Audit trail settings
    #[serde(default)]
    pub audit: AuditConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AnonymapConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> std::result::Result<(), String> {
        self.application.validate()?;
        self.recognizer.validate()?;
        self.extraction.validate()?;
        self.audit.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl ApplicationConfig {
    fn validate(&self) -> std::result::Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

/// Entity recognizer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecognizerConfig {
    /// Which adapter runs detection
    #[serde(default)]
    pub backend: RecognizerBackend,

    /// Preferred model identifier
    #[serde(default = "default_model")]
    pub model: String,

    /// Models tried in order when the preferred one fails to load
    #[serde(default = "default_fallback_models")]
    pub fallback_models: Vec<String>,

    /// Program run by the command backend
    #[serde(default)]
    pub command: Option<String>,

    /// Program arguments; `{model}` is replaced with the model identifier
    #[serde(default = "default_command_args")]
    pub args: Vec<String>,

    /// Pattern library used by the patterns backend (built-in when unset)
    #[serde(default)]
    pub pattern_library: Option<PathBuf>,
}

impl Default for RecognizerConfig {
    fn default() -> Self {
        Self {
            backend: RecognizerBackend::default(),
            model: default_model(),
            fallback_models: default_fallback_models(),
            command: None,
            args: default_command_args(),
            pattern_library: None,
        }
    }
}

impl RecognizerConfig {
    fn validate(&self) -> std::result::Result<(), String> {
        if self.backend == RecognizerBackend::Command {
            if self.model.trim().is_empty() {
                return Err("recognizer.model cannot be empty".to_string());
            }
            match &self.command {
                Some(command) if !command.trim().is_empty() => {}
                _ => {
                    return Err(
                        "recognizer.command is required when recognizer.backend = 'command'"
                            .to_string(),
                    )
                }
            }
        }
        if self.fallback_models.iter().any(|m| m.trim().is_empty()) {
            return Err("recognizer.fallback_models cannot contain empty names".to_string());
        }
        Ok(())
    }

    /// Preferred model followed by the fallbacks, without duplicates
    pub fn candidate_models(&self) -> Vec<String> {
        let mut models: Vec<String> = Vec::new();
        for model in std::iter::once(&self.model).chain(&self.fallback_models) {
            let model = model.trim();
            if !model.is_empty() && !models.iter().any(|m| m == model) {
                models.push(model.to_string());
            }
        }
        models
    }
}

/// Entity extraction configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Recognizer labels to keep; `OTHER` admits the miscellaneous types
    #[serde(default = "default_entity_types")]
    pub entity_types: Vec<String>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            entity_types: default_entity_types(),
        }
    }
}

impl ExtractionConfig {
    fn validate(&self) -> std::result::Result<(), String> {
        if self.entity_types.iter().all(|t| t.trim().is_empty()) {
            return Err("extraction.entity_types must name at least one label".to_string());
        }
        Ok(())
    }

    pub fn label_selection(&self) -> LabelSelection {
        LabelSelection::new(&self.entity_types)
    }
}

/// Anonymization configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnonymizationConfig {
    /// Entities never anonymized (case-insensitive)
    #[serde(default)]
    pub exclusions: Vec<String>,

    /// File with one excluded entity per line
    #[serde(default)]
    pub exclusions_file: Option<PathBuf>,
}

impl AnonymizationConfig {
    /// Merge inline exclusions with the exclusions file, if any
    pub fn load_exclusions(&self) -> Result<Exclusions> {
        let mut exclusions = Exclusions::new(&self.exclusions);
        if let Some(path) = &self.exclusions_file {
            let from_file = Exclusions::from_file(path).with_context(|| {
                format!("Failed to load anonymization.exclusions_file {}", path.display())
            })?;
            exclusions.extend(from_file.terms());
        }
        Ok(exclusions)
    }
}

/// Mapping file configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MappingConfig {
    /// Skip the first row when reading a mapping file
    #[serde(default = "default_true")]
    pub has_header: bool,

    /// Write the header row when saving a mapping file
    #[serde(default = "default_true")]
    pub write_header: bool,
}

impl Default for MappingConfig {
    fn default() -> Self {
        Self {
            has_header: true,
            write_header: true,
        }
    }
}

/// Audit trail configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Enable the audit trail
    #[serde(default)]
    pub enabled: bool,

    /// Audit log file path
    #[serde(default = "default_audit_log_path")]
    pub log_path: PathBuf,

    /// Write JSON lines instead of plain text
    #[serde(default = "default_true")]
    pub json_format: bool,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            log_path: default_audit_log_path(),
            json_format: true,
        }
    }
}

impl AuditConfig {
    fn validate(&self) -> std::result::Result<(), String> {
        if self.enabled && self.log_path.as_os_str().is_empty() {
            return Err("audit.log_path cannot be empty when audit is enabled".to_string());
        }
        Ok(())
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Local log directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

impl LoggingConfig {
    fn validate(&self) -> std::result::Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }
        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path cannot be empty when local logging is enabled".to_string());
        }
        Ok(())
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_model() -> String {
    "en_core_web_lg".to_string()
}

fn default_fallback_models() -> Vec<String> {
    vec!["en_core_web_md".to_string(), "en_core_web_sm".to_string()]
}

fn default_command_args() -> Vec<String> {
    vec!["{model}".to_string()]
}

fn default_entity_types() -> Vec<String> {
    vec!["PERSON".to_string()]
}

fn default_audit_log_path() -> PathBuf {
    PathBuf::from("./logs/anonymap_audit.log")
}

fn default_local_path() -> String {
    "./logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config: AnonymapConfig = toml::from_str("").unwrap();
        assert_eq!(config.application.log_level, "info");
        assert_eq!(config.recognizer.backend, RecognizerBackend::Patterns);
        assert_eq!(config.extraction.entity_types, vec!["PERSON"]);
        assert!(config.mapping.has_header);
        assert!(!config.audit.enabled);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_command_backend_requires_command() {
        let mut config = AnonymapConfig::default();
        config.recognizer.backend = RecognizerBackend::Command;
        assert!(config.validate().unwrap_err().contains("recognizer.command"));

        config.recognizer.command = Some("spacy-ner".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_candidate_models_dedup() {
        let config = RecognizerConfig {
            model: "en_core_web_md".to_string(),
            ..RecognizerConfig::default()
        };
        assert_eq!(
            config.candidate_models(),
            vec!["en_core_web_md", "en_core_web_sm"]
        );
    }

    #[test]
    fn test_invalid_log_level() {
        let mut config = AnonymapConfig::default();
        config.application.log_level = "verbose".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_rotation() {
        let mut config = AnonymapConfig::default();
        config.logging.local_rotation = "size".to_string();
        assert!(config.validate().unwrap_err().contains("local_rotation"));
    }

    #[test]
    fn test_empty_entity_types() {
        let mut config = AnonymapConfig::default();
        config.extraction.entity_types = vec![" ".to_string()];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_backend_from_str() {
        assert_eq!("COMMAND".parse::<RecognizerBackend>(), Ok(RecognizerBackend::Command));
        assert!("spacy".parse::<RecognizerBackend>().is_err());
    }

    #[test]
    fn test_load_exclusions_merges_inline() {
        let config = AnonymizationConfig {
            exclusions: vec!["London".to_string()],
            exclusions_file: None,
        };
        let exclusions = config.load_exclusions().unwrap();
        assert!(exclusions.contains("LONDON"));
    }
}
