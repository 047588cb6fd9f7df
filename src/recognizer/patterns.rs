//! Pattern library recognizer
//!
//! An offline recognizer driven by a TOML library of regular expressions.
//! It is far less capable than a statistical NER model, but it needs no
//! external process and finds the structured entities (dates, amounts,
//! e-mail addresses, titled names) that matter most for redaction.
//!
//! # Library format
//!
//! ```toml
//! [patterns.titled_person]
//! label = "PERSON"
//! patterns = ['\b(?:Mr|Mrs|Dr)\.?\s+(?P<entity>\p{Lu}\p{Ll}+)']
//! ```

use super::EntityRecognizer;
use crate::domain::{EntityDetection, RecognizerError};
use regex::Regex;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Named capture group reported instead of the whole match
const ENTITY_GROUP: &str = "entity";

/// Pattern definition from TOML
#[derive(Debug, Clone, Deserialize)]
pub struct PatternDefinition {
    /// Recognizer label reported for matches
    pub label: String,
    /// Regex patterns for this label
    pub patterns: Vec<String>,
}

/// Compiled pattern with metadata
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    pub name: String,
    pub label: String,
    pub regex: Regex,
}

/// Pattern library container
#[derive(Debug, Deserialize)]
struct PatternLibrary {
    patterns: BTreeMap<String, PatternDefinition>,
}

/// Identifier a pattern library is cached under
pub fn library_id(path: Option<&Path>) -> String {
    match path {
        Some(path) => format!("patterns:{}", path.display()),
        None => "patterns:builtin".to_string(),
    }
}

/// Regex-based entity recognizer
#[derive(Debug, Clone)]
pub struct PatternRecognizer {
    id: String,
    patterns: Vec<CompiledPattern>,
}

impl PatternRecognizer {
    /// Load a pattern library from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, RecognizerError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            RecognizerError::PatternLibrary(format!(
                "failed to read {}: {e}",
                path.display()
            ))
        })?;

        Self::from_toml(&content, library_id(Some(path)))
    }

    /// Build a recognizer from TOML content
    pub fn from_toml(content: &str, id: impl Into<String>) -> Result<Self, RecognizerError> {
        let library: PatternLibrary = toml::from_str(content)
            .map_err(|e| RecognizerError::PatternLibrary(format!("invalid TOML: {e}")))?;

        let mut patterns = Vec::new();
        for (name, def) in library.patterns {
            let label = def.label.trim().to_uppercase();
            if label.is_empty() {
                return Err(RecognizerError::PatternLibrary(format!(
                    "pattern '{name}' has an empty label"
                )));
            }

            for pattern_str in &def.patterns {
                let regex = Regex::new(pattern_str).map_err(|e| {
                    RecognizerError::PatternLibrary(format!("invalid regex in pattern '{name}': {e}"))
                })?;
                patterns.push(CompiledPattern {
                    name: name.clone(),
                    label: label.clone(),
                    regex,
                });
            }
        }

        tracing::debug!(patterns = patterns.len(), "Pattern library compiled");

        Ok(Self {
            id: id.into(),
            patterns,
        })
    }

    /// Create a recognizer with the built-in pattern library
    pub fn default_patterns() -> Result<Self, RecognizerError> {
        let default_toml = include_str!("../../patterns/entity_patterns.toml");
        Self::from_toml(default_toml, library_id(None))
    }

    /// Get all patterns
    pub fn all_patterns(&self) -> &[CompiledPattern] {
        &self.patterns
    }
}

impl EntityRecognizer for PatternRecognizer {
    fn model_id(&self) -> &str {
        &self.id
    }

    /// Matches of every pattern, in document order
    ///
    /// Where matches overlap, the one starting first wins, then the longer one.
    fn detect(&self, text: &str) -> Result<Vec<EntityDetection>, RecognizerError> {
        let mut spans: Vec<(usize, usize, &str)> = Vec::new();

        for pattern in &self.patterns {
            for caps in pattern.regex.captures_iter(text) {
                let Some(m) = caps.name(ENTITY_GROUP).or_else(|| caps.get(0)) else {
                    continue;
                };
                if m.as_str().trim().is_empty() {
                    continue;
                }
                spans.push((m.start(), m.end(), pattern.label.as_str()));
            }
        }

        spans.sort_by_key(|&(start, end, _)| (start, std::cmp::Reverse(end)));

        let mut detections = Vec::new();
        let mut covered_until = 0;
        for (start, end, label) in spans {
            if start < covered_until {
                continue;
            }
            covered_until = end;
            detections.push(EntityDetection::new(&text[start..end], label));
        }

        Ok(detections)
    }
}
