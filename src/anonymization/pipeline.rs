//! Extraction pipeline: normalize, detect, assign
//!
//! The only stage that talks to a recognizer. Its output is the ordered entry
//! list that the caller persists with [`crate::mapping::save`]; substitution
//! never re-runs detection.

use crate::anonymization::assigner::{AssignOutcome, LabelSelection, PlaceholderAssigner};
use crate::document::normalize::normalize_markdown;
use crate::domain::{AnonymapError, MappingEntry, Result};
use crate::recognizer::EntityRecognizer;
use serde::Serialize;

/// Result of one extraction run
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionResult {
    /// Identifier of the model that produced the detections
    pub model: String,
    /// Detections returned by the recognizer, before filtering
    pub detections: usize,
    /// Assigned entries in first-seen order
    pub entries: Vec<MappingEntry>,
    /// Detections dropped because their label was not selected
    pub not_selected: usize,
    /// Detections dropped as too short or purely numeric
    pub filtered: usize,
    /// Detections whose surface form already had a placeholder
    pub duplicates: usize,
}

/// Run extraction over raw document text
///
/// Fails with [`AnonymapError::EmptyInput`] when nothing is left after
/// normalization, and with [`AnonymapError::RecognizerUnavailable`] when the
/// recognizer fails; no partial entry list is returned in either case. An
/// empty entry list is a successful outcome.
pub fn extract_entities(
    raw: &str,
    recognizer: &dyn EntityRecognizer,
    selection: &LabelSelection,
) -> Result<ExtractionResult> {
    let text = normalize_markdown(raw);
    if text.trim().is_empty() {
        return Err(AnonymapError::EmptyInput);
    }

    tracing::info!(
        model = recognizer.model_id(),
        chars = text.chars().count(),
        labels = ?selection.labels(),
        "Running entity recognition"
    );

    let detections = recognizer.detect(&text)?;

    let mut result = ExtractionResult {
        model: recognizer.model_id().to_string(),
        detections: detections.len(),
        entries: Vec::new(),
        not_selected: 0,
        filtered: 0,
        duplicates: 0,
    };

    let mut assigner = PlaceholderAssigner::new(selection.clone());
    for detection in &detections {
        match assigner.offer(detection) {
            AssignOutcome::Assigned(_) => {}
            AssignOutcome::NotSelected => result.not_selected += 1,
            AssignOutcome::TooShort | AssignOutcome::Numeric => result.filtered += 1,
            AssignOutcome::Duplicate => result.duplicates += 1,
        }
    }
    result.entries = assigner.into_entries();

    tracing::info!(
        detections = result.detections,
        assigned = result.entries.len(),
        duplicates = result.duplicates,
        "Entity extraction complete"
    );

    Ok(result)
}
