//! Placeholder assignment
//!
//! Turns recognizer detections into an ordered list of mapping entries. Each new
//! surface form gets the next `<category>_NNN` placeholder of its category;
//! repeated surface forms are ignored so the counters only move for new text.

use crate::domain::{Category, EntityDetection, MappingEntry, Placeholder};
use std::collections::{HashMap, HashSet};

/// Allow-list marker that admits [`OTHER_TYPE_LABELS`]
pub const OTHER_MARKER: &str = "OTHER";

/// Labels admitted by the [`OTHER_MARKER`] allow-list entry
pub const OTHER_TYPE_LABELS: [&str; 7] = [
    "TIME", "PERCENT", "QUANTITY", "ORDINAL", "CARDINAL", "LANGUAGE", "LAW",
];

/// Labels offered for selection, with a display name
pub const SELECTABLE_LABELS: [(&str, &str); 12] = [
    ("PERSON", "Person"),
    ("ORG", "Organization"),
    ("GPE", "Geopolitical entity (countries, cities)"),
    ("LOC", "Location (non-GPE, e.g. mountains)"),
    ("FAC", "Facility (buildings, airports)"),
    ("NORP", "Group (nationalities, religious/political)"),
    ("PRODUCT", "Product"),
    ("EVENT", "Event"),
    ("WORK_OF_ART", "Work of art"),
    ("DATE", "Date"),
    ("MONEY", "Money"),
    (OTHER_MARKER, "Other (time, quantity, language, etc.)"),
];

/// Set of recognizer labels the caller wants anonymized
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelSelection {
    labels: HashSet<String>,
}

impl LabelSelection {
    /// Build a selection from label codes; codes are trimmed and upper-cased
    ///
    /// `OTHER_TYPES` is accepted as an alias of [`OTHER_MARKER`].
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let labels = labels
            .into_iter()
            .map(|l| l.as_ref().trim().to_uppercase())
            .filter(|l| !l.is_empty())
            .map(|l| {
                if l == "OTHER_TYPES" {
                    OTHER_MARKER.to_string()
                } else {
                    l
                }
            })
            .collect();
        Self { labels }
    }

    /// Parse a comma-separated list such as `PERSON,ORG,OTHER`
    pub fn parse_list(list: &str) -> Self {
        Self::new(list.split(','))
    }

    /// Whether detections carrying `label` should be kept
    pub fn allows(&self, label: &str) -> bool {
        if self.labels.contains(label) {
            return true;
        }
        self.labels.contains(OTHER_MARKER) && OTHER_TYPE_LABELS.contains(&label)
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Selected label codes in sorted order
    pub fn labels(&self) -> Vec<&str> {
        let mut labels: Vec<&str> = self.labels.iter().map(String::as_str).collect();
        labels.sort_unstable();
        labels
    }
}

impl Default for LabelSelection {
    fn default() -> Self {
        Self::new(["PERSON"])
    }
}

/// Outcome of offering one detection to the assigner
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssignOutcome {
    /// New surface form, placeholder assigned
    Assigned(Placeholder),
    /// Label not in the selection
    NotSelected,
    /// Trimmed text shorter than two characters
    TooShort,
    /// Purely numeric text under a category that is not numeric-safe
    Numeric,
    /// Surface form already has a placeholder
    Duplicate,
}

/// Stateful placeholder assigner for a single document
///
/// Counters are scoped per category and start at zero; the counter of a
/// category is incremented before formatting, so the first placeholder is `_001`.
pub struct PlaceholderAssigner {
    selection: LabelSelection,
    counters: HashMap<Category, usize>,
    seen: HashSet<String>,
    entries: Vec<MappingEntry>,
}

impl PlaceholderAssigner {
    /// Create an assigner that keeps only detections allowed by `selection`
    pub fn new(selection: LabelSelection) -> Self {
        Self {
            selection,
            counters: HashMap::new(),
            seen: HashSet::new(),
            entries: Vec::new(),
        }
    }

    /// Offer one detection
    pub fn offer(&mut self, detection: &EntityDetection) -> AssignOutcome {
        if !self.selection.allows(&detection.label) {
            return AssignOutcome::NotSelected;
        }

        let text = detection.text.trim();
        if text.chars().count() < 2 {
            return AssignOutcome::TooShort;
        }

        let category = Category::from_label(&detection.label);
        if text.chars().all(char::is_numeric) && !category.is_numeric_safe() {
            return AssignOutcome::Numeric;
        }

        if self.seen.contains(text) {
            return AssignOutcome::Duplicate;
        }

        let placeholder = self.next_placeholder(category);
        self.seen.insert(text.to_string());
        self.entries.push(MappingEntry {
            placeholder: placeholder.clone(),
            real_entity: text.to_string(),
        });

        tracing::debug!(
            label = %detection.label,
            placeholder = %placeholder,
            entity = %text,
            "Assigned placeholder"
        );

        AssignOutcome::Assigned(placeholder)
    }

    /// Entries assigned so far, in first-seen order
    pub fn entries(&self) -> &[MappingEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<MappingEntry> {
        self.entries
    }

    fn next_placeholder(&mut self, category: Category) -> Placeholder {
        let counter = self.counters.entry(category).or_insert(0);
        *counter += 1;
        Placeholder::generate(category, *counter)
    }
}

/// Assign placeholders to `detections`, returning entries in first-seen order
///
/// An empty result is a successful outcome: nothing survived filtering.
///
/// # Examples
///
/// ```
/// use anonymap::anonymization::assigner::{assign, LabelSelection};
/// use anonymap::domain::EntityDetection;
///
/// let detections = vec![
///     EntityDetection::new("Jane Doe", "PERSON"),
///     EntityDetection::new("Acme Corp", "ORG"),
///     EntityDetection::new("Jane Doe", "PERSON"),
/// ];
/// let entries = assign(&detections, &LabelSelection::new(["PERSON", "ORG"]));
///
/// assert_eq!(entries.len(), 2);
/// assert_eq!(entries[0].placeholder.as_str(), "person_001");
/// assert_eq!(entries[1].placeholder.as_str(), "org_001");
/// ```
pub fn assign(detections: &[EntityDetection], selection: &LabelSelection) -> Vec<MappingEntry> {
    let mut assigner = PlaceholderAssigner::new(selection.clone());
    for detection in detections {
        assigner.offer(detection);
    }
    assigner.into_entries()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(text: &str, label: &str) -> EntityDetection {
        EntityDetection::new(text, label)
    }

    fn placeholders(entries: &[MappingEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.placeholder.as_str()).collect()
    }

    #[test]
    fn test_counters_are_per_category() {
        let selection = LabelSelection::new(["PERSON", "ORG", "GPE"]);
        let entries = assign(
            &[
                d("Alice Smith", "PERSON"),
                d("Paris", "GPE"),
                d("Bob Jones", "PERSON"),
                d("Acme", "ORG"),
                d("Berlin", "GPE"),
            ],
            &selection,
        );
        assert_eq!(
            placeholders(&entries),
            vec!["person_001", "place_001", "person_002", "org_001", "place_002"]
        );
    }

    #[test]
    fn test_duplicates_do_not_advance_counter() {
        let mut assigner = PlaceholderAssigner::new(LabelSelection::default());
        assert!(matches!(
            assigner.offer(&d("Jane", "PERSON")),
            AssignOutcome::Assigned(_)
        ));
        assert_eq!(assigner.offer(&d("Jane", "PERSON")), AssignOutcome::Duplicate);
        assert_eq!(assigner.offer(&d("  Jane ", "PERSON")), AssignOutcome::Duplicate);
        assigner.offer(&d("John", "PERSON"));
        assert_eq!(placeholders(assigner.entries()), vec!["person_001", "person_002"]);
    }

    #[test]
    fn test_dedup_is_case_sensitive() {
        let entries = assign(&[d("Jane", "PERSON"), d("JANE", "PERSON")], &LabelSelection::default());
        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn test_filters_unselected_labels() {
        let entries = assign(&[d("Acme", "ORG")], &LabelSelection::default());
        assert!(entries.is_empty());
    }

    #[test]
    fn test_short_text_skipped() {
        let mut assigner = PlaceholderAssigner::new(LabelSelection::default());
        assert_eq!(assigner.offer(&d(" J ", "PERSON")), AssignOutcome::TooShort);
    }

    #[test]
    fn test_numeric_skipped_unless_misc() {
        let selection = LabelSelection::new(["PERSON", "DATE"]);
        let mut assigner = PlaceholderAssigner::new(selection);
        assert_eq!(assigner.offer(&d("1984", "PERSON")), AssignOutcome::Numeric);
        assert_eq!(
            assigner.offer(&d("1984", "DATE")),
            AssignOutcome::Assigned(Placeholder::generate(Category::Misc, 1))
        );
    }

    #[test]
    fn test_other_marker_admits_secondary_labels() {
        let selection = LabelSelection::new(["OTHER"]);
        assert!(selection.allows("CARDINAL"));
        assert!(selection.allows("LAW"));
        assert!(!selection.allows("PERSON"));
        assert!(!selection.allows("MONEY"));

        let alias = LabelSelection::parse_list("person, other_types");
        assert!(alias.allows("PERSON"));
        assert!(alias.allows("TIME"));
    }

    #[test]
    fn test_unmapped_label_falls_back_to_misc() {
        let entries = assign(&[d("$5 million", "MONEY")], &LabelSelection::new(["MONEY"]));
        assert_eq!(placeholders(&entries), vec!["misc_001"]);
    }

    #[test]
    fn test_entity_text_is_trimmed() {
        let entries = assign(&[d("  Jane Doe\n", "PERSON")], &LabelSelection::default());
        assert_eq!(entries[0].real_entity, "Jane Doe");
    }
}
