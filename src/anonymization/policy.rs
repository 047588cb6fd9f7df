//! Restoration policy for the de-anonymize direction

use crate::domain::Category;

/// How the occurrences of one bolded placeholder are restored
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestorationPolicy {
    /// First occurrence in document order gets the full name, later ones the surname
    FirstFullThenSurname { full: String, surname: String },
    /// Every occurrence gets the same text
    Uniform(String),
}

impl RestorationPolicy {
    /// Pick the policy for an entry of `category` restoring to `real_entity`
    ///
    /// Person names with more than one whitespace-separated token use
    /// [`RestorationPolicy::FirstFullThenSurname`]; everything else, including
    /// unknown categories, is uniform.
    pub fn for_entry(category: Option<Category>, real_entity: &str) -> Self {
        if category == Some(Category::Person) {
            let tokens: Vec<&str> = real_entity.split_whitespace().collect();
            if let [_, .., last] = tokens.as_slice() {
                return Self::FirstFullThenSurname {
                    full: real_entity.to_string(),
                    surname: (*last).to_string(),
                };
            }
        }
        Self::Uniform(real_entity.to_string())
    }

    /// Text for the occurrence at 0-based `occurrence_index`
    pub fn replacement_for(&self, occurrence_index: usize) -> &str {
        match self {
            Self::FirstFullThenSurname { full, .. } if occurrence_index == 0 => full,
            Self::FirstFullThenSurname { surname, .. } => surname,
            Self::Uniform(text) => text,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::FirstFullThenSurname { .. } => "first_full_then_surname",
            Self::Uniform(_) => "uniform",
        }
    }
}

/// Per-entry occurrence state for a single replace-all pass
///
/// A fresh counter is created for every entry, so surname shortening never
/// leaks from one placeholder to another.
#[derive(Debug, Default)]
pub struct OccurrenceCounter {
    occurrence_index: usize,
}

impl OccurrenceCounter {
    /// Return the current 0-based index and move to the next occurrence
    pub fn advance(&mut self) -> usize {
        let current = self.occurrence_index;
        self.occurrence_index += 1;
        current
    }

    /// Number of occurrences seen so far
    pub fn seen(&self) -> usize {
        self.occurrence_index
    }
}
