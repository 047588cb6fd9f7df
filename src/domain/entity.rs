//! Entity, placeholder and mapping entry types

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Coarse bucket a recognizer's fine-grained type label is normalized into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// People, first and last names
    Person,
    /// Companies, agencies, institutions
    Org,
    /// Countries, cities, locations, facilities
    Place,
    /// Products, events, works of art, laws, languages
    Thing,
    /// Nationalities, religious and political groups
    Group,
    /// Everything else, including dates, amounts and numbers
    Misc,
}

impl Category {
    /// Every category, in placeholder-prefix matching order
    pub const ALL: [Category; 6] = [
        Category::Person,
        Category::Org,
        Category::Place,
        Category::Thing,
        Category::Group,
        Category::Misc,
    ];

    /// Placeholder prefix for this category
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Person => "person",
            Self::Org => "org",
            Self::Place => "place",
            Self::Thing => "thing",
            Self::Group => "group",
            Self::Misc => "misc",
        }
    }

    /// Map a recognizer type label to its category; unknown labels are `Misc`
    pub fn from_label(label: &str) -> Self {
        match label {
            "PERSON" => Self::Person,
            "ORG" => Self::Org,
            "GPE" | "LOC" | "FAC" => Self::Place,
            "PRODUCT" | "EVENT" | "WORK_OF_ART" | "LAW" | "LANGUAGE" => Self::Thing,
            "NORP" => Self::Group,
            _ => Self::Misc,
        }
    }

    /// Resolve the category from a placeholder's `<category>_` prefix
    ///
    /// The prefix check is case-sensitive; hand-edited placeholders with other
    /// casing resolve to `None`.
    pub fn from_placeholder(placeholder: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|category| {
            placeholder
                .strip_prefix(category.as_str())
                .is_some_and(|rest| rest.starts_with('_'))
        })
    }

    /// Whether a purely numeric surface form may be anonymized under this category
    pub fn is_numeric_safe(&self) -> bool {
        matches!(self, Self::Misc)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("Unknown category: {s}"))
    }
}

/// Synthetic token substituted for a real entity, e.g. `person_001`
///
/// Generated placeholders always carry a known category prefix. Placeholders
/// read back from a hand-edited mapping file may carry any non-empty text.
///
/// # Examples
///
/// ```
/// use anonymap::domain::{Category, Placeholder};
///
/// let placeholder = Placeholder::generate(Category::Person, 1);
/// assert_eq!(placeholder.as_str(), "person_001");
/// assert_eq!(placeholder.category(), Some(Category::Person));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Placeholder(String);

impl Placeholder {
    /// Creates a placeholder from arbitrary non-empty text
    pub fn new(value: impl Into<String>) -> Result<Self, String> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err("Placeholder cannot be empty".to_string());
        }
        Ok(Self(value))
    }

    /// Formats `<category>_<sequence>` with a zero-padded, 1-based sequence
    pub fn generate(category: Category, sequence: usize) -> Self {
        Self(format!("{}_{:03}", category.as_str(), sequence))
    }

    /// Category encoded in the prefix, if it is a known one
    pub fn category(&self) -> Option<Category> {
        Category::from_placeholder(&self.0)
    }

    /// Returns the placeholder as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Placeholder wrapped in the bold marker used inside anonymized text
    pub fn bolded(&self) -> String {
        format!("**{}**", self.0)
    }
}

impl fmt::Display for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Placeholder {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// One `(placeholder, real_entity)` pair of a mapping store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingEntry {
    pub placeholder: Placeholder,
    pub real_entity: String,
}

impl MappingEntry {
    /// Creates a mapping entry, rejecting an empty placeholder or entity
    pub fn new(placeholder: impl Into<String>, real_entity: impl Into<String>) -> Result<Self, String> {
        let real_entity = real_entity.into();
        if real_entity.trim().is_empty() {
            return Err("Real entity cannot be empty".to_string());
        }
        Ok(Self {
            placeholder: Placeholder::new(placeholder)?,
            real_entity,
        })
    }
}

/// Raw `(span_text, type_label)` pair returned by a recognizer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityDetection {
    pub text: String,
    #[serde(alias = "type_label", alias = "label_")]
    pub label: String,
}

impl EntityDetection {
    pub fn new(text: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            label: label.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_from_label() {
        assert_eq!(Category::from_label("PERSON"), Category::Person);
        assert_eq!(Category::from_label("GPE"), Category::Place);
        assert_eq!(Category::from_label("FAC"), Category::Place);
        assert_eq!(Category::from_label("WORK_OF_ART"), Category::Thing);
        assert_eq!(Category::from_label("NORP"), Category::Group);
        assert_eq!(Category::from_label("MONEY"), Category::Misc);
        assert_eq!(Category::from_label("SOMETHING_NEW"), Category::Misc);
    }

    #[test]
    fn test_category_from_placeholder() {
        assert_eq!(Category::from_placeholder("person_001"), Some(Category::Person));
        assert_eq!(Category::from_placeholder("group_012"), Some(Category::Group));
        assert_eq!(Category::from_placeholder("xyz_001"), None);
        assert_eq!(Category::from_placeholder("personal_001"), None);
        assert_eq!(Category::from_placeholder("Person_001"), None);
    }

    #[test]
    fn test_placeholder_generate_padding() {
        assert_eq!(Placeholder::generate(Category::Org, 7).as_str(), "org_007");
        assert_eq!(Placeholder::generate(Category::Misc, 1234).as_str(), "misc_1234");
    }

    #[test]
    fn test_placeholder_rejects_empty() {
        assert!(Placeholder::new("   ").is_err());
        assert!(MappingEntry::new("person_001", "").is_err());
        assert!(MappingEntry::new("", "Jane").is_err());
    }

    #[test]
    fn test_bolded() {
        let p = Placeholder::generate(Category::Place, 2);
        assert_eq!(p.bolded(), "**place_002**");
    }

    #[test]
    fn test_detection_deserializes_label_aliases() {
        let d: EntityDetection =
            serde_json::from_str(r#"{"text": "Paris", "type_label": "GPE"}"#).unwrap();
        assert_eq!(d, EntityDetection::new("Paris", "GPE"));
    }

    #[test]
    fn test_numeric_safe() {
        assert!(Category::Misc.is_numeric_safe());
        assert!(!Category::Person.is_numeric_safe());
    }
}
