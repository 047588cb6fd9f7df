//! Exclusion list for the anonymize direction

use anyhow::{Context, Result};
use std::collections::HashSet;
use std::path::Path;

/// Terms that must never be anonymized, compared case-insensitively
///
/// Matching is against the whole mapped entity text, not substrings: excluding
/// `"acme"` keeps `"ACME"` in the text but still anonymizes `"Acme Corp"`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Exclusions {
    terms: HashSet<String>,
}

impl Exclusions {
    pub fn new<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut exclusions = Self::default();
        exclusions.extend(terms);
        exclusions
    }

    /// Parse a comma-separated list
    pub fn parse_list(list: &str) -> Self {
        Self::new(list.split(','))
    }

    /// Load one term per line; blank lines and `#` comments are ignored
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read exclusions file: {}", path.display()))?;

        Ok(Self::new(
            content
                .lines()
                .filter(|line| !line.trim_start().starts_with('#')),
        ))
    }

    /// Add terms; each is trimmed and lower-cased, blanks are dropped
    pub fn extend<I, S>(&mut self, terms: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.terms.extend(
            terms
                .into_iter()
                .map(|t| t.as_ref().trim().to_lowercase())
                .filter(|t| !t.is_empty()),
        );
    }

    /// Whether `entity` is excluded
    pub fn contains(&self, entity: &str) -> bool {
        self.terms.contains(&entity.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Excluded terms in sorted order
    pub fn terms(&self) -> Vec<&str> {
        let mut terms: Vec<&str> = self.terms.iter().map(String::as_str).collect();
        terms.sort_unstable();
        terms
    }
}
