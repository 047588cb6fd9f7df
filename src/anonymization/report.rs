//! Substitution run reporting
//!
//! Every anonymize or de-anonymize pass produces a [`SubstitutionReport`] with
//! one outcome per mapping entry, in processing order, plus the recoverable
//! issues met along the way. Reports never contain real entity text, so they
//! are safe to print or persist next to anonymized output.

use crate::domain::SubstitutionIssue;
use serde::{Deserialize, Serialize};

/// Direction of a substitution pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Anonymize,
    Deanonymize,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Anonymize => "anonymize",
            Self::Deanonymize => "deanonymize",
        }
    }
}

/// What happened to one mapping entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryStatus {
    /// At least one occurrence replaced
    Replaced,
    /// Pattern built, no occurrence in the text
    NoMatch,
    /// Entity is on the exclusion list
    Excluded,
    /// Entity text empty after trimming
    EmptyEntity,
    /// Placeholder empty after trimming
    EmptyPlaceholder,
    /// Pattern could not be compiled
    PatternFailed,
}

impl EntryStatus {
    /// Whether the entry was skipped rather than processed
    pub fn is_skipped(&self) -> bool {
        !matches!(self, Self::Replaced | Self::NoMatch)
    }
}

/// Outcome of one mapping entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryOutcome {
    pub placeholder: String,
    pub status: EntryStatus,
    pub replacements: usize,
    /// Restoration policy name (de-anonymize only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub policy: Option<String>,
}

/// Report of one substitution pass
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubstitutionReport {
    pub direction: Direction,
    pub outcomes: Vec<EntryOutcome>,
    pub issues: Vec<SubstitutionIssue>,
}

impl SubstitutionReport {
    pub fn new(direction: Direction) -> Self {
        Self {
            direction,
            outcomes: Vec::new(),
            issues: Vec::new(),
        }
    }

    pub(crate) fn record(&mut self, placeholder: &str, status: EntryStatus, replacements: usize) {
        self.outcomes.push(EntryOutcome {
            placeholder: placeholder.to_string(),
            status,
            replacements,
            policy: None,
        });
    }

    pub(crate) fn record_with_policy(
        &mut self,
        placeholder: &str,
        replacements: usize,
        policy: &str,
    ) {
        let status = if replacements > 0 {
            EntryStatus::Replaced
        } else {
            EntryStatus::NoMatch
        };
        self.outcomes.push(EntryOutcome {
            placeholder: placeholder.to_string(),
            status,
            replacements,
            policy: Some(policy.to_string()),
        });
    }

    pub(crate) fn add_issue(&mut self, issue: SubstitutionIssue) {
        self.issues.push(issue);
    }

    /// Total occurrences replaced across all entries
    pub fn total_replacements(&self) -> usize {
        self.outcomes.iter().map(|o| o.replacements).sum()
    }

    /// Entries with at least one replacement
    pub fn replaced_count(&self) -> usize {
        self.count(EntryStatus::Replaced)
    }

    /// Entries skipped (excluded, empty, or failed pattern)
    pub fn skipped_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.status.is_skipped()).count()
    }

    pub fn count(&self, status: EntryStatus) -> usize {
        self.outcomes.iter().filter(|o| o.status == status).count()
    }

    /// Format report for console output
    pub fn format_console(&self) -> String {
        let mut output = String::new();

        output.push_str("───────────────────────────────────────────────────────────────\n");
        output.push_str(&format!(
            "  {} summary\n",
            match self.direction {
                Direction::Anonymize => "Anonymization",
                Direction::Deanonymize => "De-anonymization",
            }
        ));
        output.push_str("───────────────────────────────────────────────────────────────\n");
        output.push_str(&format!("  Mapping entries:        {}\n", self.outcomes.len()));
        output.push_str(&format!("  Entries replaced:       {}\n", self.replaced_count()));
        output.push_str(&format!(
            "  Entries without match:  {}\n",
            self.count(EntryStatus::NoMatch)
        ));
        if self.direction == Direction::Anonymize {
            output.push_str(&format!(
                "  Entries excluded:       {}\n",
                self.count(EntryStatus::Excluded)
            ));
        }
        output.push_str(&format!("  Entries skipped:        {}\n", self.skipped_count()));
        output.push_str(&format!(
            "  Total replacements:     {}\n",
            self.total_replacements()
        ));

        if !self.issues.is_empty() {
            output.push_str("\n  Warnings\n");
            for issue in &self.issues {
                output.push_str(&format!("  • {}\n", issue));
            }
        }

        output
    }

    /// Format report as JSON
    pub fn format_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
