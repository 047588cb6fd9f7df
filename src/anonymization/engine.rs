//! Substitution engine
//!
//! Rewrites text in both directions using a mapping store:
//!
//! - **anonymize**: every whole-word, case-insensitive occurrence of a real
//!   entity becomes `**placeholder**`
//! - **de-anonymize**: every `**placeholder**` becomes its real entity, following
//!   the category's [`RestorationPolicy`]
//!
//! Both directions are pure functions of their inputs. Entries are applied
//! sequentially, each one against the text produced by the previous ones, in a
//! deterministic order:
//!
//! - anonymize sorts by real entity length, longest first, so `"John Smith"` is
//!   replaced before `"Smith"` can split it
//! - de-anonymize sorts by placeholder length, longest first
//!
//! Both sorts are stable, so entries of equal length keep their mapping file order.
//!
//! # Known limitation
//!
//! Overlapping entities that are neither identical nor substrings of each other
//! (`"Bank of America"` and `"America Online"` in `"Bank of America Online"`) are
//! resolved only by that ordering: the longer one wins and the shorter one
//! loses the characters they share.
//!
//! # Examples
//!
//! ```
//! use anonymap::anonymization::engine::{anonymize, deanonymize};
//! use anonymap::anonymization::Exclusions;
//! use anonymap::domain::MappingEntry;
//!
//! let entries = vec![
//!     MappingEntry::new("person_001", "Jane Doe").unwrap(),
//!     MappingEntry::new("place_001", "Paris").unwrap(),
//! ];
//!
//! let text = "Jane Doe flew to Paris. Jane Doe liked it.";
//! let anonymized = anonymize(text, &entries, &Exclusions::default());
//! assert_eq!(
//!     anonymized,
//!     "**person_001** flew to **place_001**. **person_001** liked it."
//! );
//!
//! let restored = deanonymize(&anonymized, &entries);
//! assert_eq!(restored, "Jane Doe flew to Paris. Doe liked it.");
//! ```

use crate::anonymization::{
    exclusions::Exclusions,
    policy::{OccurrenceCounter, RestorationPolicy},
    report::{Direction, EntryStatus, SubstitutionReport},
};
use crate::domain::{MappingEntry, SubstitutionIssue};
use regex::{Captures, Regex, RegexBuilder};

/// Anonymize `text`, returning only the rewritten text
pub fn anonymize(text: &str, entries: &[MappingEntry], exclusions: &Exclusions) -> String {
    anonymize_with_report(text, entries, exclusions).0
}

/// Anonymize `text` and report what happened to each entry
pub fn anonymize_with_report(
    text: &str,
    entries: &[MappingEntry],
    exclusions: &Exclusions,
) -> (String, SubstitutionReport) {
    let mut report = SubstitutionReport::new(Direction::Anonymize);
    let mut content = text.to_string();

    let mut ordered: Vec<&MappingEntry> = entries.iter().collect();
    ordered.sort_by_key(|e| std::cmp::Reverse(e.real_entity.chars().count()));

    tracing::debug!(
        entries = ordered.len(),
        exclusions = exclusions.len(),
        "Performing anonymization replacements (longest entities first)"
    );

    for entry in ordered {
        let placeholder = entry.placeholder.as_str();

        if exclusions.contains(&entry.real_entity) {
            tracing::debug!(placeholder, "Skipping excluded entity");
            report.record(placeholder, EntryStatus::Excluded, 0);
            continue;
        }

        if entry.real_entity.trim().is_empty() {
            report.record(placeholder, EntryStatus::EmptyEntity, 0);
            continue;
        }

        let pattern = match entity_pattern(&entry.real_entity) {
            Ok(pattern) => pattern,
            Err(e) => {
                let issue = SubstitutionIssue::PatternConstruction {
                    placeholder: placeholder.to_string(),
                    reason: e.to_string(),
                };
                tracing::warn!(%issue, "Skipping entry");
                report.record(placeholder, EntryStatus::PatternFailed, 0);
                report.add_issue(issue);
                continue;
            }
        };

        let bolded = entry.placeholder.bolded();
        let mut replacements = 0;
        let replaced = pattern.replace_all(&content, |_: &Captures<'_>| {
            replacements += 1;
            bolded.clone()
        });

        if replacements > 0 {
            content = replaced.into_owned();
            tracing::debug!(placeholder, replacements, "Anonymized entity");
            report.record(placeholder, EntryStatus::Replaced, replacements);
        } else {
            report.record(placeholder, EntryStatus::NoMatch, 0);
        }
    }

    (content, report)
}

/// De-anonymize `text`, returning only the restored text
pub fn deanonymize(text: &str, entries: &[MappingEntry]) -> String {
    deanonymize_with_report(text, entries).0
}

/// De-anonymize `text` and report what happened to each entry
pub fn deanonymize_with_report(
    text: &str,
    entries: &[MappingEntry],
) -> (String, SubstitutionReport) {
    let mut report = SubstitutionReport::new(Direction::Deanonymize);
    let mut content = text.to_string();

    let mut ordered: Vec<&MappingEntry> = entries.iter().collect();
    ordered.sort_by_key(|e| std::cmp::Reverse(e.placeholder.as_str().chars().count()));

    tracing::debug!(
        entries = ordered.len(),
        "Performing de-anonymization replacements"
    );

    for entry in ordered {
        let placeholder = entry.placeholder.as_str();

        if placeholder.trim().is_empty() {
            report.record(placeholder, EntryStatus::EmptyPlaceholder, 0);
            continue;
        }

        let pattern = match bolded_placeholder_pattern(placeholder) {
            Ok(pattern) => pattern,
            Err(e) => {
                let issue = SubstitutionIssue::PatternConstruction {
                    placeholder: placeholder.to_string(),
                    reason: e.to_string(),
                };
                tracing::warn!(%issue, "Skipping entry");
                report.record(placeholder, EntryStatus::PatternFailed, 0);
                report.add_issue(issue);
                continue;
            }
        };

        let category = entry.placeholder.category();
        if category.is_none() {
            let issue = SubstitutionIssue::UnknownPlaceholderCategory {
                placeholder: placeholder.to_string(),
            };
            tracing::warn!(%issue, "Unknown placeholder prefix during de-anonymization");
            report.add_issue(issue);
        }

        let policy = RestorationPolicy::for_entry(category, &entry.real_entity);
        let mut counter = OccurrenceCounter::default();
        let replaced = pattern.replace_all(&content, |_: &Captures<'_>| {
            policy.replacement_for(counter.advance()).to_string()
        });

        let replacements = counter.seen();
        if replacements > 0 {
            content = replaced.into_owned();
            tracing::debug!(
                placeholder,
                replacements,
                policy = policy.name(),
                "De-anonymized placeholder"
            );
        }
        report.record_with_policy(placeholder, replacements, policy.name());
    }

    (content, report)
}

/// Whole-word, case-insensitive pattern for a literal entity
fn entity_pattern(entity: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(&format!(r"\b{}\b", regex::escape(entity)))
        .case_insensitive(true)
        .build()
}

/// Case-insensitive pattern for `**placeholder**`
fn bolded_placeholder_pattern(placeholder: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(&format!(r"\*\*{}\*\*", regex::escape(placeholder)))
        .case_insensitive(true)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(placeholder: &str, real: &str) -> MappingEntry {
        MappingEntry::new(placeholder, real).unwrap()
    }

    #[test]
    fn test_whole_word_only() {
        let entries = vec![entry("person_001", "Ann")];
        let out = anonymize("Ann met Anna and ANN.", &entries, &Exclusions::default());
        assert_eq!(out, "**person_001** met Anna and **person_001**.");
    }

    #[test]
    fn test_longest_first() {
        let entries = vec![entry("person_002", "Smith"), entry("person_001", "John Smith")];
        let out = anonymize("John Smith is here", &entries, &Exclusions::default());
        assert_eq!(out, "**person_001** is here");
    }

    #[test]
    fn test_shorter_entity_still_replaced_elsewhere() {
        let entries = vec![entry("person_001", "John Smith"), entry("person_002", "Smith")];
        let out = anonymize(
            "John Smith met Mrs. Smith.",
            &entries,
            &Exclusions::default(),
        );
        assert_eq!(out, "**person_001** met Mrs. **person_002**.");
    }

    #[test]
    fn test_exclusions_are_skipped() {
        let entries = vec![entry("place_001", "London")];
        let (out, report) = anonymize_with_report(
            "London calling",
            &entries,
            &Exclusions::new(["LONDON"]),
        );
        assert_eq!(out, "London calling");
        assert_eq!(report.count(EntryStatus::Excluded), 1);
    }

    #[test]
    fn test_replacement_is_literal() {
        let entries = vec![entry("misc_001", "$5 million"), entry("misc_$1", "Acme")];
        let out = anonymize("Acme paid $5 million", &entries, &Exclusions::default());
        assert_eq!(out, "**misc_$1** paid $5 million");

        let restored = deanonymize("**misc_001** for **misc_001**", &entries[..1]);
        assert_eq!(restored, "$5 million for $5 million");
    }

    #[test]
    fn test_entity_with_regex_metacharacters() {
        let entries = vec![entry("org_001", "Foo.Bar+ Ltd")];
        let out = anonymize("Foo.Bar+ Ltd and FooXBar+ Ltd", &entries, &Exclusions::default());
        assert_eq!(out, "**org_001** and FooXBar+ Ltd");
    }

    #[test]
    fn test_person_first_full_then_surname() {
        let entries = vec![entry("person_001", "Jane Doe")];
        let out = deanonymize(
            "**person_001** wrote. Later **person_001** left. **PERSON_001** returned.",
            &entries,
        );
        assert_eq!(out, "Jane Doe wrote. Later Doe left. Doe returned.");
    }

    #[test]
    fn test_counter_is_per_entry() {
        let entries = vec![entry("person_001", "Jane Doe"), entry("person_002", "John Roe")];
        let out = deanonymize(
            "**person_001** and **person_002**; **person_002** and **person_001**",
            &entries,
        );
        assert_eq!(out, "Jane Doe and John Roe; Roe and Doe");
    }

    #[test]
    fn test_unknown_prefix_falls_back_to_uniform() {
        let entries = vec![entry("xyz_001", "Widget Co")];
        let (out, report) = deanonymize_with_report("**xyz_001** and **xyz_001**", &entries);
        assert_eq!(out, "Widget Co and Widget Co");
        assert_eq!(
            report.issues,
            vec![SubstitutionIssue::UnknownPlaceholderCategory {
                placeholder: "xyz_001".to_string()
            }]
        );
    }

    #[test]
    fn test_unmatched_placeholder_is_not_an_error() {
        let entries = vec![entry("org_001", "Acme")];
        let (out, report) = deanonymize_with_report("nothing here", &entries);
        assert_eq!(out, "nothing here");
        assert_eq!(report.count(EntryStatus::NoMatch), 1);
        assert!(report.issues.is_empty());
    }

    #[test]
    fn test_empty_inputs() {
        assert_eq!(anonymize("", &[], &Exclusions::default()), "");
        assert_eq!(deanonymize("", &[]), "");
    }

    #[test]
    fn test_line_endings_preserved() {
        let entries = vec![entry("place_001", "Oslo")];
        let text = "Oslo\r\nis cold\r\n";
        let anonymized = anonymize(text, &entries, &Exclusions::default());
        assert_eq!(anonymized, "**place_001**\r\nis cold\r\n");
        assert_eq!(deanonymize(&anonymized, &entries), text);
    }

    #[test]
    fn test_unicode_word_boundaries() {
        let entries = vec![entry("person_001", "Zoë")];
        let out = anonymize("Zoë and Zoëlle met ZOË", &entries, &Exclusions::default());
        assert_eq!(out, "**person_001** and Zoëlle met **person_001**");
    }

    #[test]
    fn test_overlapping_entities_longest_wins() {
        let entries = vec![
            entry("org_001", "Bank of America"),
            entry("org_002", "America Online"),
        ];
        let out = anonymize("Bank of America Online", &entries, &Exclusions::default());
        assert_eq!(out, "**org_001** Online");
    }
}
