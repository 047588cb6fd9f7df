//! Anonymization module for Anonymap
//!
//! This module turns recognizer detections into a mapping store and applies
//! that mapping to text in both directions.
//!
//! # Architecture
//!
//! The anonymization flow consists of:
//! - **Assignment**: detections become typed, numbered placeholders
//! - **Substitution**: `real → **placeholder**` and back, longest entries first
//! - **Restoration policy**: person names restore in full once, then by surname
//! - **Audit**: structured logging with hashed entity values
//!
//! # Usage
//!
//! ```rust
//! use anonymap::anonymization::{anonymize, assign, Exclusions, LabelSelection};
//! use anonymap::domain::EntityDetection;
//!
//! let detections = vec![EntityDetection::new("Jane Doe", "PERSON")];
//! let entries = assign(&detections, &LabelSelection::default());
//!
//! let anonymized = anonymize("Ask Jane Doe.", &entries, &Exclusions::default());
//! assert_eq!(anonymized, "Ask **person_001**.");
//! ```

pub mod assigner;
pub mod audit;
pub mod engine;
pub mod exclusions;
pub mod pipeline;
pub mod policy;
pub mod report;

// Re-export main types
pub use assigner::{assign, LabelSelection, PlaceholderAssigner};
pub use audit::AuditLogger;
pub use engine::{anonymize, anonymize_with_report, deanonymize, deanonymize_with_report};
pub use exclusions::Exclusions;
pub use pipeline::{extract_entities, ExtractionResult};
pub use policy::{OccurrenceCounter, RestorationPolicy};
pub use report::{Direction, EntryStatus, SubstitutionReport};
