// Anonymap - Reversible Document Anonymization Tool
// Copyright (c) 2025 Anonymap Contributors
// Licensed under the MIT License

//! # Anonymap - Reversible Document Anonymization
//!
//! Anonymap replaces named entities in a document with typed placeholders
//! such as `**person_001**`, and restores them later from the same mapping
//! file.
//!
//! ## Overview
//!
//! The workflow has three steps, each driven by a plain CSV mapping file:
//! - **Extract** entities with a recognizer and assign placeholders
//! - **Anonymize** a document with the (possibly hand-edited) mapping
//! - **Deanonymize** a processed document back to real entity names
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`anonymization`] - Placeholder assignment and the substitution engine
//! - [`recognizer`] - Entity recognizer adapters and model cache
//! - [`mapping`] - Mapping file persistence
//! - [`document`] - Document reading, Markdown normalization and output writing
//! - [`domain`] - Core domain types and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust
//! use anonymap::anonymization::{anonymize, deanonymize, Exclusions};
//! use anonymap::domain::MappingEntry;
//!
//! let entries = vec![
//!     MappingEntry::new("person_001", "Jane Doe").unwrap(),
//!     MappingEntry::new("org_001", "Acme Corp").unwrap(),
//! ];
//!
//! let text = "Jane Doe joined Acme Corp. Jane Doe starts Monday.";
//! let anonymized = anonymize(text, &entries, &Exclusions::default());
//! assert_eq!(
//!     anonymized,
//!     "**person_001** joined **org_001**. **person_001** starts Monday."
//! );
//!
//! // Later mentions of a person come back as the surname
//! let restored = deanonymize(&anonymized, &entries);
//! assert_eq!(restored, "Jane Doe joined Acme Corp. Doe starts Monday.");
//! ```
//!
//! ## Error Handling
//!
//! Fatal failures are [`domain::AnonymapError`] values and abort the current
//! operation without writing output. Problems with individual mapping rows
//! or entries are collected as warnings and never stop a run.

pub mod anonymization;
pub mod cli;
pub mod config;
pub mod document;
pub mod domain;
pub mod logging;
pub mod mapping;
pub mod recognizer;
