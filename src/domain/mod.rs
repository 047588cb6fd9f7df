//! Domain models and types for Anonymap.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Entity types** ([`EntityDetection`], [`Category`])
//! - **Mapping types** ([`Placeholder`], [`MappingEntry`])
//! - **Error types** ([`AnonymapError`], [`RecognizerError`], [`MappingError`],
//!   [`DocumentError`], [`SubstitutionIssue`])
//! - **Result type alias** ([`Result`])
//!
//! # Type Safety
//!
//! Placeholders are a newtype so they cannot be swapped with the real entity
//! text they stand for:
//!
//! ```rust
//! use anonymap::domain::{Category, MappingEntry, Placeholder};
//!
//! let entry = MappingEntry {
//!     placeholder: Placeholder::generate(Category::Person, 1),
//!     real_entity: "Jane Doe".to_string(),
//! };
//! assert_eq!(entry.placeholder.as_str(), "person_001");
//! ```

pub mod entity;
pub mod errors;
pub mod result;

pub use entity::{Category, EntityDetection, MappingEntry, Placeholder};
pub use errors::{
    AnonymapError, DocumentError, MappingError, RecognizerError, SubstitutionIssue,
};
pub use result::Result;
