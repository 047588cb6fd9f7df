//! Mapping store persistence
//!
//! The mapping file is the only link between extraction, anonymization and
//! de-anonymization.

pub mod store;

pub use store::{load, save, LoadedMapping, RowWarning, MAPPING_HEADER};
