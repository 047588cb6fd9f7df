//! Audit logging module
//!
//! Records one line per extraction or substitution run. Real entities are
//! stored only as SHA-256 hashes.

pub mod logger;

pub use logger::AuditLogger;
