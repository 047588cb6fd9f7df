//! Configuration management for Anonymap.
//!
//! # Overview
//!
//! Anonymap uses an optional TOML configuration file with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `ANONYMAP_<SECTION>_<KEY>` environment overrides
//! - Default values for every setting
//! - Validation on load
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use anonymap::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("anonymap.toml")?;
//!
//! println!("Model: {}", config.recognizer.model);
//! println!("Entity types: {:?}", config.extraction.entity_types);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Log level
//! - [`RecognizerConfig`] - Recognizer backend, models and fallbacks
//! - [`ExtractionConfig`] - Entity types kept during extraction
//! - [`AnonymizationConfig`] - Exclusion list
//! - [`MappingConfig`] - Mapping file header handling
//! - [`AuditConfig`] - Audit trail
//! - [`LoggingConfig`] - Local file logging
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [recognizer]
//! backend = "command"
//! model = "en_core_web_lg"
//! fallback_models = ["en_core_web_md", "en_core_web_sm"]
//! command = "${ANONYMAP_NER_COMMAND}"
//! args = ["--model", "{model}"]
//!
//! [extraction]
//! entity_types = ["PERSON", "ORG", "GPE"]
//!
//! [anonymization]
//! exclusions = ["World Health Organization"]
//! ```

pub mod loader;
pub mod schema;

// Re-export commonly used types
pub use loader::{load_config, load_config_or_default, load_config_str, DEFAULT_CONFIG_FILE};
pub use schema::{
    AnonymapConfig, AnonymizationConfig, ApplicationConfig, AuditConfig, ExtractionConfig,
    LoggingConfig, MappingConfig, RecognizerBackend, RecognizerConfig,
};
