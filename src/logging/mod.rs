//! Logging and observability
//!
//! This module provides structured logging with support for:
//! - Console output on stderr
//! - Configurable log levels, overridable with `RUST_LOG`
//! - Local JSON file logging with rotation
//!
//! Real entity text is only ever logged at `debug` level.
//!
//! # Example
//!
//! ```no_run
//! use anonymap::logging::init_logging;
//! use anonymap::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

// Re-export commonly used items
pub use structured::{init_logging, LoggingGuard};

/// Log the start of a pipeline stage for a document
///
/// # Example
///
/// ```no_run
/// use anonymap::log_stage_start;
/// use std::path::Path;
///
/// log_stage_start!("anonymize", Path::new("letter.md").display());
/// ```
#[macro_export]
macro_rules! log_stage_start {
    ($stage:expr, $document:expr) => {
        tracing::info!(
            stage = $stage,
            document = %$document,
            "Starting stage"
        );
    };
}

/// Log the completion of a substitution pass
///
/// # Example
///
/// ```no_run
/// use anonymap::log_substitution_complete;
/// use anonymap::anonymization::{Direction, SubstitutionReport};
/// use std::time::Duration;
///
/// let report = SubstitutionReport::new(Direction::Anonymize);
/// log_substitution_complete!(&report, Duration::from_millis(12));
/// ```
#[macro_export]
macro_rules! log_substitution_complete {
    ($report:expr, $duration:expr) => {
        tracing::info!(
            direction = $report.direction.as_str(),
            entries = $report.outcomes.len(),
            replaced = $report.replaced_count(),
            skipped = $report.skipped_count(),
            replacements = $report.total_replacements(),
            issues = $report.issues.len(),
            duration_ms = $duration.as_millis() as u64,
            "Substitution completed"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use anonymap::log_error_with_context;
/// use anonymap::domain::AnonymapError;
///
/// let error = AnonymapError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}
