//! CLI command implementations
//!
//! This module contains all CLI command implementations and the helpers
//! they share.

pub mod anonymize;
pub mod deanonymize;
pub mod extract;
pub mod init;
pub mod validate;

use crate::anonymization::{AuditLogger, SubstitutionReport};
use crate::config::AnonymapConfig;
use crate::domain::AnonymapError;
use crate::mapping::{LoadedMapping, RowWarning};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use tokio::sync::watch;

/// Output format for substitution reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable summary
    #[default]
    Console,
    /// Pretty-printed JSON on stdout, status lines on stderr
    Json,
}

/// Document printed on stdout by `--format json`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub mapping: MappingLoadReport,
    pub report: SubstitutionReport,
    /// Written document; absent on dry runs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
    pub dry_run: bool,
}

/// Partial-success summary of the mapping load
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MappingLoadReport {
    pub path: PathBuf,
    pub summary: String,
    pub entries_loaded: usize,
    pub rows_seen: usize,
    pub warnings: Vec<RowWarning>,
}

impl MappingLoadReport {
    pub fn new(path: &Path, loaded: &LoadedMapping) -> Self {
        Self {
            path: path.to_path_buf(),
            summary: loaded.summary(),
            entries_loaded: loaded.entries.len(),
            rows_seen: loaded.rows_seen,
            warnings: loaded.warnings.clone(),
        }
    }
}

/// Print a status line; with JSON reports stdout is reserved for the report
pub(crate) fn status(format: ReportFormat, line: impl fmt::Display) {
    match format {
        ReportFormat::Console => println!("{line}"),
        ReportFormat::Json => eprintln!("{line}"),
    }
}

/// Resolve when a shutdown has been signalled
pub(crate) async fn wait_for_shutdown(shutdown: &mut watch::Receiver<bool>) {
    while !*shutdown.borrow_and_update() {
        if shutdown.changed().await.is_err() {
            // Sender gone: no shutdown can arrive any more
            std::future::pending::<()>().await;
        }
    }
}

/// Print a fatal operation error and return its exit code
pub(crate) fn report_failure(error: &AnonymapError) -> i32 {
    crate::log_error_with_context!(error, error.stage());
    eprintln!("❌ {} failed", capitalize(error.stage()));
    eprintln!("   Error: {error}");
    crate::cli::exit_code_for(error)
}

/// Print the partial-success summary of a mapping load
pub(crate) fn print_mapping_summary(format: ReportFormat, path: &Path, loaded: &LoadedMapping) {
    if loaded.is_complete() {
        status(format, format_args!("✅ Mapping {}: {}", path.display(), loaded.summary()));
    } else {
        status(format, format_args!("⚠️  Mapping {}: {}", path.display(), loaded.summary()));
        for warning in &loaded.warnings {
            status(format, format_args!("   • {warning}"));
        }
    }
}

/// Render the report of a substitution run in the requested format
pub(crate) fn render_report(
    format: ReportFormat,
    mapping: MappingLoadReport,
    report: &SubstitutionReport,
    output: Option<&Path>,
) -> anyhow::Result<String> {
    match format {
        ReportFormat::Console => Ok(report.format_console()),
        ReportFormat::Json => {
            let run = RunReport {
                mapping,
                report: report.clone(),
                output: output.map(Path::to_path_buf),
                dry_run: output.is_none(),
            };
            Ok(format!("{}\n", serde_json::to_string_pretty(&run)?))
        }
    }
}

/// Build the audit logger; a broken audit setup disables auditing with a warning
pub(crate) fn audit_logger(config: &AnonymapConfig) -> AuditLogger {
    match AuditLogger::new(
        config.audit.log_path.clone(),
        config.audit.json_format,
        config.audit.enabled,
    ) {
        Ok(logger) => logger,
        Err(e) => {
            tracing::warn!(error = %e, "Audit logging disabled");
            eprintln!("⚠️  Audit logging disabled: {e}");
            AuditLogger::disabled()
        }
    }
}

/// Record an audit line, warning instead of failing the operation
pub(crate) fn audit_or_warn(result: anyhow::Result<()>) {
    if let Err(e) = result {
        tracing::warn!(error = %e, "Failed to write audit entry");
        eprintln!("⚠️  Failed to write audit entry: {e}");
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Exit code when the user cancelled before anything was written
pub(crate) fn cancelled(stage: &str) -> i32 {
    let error = AnonymapError::Cancelled(stage.to_string());
    tracing::warn!(stage, "Operation cancelled, nothing written");
    println!();
    println!("⚠️  {error}; no output was written");
    crate::cli::exit_code_for(&error)
}
