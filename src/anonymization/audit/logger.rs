//! Audit logger for extraction and substitution runs

use crate::anonymization::report::SubstitutionReport;
use crate::domain::MappingEntry;
use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Audit log entry
#[derive(Debug, Serialize)]
struct AuditLogEntry {
    timestamp: String,
    run_id: String,
    operation: String,
    document: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<String>,
    entry_count: usize,
    replacement_count: usize,
    skipped_count: usize,
    entries: Vec<AuditMappingEntry>,
}

/// Audit mapping entry (with hashed entity)
#[derive(Debug, Serialize)]
struct AuditMappingEntry {
    placeholder: String,
    /// SHA-256 hash of the real entity (never log plaintext entities)
    value_hash: String,
}

/// Audit logger for anonymization runs
pub struct AuditLogger {
    log_path: PathBuf,
    json_format: bool,
    enabled: bool,
}

impl AuditLogger {
    /// Create a new audit logger
    pub fn new(log_path: PathBuf, json_format: bool, enabled: bool) -> Result<Self> {
        if enabled {
            if let Some(parent) = log_path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create audit log directory: {}", parent.display())
                })?;
            }
        }

        Ok(Self {
            log_path,
            json_format,
            enabled,
        })
    }

    /// A logger that records nothing
    pub fn disabled() -> Self {
        Self {
            log_path: PathBuf::new(),
            json_format: true,
            enabled: false,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Log an extraction run that produced `entries` with recognizer `model`
    pub fn log_extraction(
        &self,
        document: &Path,
        model: &str,
        entries: &[MappingEntry],
    ) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }

        let entry = AuditLogEntry {
            timestamp: Utc::now().to_rfc3339(),
            run_id: Uuid::new_v4().to_string(),
            operation: "extract".to_string(),
            document: document.display().to_string(),
            model: Some(model.to_string()),
            entry_count: entries.len(),
            replacement_count: 0,
            skipped_count: 0,
            entries: self.hashed_entries(entries),
        };

        self.write_entry(&entry)
    }

    /// Log a substitution run over `document`
    pub fn log_substitution(
        &self,
        document: &Path,
        entries: &[MappingEntry],
        report: &SubstitutionReport,
    ) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }

        let entry = AuditLogEntry {
            timestamp: Utc::now().to_rfc3339(),
            run_id: Uuid::new_v4().to_string(),
            operation: report.direction.as_str().to_string(),
            document: document.display().to_string(),
            model: None,
            entry_count: entries.len(),
            replacement_count: report.total_replacements(),
            skipped_count: report.skipped_count(),
            entries: self.hashed_entries(entries),
        };

        self.write_entry(&entry)
    }

    fn hashed_entries(&self, entries: &[MappingEntry]) -> Vec<AuditMappingEntry> {
        entries
            .iter()
            .map(|e| AuditMappingEntry {
                placeholder: e.placeholder.to_string(),
                value_hash: self.hash_entity(&e.real_entity),
            })
            .collect()
    }

    /// Hash an entity value using SHA-256
    fn hash_entity(&self, value: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(value.as_bytes());
        let result = hasher.finalize();
        format!("{result:x}")
    }

    /// Write an audit entry to the log file
    fn write_entry(&self, entry: &AuditLogEntry) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .with_context(|| format!("Failed to open audit log: {}", self.log_path.display()))?;

        if self.json_format {
            let json_line =
                serde_json::to_string(entry).context("Failed to serialize audit entry")?;
            writeln!(file, "{json_line}").context("Failed to write audit entry")?;
        } else {
            writeln!(
                file,
                "[{}] Run: {} | Operation: {} | Document: {} | Entries: {} | Replacements: {} | Skipped: {}",
                entry.timestamp,
                entry.run_id,
                entry.operation,
                entry.document,
                entry.entry_count,
                entry.replacement_count,
                entry.skipped_count
            )
            .context("Failed to write audit entry")?;
        }

        Ok(())
    }
}
