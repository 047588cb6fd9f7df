//! Anonymize command implementation

use super::{
    audit_logger, audit_or_warn, print_mapping_summary, render_report, report_failure, status,
    MappingLoadReport, ReportFormat,
};
use crate::anonymization::{anonymize_with_report, Exclusions};
use crate::cli::exit_codes;
use crate::config::AnonymapConfig;
use crate::document::{default_output_path, read_document, write_text, OutputKind};
use crate::domain::AnonymapError;
use crate::{log_stage_start, log_substitution_complete, mapping};
use clap::Args;
use std::path::PathBuf;
use std::time::Instant;

/// Arguments for the anonymize command
#[derive(Args, Debug)]
pub struct AnonymizeArgs {
    /// Document to anonymize
    pub input: PathBuf,

    /// Mapping file produced by `extract`
    #[arg(short, long)]
    pub mapping: PathBuf,

    /// Output file [default: <input>_anonymized.md or .txt]
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Entities to leave untouched (comma-separated, exact match)
    #[arg(long, value_delimiter = ',')]
    pub exclude: Vec<String>,

    /// File with one excluded entity per line
    #[arg(long)]
    pub exclusions_file: Option<PathBuf>,

    /// Treat the first mapping row as data
    #[arg(long)]
    pub no_header: bool,

    /// Report format
    #[arg(long, value_enum, default_value_t = ReportFormat::Console)]
    pub format: ReportFormat,

    /// Report what would be replaced without writing output
    #[arg(long)]
    pub dry_run: bool,
}

impl AnonymizeArgs {
    /// Execute the anonymize command
    pub async fn execute(&self, config: &AnonymapConfig) -> anyhow::Result<i32> {
        log_stage_start!("anonymize", self.input.display());

        let text = match read_document(&self.input) {
            Ok(text) => text,
            Err(e) => return Ok(report_failure(&e.into())),
        };

        let has_header = config.mapping.has_header && !self.no_header;
        let loaded = match mapping::load(&self.mapping, has_header) {
            Ok(loaded) => loaded,
            Err(e) => return Ok(report_failure(&e.into())),
        };
        print_mapping_summary(self.format, &self.mapping, &loaded);

        let mut exclusions = match config.anonymization.load_exclusions() {
            Ok(exclusions) => exclusions,
            Err(e) => {
                let error = AnonymapError::Configuration(format!("{e:#}"));
                return Ok(report_failure(&error));
            }
        };
        exclusions.extend(&self.exclude);
        if let Some(path) = &self.exclusions_file {
            match Exclusions::from_file(path) {
                Ok(extra) => exclusions.extend(extra.terms()),
                Err(e) => {
                    let error = AnonymapError::Configuration(format!("{e:#}"));
                    return Ok(report_failure(&error));
                }
            }
        }
        if !exclusions.is_empty() {
            status(
                self.format,
                format_args!("   Excluding {} entities", exclusions.len()),
            );
        }

        let start = Instant::now();
        let (anonymized, report) = anonymize_with_report(&text, &loaded.entries, &exclusions);
        log_substitution_complete!(&report, start.elapsed());

        if self.dry_run {
            let mapping_report = MappingLoadReport::new(&self.mapping, &loaded);
            print!("{}", render_report(self.format, mapping_report, &report, None)?);
            status(self.format, "");
            status(self.format, "Dry run: output not written");
            return Ok(exit_codes::SUCCESS);
        }

        let output = self
            .output
            .clone()
            .unwrap_or_else(|| default_output_path(&self.input, OutputKind::Anonymized));
        if let Err(e) = write_text(&output, &anonymized) {
            return Ok(report_failure(&e.into()));
        }

        audit_or_warn(audit_logger(config).log_substitution(
            &self.input,
            &loaded.entries,
            &report,
        ));

        let mapping_report = MappingLoadReport::new(&self.mapping, &loaded);
        print!(
            "{}",
            render_report(self.format, mapping_report, &report, Some(output.as_path()))?
        );
        status(
            self.format,
            format_args!("📄 Anonymized document written to {}", output.display()),
        );

        Ok(exit_codes::SUCCESS)
    }
}
