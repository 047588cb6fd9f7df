//! Deanonymize command implementation

use super::{
    audit_logger, audit_or_warn, print_mapping_summary, render_report, report_failure, status,
    MappingLoadReport, ReportFormat,
};
use crate::anonymization::deanonymize_with_report;
use crate::cli::exit_codes;
use crate::config::AnonymapConfig;
use crate::document::{default_output_path, read_document, write_text, OutputKind};
use crate::{log_stage_start, log_substitution_complete, mapping};
use clap::Args;
use std::path::PathBuf;
use std::time::Instant;

/// Arguments for the deanonymize command
#[derive(Args, Debug)]
pub struct DeanonymizeArgs {
    /// Anonymized document to restore
    pub input: PathBuf,

    /// Mapping file used for anonymization
    #[arg(short, long)]
    pub mapping: PathBuf,

    /// Output file [default: <input>_deanonymized.md or .txt]
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Treat the first mapping row as data
    #[arg(long)]
    pub no_header: bool,

    /// Report format
    #[arg(long, value_enum, default_value_t = ReportFormat::Console)]
    pub format: ReportFormat,

    /// Report what would be restored without writing output
    #[arg(long)]
    pub dry_run: bool,
}

impl DeanonymizeArgs {
    /// Execute the deanonymize command
    pub async fn execute(&self, config: &AnonymapConfig) -> anyhow::Result<i32> {
        log_stage_start!("deanonymize", self.input.display());

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

        let start = Instant::now();
        let (restored, report) = deanonymize_with_report(&text, &loaded.entries);
        log_substitution_complete!(&report, start.elapsed());

        for issue in &report.issues {
            status(self.format, format_args!("⚠️  {issue}"));
        }

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
            .unwrap_or_else(|| default_output_path(&self.input, OutputKind::Deanonymized));
        if let Err(e) = write_text(&output, &restored) {
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
            format_args!("📄 Restored document written to {}", output.display()),
        );

        Ok(exit_codes::SUCCESS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn args(input: PathBuf, mapping: PathBuf, output: PathBuf) -> DeanonymizeArgs {
        DeanonymizeArgs {
            input,
            mapping,
            output: Some(output),
            no_header: false,
            format: ReportFormat::Console,
            dry_run: false,
        }
    }

    #[tokio::test]
    async fn test_deanonymize_applies_person_policy() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("memo_anonymized.md");
        std::fs::write(
            &input,
            "**person_001** called **org_001**. Later **person_001** hung up.",
        )
        .unwrap();
        let mapping = dir.path().join("map.csv");
        std::fs::write(
            &mapping,
            "base_placeholder,real_entity_name\nperson_001,Jane Doe\norg_001,Acme Corp\n",
        )
        .unwrap();
        let output = dir.path().join("restored.md");

        let code = args(input, mapping, output.clone())
            .execute(&AnonymapConfig::default())
            .await
            .unwrap();

        assert_eq!(code, exit_codes::SUCCESS);
        assert_eq!(
            std::fs::read_to_string(&output).unwrap(),
            "Jane Doe called Acme Corp. Later Doe hung up."
        );
    }

    #[tokio::test]
    async fn test_deanonymize_default_output_name() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("memo_anonymized.md");
        std::fs::write(&input, "Signed, **person_001**").unwrap();
        let mapping = dir.path().join("map.csv");
        std::fs::write(&mapping, "person_001,Maria\n").unwrap();

        let mut deanonymize = args(input, mapping, PathBuf::new());
        deanonymize.output = None;
        deanonymize.no_header = true;

        let code = deanonymize
            .execute(&AnonymapConfig::default())
            .await
            .unwrap();

        assert_eq!(code, exit_codes::SUCCESS);
        let expected = dir.path().join("memo_anonymized_deanonymized.md");
        assert_eq!(std::fs::read_to_string(expected).unwrap(), "Signed, Maria");
    }

    #[tokio::test]
    async fn test_deanonymize_missing_input() {
        let dir = tempdir().unwrap();
        let mapping = dir.path().join("map.csv");
        std::fs::write(&mapping, "person_001,Jane Doe\n").unwrap();

        let code = args(
            dir.path().join("missing.md"),
            mapping,
            dir.path().join("out.md"),
        )
        .execute(&AnonymapConfig::default())
        .await
        .unwrap();

        assert_eq!(code, exit_codes::INPUT_ERROR);
    }
}
