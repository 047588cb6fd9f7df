//! Extract command implementation
//!
//! Reads a document, runs entity recognition on its normalized text and
//! writes the placeholder mapping as CSV.

use super::{audit_logger, audit_or_warn, cancelled, report_failure, wait_for_shutdown};
use crate::anonymization::assigner::{LabelSelection, SELECTABLE_LABELS};
use crate::anonymization::{extract_entities, ExtractionResult};
use crate::cli::exit_codes;
use crate::config::{AnonymapConfig, RecognizerBackend};
use crate::document::{default_output_path, read_document, OutputKind};
use crate::domain::{AnonymapError, MappingEntry};
use crate::recognizer::load_recognizer;
use crate::{log_stage_start, mapping};
use clap::Args;
use std::path::PathBuf;
use std::time::Instant;
use tokio::sync::watch;

/// Arguments for the extract command
#[derive(Args, Debug)]
pub struct ExtractArgs {
    /// Document to analyze (.txt, .md, .docx, .odt)
    #[arg(required_unless_present = "list_types")]
    pub input: Option<PathBuf>,

    /// Mapping file to write [default: <input>_entities.csv]
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Entity types to keep (comma-separated, e.g. PERSON,ORG,OTHER)
    #[arg(short = 't', long, value_delimiter = ',')]
    pub entity_types: Vec<String>,

    /// Override recognizer backend (command or patterns)
    #[arg(long)]
    pub backend: Option<RecognizerBackend>,

    /// Override preferred recognizer model
    #[arg(long)]
    pub model: Option<String>,

    /// Do not write a header row to the mapping file
    #[arg(long)]
    pub no_header: bool,

    /// Print the entities without writing the mapping file
    #[arg(long)]
    pub dry_run: bool,

    /// List the selectable entity types and exit
    #[arg(long)]
    pub list_types: bool,
}

impl ExtractArgs {
    /// Execute the extract command
    pub async fn execute(
        &self,
        config: &AnonymapConfig,
        mut shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        if self.list_types {
            Self::print_entity_types();
            return Ok(exit_codes::SUCCESS);
        }
        let Some(input) = &self.input else {
            anyhow::bail!("an input document is required");
        };

        log_stage_start!("extract", input.display());
        println!("🔍 Extracting entities from {}", input.display());

        let raw = match read_document(input) {
            Ok(text) => text,
            Err(e) => return Ok(report_failure(&e.into())),
        };

        let selection = if self.entity_types.is_empty() {
            config.extraction.label_selection()
        } else {
            LabelSelection::new(&self.entity_types)
        };

        let mut recognizer_config = config.recognizer.clone();
        if let Some(backend) = self.backend {
            recognizer_config.backend = backend;
        }
        if let Some(model) = &self.model {
            recognizer_config.model = model.clone();
        }

        println!("   Entity types: {}", selection.labels().join(", "));

        let start = Instant::now();
        let task = tokio::task::spawn_blocking(move || -> Result<ExtractionResult, AnonymapError> {
            let recognizer = load_recognizer(&recognizer_config)?;
            extract_entities(&raw, recognizer.as_ref(), &selection)
        });

        let result = tokio::select! {
            joined = task => joined?,
            _ = wait_for_shutdown(&mut shutdown_signal) => {
                return Ok(cancelled("entity recognition"));
            }
        };

        let result = match result {
            Ok(result) => result,
            Err(e) => return Ok(report_failure(&e)),
        };

        println!(
            "✅ Found {} unique entities ({} detections) with model {} in {:.1}s",
            result.entries.len(),
            result.detections,
            result.model,
            start.elapsed().as_secs_f64()
        );
        if result.entries.is_empty() {
            println!("⚠️  No entities of the selected types were found");
        }

        if self.dry_run {
            Self::print_entries(&result.entries);
            println!();
            println!("Dry run: mapping file not written");
            return Ok(exit_codes::SUCCESS);
        }

        let output = self
            .output
            .clone()
            .unwrap_or_else(|| default_output_path(input, OutputKind::Entities));
        let write_header = config.mapping.write_header && !self.no_header;

        if let Err(e) = mapping::save(&result.entries, &output, write_header) {
            return Ok(report_failure(&e.into()));
        }

        audit_or_warn(audit_logger(config).log_extraction(input, &result.model, &result.entries));

        println!("📄 Mapping written to {}", output.display());
        println!();
        println!("Next steps:");
        println!("  1. Review and edit {} if needed", output.display());
        println!(
            "  2. Run: anonymap anonymize {} --mapping {}",
            input.display(),
            output.display()
        );

        Ok(exit_codes::SUCCESS)
    }

    fn print_entity_types() {
        println!("Selectable entity types:");
        for (code, name) in SELECTABLE_LABELS {
            println!("  {code:<12} {name}");
        }
    }

    fn print_entries(entries: &[MappingEntry]) {
        println!();
        for entry in entries {
            println!("  {:<14} {}", entry.placeholder, entry.real_entity);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    fn args(input: PathBuf, output: PathBuf) -> ExtractArgs {
        ExtractArgs {
            input: Some(input),
            output: Some(output),
            entity_types: vec!["PERSON".to_string(), "ORG".to_string()],
            backend: None,
            model: None,
            no_header: false,
            dry_run: false,
            list_types: false,
        }
    }

    #[tokio::test]
    async fn test_extract_writes_mapping_with_builtin_patterns() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("letter.md");
        let mut file = std::fs::File::create(&input).unwrap();
        writeln!(file, "# Letter\n\nDear Dr. Jane Doe,\n\nAcme Widgets Inc agreed.").unwrap();
        let output = dir.path().join("map.csv");

        let (_tx, rx) = watch::channel(false);
        let code = args(input, output.clone())
            .execute(&AnonymapConfig::default(), rx)
            .await
            .unwrap();

        assert_eq!(code, exit_codes::SUCCESS);
        let content = std::fs::read_to_string(&output).unwrap();
        assert_eq!(
            content,
            "base_placeholder,real_entity_name\nperson_001,Jane Doe\norg_001,Acme Widgets Inc\n"
        );
    }

    #[tokio::test]
    async fn test_extract_empty_document() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("empty.md");
        std::fs::write(&input, "<!-- nothing -->\n").unwrap();
        let output = dir.path().join("map.csv");

        let (_tx, rx) = watch::channel(false);
        let code = args(input, output.clone())
            .execute(&AnonymapConfig::default(), rx)
            .await
            .unwrap();

        assert_eq!(code, exit_codes::INPUT_ERROR);
        assert!(!output.exists());
    }

    #[tokio::test]
    async fn test_extract_missing_input() {
        let dir = tempdir().unwrap();
        let (_tx, rx) = watch::channel(false);
        let code = args(dir.path().join("missing.txt"), dir.path().join("map.csv"))
            .execute(&AnonymapConfig::default(), rx)
            .await
            .unwrap();
        assert_eq!(code, exit_codes::INPUT_ERROR);
    }

    #[tokio::test]
    async fn test_extract_recognizer_unavailable() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("note.txt");
        std::fs::write(&input, "Jane Doe called.").unwrap();
        let output = dir.path().join("map.csv");

        let mut config = AnonymapConfig::default();
        config.recognizer.backend = RecognizerBackend::Command;
        config.recognizer.command = Some("anonymap-missing-ner-binary".to_string());

        let (_tx, rx) = watch::channel(false);
        let code = args(input, output.clone()).execute(&config, rx).await.unwrap();

        assert_eq!(code, exit_codes::RECOGNIZER_ERROR);
        assert!(!output.exists());
    }
}
