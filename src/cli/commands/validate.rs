//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the Anonymap configuration file.

use crate::cli::exit_codes;
use crate::config::{load_config_or_default, AnonymapConfig, RecognizerBackend};
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str, explicit: bool) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        let config = match load_config_or_default(config_path, explicit) {
            Ok(config) => config,
            Err(e) => {
                println!("❌ Configuration is invalid");
                println!("   Error: {e}");
                return Ok(exit_codes::CONFIG_ERROR);
            }
        };

        if !explicit && !std::path::Path::new(config_path).exists() {
            println!("ℹ️  No configuration file found, defaults apply");
        }
        println!("✅ Configuration is valid");
        println!();
        Self::print_summary(&config);

        Ok(exit_codes::SUCCESS)
    }

    fn print_summary(config: &AnonymapConfig) {
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        match config.recognizer.backend {
            RecognizerBackend::Command => {
                println!("  Recognizer: command");
                println!(
                    "  Command: {}",
                    config.recognizer.command.as_deref().unwrap_or("-")
                );
                println!(
                    "  Models: {}",
                    config.recognizer.candidate_models().join(" → ")
                );
            }
            RecognizerBackend::Patterns => {
                println!("  Recognizer: patterns");
                match &config.recognizer.pattern_library {
                    Some(path) => println!("  Pattern Library: {}", path.display()),
                    None => println!("  Pattern Library: built-in"),
                }
            }
        }
        println!(
            "  Entity Types: {}",
            config.extraction.entity_types.join(", ")
        );
        println!(
            "  Exclusions: {}{}",
            config.anonymization.exclusions.len(),
            config
                .anonymization
                .exclusions_file
                .as_ref()
                .map(|p| format!(" (+ {})", p.display()))
                .unwrap_or_default()
        );
        println!(
            "  Mapping Header: read={} write={}",
            config.mapping.has_header, config.mapping.write_header
        );
        if config.audit.enabled {
            println!("  Audit Log: {}", config.audit.log_path.display());
        } else {
            println!("  Audit Log: disabled");
        }
        println!();
    }
}
