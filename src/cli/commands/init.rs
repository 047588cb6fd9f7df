//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use crate::cli::exit_codes;
use crate::config::DEFAULT_CONFIG_FILE;
use clap::Args;
use std::path::PathBuf;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    pub output: PathBuf,

    /// Include example values and comments
    #[arg(long)]
    pub with_examples: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output.display(), "Initializing configuration file");

        println!("📝 Initializing Anonymap configuration");
        println!();

        if self.output.exists() && !self.force {
            println!(
                "❌ Configuration file already exists: {}",
                self.output.display()
            );
            println!("   Use --force to overwrite");
            return Ok(exit_codes::CONFIG_ERROR);
        }

        let config_content = if self.with_examples {
            Self::generate_config_with_examples()
        } else {
            Self::generate_minimal_config()
        };

        match crate::document::write_atomic(&self.output, config_content.as_bytes()) {
            Ok(()) => {
                println!("✅ Configuration file created: {}", self.output.display());
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your settings", self.output.display());
                println!("  2. To use an NER program, set recognizer.backend = \"command\"");
                println!("     and recognizer.command to its path");
                println!("  3. Validate configuration: anonymap validate-config");
                println!("  4. Extract entities: anonymap extract <document>");
                println!();
                Ok(exit_codes::SUCCESS)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {e}");
                Ok(exit_codes::FATAL)
            }
        }
    }

    /// Generate minimal configuration
    fn generate_minimal_config() -> String {
        r#"# Anonymap Configuration File
# Reversible document anonymization

[application]
log_level = "info"

[recognizer]
backend = "patterns"

[extraction]
entity_types = ["PERSON"]

[anonymization]
exclusions = []

[mapping]
has_header = true
write_header = true

[audit]
enabled = false

[logging]
local_enabled = false
"#
        .to_string()
    }

    /// Generate configuration with examples and documentation
    fn generate_config_with_examples() -> String {
        r#"# Anonymap Configuration File
# Reversible document anonymization
#
# Every setting is optional. Values can reference environment variables
# with ${VAR_NAME}, and any setting can be overridden with
# ANONYMAP_<SECTION>_<KEY>, e.g. ANONYMAP_RECOGNIZER_MODEL=en_core_web_sm

# ============================================================================
# Application Configuration
# ============================================================================
[application]
# Log level: trace | debug | info | warn | error
log_level = "info"

# ============================================================================
# Entity Recognizer Configuration
# ============================================================================
[recognizer]
# Backend: "patterns" (built-in regex library, works offline) or
# "command" (external NER program)
backend = "patterns"

# Preferred model, tried first by the command backend
model = "en_core_web_lg"

# Models tried in order when the preferred one fails to load
fallback_models = ["en_core_web_md", "en_core_web_sm"]

# External NER program. It reads plain text on stdin and prints a JSON
# array such as [{"text": "Jane Doe", "label": "PERSON"}] on stdout.
# command = "${ANONYMAP_NER_COMMAND}"

# Program arguments; {model} is replaced with the model being loaded
args = ["{model}"]

# Custom pattern library for the patterns backend
# pattern_library = "./patterns/entity_patterns.toml"

# ============================================================================
# Extraction Configuration
# ============================================================================
[extraction]
# Recognizer labels to anonymize:
#   PERSON, ORG, GPE, LOC, FAC, NORP, PRODUCT, EVENT, WORK_OF_ART, DATE, MONEY
#   OTHER admits TIME, PERCENT, QUANTITY, ORDINAL, CARDINAL, LANGUAGE, LAW
entity_types = ["PERSON", "ORG", "GPE"]

# ============================================================================
# Anonymization Configuration
# ============================================================================
[anonymization]
# Entities that are never anonymized (whole entity, case-insensitive)
exclusions = ["United Nations"]

# File with one excluded entity per line; '#' starts a comment
# exclusions_file = "./exclusions.txt"

# ============================================================================
# Mapping File Configuration
# ============================================================================
[mapping]
# Skip the first row when reading a mapping file
has_header = true

# Write a "base_placeholder,real_entity_name" header when saving
write_header = true

# ============================================================================
# Audit Trail Configuration
# ============================================================================
[audit]
# Record each extract/anonymize/deanonymize run. Entity values are stored
# as SHA-256 hashes only.
enabled = false

# Audit log file path
log_path = "./logs/anonymap_audit.log"

# JSON lines (true) or plain text (false)
json_format = true

# ============================================================================
# Logging Configuration
# ============================================================================
[logging]
# Enable local JSON file logging
local_enabled = false

# Local log directory
local_path = "./logs"

# Log rotation: daily | hourly | never
local_rotation = "daily"
"#
        .to_string()
    }
}
