//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for Anonymap using clap.

pub mod commands;

use crate::config::DEFAULT_CONFIG_FILE;
use crate::domain::{AnonymapError, DocumentError};
use clap::{Parser, Subcommand};

/// Process exit codes
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const CONFIG_ERROR: i32 = 2;
    pub const INPUT_ERROR: i32 = 3;
    pub const RECOGNIZER_ERROR: i32 = 4;
    pub const FATAL: i32 = 5;
    pub const CANCELLED: i32 = 130;
}

/// Exit code for a failed operation
pub fn exit_code_for(error: &AnonymapError) -> i32 {
    match error {
        AnonymapError::Configuration(_) => exit_codes::CONFIG_ERROR,
        AnonymapError::RecognizerUnavailable(_) => exit_codes::RECOGNIZER_ERROR,
        AnonymapError::EmptyInput | AnonymapError::Mapping(_) => exit_codes::INPUT_ERROR,
        AnonymapError::Document(DocumentError::Write { .. }) => exit_codes::FATAL,
        AnonymapError::Document(_) => exit_codes::INPUT_ERROR,
        AnonymapError::Cancelled(_) => exit_codes::CANCELLED,
        AnonymapError::Serialization(_) | AnonymapError::Io(_) => exit_codes::FATAL,
    }
}

/// Anonymap - reversible document anonymization
#[derive(Parser, Debug)]
#[command(name = "anonymap")]
#[command(version, about, long_about = None)]
#[command(author = "Anonymap Contributors")]
pub struct Cli {
    /// Path to configuration file [default: anonymap.toml]
    #[arg(short, long, env = "ANONYMAP_CONFIG")]
    pub config: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "ANONYMAP_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Configuration file path, explicit or default
    pub fn config_path(&self) -> &str {
        self.config.as_deref().unwrap_or(DEFAULT_CONFIG_FILE)
    }

    /// Whether the configuration path was given on the command line or environment
    pub fn config_is_explicit(&self) -> bool {
        self.config.is_some()
    }
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Detect entities in a document and write the mapping file
    Extract(commands::extract::ExtractArgs),

    /// Replace real entities with placeholders using a mapping file
    Anonymize(commands::anonymize::AnonymizeArgs),

    /// Restore real entities from placeholders using a mapping file
    Deanonymize(commands::deanonymize::DeanonymizeArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}
