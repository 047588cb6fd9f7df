// Anonymap - Reversible Document Anonymization Tool
// Copyright (c) 2025 Anonymap Contributors
// Licensed under the MIT License

use anonymap::cli::{exit_codes, Cli, Commands};
use anonymap::config::{load_config_or_default, AnonymapConfig};
use anonymap::logging::init_logging;
use clap::Parser;
use std::process;
use tokio::sync::watch;

#[tokio::main]
async fn main() {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Document commands need the configuration before logging starts
    let config = if needs_config(&cli.command) {
        match load_config_or_default(cli.config_path(), cli.config_is_explicit()) {
            Ok(config) => Some(config),
            Err(e) => {
                eprintln!("❌ {e}");
                process::exit(exit_codes::CONFIG_ERROR);
            }
        }
    } else {
        None
    };

    let log_level = cli
        .log_level
        .clone()
        .or_else(|| config.as_ref().map(|c| c.application.log_level.clone()))
        .unwrap_or_else(|| "info".to_string());
    let logging_config = config
        .as_ref()
        .map(|c| c.logging.clone())
        .unwrap_or_default();

    let guard = match init_logging(&log_level, &logging_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            process::exit(exit_codes::FATAL);
        }
    };

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "Anonymap - Reversible Document Anonymization"
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    tokio::spawn(async move {
        #[cfg(unix)]
        {
            use tokio::signal::unix::{signal, SignalKind};
            match signal(SignalKind::terminate()) {
                Ok(mut sigterm) => {
                    tokio::select! {
                        _ = tokio::signal::ctrl_c() => {
                            tracing::info!("Received SIGINT (Ctrl+C), cancelling...");
                        }
                        _ = sigterm.recv() => {
                            tracing::info!("Received SIGTERM, cancelling...");
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to install SIGTERM handler");
                    if tokio::signal::ctrl_c().await.is_err() {
                        return;
                    }
                    tracing::info!("Received SIGINT (Ctrl+C), cancelling...");
                }
            }
            let _ = shutdown_tx.send(true);
        }

        #[cfg(not(unix))]
        {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            } else {
                tracing::info!("Received SIGINT (Ctrl+C), cancelling...");
                let _ = shutdown_tx.send(true);
            }
        }
    });

    let exit_code = match execute_command(&cli, config.as_ref(), shutdown_rx).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "Command execution failed");
            eprintln!("Error: {e}");
            exit_codes::FATAL
        }
    };

    // Flush the file logger before exiting
    drop(guard);
    process::exit(exit_code);
}

fn needs_config(command: &Commands) -> bool {
    matches!(
        command,
        Commands::Extract(_) | Commands::Anonymize(_) | Commands::Deanonymize(_)
    )
}

/// Execute the CLI command
async fn execute_command(
    cli: &Cli,
    config: Option<&AnonymapConfig>,
    shutdown_signal: watch::Receiver<bool>,
) -> anyhow::Result<i32> {
    let default_config;
    let config = match config {
        Some(config) => config,
        None => {
            default_config = AnonymapConfig::default();
            &default_config
        }
    };

    match &cli.command {
        Commands::Extract(args) => args.execute(config, shutdown_signal).await,
        Commands::Anonymize(args) => args.execute(config).await,
        Commands::Deanonymize(args) => args.execute(config).await,
        Commands::ValidateConfig(args) => {
            args.execute(cli.config_path(), cli.config_is_explicit())
                .await
        }
        Commands::Init(args) => args.execute().await,
    }
}
