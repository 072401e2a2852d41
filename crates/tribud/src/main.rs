mod cli;
mod commands;

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};
use tribud_core::config::log_level_check;
use tribud_core::{BackupSettings, ConfigDiscovery, ConfigValidator};

fn main() -> anyhow::Result<ExitCode> {
    // Set up Ctrl+C handler for graceful interruption
    ctrlc::set_handler(|| {
        eprintln!("\n\nInterrupted by user (Ctrl+C)");
        std::process::exit(130); // Standard exit code for SIGINT
    })
    .context("Failed to set Ctrl+C handler")?;

    let cli = Cli::parse();

    let config_path = ConfigDiscovery::discover(cli.config.as_deref())
        .context("Could not determine the user configuration directory, use --config")?;
    let config = ConfigValidator::load(&config_path).with_context(|| {
        format!(
            "Failed to load configuration from {}",
            config_path.display()
        )
    })?;

    init_tracing(cli.verbose, cli.quiet, configured_level(&config));
    tracing::info!("Path to config: {}", config_path.display());

    match cli.command.unwrap_or_default() {
        Commands::Backup { strict } => {
            commands::Backup::execute(&config, strict).context("Failed to execute backup command")
        }
        Commands::Check => {
            commands::Check::execute(&config).context("Failed to execute check command")
        }
        Commands::Config => commands::Config::execute(&config_path, &config)
            .context("Failed to execute config command"),
    }
}

/// Log level named by the `log` option, when it is a valid one
fn configured_level(config: &ConfigValidator) -> Option<&str> {
    config
        .lookup(&BackupSettings::log_key())
        .and_then(|option| option.value().as_str())
        .filter(|level| log_level_check(level))
}

fn init_tracing(verbose: u8, quiet: bool, configured: Option<&str>) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new(configured.unwrap_or("info")),
            1 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}
