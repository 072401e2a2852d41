use std::path::Path;
use std::process::ExitCode;

use anyhow::Context;
use tribud_core::{BackupSettings, ConfigValidator};

pub struct Config;

impl Config {
    pub fn execute(config_path: &Path, config: &ConfigValidator) -> anyhow::Result<ExitCode> {
        println!("Config file: {}", config_path.display());

        println!("\nOptions:");
        for option in config.options() {
            println!("  {} = {}", option.full_path(), option.value());
        }

        match BackupSettings::resolve(config) {
            Ok(settings) => {
                let rendered = serde_json::to_string_pretty(&settings)
                    .context("Failed to render backup settings")?;
                println!("\nBackup settings:\n{rendered}");
            }
            Err(err) => println!("\nBackup settings: {err}"),
        }

        Ok(ExitCode::SUCCESS)
    }
}
