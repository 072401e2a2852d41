use std::process::ExitCode;

use anyhow::Context;
use tribud_core::config::backup_schema;
use tribud_core::{
    BackupCoordinator, BackupReporter, BackupSettings, ConfigValidator, DirDestination,
};

pub struct Backup;

impl Backup {
    pub fn execute(config: &ConfigValidator, strict: bool) -> anyhow::Result<ExitCode> {
        // Each non-compliant option is logged by the validator itself
        let compliance = config.sanitize(&backup_schema());
        if strict && !compliance.is_compliant() {
            anyhow::bail!(
                "Configuration is not compliant ({} options), refusing to back up in strict mode",
                compliance.entries().len()
            );
        }

        let settings = BackupSettings::resolve(config)
            .context("Configuration can not be used for a backup")?;

        let coordinator = BackupCoordinator::new(DirDestination::new(&settings.output));
        if !coordinator.connect() || !coordinator.is_ready() {
            anyhow::bail!(
                "Backup directory is not usable: {}",
                settings.output.display()
            );
        }

        let report = coordinator.backup_all(&settings.inputs);
        print!("{}", BackupReporter::generate_summary(&report));

        Ok(if report.is_success() {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        })
    }
}
