use std::process::ExitCode;

use tribud_core::ConfigValidator;
use tribud_core::config::backup_schema;

pub struct Check;

impl Check {
    #[allow(clippy::unnecessary_wraps)]
    pub fn execute(config: &ConfigValidator) -> anyhow::Result<ExitCode> {
        let report = config.sanitize(&backup_schema());

        if report.is_compliant() {
            println!("Configuration is compliant");
            return Ok(ExitCode::SUCCESS);
        }

        println!("This option is not checked or not compliant:");
        for entry in report.entries() {
            println!("  {} ({})", entry.path, entry.violation);
        }
        Ok(ExitCode::FAILURE)
    }
}
