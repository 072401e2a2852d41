//! Backup run aggregation and reporting

use std::fmt::Write;
use std::path::{Path, PathBuf};

use super::FailedEntry;

/// Failures of one configured input
#[derive(Debug)]
pub struct InputOutcome {
    /// The input as configured
    pub source: PathBuf,
    /// Entries of that input that could not be backed up
    pub failures: Vec<FailedEntry>,
}

impl InputOutcome {
    /// Whether every entry of the input was backed up
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Outcome of a whole backup run, one record per input in order
#[derive(Debug, Default)]
pub struct BackupReport {
    inputs: Vec<InputOutcome>,
}

impl BackupReport {
    /// Record the failures of `source`
    pub fn push(&mut self, source: PathBuf, failures: Vec<FailedEntry>) {
        self.inputs.push(InputOutcome { source, failures });
    }

    /// Per-input outcomes in run order
    #[must_use]
    pub fn inputs(&self) -> &[InputOutcome] {
        &self.inputs
    }

    /// Every failed entry across all inputs
    pub fn failures(&self) -> impl Iterator<Item = &FailedEntry> {
        self.inputs.iter().flat_map(|input| &input.failures)
    }

    /// Number of failed entries across all inputs
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.inputs.iter().map(|input| input.failures.len()).sum()
    }

    /// Whether no entry failed
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.inputs.iter().all(InputOutcome::is_success)
    }

    /// Failures recorded for `source`, if it was part of the run
    #[must_use]
    pub fn failures_for(&self, source: &Path) -> Option<&[FailedEntry]> {
        self.inputs
            .iter()
            .find(|input| input.source == source)
            .map(|input| input.failures.as_slice())
    }
}

/// Backup run reporter
pub struct BackupReporter;

impl BackupReporter {
    /// Generate a summary report
    #[must_use]
    pub fn generate_summary(report: &BackupReport) -> String {
        let mut output = String::new();
        let succeeded = report.inputs().iter().filter(|i| i.is_success()).count();

        output.push_str("\n=== Backup Summary ===\n");
        let _ = writeln!(output, "Inputs:    {}", report.inputs().len());
        let _ = writeln!(output, "Succeeded: {succeeded}");
        let _ = writeln!(output, "Failed:    {}", report.inputs().len() - succeeded);

        for input in report.inputs().iter().filter(|i| !i.is_success()) {
            let _ = writeln!(
                output,
                "\n{} ({} entries failed):",
                input.source.display(),
                input.failures.len()
            );
            for failure in &input.failures {
                let _ = writeln!(output, "  - {failure}");
            }
        }

        if report.is_success() {
            output.push_str("\nStatus: ✓ Success\n");
        } else {
            output.push_str("\nStatus: ✗ Completed with errors\n");
        }

        output
    }
}
