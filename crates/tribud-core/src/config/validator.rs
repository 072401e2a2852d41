//! Schema compliance of a loaded configuration

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use super::flatten::flatten;
use super::loader::{self, LoadError};
use super::option::{CheckOutcome, ConfigOption};
use super::schema::{KeyPath, Schema};
use super::value::ConfigValue;
use crate::report::{Event, Reporter, TracingReporter};

/// Why an option appears in a [`ComplianceReport`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Violation {
    /// A mandatory key is absent
    Missing,
    /// The option failed its rule
    Check(CheckOutcome),
    /// No rule covers the option
    Unchecked,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => f.write_str("missing"),
            Self::Check(outcome) => write!(f, "{outcome}"),
            Self::Unchecked => f.write_str("not in schema"),
        }
    }
}

/// One reported option
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NonCompliance {
    /// Full path of the option, or the declared path of a missing key
    pub path: KeyPath,
    /// What is wrong with it
    pub violation: Violation,
}

/// Result of [`ConfigValidator::sanitize`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComplianceReport {
    entries: Vec<NonCompliance>,
}

impl ComplianceReport {
    /// Whether nothing was reported
    #[must_use]
    pub fn is_compliant(&self) -> bool {
        self.entries.is_empty()
    }

    /// Reported options in report order
    #[must_use]
    pub fn entries(&self) -> &[NonCompliance] {
        &self.entries
    }

    /// Paths of the reported options in report order
    #[must_use]
    pub fn paths(&self) -> Vec<&KeyPath> {
        self.entries.iter().map(|entry| &entry.path).collect()
    }
}

/// Owns every option of one configuration snapshot
pub struct ConfigValidator {
    document: Vec<(String, ConfigValue)>,
    options: Vec<ConfigOption>,
    reporter: Arc<dyn Reporter>,
}

impl ConfigValidator {
    /// Build a validator over an already parsed top-level mapping
    #[must_use]
    pub fn new(document: Vec<(String, ConfigValue)>) -> Self {
        let options = flatten(&document)
            .into_iter()
            .map(ConfigOption::from)
            .collect();
        Self {
            document,
            options,
            reporter: Arc::new(TracingReporter),
        }
    }

    /// Build a validator from a JSON value, `None` unless it is an object
    #[must_use]
    pub fn from_json(value: serde_json::Value) -> Option<Self> {
        match ConfigValue::from(value) {
            ConfigValue::Mapping(entries) => Some(Self::new(entries)),
            _ => None,
        }
    }

    /// Load the JSON configuration file at `path`
    ///
    /// # Errors
    ///
    /// Returns a [`LoadError`] if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        loader::load_file(path).map(Self::new)
    }

    /// Report events to `reporter` instead of `tracing`
    #[must_use]
    pub fn with_reporter(mut self, reporter: Arc<dyn Reporter>) -> Self {
        self.reporter = reporter;
        self
    }

    /// All options, in flattening order
    #[must_use]
    pub fn options(&self) -> &[ConfigOption] {
        &self.options
    }

    /// First option whose full path is `path`
    #[must_use]
    pub fn lookup(&self, path: &KeyPath) -> Option<&ConfigOption> {
        self.options.iter().find(|option| option.is_key(path))
    }

    /// Value found by descending through `keys`, sub-mappings included
    #[must_use]
    pub fn item_search<S: AsRef<str>>(&self, keys: &[S]) -> Option<&ConfigValue> {
        let (first, rest) = keys.split_first()?;
        let first = first.as_ref();
        let Some(mut current) = self
            .document
            .iter()
            .find(|(k, _)| k == first)
            .map(|(_, v)| v)
        else {
            self.reporter.report(&Event::KeyMissing { key: first });
            return None;
        };
        for key in rest {
            let key = key.as_ref();
            let Some(next) = current.get(key) else {
                self.reporter.report(&Event::KeyMissing { key });
                return None;
            };
            current = next;
        }
        Some(current)
    }

    /// Check every option against `schema`.
    ///
    /// Reports, in order: each declared rule whose key is missing (when
    /// mandatory) or fails its check, then every option no rule covered.
    /// An empty report means the configuration is compliant.
    #[must_use]
    pub fn sanitize(&self, schema: &Schema) -> ComplianceReport {
        let mut reached = vec![false; self.options.len()];
        let mut entries = Vec::new();

        for (key, rule) in schema.iter() {
            let candidate = rule.declared_path(key);
            let Some(index) = self.options.iter().position(|o| o.is_key(&candidate)) else {
                if rule.mandatory {
                    self.reporter.report(&Event::MandatoryMissing { path: &candidate });
                    entries.push(NonCompliance {
                        path: candidate,
                        violation: Violation::Missing,
                    });
                }
                continue;
            };

            reached[index] = true;
            let option = &self.options[index];
            let outcome = option.check(rule);
            if outcome != CheckOutcome::Ok {
                self.reporter.report(&Event::NonCompliant {
                    path: option.full_path(),
                    outcome: Some(outcome),
                });
                entries.push(NonCompliance {
                    path: option.full_path().clone(),
                    violation: Violation::Check(outcome),
                });
            }
        }

        for (option, _) in self
            .options
            .iter()
            .zip(&reached)
            .filter(|(_, reached)| !**reached)
        {
            self.reporter.report(&Event::NonCompliant {
                path: option.full_path(),
                outcome: None,
            });
            entries.push(NonCompliance {
                path: option.full_path().clone(),
                violation: Violation::Unchecked,
            });
        }

        ComplianceReport { entries }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::config::schema::{SchemaRule, backup_schema, path_check};
    use crate::config::value::ValueType;
    use serde_json::json;

    #[derive(Default)]
    struct Recorder {
        lines: Mutex<Vec<String>>,
    }

    impl Reporter for Recorder {
        fn report(&self, event: &Event<'_>) {
            self.lines.lock().unwrap().push(format!("{event:?}"));
        }
    }

    fn validator(raw: serde_json::Value) -> ConfigValidator {
        ConfigValidator::from_json(raw).unwrap()
    }

    fn archive_schema() -> Schema {
        Schema::new()
            .rule(
                "input",
                SchemaRule::mandatory(ValueType::StringList)
                    .under(["archive"])
                    .check(path_check),
            )
            .rule(
                "output",
                SchemaRule::mandatory(ValueType::String)
                    .under(["archive"])
                    .check(path_check),
            )
    }

    #[test]
    fn test_sanitize_compliant() {
        let config = validator(json!({
            "archive": {"input": ["/abs/file.txt"], "output": "/abs/backup"}
        }));

        assert!(config.sanitize(&archive_schema()).is_compliant());
    }

    #[test]
    fn test_sanitize_relative_output() {
        let config = validator(json!({
            "archive": {"input": ["/abs/file.txt"], "output": "relative/backup"}
        }));

        let report = config.sanitize(&archive_schema());
        assert_eq!(report.paths(), [&KeyPath::from(["archive", "output"])]);
        assert_eq!(
            report.entries()[0].violation,
            Violation::Check(CheckOutcome::WrongValue)
        );
    }

    #[test]
    fn test_sanitize_missing_mandatory() {
        let config = validator(json!({"archive": {"input": ["/abs"]}}));

        let report = config.sanitize(&archive_schema());
        assert_eq!(report.paths(), [&KeyPath::from(["archive", "output"])]);
        assert_eq!(report.entries()[0].violation, Violation::Missing);
    }

    #[test]
    fn test_sanitize_missing_optional_is_fine() {
        let config = validator(json!({
            "archive": {"input": ["/abs"], "output": "/bck"}
        }));

        assert!(config.sanitize(&backup_schema()).is_compliant());
    }

    #[test]
    fn test_sanitize_rule_without_check_reaches_option() {
        let config = validator(json!({"archive": {"label": "weekly"}}));
        let schema = Schema::new().rule(
            "label",
            SchemaRule::optional(ValueType::String).under(["archive"]),
        );

        let report = config.sanitize(&schema);
        assert!(report.is_compliant(), "{:?}", report.paths());
    }

    #[test]
    fn test_sanitize_reports_unknown_keys() {
        let config = validator(json!({
            "archive": {"input": ["/abs"], "output": "/bck", "compress": true},
            "former": ["/old"]
        }));

        let report = config.sanitize(&archive_schema());
        let paths = report.paths();
        assert_eq!(paths.len(), 2);
        assert!(paths.contains(&&KeyPath::from(["archive", "compress"])));
        assert!(paths.contains(&&KeyPath::from(["former"])));
        assert!(
            report
                .entries()
                .iter()
                .all(|entry| entry.violation == Violation::Unchecked)
        );
    }

    #[test]
    fn test_sanitize_reports_all_violations() {
        let config = validator(json!({
            "archive": {"input": "/not/a/list", "output": "relative"}
        }));

        let report = config.sanitize(&archive_schema());
        assert_eq!(
            report.entries(),
            [
                NonCompliance {
                    path: KeyPath::from(["archive", "input"]),
                    violation: Violation::Check(CheckOutcome::WrongType),
                },
                NonCompliance {
                    path: KeyPath::from(["archive", "output"]),
                    violation: Violation::Check(CheckOutcome::WrongValue),
                },
            ]
        );
    }

    #[test]
    fn test_sanitize_key_under_wrong_parent() {
        // Found neither where declared nor covered elsewhere
        let config = validator(json!({
            "archive": {"input": ["/abs"]},
            "output": "/bck"
        }));

        let report = config.sanitize(&archive_schema());
        assert_eq!(
            report.entries(),
            [
                NonCompliance {
                    path: KeyPath::from(["archive", "output"]),
                    violation: Violation::Missing,
                },
                NonCompliance {
                    path: KeyPath::from(["output"]),
                    violation: Violation::Unchecked,
                },
            ]
        );
    }

    #[test]
    fn test_sanitize_notifies_reporter() {
        let recorder = Arc::new(Recorder::default());
        let config = validator(json!({"archive": {"input": ["/abs"]}, "extra": 1}))
            .with_reporter(recorder.clone());

        let _ = config.sanitize(&archive_schema());

        let lines = recorder.lines.lock().unwrap();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("MandatoryMissing"));
        assert!(lines[1].contains("NonCompliant"));
    }

    #[test]
    fn test_lookup() {
        let config = validator(json!({
            "archive": {"input": ["/a", "/b"], "output": "/bck"}
        }));

        let option = config.lookup(&KeyPath::from(["archive", "output"])).unwrap();
        assert_eq!(option.value().as_str(), Some("/bck"));
        assert!(config.lookup(&KeyPath::from(["output"])).is_none());
    }

    #[test]
    fn test_item_search() {
        let config = validator(json!({
            "archive": {"input": ["data/config.json", "data/test"], "output": "data/tar"}
        }));

        assert_eq!(
            config.item_search(&["archive", "output"]),
            Some(&ConfigValue::String("data/tar".to_string()))
        );
        assert_eq!(
            config
                .item_search(&["archive"])
                .and_then(ConfigValue::as_mapping)
                .map(<[_]>::len),
            Some(2)
        );
    }

    #[test]
    fn test_item_search_missing_key() {
        let recorder = Arc::new(Recorder::default());
        let config = validator(json!({"former": ["/a"], "output": "data/tar"}))
            .with_reporter(recorder.clone());

        assert!(config.item_search(&["archive"]).is_none());
        assert!(config.item_search(&["archive", "input"]).is_none());
        assert!(config.item_search::<&str>(&[]).is_none());
        assert_eq!(recorder.lines.lock().unwrap().len(), 2);
    }
}
