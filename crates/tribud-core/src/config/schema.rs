//! Schema rules declared for configuration keys

use std::fmt;
use std::path::Path;

use serde::Serialize;

use super::value::ValueType;

/// Full path of a configuration key: enclosing keys then the key itself
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct KeyPath(Vec<String>);

impl KeyPath {
    /// Build a key path from its segments
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    /// Path of `key` under `parents`
    #[must_use]
    pub fn child_of(parents: &[String], key: &str) -> Self {
        let mut segments = parents.to_vec();
        segments.push(key.to_string());
        Self(segments)
    }

    /// Segments, outermost first
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.0
    }
}

impl<const N: usize> From<[&str; N]> for KeyPath {
    fn from(segments: [&str; N]) -> Self {
        Self::new(segments)
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("."))
    }
}

/// Predicate applied to a string value, or to every element of a list
pub type ValueCheck = fn(&str) -> bool;

/// What the schema expects of one key
#[derive(Debug, Clone)]
pub struct SchemaRule {
    /// Whether the key must be present
    pub mandatory: bool,
    /// Expected value shape
    pub expected_type: ValueType,
    /// Expected enclosing keys
    pub expected_parent: Vec<String>,
    /// Optional value predicate
    pub value_check: Option<ValueCheck>,
}

impl SchemaRule {
    /// A mandatory rule at the top level with no value check
    #[must_use]
    pub const fn mandatory(expected_type: ValueType) -> Self {
        Self {
            mandatory: true,
            expected_type,
            expected_parent: Vec::new(),
            value_check: None,
        }
    }

    /// An optional rule at the top level with no value check
    #[must_use]
    pub const fn optional(expected_type: ValueType) -> Self {
        Self {
            mandatory: false,
            expected_type,
            expected_parent: Vec::new(),
            value_check: None,
        }
    }

    /// Set the expected enclosing keys
    #[must_use]
    pub fn under<I, S>(mut self, parents: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.expected_parent = parents.into_iter().map(Into::into).collect();
        self
    }

    /// Set the value predicate
    #[must_use]
    pub fn check(mut self, value_check: ValueCheck) -> Self {
        self.value_check = Some(value_check);
        self
    }

    /// Full path the rule's key is expected at
    #[must_use]
    pub fn declared_path(&self, key: &str) -> KeyPath {
        KeyPath::child_of(&self.expected_parent, key)
    }
}

/// Rules by key name, kept in declaration order
#[derive(Debug, Clone, Default)]
pub struct Schema {
    rules: Vec<(String, SchemaRule)>,
}

impl Schema {
    /// An empty schema
    #[must_use]
    pub const fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Declare `rule` for `key`, replacing an earlier rule for the same key
    #[must_use]
    pub fn rule(mut self, key: impl Into<String>, rule: SchemaRule) -> Self {
        let key = key.into();
        if let Some(slot) = self.rules.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = rule;
        } else {
            self.rules.push((key, rule));
        }
        self
    }

    /// Iterate over `(key, rule)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SchemaRule)> {
        self.rules.iter().map(|(k, r)| (k.as_str(), r))
    }

    /// Number of declared rules
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether no rule is declared
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Whether `value` is an absolute filesystem path
#[must_use]
pub fn path_check(value: &str) -> bool {
    Path::new(value).is_absolute()
}

/// Whether `value` names a log level
#[must_use]
pub fn log_level_check(value: &str) -> bool {
    value.parse::<tracing::Level>().is_ok()
}

/// Schema of the tribud backup configuration
///
/// ```json
/// {
///     "archive": {
///         "input": ["/home/me/documents", "/etc/fstab"],
///         "output": "/mnt/backup"
///     },
///     "log": "info"
/// }
/// ```
#[must_use]
pub fn backup_schema() -> Schema {
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
        .rule(
            "log",
            SchemaRule::optional(ValueType::String).check(log_level_check),
        )
}
