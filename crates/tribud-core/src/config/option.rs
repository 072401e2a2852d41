//! A single leaf option and its compliance check

use std::fmt;

use super::flatten::FlatEntry;
use super::schema::{KeyPath, SchemaRule, ValueCheck};
use super::value::ConfigValue;

/// Outcome of checking an option against a rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CheckOutcome {
    /// The option complies with the rule
    Ok,
    /// The value has another shape than the rule expects
    WrongType,
    /// The option sits under other keys than the rule expects
    WrongParent,
    /// The value predicate rejected the value
    WrongValue,
}

impl fmt::Display for CheckOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Ok => "ok",
            Self::WrongType => "wrong type",
            Self::WrongParent => "wrong parent",
            Self::WrongValue => "wrong value",
        };
        f.write_str(text)
    }
}

/// One leaf of the configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigOption {
    parent_path: Vec<String>,
    key: String,
    value: ConfigValue,
    full_path: KeyPath,
}

impl ConfigOption {
    /// Create an option from its parts
    pub fn new<I, S>(parent_path: I, key: impl Into<String>, value: ConfigValue) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let parent_path: Vec<String> = parent_path.into_iter().map(Into::into).collect();
        let key = key.into();
        let full_path = KeyPath::child_of(&parent_path, &key);
        Self {
            parent_path,
            key,
            value,
            full_path,
        }
    }

    /// Enclosing keys, outermost first
    #[must_use]
    pub fn parent_path(&self) -> &[String] {
        &self.parent_path
    }

    /// Key of the option
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Value of the option
    #[must_use]
    pub const fn value(&self) -> &ConfigValue {
        &self.value
    }

    /// Enclosing keys followed by the key
    #[must_use]
    pub const fn full_path(&self) -> &KeyPath {
        &self.full_path
    }

    /// Whether `candidate` names this option
    #[must_use]
    pub fn is_key(&self, candidate: &KeyPath) -> bool {
        self.full_path == *candidate
    }

    /// Check the option against `rule`.
    ///
    /// Type is checked first, then the parent path, then the value
    /// predicate; the first failure wins.
    #[must_use]
    pub fn check(&self, rule: &SchemaRule) -> CheckOutcome {
        if self.value.value_type() != rule.expected_type {
            return CheckOutcome::WrongType;
        }
        if self.parent_path != rule.expected_parent {
            return CheckOutcome::WrongParent;
        }
        match rule.value_check {
            Some(predicate) if !value_passes(&self.value, predicate) => CheckOutcome::WrongValue,
            _ => CheckOutcome::Ok,
        }
    }
}

impl From<FlatEntry> for ConfigOption {
    fn from(entry: FlatEntry) -> Self {
        Self::new(entry.parent_path, entry.key, entry.value)
    }
}

fn value_passes(value: &ConfigValue, predicate: ValueCheck) -> bool {
    match value {
        ConfigValue::String(s) => predicate(s),
        ConfigValue::StringList(items) => items.iter().all(|item| predicate(item)),
        // Mappings have no textual form to check
        ConfigValue::Mapping(_) => false,
        ConfigValue::Other(raw) => predicate(&raw.to_string()),
    }
}
