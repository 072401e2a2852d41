//! Tagged configuration values

use std::fmt;

/// A configuration value, tagged once when the document is loaded
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValue {
    /// A string
    String(String),
    /// A list whose elements are all strings (an empty list included)
    StringList(Vec<String>),
    /// A nested mapping, in document order
    Mapping(Vec<(String, ConfigValue)>),
    /// Any other scalar or list
    Other(serde_json::Value),
}

/// Shape of a [`ConfigValue`], used by schema rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    /// [`ConfigValue::String`]
    String,
    /// [`ConfigValue::StringList`]
    StringList,
    /// [`ConfigValue::Mapping`]
    Mapping,
    /// [`ConfigValue::Other`]
    Other,
}

impl ConfigValue {
    /// Shape tag of this value
    #[must_use]
    pub const fn value_type(&self) -> ValueType {
        match self {
            Self::String(_) => ValueType::String,
            Self::StringList(_) => ValueType::StringList,
            Self::Mapping(_) => ValueType::Mapping,
            Self::Other(_) => ValueType::Other,
        }
    }

    /// The string, if this is a string value
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// The elements, if this is a list of strings
    #[must_use]
    pub fn as_string_list(&self) -> Option<&[String]> {
        match self {
            Self::StringList(items) => Some(items),
            _ => None,
        }
    }

    /// The entries, if this is a mapping
    #[must_use]
    pub fn as_mapping(&self) -> Option<&[(String, Self)]> {
        match self {
            Self::Mapping(entries) => Some(entries),
            _ => None,
        }
    }

    /// Value stored under `key`, if this is a mapping containing it
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Self> {
        self.as_mapping()?
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Convert back into a JSON value
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::String(s) => serde_json::Value::String(s.clone()),
            Self::StringList(items) => items
                .iter()
                .cloned()
                .map(serde_json::Value::String)
                .collect(),
            Self::Mapping(entries) => serde_json::Value::Object(
                entries
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
            Self::Other(value) => value.clone(),
        }
    }
}

impl From<serde_json::Value> for ConfigValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::String(s) => Self::String(s),
            serde_json::Value::Object(map) => {
                Self::Mapping(map.into_iter().map(|(k, v)| (k, Self::from(v))).collect())
            }
            serde_json::Value::Array(items) => {
                if items.iter().all(serde_json::Value::is_string) {
                    Self::StringList(
                        items
                            .into_iter()
                            .filter_map(|item| match item {
                                serde_json::Value::String(s) => Some(s),
                                _ => None,
                            })
                            .collect(),
                    )
                } else {
                    Self::Other(serde_json::Value::Array(items))
                }
            }
            other => Self::Other(other),
        }
    }
}

impl fmt::Display for ConfigValue {
    /// Strings are written bare, everything else as JSON text
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(value) => f.write_str(value),
            _ => write!(f, "{}", self.to_json()),
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::String => "string",
            Self::StringList => "list of strings",
            Self::Mapping => "mapping",
            Self::Other => "other",
        };
        f.write_str(name)
    }
}
