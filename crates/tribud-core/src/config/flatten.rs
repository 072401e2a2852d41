//! Flattening of nested mappings into leaf entries

use super::value::ConfigValue;

/// One leaf of a flattened mapping
#[derive(Debug, Clone, PartialEq)]
pub struct FlatEntry {
    /// Keys of the enclosing mappings, outermost first
    pub parent_path: Vec<String>,
    /// Key of the leaf
    pub key: String,
    /// Leaf value, never a mapping
    pub value: ConfigValue,
}

/// Flatten `entries` into one [`FlatEntry`] per non-mapping leaf.
///
/// Mapping values are descended into; lists are leaves. Output follows the
/// iteration order of the mappings.
#[must_use]
pub fn flatten(entries: &[(String, ConfigValue)]) -> Vec<FlatEntry> {
    let mut leaves = Vec::new();
    flatten_into(entries, &mut Vec::new(), &mut leaves);
    leaves
}

fn flatten_into(
    entries: &[(String, ConfigValue)],
    parents: &mut Vec<String>,
    leaves: &mut Vec<FlatEntry>,
) {
    for (key, value) in entries {
        if let ConfigValue::Mapping(children) = value {
            parents.push(key.clone());
            flatten_into(children, parents, leaves);
            parents.pop();
        } else {
            leaves.push(FlatEntry {
                parent_path: parents.clone(),
                key: key.clone(),
                value: value.clone(),
            });
        }
    }
}
