use std::collections::BTreeMap;

use serde::Serialize;

/// Accumulated field-name to serialization-key mapping.
///
/// Keys are unique and the first value recorded for a key is kept. Iteration
/// is in ascending key order so rendered output is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldMapping {
    entries: BTreeMap<String, String>,
}

impl FieldMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `key -> value` unless `key` is already present.
    ///
    /// Returns whether the entry was inserted.
    pub fn insert_if_absent(&mut self, key: impl Into<String>, value: impl Into<String>) -> bool {
        match self.entries.entry(key.into()) {
            std::collections::btree_map::Entry::Vacant(slot) => {
                slot.insert(value.into());
                true
            }
            std::collections::btree_map::Entry::Occupied(_) => false,
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in ascending key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<'a> IntoIterator for &'a FieldMapping {
    type Item = (&'a String, &'a String);
    type IntoIter = std::collections::btree_map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Derive the mapping key for a field identifier: the identifier with only
/// its first character lowercased.
pub fn mapping_key(ident: &str) -> String {
    let mut chars = ident.chars();
    match chars.next() {
        Some(first) => {
            let lower = first.to_lowercase().next().unwrap_or(first);
            std::iter::once(lower).chain(chars).collect()
        }
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mapping_key() {
        assert_eq!(mapping_key("Name"), "name");
        assert_eq!(mapping_key("UserID"), "userID");
        assert_eq!(mapping_key("id"), "id");
        assert_eq!(mapping_key("_Private"), "_Private");
        assert_eq!(mapping_key("Élan"), "élan");
        assert_eq!(mapping_key(""), "");
    }

    #[test]
    fn test_mapping_key_keeps_one_char_for_multi_char_lowercase() {
        // 'İ' lowercases to "i\u{307}"; only the first char is kept.
        assert_eq!(mapping_key("İd"), "id");
        assert_eq!(mapping_key("İ"), "i");
    }

    #[test]
    fn test_first_write_wins() {
        let mut mapping = FieldMapping::new();
        assert!(mapping.insert_if_absent("name", "name"));
        assert!(!mapping.insert_if_absent("name", "full_name"));
        assert_eq!(mapping.get("name"), Some("name"));
        assert_eq!(mapping.len(), 1);
    }

    #[test]
    fn test_iteration_is_sorted() {
        let mut mapping = FieldMapping::new();
        mapping.insert_if_absent("zeta", "z");
        mapping.insert_if_absent("alpha", "a");
        mapping.insert_if_absent("Mid", "m");
        let keys: Vec<_> = mapping.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["Mid", "alpha", "zeta"]);
    }

    #[test]
    fn test_serializes_as_plain_object() {
        let mut mapping = FieldMapping::new();
        mapping.insert_if_absent("id", "identifier");
        assert_eq!(serde_json::to_string(&mapping).unwrap(), r#"{"id":"identifier"}"#);
    }
}
