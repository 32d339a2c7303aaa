use serde::Serialize;
use std::collections::BTreeMap;

use crate::paths::split_path_list;

/// Immutable snapshot of flat `key = value` settings.
///
/// Values are stored as given; blank values read back as absent so that an
/// empty key in a config file behaves like an unset one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Settings {
    values: BTreeMap<String, String>,
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// Value for `key`, or `None` when unset or blank.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values
            .get(key)
            .map(String::as_str)
            .filter(|value| !value.trim().is_empty())
    }

    /// Comma-separated value for `key` split into trimmed entries.
    pub fn get_list(&self, key: &str) -> Vec<String> {
        split_path_list(self.get(key))
    }

    pub fn has(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Overlay `other` on top of `self`; keys in `other` win.
    pub fn merge(mut self, other: Settings) -> Self {
        self.values.extend(other.values);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_values_read_as_absent() {
        let settings = Settings::new().with("a", "  ").with("b", "x.xml");

        assert_eq!(settings.get("a"), None);
        assert!(!settings.has("a"));
        assert_eq!(settings.get("b"), Some("x.xml"));
        assert_eq!(settings.get("missing"), None);
    }

    #[test]
    fn test_merge_prefers_overlay() {
        let base = Settings::from_pairs([("a", "1"), ("b", "2")]);
        let overlay = Settings::from_pairs([("b", "3"), ("c", "4")]);

        let merged = base.merge(overlay);

        assert_eq!(merged.get("a"), Some("1"));
        assert_eq!(merged.get("b"), Some("3"));
        assert_eq!(merged.get("c"), Some("4"));
        assert_eq!(merged.len(), 3);
    }

    #[test]
    fn test_get_list_splits_value() {
        let settings = Settings::new().with("paths", "a.xml, b.xml,");
        assert_eq!(settings.get_list("paths"), vec!["a.xml", "b.xml"]);
        assert!(settings.get_list("other").is_empty());
    }
}
