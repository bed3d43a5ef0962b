use indexmap::IndexMap;
use serde::Serialize;

use super::param::Param;

/// Parsed `config/list` output: key to typed value, in daemon order.
///
/// A key mapped to `None` was reported by the daemon as not defined; it is
/// still part of the table (global `config_set` only touches tables that
/// already know the key).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ConfigTable {
    entries: IndexMap<String, Option<Param>>,
}

impl ConfigTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Typed value for `key`; `None` when missing or not defined.
    pub fn get(&self, key: &str) -> Option<&Param> {
        self.entries.get(key).and_then(Option::as_ref)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Insert or replace; later values win.
    pub fn insert(&mut self, key: impl Into<String>, value: Option<Param>) {
        self.entries.insert(key.into(), value);
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&Param>)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_ref()))
    }
}

impl FromIterator<(String, Option<Param>)> for ConfigTable {
    fn from_iter<I: IntoIterator<Item = (String, Option<Param>)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::param::build_value;

    #[test]
    fn null_entries_are_present_but_valueless() {
        let mut table = ConfigTable::new();
        table.insert("target_dir", build_value("target_dir", "(not defined)"));
        table.insert("framerate", build_value("framerate", "15"));

        assert!(table.contains_key("target_dir"));
        assert!(table.get("target_dir").is_none());
        assert_eq!(table.get("framerate").and_then(Param::as_i64), Some(15));
        assert_eq!(table.keys().collect::<Vec<_>>(), ["target_dir", "framerate"]);
    }

    #[test]
    fn serializes_as_wire_strings() {
        let table: ConfigTable = [
            ("stream_tls".to_owned(), build_value("stream_tls", "on")),
            ("netcam_url".to_owned(), None),
        ]
        .into_iter()
        .collect();
        let json = serde_json::to_value(&table).expect("serializable");
        assert_eq!(json, serde_json::json!({"stream_tls": "on", "netcam_url": null}));
    }
}
