//! Per-source working map
//!
//! Each info source writes its raw entries here. The map never overwrites:
//! a key written twice is remembered so the collector can reject it.

use std::collections::BTreeMap;

use crate::value::Value;

/// Raw `key -> value` entries written by one source during one collection
#[derive(Debug, Default)]
pub struct Properties {
    entries: BTreeMap<String, Value>,
    duplicates: Vec<String>,
}

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an entry; the first value written under a key wins and the
    /// key is reported as a duplicate.
    pub fn put(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        if self.entries.contains_key(&key) {
            self.duplicates.push(key);
            return;
        }
        self.entries.insert(key, value.into());
    }

    /// Record an entry whose value may be unavailable
    ///
    /// An error collapses to `null` for that key only, the way a guarded
    /// getter would.
    pub fn put_or_null<T, E>(&mut self, key: impl Into<String>, value: Result<T, E>)
    where
        T: Into<Value>,
        E: std::fmt::Display,
    {
        let key = key.into();
        match value {
            Ok(value) => self.put(key, value),
            Err(e) => {
                tracing::trace!(%key, error = %e, "value unavailable");
                self.put(key, Value::Null);
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
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

    /// Keys written more than once, in the order the repeats happened
    pub fn duplicates(&self) -> &[String] {
        &self.duplicates
    }

    pub(crate) fn into_parts(self) -> (BTreeMap<String, Value>, Vec<String>) {
        (self.entries, self.duplicates)
    }
}
