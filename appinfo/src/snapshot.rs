//! Immutable, key-sorted snapshot of string values

use std::collections::btree_map;
use std::collections::BTreeMap;
use std::fmt;

/// One fully collected, sorted, string-valued mapping
///
/// Produced fresh by every collection and never mutated afterwards;
/// filtering builds a new snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    entries: BTreeMap<String, String>,
}

impl Snapshot {
    pub(crate) fn from_entries(entries: BTreeMap<String, String>) -> Self {
        Self { entries }
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

    /// Entries in lexicographic key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Keep the entries whose key contains any of `keys`, ignoring case
    ///
    /// An empty `keys` keeps everything.
    pub fn filter<S: AsRef<str>>(&self, keys: &[S]) -> Snapshot {
        if keys.is_empty() {
            return self.clone();
        }
        let needles: Vec<String> = keys.iter().map(|k| k.as_ref().to_lowercase()).collect();
        let entries = self
            .entries
            .iter()
            .filter(|(key, _)| {
                let key = key.to_lowercase();
                needles.iter().any(|needle| key.contains(needle.as_str()))
            })
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        Snapshot { entries }
    }

    /// `key: value` lines in key order, joined by `\n`, no trailing newline
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, value)) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{}: {}", key, value)?;
        }
        Ok(())
    }
}

impl IntoIterator for Snapshot {
    type Item = (String, String);
    type IntoIter = btree_map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a Snapshot {
    type Item = (&'a String, &'a String);
    type IntoIter = btree_map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Snapshot {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Snapshot {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Snapshot {
        [
            ("classLoading.loadedClassCount", "12"),
            ("classLoading.totalLoadedClassCount", "14"),
            ("compilation.totalCompilationTime", "0"),
            ("os.name", "Linux"),
            ("thread.threadCount", "3"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_empty_filter_is_identity() {
        let snapshot = sample();
        assert_eq!(snapshot.filter::<&str>(&[]), snapshot);
    }

    #[test]
    fn test_empty_needle_matches_everything() {
        let snapshot = sample();
        assert_eq!(snapshot.filter(&[""]), snapshot);
    }

    #[test]
    fn test_filter_is_case_insensitive_substring() {
        let filtered = sample().filter(&["CLASSLOADING"]);
        let keys: Vec<_> = filtered.keys().collect();
        assert_eq!(
            keys,
            vec![
                "classLoading.loadedClassCount",
                "classLoading.totalLoadedClassCount"
            ]
        );
    }

    #[test]
    fn test_filter_matches_any_needle() {
        let filtered = sample().filter(&["totalLoadedClassCount", "totalCompilationTime"]);
        let keys: Vec<_> = filtered.keys().collect();
        assert_eq!(
            keys,
            vec![
                "classLoading.totalLoadedClassCount",
                "compilation.totalCompilationTime"
            ]
        );
    }

    #[test]
    fn test_filter_no_match() {
        assert!(sample().filter(&["nothing-like-this"]).is_empty());
    }

    #[test]
    fn test_render_lines() {
        let rendered = sample().render();
        let lines: Vec<_> = rendered.lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], "classLoading.loadedClassCount: 12");
        assert_eq!(lines[4], "thread.threadCount: 3");
        assert!(!rendered.ends_with('\n'));
    }

    #[test]
    fn test_render_empty() {
        assert_eq!(Snapshot::default().render(), "");
    }

    #[test]
    fn test_render_keeps_empty_values() {
        let snapshot: Snapshot = [("env.EMPTY", "")].into_iter().collect();
        assert_eq!(snapshot.render(), "env.EMPTY: ");
    }

    #[test]
    fn test_sorted_by_key() {
        let snapshot: Snapshot = [("b", "2"), ("a", "1"), ("B", "3")].into_iter().collect();
        let keys: Vec<_> = snapshot.keys().collect();
        assert_eq!(keys, vec!["B", "a", "b"]);
    }
}
