//! Info source registry
//!
//! The closed set of diagnostic categories the collector knows about.
//! Adding a source is a code change: a new variant, a gathering routine in
//! [`crate::info`], and its key namespace below.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// One named category of diagnostic facts
///
/// Variant order is the collection order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum InfoSource {
    SystemProperties,
    EnvironmentVariables,
    Runtime,
    ClassLoading,
    Compilation,
    GarbageCollector,
    Memory,
    OperatingSystem,
    Thread,
}

impl InfoSource {
    /// Every source, in collection order
    pub const ALL: &'static [InfoSource] = &[
        InfoSource::SystemProperties,
        InfoSource::EnvironmentVariables,
        InfoSource::Runtime,
        InfoSource::ClassLoading,
        InfoSource::Compilation,
        InfoSource::GarbageCollector,
        InfoSource::Memory,
        InfoSource::OperatingSystem,
        InfoSource::Thread,
    ];

    /// Stable kebab-case name used on the command line and in config files
    pub fn as_str(&self) -> &'static str {
        match self {
            InfoSource::SystemProperties => "system-properties",
            InfoSource::EnvironmentVariables => "environment-variables",
            InfoSource::Runtime => "runtime",
            InfoSource::ClassLoading => "class-loading",
            InfoSource::Compilation => "compilation",
            InfoSource::GarbageCollector => "garbage-collector",
            InfoSource::Memory => "memory",
            InfoSource::OperatingSystem => "operating-system",
            InfoSource::Thread => "thread",
        }
    }

    /// Leading key segments this source writes under (each followed by `.`)
    pub fn namespaces(&self) -> &'static [&'static str] {
        match self {
            InfoSource::SystemProperties => &["system"],
            InfoSource::EnvironmentVariables => &["env"],
            InfoSource::Runtime => &["runtime"],
            InfoSource::ClassLoading => &["classLoading"],
            InfoSource::Compilation => &["compilation"],
            InfoSource::GarbageCollector => &["gc"],
            InfoSource::Memory => &["memory", "memoryManager", "memoryPool"],
            InfoSource::OperatingSystem => &["os"],
            InfoSource::Thread => &["thread"],
        }
    }

    /// Whether `key` lives in one of this source's namespaces
    pub fn owns_key(&self, key: &str) -> bool {
        let head = key.split('.').next().unwrap_or_default();
        self.namespaces().contains(&head)
    }
}

impl fmt::Display for InfoSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a source name is not recognised
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown info source '{0}' (expected one of: all, {names})", names = known_names())]
pub struct UnknownSource(pub String);

fn known_names() -> String {
    InfoSource::ALL
        .iter()
        .map(InfoSource::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

impl FromStr for InfoSource {
    type Err = UnknownSource;

    /// Accepts `class-loading`, `class_loading` and `CLASS_LOADING` alike.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        InfoSource::ALL
            .iter()
            .copied()
            .find(|source| source.as_str() == wanted)
            .ok_or_else(|| UnknownSource(s.to_string()))
    }
}

/// The set of sources a collector queries
///
/// Defaults to every source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSelection(BTreeSet<InfoSource>);

impl SourceSelection {
    /// Every known source
    pub fn all() -> Self {
        Self(InfoSource::ALL.iter().copied().collect())
    }

    /// No sources at all; collecting yields an empty snapshot
    pub fn none() -> Self {
        Self(BTreeSet::new())
    }

    pub fn contains(&self, source: InfoSource) -> bool {
        self.0.contains(&source)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Selected sources in collection order
    pub fn iter(&self) -> impl Iterator<Item = InfoSource> + '_ {
        self.0.iter().copied()
    }

    /// Parse names such as `["memory", "thread"]`; `all` expands to every source.
    pub fn parse<I, S>(names: I) -> Result<Self, UnknownSource>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut selected = BTreeSet::new();
        for name in names {
            let name = name.as_ref().trim();
            if name.is_empty() {
                continue;
            }
            if name.eq_ignore_ascii_case("all") {
                selected.extend(InfoSource::ALL.iter().copied());
            } else {
                selected.insert(name.parse()?);
            }
        }
        Ok(Self(selected))
    }
}

impl Default for SourceSelection {
    fn default() -> Self {
        Self::all()
    }
}

impl FromIterator<InfoSource> for SourceSelection {
    fn from_iter<T: IntoIterator<Item = InfoSource>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl From<InfoSource> for SourceSelection {
    fn from(source: InfoSource) -> Self {
        std::iter::once(source).collect()
    }
}

impl From<&[InfoSource]> for SourceSelection {
    fn from(sources: &[InfoSource]) -> Self {
        sources.iter().copied().collect()
    }
}
