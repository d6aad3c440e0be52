//! Configuration file loading (`appinfo.toml`)

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::component::SourceSelection;

pub const CONFIG_FILE: &str = "appinfo.toml";

/// Find a config file by walking up the directory tree, then checking global config.
///
/// Search order:
/// 1. Current directory and parent directories (walking up to root)
/// 2. Global config at `<config_dir>/appinfo/`
fn find_config_file(filename: &str) -> Option<PathBuf> {
    let mut current = std::env::current_dir().ok()?;

    loop {
        let candidate = current.join(filename);
        if candidate.is_file() {
            return Some(candidate);
        }
        match current.parent() {
            Some(parent) => current = parent.to_path_buf(),
            None => break,
        }
    }

    let global_path = dirs::config_dir()?.join("appinfo").join(filename);
    global_path.is_file().then_some(global_path)
}

/// Top-level configuration (from appinfo.toml)
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub collector: CollectorSection,
}

/// `[server]` section
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

/// `[collector]` section
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CollectorSection {
    /// Source names; absent means every source
    pub sources: Option<Vec<String>>,
}

pub fn default_host() -> String {
    "0.0.0.0".to_string()
}

pub fn default_port() -> u16 {
    8080
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl FileConfig {
    /// Load config from an explicit path, or search for appinfo.toml
    ///
    /// Falls back to defaults when no file is found. An explicit path
    /// that does not exist is an error.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_from_path(path);
        }
        if let Some(config_path) = find_config_file(CONFIG_FILE) {
            tracing::debug!("Loading config from: {}", config_path.display());
            return Self::load_from_path(&config_path);
        }

        tracing::debug!("No {} found, using defaults", CONFIG_FILE);
        Ok(Self::default())
    }

    /// Load from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let config: FileConfig = toml::from_str(&content)
            .with_context(|| format!("invalid config in {}", path.display()))?;
        Ok(config)
    }

    /// The configured source selection, `None` when the file leaves it open
    pub fn selection(&self) -> Result<Option<SourceSelection>> {
        self.collector
            .sources
            .as_ref()
            .map(|names| SourceSelection::parse(names).context("invalid [collector] sources"))
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::InfoSource;
    use std::io::Write;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults() {
        let config = FileConfig::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert!(config.selection().unwrap().is_none());
    }

    #[test]
    fn test_full_file() {
        let file = write_config(
            r#"
[server]
host = "127.0.0.1"
port = 9090

[collector]
sources = ["memory", "THREAD", "garbage-collector"]
"#,
        );
        let config = FileConfig::load_from_path(file.path()).unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9090);

        let selection = config.selection().unwrap().unwrap();
        assert_eq!(selection.len(), 3);
        assert!(selection.contains(InfoSource::Memory));
        assert!(selection.contains(InfoSource::Thread));
        assert!(selection.contains(InfoSource::GarbageCollector));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let file = write_config("[server]\nport = 1234\n");
        let config = FileConfig::load_from_path(file.path()).unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 1234);
        assert_eq!(config.collector, CollectorSection::default());
    }

    #[test]
    fn test_unknown_source_is_rejected() {
        let file = write_config("[collector]\nsources = [\"heap-dump\"]\n");
        let config = FileConfig::load_from_path(file.path()).unwrap();
        assert!(config.selection().is_err());
    }

    #[test]
    fn test_invalid_toml_is_error() {
        let file = write_config("[server\nport = ");
        assert!(FileConfig::load_from_path(file.path()).is_err());
    }

    #[test]
    fn test_unknown_field_is_error() {
        let file = write_config("[server]\nprot = 80\n");
        assert!(FileConfig::load_from_path(file.path()).is_err());
    }

    #[test]
    fn test_missing_explicit_path_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(FileConfig::load(Some(&dir.path().join("absent.toml"))).is_err());
    }
}
