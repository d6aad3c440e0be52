//! CLI argument definitions and settings resolution

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use std::path::PathBuf;

use crate::component::SourceSelection;
use crate::config::FileConfig;

#[derive(Parser, Debug)]
#[command(name = "appinfo")]
#[command(version)]
#[command(about = "Print a diagnostics snapshot of this process, or serve it over HTTP")]
pub struct Cli {
    /// Only print keys containing one of these substrings (case-insensitive)
    pub filter: Vec<String>,

    /// Serve snapshots over HTTP instead of printing one
    #[arg(long)]
    pub server: bool,

    /// Port to listen on (default: from appinfo.toml or 8080)
    #[arg(long, env = "APPINFO_PORT")]
    pub port: Option<u16>,

    /// Address to bind (default: from appinfo.toml or 0.0.0.0)
    #[arg(long, env = "APPINFO_HOST")]
    pub host: Option<String>,

    /// Comma-separated info sources to collect, e.g. "memory,thread" (default: all)
    #[arg(long, env = "APPINFO_SOURCES", value_delimiter = ',')]
    pub sources: Option<Vec<String>>,

    /// Config file (default: appinfo.toml searched upward from the current directory)
    #[arg(long, env = "APPINFO_CONFIG")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v info, -vv debug, -vvv trace). Default is warn.
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

/// Effective settings after merging CLI/env, the config file and defaults
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    pub selection: SourceSelection,
}

impl Cli {
    /// Merge with `file`; flags and environment win over the file
    pub fn resolve(&self, file: &FileConfig) -> Result<Settings> {
        let selection = match &self.sources {
            Some(names) => SourceSelection::parse(names).context("invalid --sources")?,
            None => file.selection()?.unwrap_or_default(),
        };
        Ok(Settings {
            host: self.host.clone().unwrap_or_else(|| file.server.host.clone()),
            port: self.port.unwrap_or(file.server.port),
            selection,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::InfoSource;
    use crate::config::{CollectorSection, ServerSection};

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("appinfo").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_filters_and_flags() {
        let cli = parse(&["gc.0", "os.name", "--server", "--port", "9000", "-vv"]);
        assert_eq!(cli.filter, vec!["gc.0", "os.name"]);
        assert!(cli.server);
        assert_eq!(cli.port, Some(9000));
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_sources_are_comma_split() {
        let cli = parse(&["--sources", "memory,thread"]);
        let settings = cli.resolve(&FileConfig::default()).unwrap();
        assert_eq!(
            settings.selection,
            SourceSelection::from(&[InfoSource::Memory, InfoSource::Thread][..])
        );
    }

    #[test]
    fn test_file_fills_gaps() {
        let file = FileConfig {
            server: ServerSection {
                host: "127.0.0.1".to_string(),
                port: 7000,
            },
            collector: CollectorSection {
                sources: Some(vec!["operating-system".to_string()]),
            },
        };
        let settings = parse(&["--port", "7100"]).resolve(&file).unwrap();
        assert_eq!(settings.host, "127.0.0.1");
        assert_eq!(settings.port, 7100);
        assert_eq!(settings.selection, SourceSelection::from(InfoSource::OperatingSystem));
    }

    #[test]
    fn test_defaults_select_everything() {
        let settings = parse(&[]).resolve(&FileConfig::default()).unwrap();
        assert_eq!(settings.host, "0.0.0.0");
        assert_eq!(settings.port, 8080);
        assert_eq!(settings.selection, SourceSelection::all());
    }

    #[test]
    fn test_unknown_source_flag_is_error() {
        assert!(parse(&["--sources", "bogus"])
            .resolve(&FileConfig::default())
            .is_err());
    }
}
