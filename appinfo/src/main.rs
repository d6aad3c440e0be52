//! appinfo - diagnostics snapshot of the running process
//!
//! # Usage
//!
//! ```text
//! appinfo                      # print every entry
//! appinfo heap thread.count    # print entries whose key contains a filter
//! appinfo --server --port 9000 # serve snapshots at http://0.0.0.0:9000/?keys=...
//! ```

use anyhow::Result;
use clap::Parser;

use appinfo::cli::Cli;
use appinfo::config::FileConfig;
use appinfo::server::{self, ServerConfig};
use appinfo::Collector;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    appinfo_common::init_tracing("appinfo", cli.verbose)?;

    let file = FileConfig::load(cli.config.as_deref())?;
    let settings = cli.resolve(&file)?;
    tracing::debug!(?settings, "resolved settings");

    let collector = Collector::new(settings.selection);

    if cli.server {
        if !cli.filter.is_empty() {
            tracing::warn!("Ignoring filters in server mode; use the keys query parameter");
        }
        let config = ServerConfig {
            host: settings.host,
            port: settings.port,
        };
        return server::serve(config, collector).await;
    }

    let rendered = tokio::task::spawn_blocking(move || collector.pretty_print_matching(&cli.filter)).await??;
    // An empty snapshot still prints its (empty) line.
    println!("{}", rendered);
    Ok(())
}
