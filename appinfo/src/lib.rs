//! appinfo Library
//!
//! Runtime diagnostics for the current process: identity, runtime,
//! memory, reclaim, threads, loaded objects and platform facts, collected
//! on demand into a flat, key-sorted `key: value` snapshot.
//!
//! # Usage as Library
//!
//! ```rust,ignore
//! use appinfo::{Collector, InfoSource};
//!
//! let collector = Collector::new(&[InfoSource::Memory, InfoSource::Thread][..]);
//! println!("{}", collector.pretty_print_matching(&["heap"])?);
//! ```
//!
//! # Usage as Binary
//!
//! Print once: `appinfo [FILTER]...`
//!
//! Serve over HTTP: `appinfo --server --port 8080`, then
//! `curl 'localhost:8080/?keys=gc.0,os.name'`

pub mod cli;
pub mod collector;
pub mod component;
pub mod config;
pub mod error;
pub mod info;
pub mod properties;
pub mod server;
pub mod snapshot;
pub mod types;
pub mod value;

// Re-export the collection API
pub use collector::{CollectContext, Collector, Gather};
pub use component::{InfoSource, SourceSelection, UnknownSource};
pub use error::{CollectError, SourceError, SourceResult};
pub use properties::Properties;
pub use snapshot::Snapshot;
pub use value::Value;

// Re-export record types
pub use types::{MemoryUsage, ThreadInfo, ThreadState};
