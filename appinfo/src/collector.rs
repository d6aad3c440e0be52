//! Snapshot collection
//!
//! Runs the selected info sources in registry order, isolates each source's
//! failure, merges the raw entries and normalizes them into a [`Snapshot`].

use std::collections::BTreeMap;
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

use appinfo_common::describe_panic;
use tracing::{debug, warn};

use crate::component::{InfoSource, SourceSelection};
use crate::error::{CollectError, SourceResult};
use crate::info;
use crate::properties::Properties;
use crate::snapshot::Snapshot;

/// Context handed to every gathering routine
#[derive(Debug, Clone, Copy)]
pub struct CollectContext {
    /// When the owning collector was created; the origin of `system.nanoTime`
    pub created: Instant,
}

/// Signature of a gathering routine
pub type Gather = fn(&CollectContext, &mut Properties) -> SourceResult<()>;

/// Collects diagnostics snapshots for a fixed selection of sources
///
/// Holds no state besides its configuration: every call re-queries the
/// live process and platform.
#[derive(Debug, Clone)]
pub struct Collector {
    selection: SourceSelection,
    context: CollectContext,
    gather: fn(InfoSource) -> Gather,
}

impl Collector {
    pub fn new(selection: impl Into<SourceSelection>) -> Self {
        Self {
            selection: selection.into(),
            context: CollectContext {
                created: Instant::now(),
            },
            gather: info::routine,
        }
    }

    /// A collector over every source
    pub fn all() -> Self {
        Self::new(SourceSelection::all())
    }

    /// Replace the routine lookup, e.g. to exercise isolation with faulty sources
    pub fn with_routines(mut self, gather: fn(InfoSource) -> Gather) -> Self {
        self.gather = gather;
        self
    }

    pub fn selection(&self) -> &SourceSelection {
        &self.selection
    }

    /// Query every selected source and build a fresh snapshot
    ///
    /// A failing or panicking source contributes whatever it wrote before
    /// failing and is otherwise skipped. The only error is a key written
    /// twice, compared after line breaks are escaped.
    pub fn collect(&self) -> Result<Snapshot, CollectError> {
        let mut merged: BTreeMap<String, String> = BTreeMap::new();

        for source in InfoSource::ALL.iter().copied() {
            if !self.selection.contains(source) {
                continue;
            }

            let props = self.run(source);
            let (entries, duplicates) = props.into_parts();
            if let Some(key) = duplicates.into_iter().next() {
                return Err(CollectError::DuplicateKey {
                    key,
                    info_source: source,
                });
            }

            debug!(%source, entries = entries.len(), "info source collected");
            for (key, value) in entries {
                // Checked after escaping: distinct raw keys may render alike.
                let key = single_line(key);
                if merged.contains_key(&key) {
                    return Err(CollectError::DuplicateKey {
                        key,
                        info_source: source,
                    });
                }
                merged.insert(key, single_line(value.normalize()));
            }
        }

        Ok(Snapshot::from_entries(merged))
    }

    /// Run one source behind its isolation boundary
    ///
    /// Both an error and a panic end only this source; whatever it wrote
    /// up to that point is returned.
    fn run(&self, source: InfoSource) -> Properties {
        let mut props = Properties::new();
        let gather = (self.gather)(source);
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| gather(&self.context, &mut props)));
        match outcome {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                warn!(%source, error = %e, kept = props.len(), "info source failed");
            }
            Err(payload) => {
                warn!(
                    %source,
                    error = %describe_panic(&*payload),
                    kept = props.len(),
                    "info source panicked"
                );
            }
        }
        props
    }

    /// Snapshot of every selected source
    pub fn properties(&self) -> Result<Snapshot, CollectError> {
        self.collect()
    }

    /// Snapshot narrowed to keys containing any of `keys`
    pub fn properties_matching<S: AsRef<str>>(&self, keys: &[S]) -> Result<Snapshot, CollectError> {
        Ok(self.collect()?.filter(keys))
    }

    /// Collect and render
    pub fn pretty_print(&self) -> Result<String, CollectError> {
        Ok(self.collect()?.render())
    }

    /// Collect, filter and render
    pub fn pretty_print_matching<S: AsRef<str>>(&self, keys: &[S]) -> Result<String, CollectError> {
        Ok(self.properties_matching(keys)?.render())
    }
}

impl Default for Collector {
    fn default() -> Self {
        Self::all()
    }
}

/// Escape line breaks so every entry renders as exactly one line
fn single_line(text: String) -> String {
    if text.contains(['\n', '\r']) {
        text.replace('\r', "\\r").replace('\n', "\\n")
    } else {
        text
    }
}
