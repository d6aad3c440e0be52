//! Runtime identity and process resource usage

use std::num::NonZeroUsize;

use sysinfo::{ProcessesToUpdate, System};

use crate::collector::CollectContext;
use crate::error::{SourceError, SourceResult};
use crate::properties::Properties;

const RUSTC_VERSION: &str = env!("APPINFO_RUSTC_VERSION");

#[cfg(target_os = "macos")]
const LIBRARY_PATH_VAR: &str = "DYLD_LIBRARY_PATH";
#[cfg(windows)]
const LIBRARY_PATH_VAR: &str = "PATH";
#[cfg(not(any(target_os = "macos", windows)))]
const LIBRARY_PATH_VAR: &str = "LD_LIBRARY_PATH";

/// Gather `runtime.*` entries
///
/// Identity entries are written first so they survive if the process
/// table cannot be read.
pub fn collect(_ctx: &CollectContext, props: &mut Properties) -> SourceResult<()> {
    let pid = std::process::id();
    props.put_or_null(
        "runtime.availableProcessors",
        std::thread::available_parallelism().map(NonZeroUsize::get),
    );
    props.put("runtime.pid", pid);
    props.put(
        "runtime.name",
        format!(
            "{}@{}",
            pid,
            System::host_name().unwrap_or_else(|| "localhost".to_string())
        ),
    );
    props.put_or_null("runtime.executable", std::env::current_exe());
    props.put(
        "runtime.inputArguments",
        std::env::args_os().skip(1).collect::<Vec<_>>(),
    );
    props.put("runtime.libraryPath", std::env::var_os(LIBRARY_PATH_VAR));

    props.put("runtime.specName", "Rust");
    props.put("runtime.specVendor", "The Rust Project Developers");
    props.put("runtime.specVersion", release(RUSTC_VERSION));
    props.put("runtime.vmName", env!("CARGO_PKG_NAME"));
    props.put("runtime.vmVersion", env!("CARGO_PKG_VERSION"));

    props.put("runtime.maxMemory", max_memory());

    let current = sysinfo::get_current_pid().map_err(|e| SourceError::Unavailable(e.to_string()))?;
    let mut sys = System::new();
    sys.refresh_memory();
    props.put("runtime.totalMemory", sys.total_memory());
    props.put("runtime.freeMemory", sys.available_memory());

    sys.refresh_processes(ProcessesToUpdate::Some(&[current]), true);
    let process = sys
        .process(current)
        .ok_or_else(|| SourceError::Unavailable(format!("process {} not listed", current)))?;
    props.put("runtime.startTime", process.start_time().saturating_mul(1000));
    props.put("runtime.uptime", process.run_time().saturating_mul(1000));
    props.put("runtime.residentMemory", process.memory());
    props.put("runtime.virtualMemory", process.virtual_memory());

    Ok(())
}

/// Address-space limit of the process, `None` when unlimited
#[cfg(target_os = "linux")]
fn max_memory() -> Option<u64> {
    soft_limit!(libc::RLIMIT_AS)
}

#[cfg(not(target_os = "linux"))]
fn max_memory() -> Option<u64> {
    None
}

/// `rustc 1.80.0 (051478957 2024-07-21)` -> `1.80.0`
fn release(version: &str) -> &str {
    version.split_whitespace().nth(1).unwrap_or(version)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn test_release() {
        assert_eq!(release("rustc 1.80.0 (051478957 2024-07-21)"), "1.80.0");
        assert_eq!(release("rustc"), "rustc");
    }

    #[test]
    fn test_runtime_identity() {
        let ctx = CollectContext {
            created: Instant::now(),
        };
        let mut props = Properties::new();
        // Process metrics may be unavailable in restricted sandboxes.
        let _ = collect(&ctx, &mut props);

        assert_eq!(props.get("runtime.specName").unwrap().normalize(), "Rust");
        assert!(props.contains_key("runtime.maxMemory"));
        let name = props.get("runtime.name").unwrap().normalize();
        assert!(name.starts_with(&format!("{}@", std::process::id())));
        assert!(props.duplicates().is_empty());
    }
}
