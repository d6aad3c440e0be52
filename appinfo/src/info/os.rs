//! Operating system identity, load and memory totals

use std::num::NonZeroUsize;

use sysinfo::System;

use crate::collector::CollectContext;
use crate::error::SourceResult;
use crate::properties::Properties;

/// Gather `os.*` entries
pub fn collect(_ctx: &CollectContext, props: &mut Properties) -> SourceResult<()> {
    props.put("os.arch", std::env::consts::ARCH);
    props.put("os.family", std::env::consts::FAMILY);
    props.put_or_null(
        "os.availableProcessors",
        std::thread::available_parallelism().map(NonZeroUsize::get),
    );
    props.put("os.name", System::name());
    props.put("os.version", System::kernel_version());
    props.put("os.longVersion", System::long_os_version());
    props.put("os.distributionId", System::distribution_id());
    props.put("os.hostName", System::host_name());

    props.put("os.systemLoadAverage", load_average());
    props.put("os.uptime", System::uptime());
    props.put("os.bootTime", System::boot_time());

    let mut sys = System::new();
    sys.refresh_memory();
    props.put("os.totalPhysicalMemorySize", sys.total_memory());
    props.put("os.freePhysicalMemorySize", sys.free_memory());
    props.put("os.totalSwapSpaceSize", sys.total_swap());
    props.put("os.freeSwapSpaceSize", sys.free_swap());

    Ok(())
}

/// One-minute load average, or `None` where the platform has none
fn load_average() -> Option<f64> {
    if cfg!(windows) {
        return None;
    }
    let load = System::load_average();
    (load.one >= 0.0).then_some(load.one)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    fn gather() -> Properties {
        let ctx = CollectContext {
            created: Instant::now(),
        };
        let mut props = Properties::new();
        collect(&ctx, &mut props).unwrap();
        props
    }

    #[test]
    fn test_os_entries() {
        let props = gather();
        assert_eq!(
            props.get("os.arch").unwrap().normalize(),
            std::env::consts::ARCH
        );
        assert!(props.contains_key("os.name"));
        assert!(props.contains_key("os.totalPhysicalMemorySize"));
        assert!(props.duplicates().is_empty());
    }

    #[test]
    fn test_os_name_is_stable() {
        let first = gather().get("os.name").unwrap().normalize();
        let second = gather().get("os.name").unwrap().normalize();
        assert_eq!(first, second);
    }
}
