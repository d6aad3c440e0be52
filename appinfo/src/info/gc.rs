//! Kernel page reclaim, reported as two collectors
//!
//! `kswapd` is background reclaim; `direct` is reclaim the allocating
//! task had to perform itself. Counters come from `/proc/vmstat` and
//! are system-wide.

use std::collections::HashMap;

use crate::collector::CollectContext;
#[cfg(not(target_os = "linux"))]
use crate::error::SourceError;
use crate::error::SourceResult;
use crate::properties::Properties;

#[cfg(target_os = "linux")]
use super::procfs;

const VMSTAT: &str = "/proc/vmstat";
const MEMORY_PRESSURE: &str = "/proc/pressure/memory";

/// Zone suffixes older kernels append to per-zone counters
const ZONES: &[&str] = &["dma", "dma32", "normal", "high", "movable", "device"];

/// Pools of the memory source that reclaim acts on
const RECLAIMED_POOLS: &[&str] = &["heap", "stack", "code", "shared"];

/// One reclaim path and the counters describing it
struct Reclaimer {
    name: &'static str,
    runs: &'static str,
    scanned: &'static str,
    reclaimed: &'static str,
    /// Whether PSI stall time is attributable to this path
    stalls: bool,
}

const RECLAIMERS: &[Reclaimer] = &[
    Reclaimer {
        name: "kswapd",
        runs: "pageoutrun",
        scanned: "pgscan_kswapd",
        reclaimed: "pgsteal_kswapd",
        stalls: false,
    },
    Reclaimer {
        name: "direct",
        runs: "allocstall",
        scanned: "pgscan_direct",
        reclaimed: "pgsteal_direct",
        stalls: true,
    },
];

/// Gather `gc.<index>.*` entries
#[cfg(target_os = "linux")]
pub fn collect(_ctx: &CollectContext, props: &mut Properties) -> SourceResult<()> {
    let counters = procfs::parse_counters(&procfs::read(VMSTAT)?);
    // PSI is absent on kernels built without it; only collectionTime suffers.
    let stall_micros = procfs::read(MEMORY_PRESSURE)
        .ok()
        .and_then(|content| procfs::parse_psi_total(&content, "some"));
    put_reclaimers(props, &counters, stall_micros);
    Ok(())
}

#[cfg(not(target_os = "linux"))]
pub fn collect(_ctx: &CollectContext, _props: &mut Properties) -> SourceResult<()> {
    Err(SourceError::Unsupported(format!("{} is Linux only", VMSTAT)))
}

fn put_reclaimers(
    props: &mut Properties,
    counters: &HashMap<String, u64>,
    stall_micros: Option<u64>,
) {
    for (index, reclaimer) in RECLAIMERS.iter().enumerate() {
        let prefix = format!("gc.{}", index);
        props.put(format!("{prefix}.name"), reclaimer.name);
        props.put(
            format!("{prefix}.objectName"),
            format!("vmstat:type=Reclaimer,name={}", reclaimer.name),
        );
        props.put(
            format!("{prefix}.collectionCount"),
            sum_counter(counters, reclaimer.runs),
        );
        props.put(
            format!("{prefix}.collectionTime"),
            stall_micros
                .filter(|_| reclaimer.stalls)
                .map(|micros| micros / 1000),
        );
        props.put(
            format!("{prefix}.pagesScanned"),
            sum_counter(counters, reclaimer.scanned),
        );
        props.put(
            format!("{prefix}.pagesReclaimed"),
            sum_counter(counters, reclaimer.reclaimed),
        );
        props.put(format!("{prefix}.memoryPoolNames"), RECLAIMED_POOLS);
    }
}

/// Sum `base` and its per-zone variants; `None` when none are present
fn sum_counter(counters: &HashMap<String, u64>, base: &str) -> Option<u64> {
    counters
        .iter()
        .filter(|(name, _)| {
            name.as_str() == base
                || name
                    .strip_prefix(base)
                    .and_then(|rest| rest.strip_prefix('_'))
                    .is_some_and(|zone| ZONES.contains(&zone))
        })
        .map(|(_, value)| *value)
        .reduce(u64::saturating_add)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::info::procfs::parse_counters;

    const MODERN: &str = "pgscan_kswapd 120\n\
pgscan_direct 30\n\
pgscan_direct_throttle 99\n\
pgsteal_kswapd 100\n\
pgsteal_direct 25\n\
pageoutrun 7\n\
allocstall_dma 0\n\
allocstall_dma32 1\n\
allocstall_normal 2\n\
allocstall_movable 3\n";

    const LEGACY: &str = "pgscan_kswapd_dma 1\n\
pgscan_kswapd_normal 9\n\
pgsteal_kswapd_normal 8\n\
allocstall 4\n";

    #[test]
    fn test_sum_counter_zones() {
        let counters = parse_counters(MODERN);
        assert_eq!(sum_counter(&counters, "allocstall"), Some(6));
        assert_eq!(sum_counter(&counters, "pgscan_direct"), Some(30));
        assert_eq!(sum_counter(&counters, "compact_stall"), None);

        let legacy = parse_counters(LEGACY);
        assert_eq!(sum_counter(&legacy, "pgscan_kswapd"), Some(10));
        assert_eq!(sum_counter(&legacy, "allocstall"), Some(4));
    }

    #[test]
    fn test_reclaimer_entries() {
        let mut props = Properties::new();
        put_reclaimers(&mut props, &parse_counters(MODERN), Some(2_500_000));

        let get = |key: &str| props.get(key).unwrap().normalize();
        assert_eq!(get("gc.0.name"), "kswapd");
        assert_eq!(get("gc.0.collectionCount"), "7");
        assert_eq!(get("gc.0.collectionTime"), "null");
        assert_eq!(get("gc.0.pagesReclaimed"), "100");
        assert_eq!(get("gc.1.name"), "direct");
        assert_eq!(get("gc.1.collectionCount"), "6");
        assert_eq!(get("gc.1.collectionTime"), "2500");
        assert_eq!(get("gc.1.memoryPoolNames"), "[heap, stack, code, shared]");
        assert!(props.duplicates().is_empty());
    }

    #[test]
    fn test_missing_counters_are_null() {
        let mut props = Properties::new();
        put_reclaimers(&mut props, &HashMap::new(), None);
        assert!(props.get("gc.0.collectionCount").unwrap().is_null());
        assert!(props.get("gc.1.collectionTime").unwrap().is_null());
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_live_vmstat() {
        if std::fs::metadata(VMSTAT).is_err() {
            return;
        }
        let ctx = CollectContext {
            created: std::time::Instant::now(),
        };
        let mut props = Properties::new();
        collect(&ctx, &mut props).unwrap();
        assert!(props.contains_key("gc.0.collectionCount"));
    }
}
