//! Process memory: heap/non-heap totals, managers and pools
//!
//! Everything is derived from `/proc/self/status`. Anonymous resident
//! memory is treated as heap; the rest of the resident set (file-backed
//! code and shared mappings) is non-heap.

use crate::collector::CollectContext;
#[cfg(not(target_os = "linux"))]
use crate::error::SourceError;
use crate::error::SourceResult;
use crate::properties::Properties;
use crate::types::MemoryUsage;
use crate::value::Value;

use super::procfs::StatusFields;
#[cfg(target_os = "linux")]
use super::procfs;

const STATUS: &str = "/proc/self/status";

const GLOBAL_ALLOCATOR: &str = "global allocator";
const KERNEL: &str = "kernel";

/// Soft resource limits bounding the pools
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Limits {
    pub data: Option<u64>,
    pub stack: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PoolType {
    Heap,
    NonHeap,
}

impl PoolType {
    fn as_str(&self) -> &'static str {
        match self {
            PoolType::Heap => "HEAP",
            PoolType::NonHeap => "NON_HEAP",
        }
    }
}

struct Pool {
    name: &'static str,
    kind: PoolType,
    usage: MemoryUsage,
    managers: &'static [&'static str],
}

/// Gather `memory.*`, `memoryManager.*` and `memoryPool.*` entries
#[cfg(target_os = "linux")]
pub fn collect(_ctx: &CollectContext, props: &mut Properties) -> SourceResult<()> {
    let status = StatusFields::parse(&procfs::read(STATUS)?);
    let limits = Limits {
        data: soft_limit!(libc::RLIMIT_DATA),
        stack: soft_limit!(libc::RLIMIT_STACK),
    };
    put_memory(props, &status, limits)
}

#[cfg(not(target_os = "linux"))]
pub fn collect(_ctx: &CollectContext, _props: &mut Properties) -> SourceResult<()> {
    Err(SourceError::Unsupported(format!("{} is Linux only", STATUS)))
}

fn put_memory(props: &mut Properties, status: &StatusFields, limits: Limits) -> SourceResult<()> {
    let rss = status.require("VmRSS", STATUS)?;
    let anon = status.get("RssAnon");
    let size = status.get("VmSize");
    let data = status.get("VmData");

    let heap = MemoryUsage::new(anon, data, limits.data);
    let non_heap = MemoryUsage::new(
        Some(rss.saturating_sub(anon.unwrap_or(0))),
        size.zip(data).map(|(size, data)| size.saturating_sub(data)),
        None,
    );
    put_usage(props, "memory.heapMemoryUsage", heap);
    put_usage(props, "memory.nonHeapMemoryUsage", non_heap);
    props.put("memory.residentPeak", status.get("VmHWM"));
    props.put("memory.virtualPeak", status.get("VmPeak"));
    props.put("memory.objectPendingFinalizationCount", 0_u64);

    let pools = pools(status, limits);
    put_managers(props, &pools);
    put_pools(props, &pools);
    Ok(())
}

fn put_usage(props: &mut Properties, prefix: &str, usage: MemoryUsage) {
    props.put(format!("{prefix}.init"), usage.init);
    props.put(format!("{prefix}.used"), usage.used);
    props.put(format!("{prefix}.committed"), usage.committed);
    props.put(format!("{prefix}.max"), usage.max);
}

fn pools(status: &StatusFields, limits: Limits) -> Vec<Pool> {
    let sum = |first: &str, second: &str| match (status.get(first), status.get(second)) {
        (None, None) => None,
        (x, y) => Some(x.unwrap_or(0) + y.unwrap_or(0)),
    };
    vec![
        Pool {
            name: "heap",
            kind: PoolType::Heap,
            usage: MemoryUsage::new(status.get("RssAnon"), status.get("VmData"), limits.data),
            managers: &[GLOBAL_ALLOCATOR, KERNEL],
        },
        Pool {
            name: "stack",
            kind: PoolType::NonHeap,
            usage: MemoryUsage::new(status.get("VmStk"), status.get("VmStk"), limits.stack),
            managers: &[KERNEL],
        },
        Pool {
            name: "code",
            kind: PoolType::NonHeap,
            usage: MemoryUsage::new(status.get("RssFile"), sum("VmExe", "VmLib"), None),
            managers: &[KERNEL],
        },
        Pool {
            name: "shared",
            kind: PoolType::NonHeap,
            usage: MemoryUsage::new(status.get("RssShmem"), None, None),
            managers: &[KERNEL],
        },
        Pool {
            name: "pageTables",
            kind: PoolType::NonHeap,
            usage: MemoryUsage::new(status.get("VmPTE"), status.get("VmPTE"), None),
            managers: &[KERNEL],
        },
        Pool {
            name: "swap",
            kind: PoolType::NonHeap,
            usage: MemoryUsage::new(status.get("VmSwap"), None, None),
            managers: &[KERNEL],
        },
    ]
}

fn put_managers(props: &mut Properties, pools: &[Pool]) {
    for (index, manager) in [GLOBAL_ALLOCATOR, KERNEL].into_iter().enumerate() {
        let managed: Vec<&str> = pools
            .iter()
            .filter(|pool| pool.managers.contains(&manager))
            .map(|pool| pool.name)
            .collect();
        let prefix = format!("memoryManager.{}", index);
        props.put(format!("{prefix}.name"), manager);
        props.put(format!("{prefix}.valid"), true);
        props.put(format!("{prefix}.memoryPoolNames"), managed);
    }
}

fn put_pools(props: &mut Properties, pools: &[Pool]) {
    for (index, pool) in pools.iter().enumerate() {
        let prefix = format!("memoryPool.{}", index);
        props.put(format!("{prefix}.name"), pool.name);
        props.put(format!("{prefix}.type"), pool.kind.as_str());
        props.put(format!("{prefix}.usage"), pool.usage);
        props.put(format!("{prefix}.peakUsage"), Value::Null);
        props.put(format!("{prefix}.collectionUsage"), Value::Null);
        props.put(format!("{prefix}.memoryManagerNames"), pool.managers);
        props.put(format!("{prefix}.usageThresholdSupported"), false);
        props.put(format!("{prefix}.collectionUsageThresholdSupported"), false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STATUS_TEXT: &str = "Name:\tappinfo\n\
VmPeak:\t   20000 kB\n\
VmSize:\t   16000 kB\n\
VmHWM:\t    3000 kB\n\
VmRSS:\t    2500 kB\n\
RssAnon:\t    1000 kB\n\
RssFile:\t    1400 kB\n\
RssShmem:\t     100 kB\n\
VmData:\t    6000 kB\n\
VmStk:\t     132 kB\n\
VmExe:\t     900 kB\n\
VmLib:\t    2100 kB\n\
VmPTE:\t      60 kB\n\
VmSwap:\t       0 kB\n";

    fn gather(limits: Limits) -> Properties {
        let mut props = Properties::new();
        put_memory(&mut props, &StatusFields::parse(STATUS_TEXT), limits).unwrap();
        props
    }

    fn get(props: &Properties, key: &str) -> String {
        props.get(key).unwrap().normalize()
    }

    #[test]
    fn test_heap_and_non_heap() {
        let props = gather(Limits {
            data: Some(8 * 1024 * 1024),
            stack: None,
        });
        assert_eq!(get(&props, "memory.heapMemoryUsage.used"), "1024000");
        assert_eq!(get(&props, "memory.heapMemoryUsage.committed"), "6144000");
        assert_eq!(get(&props, "memory.heapMemoryUsage.max"), "8388608");
        assert_eq!(get(&props, "memory.heapMemoryUsage.init"), "null");
        assert_eq!(get(&props, "memory.nonHeapMemoryUsage.used"), "1536000");
        assert_eq!(get(&props, "memory.nonHeapMemoryUsage.committed"), "10240000");
        assert_eq!(get(&props, "memory.residentPeak"), "3072000");
    }

    #[test]
    fn test_unlimited_max_is_null() {
        let props = gather(Limits::default());
        assert_eq!(get(&props, "memory.heapMemoryUsage.max"), "null");
    }

    #[test]
    fn test_pools_and_managers() {
        let props = gather(Limits::default());
        assert_eq!(get(&props, "memoryPool.0.name"), "heap");
        assert_eq!(get(&props, "memoryPool.0.type"), "HEAP");
        assert_eq!(
            get(&props, "memoryPool.0.usage"),
            "init = undefined used = 1024000(1000K) committed = 6144000(6000K) max = undefined"
        );
        assert_eq!(
            get(&props, "memoryPool.0.memoryManagerNames"),
            "[global allocator, kernel]"
        );
        assert_eq!(get(&props, "memoryPool.2.name"), "code");
        assert_eq!(
            get(&props, "memoryPool.2.usage"),
            "init = undefined used = 1433600(1400K) committed = 3072000(3000K) max = undefined"
        );
        assert_eq!(get(&props, "memoryPool.5.name"), "swap");
        assert!(!props.contains_key("memoryPool.6.name"));

        assert_eq!(get(&props, "memoryManager.0.name"), "global allocator");
        assert_eq!(get(&props, "memoryManager.0.memoryPoolNames"), "[heap]");
        assert_eq!(
            get(&props, "memoryManager.1.memoryPoolNames"),
            "[heap, stack, code, shared, pageTables, swap]"
        );
        assert!(props.duplicates().is_empty());
    }

    #[test]
    fn test_missing_rss_fails() {
        let mut props = Properties::new();
        let status = StatusFields::parse("Name:\tkthread\n");
        assert!(put_memory(&mut props, &status, Limits::default()).is_err());
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_live_status() {
        let ctx = CollectContext {
            created: std::time::Instant::now(),
        };
        let mut props = Properties::new();
        collect(&ctx, &mut props).unwrap();
        assert!(props.contains_key("memory.heapMemoryUsage.used"));
    }
}
