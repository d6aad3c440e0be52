//! Info source gathering routines
//!
//! One module per [`InfoSource`]; each writes its entries under its own
//! key namespace. Linux-only sources report `Unsupported` elsewhere.

/// Soft limit of a resource, `None` when unlimited or unreadable
#[cfg(target_os = "linux")]
macro_rules! soft_limit {
    ($resource:expr) => {{
        let mut limit = libc::rlimit {
            rlim_cur: 0,
            rlim_max: 0,
        };
        // SAFETY: getrlimit only writes into `limit`.
        let rc = unsafe { libc::getrlimit($resource, &mut limit) };
        (rc == 0 && limit.rlim_cur != libc::RLIM_INFINITY).then_some(limit.rlim_cur as u64)
    }};
}

pub mod class_loading;
pub mod compilation;
pub mod environment;
pub mod gc;
pub mod memory;
pub mod os;
pub mod procfs;
pub mod runtime;
pub mod system;
pub mod thread;

use crate::collector::Gather;
use crate::component::InfoSource;

/// The gathering routine of `source`
pub fn routine(source: InfoSource) -> Gather {
    match source {
        InfoSource::SystemProperties => system::collect,
        InfoSource::EnvironmentVariables => environment::collect,
        InfoSource::Runtime => runtime::collect,
        InfoSource::ClassLoading => class_loading::collect,
        InfoSource::Compilation => compilation::collect,
        InfoSource::GarbageCollector => gc::collect,
        InfoSource::Memory => memory::collect,
        InfoSource::OperatingSystem => os::collect,
        InfoSource::Thread => thread::collect,
    }
}
