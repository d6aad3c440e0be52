//! Threads of this process, from `/proc/self/task`
//!
//! Threads come and go while the task directory is walked; per-thread
//! entries of a thread that exited in between are `null`.

use crate::collector::CollectContext;
#[cfg(not(target_os = "linux"))]
use crate::error::SourceError;
use crate::error::SourceResult;
use crate::properties::Properties;
use crate::types::{ThreadInfo, ThreadState};

use super::procfs::{StatusFields, TaskStat};
#[cfg(target_os = "linux")]
use super::procfs;

const TASK_DIR: &str = "/proc/self/task";

/// What could be read about one thread
#[derive(Debug, Default)]
struct TaskSample {
    stat: Option<TaskStat>,
    status: Option<StatusFields>,
}

/// Gather `thread.*` entries
#[cfg(target_os = "linux")]
pub fn collect(_ctx: &CollectContext, props: &mut Properties) -> SourceResult<()> {
    let ids = linux::thread_ids()?;
    props.put("thread.threadIds", ids.clone());
    props.put("thread.threadCount", ids.len());
    props.put("thread.daemonThreadCount", daemon_count(&ids, std::process::id()));
    props.put("thread.currentThreadId", linux::current_thread_id());
    props.put("thread.isThreadCpuTimeSupported", true);
    props.put("thread.isCurrentThreadCpuTimeSupported", true);

    let tick_nanos = linux::clock_tick_nanos();
    for id in ids {
        put_thread(props, id, &linux::sample(id), tick_nanos);
    }
    Ok(())
}

#[cfg(not(target_os = "linux"))]
pub fn collect(_ctx: &CollectContext, _props: &mut Properties) -> SourceResult<()> {
    Err(SourceError::Unsupported(format!("{} is Linux only", TASK_DIR)))
}

/// Threads other than the main one; none of them keeps the process alive
fn daemon_count(ids: &[u64], pid: u32) -> usize {
    ids.iter().filter(|&&id| id != u64::from(pid)).count()
}

fn put_thread(props: &mut Properties, id: u64, sample: &TaskSample, tick_nanos: Option<u64>) {
    let prefix = format!("thread.{}", id);
    let stat = sample.stat.as_ref();
    let ticks_to_nanos = |ticks: u64| tick_nanos.map(|nanos| ticks.saturating_mul(nanos));

    props.put(format!("{prefix}.name"), stat.map(|s| s.comm.clone()));
    props.put(
        format!("{prefix}.state"),
        stat.map(|s| ThreadState::from_code(s.state).to_string()),
    );
    props.put(
        format!("{prefix}.cpuTime"),
        stat.and_then(|s| ticks_to_nanos(s.utime.saturating_add(s.stime))),
    );
    props.put(
        format!("{prefix}.userTime"),
        stat.and_then(|s| ticks_to_nanos(s.utime)),
    );
    props.put(
        format!("{prefix}.info"),
        stat.map(|s| ThreadInfo {
            name: s.comm.clone(),
            id,
            state: ThreadState::from_code(s.state),
        }),
    );

    let status = sample.status.as_ref();
    props.put(
        format!("{prefix}.voluntaryContextSwitches"),
        status.and_then(|s| s.get("voluntary_ctxt_switches")),
    );
    props.put(
        format!("{prefix}.nonvoluntaryContextSwitches"),
        status.and_then(|s| s.get("nonvoluntary_ctxt_switches")),
    );
}

#[cfg(target_os = "linux")]
mod linux {
    use tracing::debug;

    use super::{procfs, StatusFields, TaskSample, TaskStat, TASK_DIR};
    use crate::error::{SourceError, SourceResult};

    /// Ids of the live threads, ascending
    pub fn thread_ids() -> SourceResult<Vec<u64>> {
        let entries = std::fs::read_dir(TASK_DIR).map_err(|e| SourceError::io(TASK_DIR, e))?;
        let mut ids: Vec<u64> = entries
            .filter_map(|entry| entry.ok()?.file_name().to_str()?.parse().ok())
            .collect();
        ids.sort_unstable();
        Ok(ids)
    }

    /// `/proc/thread-self` links to `<pid>/task/<tid>`
    pub fn current_thread_id() -> Option<u64> {
        let link = std::fs::read_link("/proc/thread-self").ok()?;
        link.file_name()?.to_str()?.parse().ok()
    }

    pub fn clock_tick_nanos() -> Option<u64> {
        // SAFETY: sysconf has no preconditions.
        let ticks = unsafe { libc::sysconf(libc::_SC_CLK_TCK) };
        u64::try_from(ticks)
            .ok()
            .filter(|&ticks| ticks > 0)
            .map(|ticks| 1_000_000_000 / ticks)
    }

    pub fn sample(id: u64) -> TaskSample {
        let stat = procfs::read(&format!("{}/{}/stat", TASK_DIR, id))
            .and_then(|content| TaskStat::parse(&content));
        let stat = match stat {
            Ok(stat) => Some(stat),
            Err(e) => {
                debug!(thread = id, error = %e, "thread stat unreadable");
                None
            }
        };
        let status = procfs::read(&format!("{}/{}/status", TASK_DIR, id))
            .ok()
            .map(|content| StatusFields::parse(&content));
        TaskSample { stat, status }
    }
}
