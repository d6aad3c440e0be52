//! System properties: process identity, user, paths and clocks

use chrono::{Local, SecondsFormat, Utc};
use sysinfo::System;

use crate::collector::CollectContext;
use crate::error::SourceResult;
use crate::properties::Properties;

/// Gather `system.*` entries
pub fn collect(ctx: &CollectContext, props: &mut Properties) -> SourceResult<()> {
    props.put("system.pid", std::process::id());
    props.put_or_null("system.executable", std::env::current_exe());
    props.put_or_null("system.currentDir", std::env::current_dir());
    props.put("system.arguments", std::env::args_os().collect::<Vec<_>>());
    props.put("system.userName", user_name());
    props.put("system.userHome", dirs::home_dir());
    props.put("system.tempDir", std::env::temp_dir());
    props.put("system.hostName", System::host_name());

    props.put("system.fileSeparator", std::path::MAIN_SEPARATOR);
    props.put("system.pathSeparator", PATH_SEPARATOR);
    props.put("system.lineSeparator", LINE_SEPARATOR);
    props.put("system.family", std::env::consts::FAMILY);

    let now = Utc::now();
    props.put("system.currentTimeMillis", now.timestamp_millis());
    props.put(
        "system.nanoTime",
        u64::try_from(ctx.created.elapsed().as_nanos()).unwrap_or(u64::MAX),
    );
    props.put("system.date", Local::now().to_rfc2822());
    props.put(
        "system.instant",
        now.to_rfc3339_opts(SecondsFormat::Millis, true),
    );

    Ok(())
}

#[cfg(windows)]
const PATH_SEPARATOR: char = ';';
#[cfg(not(windows))]
const PATH_SEPARATOR: char = ':';

#[cfg(windows)]
const LINE_SEPARATOR: &str = "\r\n";
#[cfg(not(windows))]
const LINE_SEPARATOR: &str = "\n";

fn user_name() -> Option<String> {
    ["USER", "USERNAME", "LOGNAME"]
        .iter()
        .find_map(|var| std::env::var(var).ok())
        .filter(|name| !name.is_empty())
}
