//! Facts about how this binary was compiled
//!
//! Rust compiles ahead of time, so there is no compilation activity to
//! monitor at run time; the entries describe the build instead.

use crate::collector::CollectContext;
use crate::error::SourceResult;
use crate::properties::Properties;

/// Gather `compilation.*` entries
pub fn collect(_ctx: &CollectContext, props: &mut Properties) -> SourceResult<()> {
    props.put("compilation.name", env!("APPINFO_RUSTC_VERSION"));
    props.put("compilation.target", env!("APPINFO_TARGET"));
    props.put("compilation.profile", env!("APPINFO_PROFILE"));
    props.put("compilation.optimizationLevel", env!("APPINFO_OPT_LEVEL"));
    props.put("compilation.debugAssertions", cfg!(debug_assertions));
    props.put("compilation.totalCompilationTime", 0_u64);
    props.put("compilation.compilationTimeMonitoringSupported", false);
    Ok(())
}
