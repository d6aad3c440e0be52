//! Environment variables of the process

use tracing::debug;

use crate::collector::CollectContext;
use crate::error::SourceResult;
use crate::properties::Properties;

/// Gather one `env.<NAME>` entry per variable
pub fn collect(_ctx: &CollectContext, props: &mut Properties) -> SourceResult<()> {
    for (name, value) in std::env::vars_os() {
        let key = format!("env.{}", name.to_string_lossy());
        // Two non-UTF-8 names can collapse into the same lossy key.
        if props.contains_key(&key) {
            debug!(%key, "skipping variable with ambiguous name");
            continue;
        }
        props.put(key, value);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn test_every_variable_is_namespaced() {
        let ctx = CollectContext {
            created: Instant::now(),
        };
        let mut props = Properties::new();
        collect(&ctx, &mut props).unwrap();

        assert_eq!(props.len(), std::env::vars_os().count());
        if let Ok(path) = std::env::var("PATH") {
            assert_eq!(props.get("env.PATH").unwrap().normalize(), path);
        }
    }
}
