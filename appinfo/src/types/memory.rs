//! Memory usage record

use std::fmt;

use crate::value::Value;

/// Usage of one memory area, in bytes
///
/// Parts the platform cannot report are `None` and display as `undefined`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemoryUsage {
    /// Amount requested from the OS at startup
    pub init: Option<u64>,
    /// Amount currently in use
    pub used: Option<u64>,
    /// Amount guaranteed to be available (mapped)
    pub committed: Option<u64>,
    /// Upper bound the area may grow to
    pub max: Option<u64>,
}

impl MemoryUsage {
    pub fn new(used: Option<u64>, committed: Option<u64>, max: Option<u64>) -> Self {
        Self {
            init: None,
            used,
            committed,
            max,
        }
    }
}

struct Amount(Option<u64>);

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(bytes) => write!(f, "{}({}K)", bytes, bytes / 1024),
            None => f.write_str("undefined"),
        }
    }
}

impl fmt::Display for MemoryUsage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "init = {} used = {} committed = {} max = {}",
            Amount(self.init),
            Amount(self.used),
            Amount(self.committed),
            Amount(self.max)
        )
    }
}

impl From<MemoryUsage> for Value {
    fn from(record: MemoryUsage) -> Self {
        Value::record(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let usage = MemoryUsage::new(Some(2048), Some(4096), None);
        assert_eq!(
            usage.to_string(),
            "init = undefined used = 2048(2K) committed = 4096(4K) max = undefined"
        );
    }

    #[test]
    fn test_default_is_all_undefined() {
        assert_eq!(
            MemoryUsage::default().to_string(),
            "init = undefined used = undefined committed = undefined max = undefined"
        );
    }
}
