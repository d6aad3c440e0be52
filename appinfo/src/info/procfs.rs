//! Parsers for the handful of procfs files the Linux sources read
//!
//! Parsing is kept free of I/O so it can be tested against captured text.

use std::collections::HashMap;

use crate::error::{SourceError, SourceResult};

/// Read a procfs file into a string
pub fn read(path: &str) -> SourceResult<String> {
    std::fs::read_to_string(path).map_err(|e| SourceError::io(path, e))
}

/// Fields of a `/proc/<pid>/status`-style file
///
/// Sizes reported in `kB` are converted to bytes; unit-less counters are
/// kept as-is; non-numeric fields are skipped.
#[derive(Debug, Default, Clone)]
pub struct StatusFields {
    fields: HashMap<String, u64>,
}

impl StatusFields {
    pub fn parse(content: &str) -> Self {
        let mut fields = HashMap::new();
        for line in content.lines() {
            let Some((name, rest)) = line.split_once(':') else {
                continue;
            };
            let mut parts = rest.split_whitespace();
            let Some(Ok(number)) = parts.next().map(str::parse::<u64>) else {
                continue;
            };
            let value = match parts.next() {
                Some(unit) if unit.eq_ignore_ascii_case("kB") => number.saturating_mul(1024),
                Some(_) => continue,
                None => number,
            };
            fields.insert(name.trim().to_string(), value);
        }
        Self { fields }
    }

    pub fn get(&self, name: &str) -> Option<u64> {
        self.fields.get(name).copied()
    }

    /// Like [`get`](Self::get) but an error names the field and file
    pub fn require(&self, name: &str, location: &str) -> SourceResult<u64> {
        self.get(name)
            .ok_or_else(|| SourceError::missing(name, location))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Parse whitespace separated `name value` lines (`/proc/vmstat`)
pub fn parse_counters(content: &str) -> HashMap<String, u64> {
    content
        .lines()
        .filter_map(|line| {
            let mut parts = line.split_whitespace();
            let name = parts.next()?;
            let value = parts.next()?.parse().ok()?;
            Some((name.to_string(), value))
        })
        .collect()
}

/// The fields of `/proc/<pid>/task/<tid>/stat` the thread source uses
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskStat {
    pub comm: String,
    pub state: char,
    /// User mode time in clock ticks
    pub utime: u64,
    /// Kernel mode time in clock ticks
    pub stime: u64,
}

impl TaskStat {
    /// `comm` may itself contain spaces and parentheses, so everything
    /// between the first `(` and the last `)` is the name.
    pub fn parse(content: &str) -> SourceResult<Self> {
        let open = content
            .find('(')
            .ok_or_else(|| SourceError::parse("task stat", "missing '('"))?;
        let close = content
            .rfind(')')
            .ok_or_else(|| SourceError::parse("task stat", "missing ')'"))?;
        if close < open {
            return Err(SourceError::parse("task stat", "unbalanced comm"));
        }
        let comm = content[open + 1..close].to_string();

        // Fields after comm start at field 3 (state).
        let rest: Vec<&str> = content[close + 1..].split_whitespace().collect();
        if rest.len() < 13 {
            return Err(SourceError::parse(
                "task stat",
                format!("expected at least 15 fields, got {}", rest.len() + 2),
            ));
        }
        let state = rest[0]
            .chars()
            .next()
            .ok_or_else(|| SourceError::missing("state", "task stat"))?;
        let utime = parse_u64(rest[11], "utime")?;
        let stime = parse_u64(rest[12], "stime")?;

        Ok(Self {
            comm,
            state,
            utime,
            stime,
        })
    }
}

fn parse_u64(field: &str, name: &str) -> SourceResult<u64> {
    field
        .parse()
        .map_err(|e| SourceError::parse(format!("task stat {}", name), format!("{}", e)))
}

/// Cumulative stall time in microseconds of one PSI line (`some` or `full`)
pub fn parse_psi_total(content: &str, kind: &str) -> Option<u64> {
    content
        .lines()
        .find(|line| line.split_whitespace().next() == Some(kind))?
        .split_whitespace()
        .find_map(|field| field.strip_prefix("total="))?
        .parse()
        .ok()
}
