//! Thread information record

use std::fmt;

use crate::value::Value;

/// Scheduler state of a thread, from the `/proc/<pid>/task/<tid>/stat` state letter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThreadState {
    Running,
    Sleeping,
    DiskSleep,
    Stopped,
    TracingStop,
    Zombie,
    Dead,
    Idle,
    Unknown(char),
}

impl ThreadState {
    pub fn from_code(code: char) -> Self {
        match code {
            'R' => ThreadState::Running,
            'S' => ThreadState::Sleeping,
            'D' => ThreadState::DiskSleep,
            'T' => ThreadState::Stopped,
            't' => ThreadState::TracingStop,
            'Z' => ThreadState::Zombie,
            'X' | 'x' => ThreadState::Dead,
            'I' => ThreadState::Idle,
            other => ThreadState::Unknown(other),
        }
    }
}

impl fmt::Display for ThreadState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThreadState::Running => f.write_str("RUNNING"),
            ThreadState::Sleeping => f.write_str("SLEEPING"),
            ThreadState::DiskSleep => f.write_str("DISK_SLEEP"),
            ThreadState::Stopped => f.write_str("STOPPED"),
            ThreadState::TracingStop => f.write_str("TRACING_STOP"),
            ThreadState::Zombie => f.write_str("ZOMBIE"),
            ThreadState::Dead => f.write_str("DEAD"),
            ThreadState::Idle => f.write_str("IDLE"),
            ThreadState::Unknown(code) => write!(f, "UNKNOWN({})", code),
        }
    }
}

/// Summary line of one live thread
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadInfo {
    pub name: String,
    pub id: u64,
    pub state: ThreadState,
}

impl fmt::Display for ThreadInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\" Id={} {}", self.name, self.id, self.state)
    }
}

impl From<ThreadInfo> for Value {
    fn from(record: ThreadInfo) -> Self {
        Value::record(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_codes() {
        assert_eq!(ThreadState::from_code('R'), ThreadState::Running);
        assert_eq!(ThreadState::from_code('t'), ThreadState::TracingStop);
        assert_eq!(ThreadState::from_code('?').to_string(), "UNKNOWN(?)");
    }

    #[test]
    fn test_info_display() {
        let info = ThreadInfo {
            name: "main".to_string(),
            id: 1,
            state: ThreadState::Sleeping,
        };
        assert_eq!(info.to_string(), "\"main\" Id=1 SLEEPING");
    }
}
