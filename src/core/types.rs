use std::fmt;

use serde::{Deserialize, Serialize};

pub type ProcessId = i64;
pub type ThreadId = i64;

/// Identifies a thread by its owning process and thread id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ThreadRef {
    pub pid: ProcessId,
    pub tid: ThreadId,
}

impl ThreadRef {
    #[must_use]
    pub fn new(pid: ProcessId, tid: ThreadId) -> Self {
        Self { pid, tid }
    }
}

impl fmt::Display for ThreadRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.pid, self.tid)
    }
}

/// Index of a slice inside its thread's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SliceId(pub usize);

/// Model-wide handle to a slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SliceRef {
    pub thread: ThreadRef,
    pub slice: SliceId,
}

impl SliceRef {
    #[must_use]
    pub fn new(thread: ThreadRef, slice: SliceId) -> Self {
        Self { thread, slice }
    }
}

/// Anything that owns events and/or child containers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContainerRef {
    Process(ProcessId),
    Thread(ThreadRef),
    Slice(SliceRef),
}
