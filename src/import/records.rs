use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::{ProcessId, SliceRef, ThreadId};

use super::ImporterKind;

/// A per-event failure recorded during import instead of aborting it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportError {
    pub importer: ImporterKind,
    pub message: String,
}

/// A metadata record carried by a trace alongside its events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataEntry {
    pub name: String,
    pub pid: Option<ProcessId>,
    pub tid: Option<ThreadId>,
    pub value: Value,
}

/// A causal arrow between two slices, possibly on different threads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowEvent {
    pub id: String,
    pub category: String,
    pub name: String,
    pub from: SliceRef,
    pub to: SliceRef,
}
