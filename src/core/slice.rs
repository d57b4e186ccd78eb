use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{SliceId, SliceRef, ThreadRef};

/// A named time interval on a thread, possibly nested inside a parent slice.
///
/// Times are milliseconds. `end` is always derived from `start + duration`, so
/// shifting `start` keeps the interval length intact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slice {
    pub id: SliceId,
    pub thread: ThreadRef,
    pub category: String,
    pub name: String,
    pub start: f64,
    pub duration: f64,
    pub thread_start: Option<f64>,
    pub thread_duration: Option<f64>,
    /// Set while the slice has no explicit end, and kept after an auto-close.
    pub did_not_finish: bool,
    pub args: Map<String, Value>,
    pub(crate) parent_slice: Option<SliceId>,
    pub(crate) sub_slices: Vec<SliceId>,
}

impl Slice {
    pub(crate) fn new(
        id: SliceId,
        thread: ThreadRef,
        category: impl Into<String>,
        name: impl Into<String>,
        start: f64,
        duration: f64,
    ) -> Self {
        Self {
            id,
            thread,
            category: category.into(),
            name: name.into(),
            start,
            duration,
            thread_start: None,
            thread_duration: None,
            did_not_finish: false,
            args: Map::new(),
            parent_slice: None,
            sub_slices: Vec::new(),
        }
    }

    #[must_use]
    pub fn slice_ref(&self) -> SliceRef {
        SliceRef::new(self.thread, self.id)
    }

    #[must_use]
    pub fn end(&self) -> f64 {
        self.start + self.duration
    }

    #[must_use]
    pub fn thread_end(&self) -> Option<f64> {
        match (self.thread_start, self.thread_duration) {
            (Some(start), Some(duration)) => Some(start + duration),
            _ => None,
        }
    }

    #[must_use]
    pub fn parent_slice(&self) -> Option<SliceId> {
        self.parent_slice
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        self.parent_slice.is_none()
    }

    #[must_use]
    pub fn sub_slices(&self) -> &[SliceId] {
        &self.sub_slices
    }
}
