use ordered_float::OrderedFloat;
use serde_json::{Map, Value};
use tracing::trace;

use super::{Bounds, Slice, SliceId, ThreadRef};

/// Slice storage and begin/end bookkeeping for one thread.
///
/// Slices live in an arena owned by the thread. Parent links are arena indices
/// and never participate in ownership.
#[derive(Debug, Clone, PartialEq)]
pub struct Thread {
    thread_ref: ThreadRef,
    name: Option<String>,
    slices: Vec<Slice>,
    root_slices: Vec<SliceId>,
    open_slices: Vec<SliceId>,
}

impl Thread {
    #[must_use]
    pub fn new(thread_ref: ThreadRef) -> Self {
        Self {
            thread_ref,
            name: None,
            slices: Vec::new(),
            root_slices: Vec::new(),
            open_slices: Vec::new(),
        }
    }

    #[must_use]
    pub fn thread_ref(&self) -> ThreadRef {
        self.thread_ref
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
    }

    #[must_use]
    pub fn slice(&self, id: SliceId) -> Option<&Slice> {
        self.slices.get(id.0)
    }

    pub(crate) fn slice_mut(&mut self, id: SliceId) -> Option<&mut Slice> {
        self.slices.get_mut(id.0)
    }

    /// Every slice of the thread in creation order, nested or not.
    #[must_use]
    pub fn all_slices(&self) -> &[Slice] {
        &self.slices
    }

    /// Top-level slices. Before `finalize_import` every slice is top-level.
    #[must_use]
    pub fn root_slices(&self) -> &[SliceId] {
        &self.root_slices
    }

    #[must_use]
    pub fn open_slice_count(&self) -> usize {
        self.open_slices.len()
    }

    /// Opens a slice that stays open until the matching `end_slice`.
    pub fn begin_slice(
        &mut self,
        category: impl Into<String>,
        name: impl Into<String>,
        start: f64,
        thread_start: Option<f64>,
        args: Map<String, Value>,
    ) -> SliceId {
        let id = self.push_slice(category, name, start, 0.0, args);
        if let Some(slice) = self.slices.get_mut(id.0) {
            slice.thread_start = thread_start;
            slice.did_not_finish = true;
        }
        self.open_slices.push(id);
        id
    }

    /// Closes the innermost open slice. Returns `None` when nothing is open.
    pub fn end_slice(&mut self, end: f64, thread_end: Option<f64>) -> Option<SliceId> {
        let id = self.open_slices.pop()?;
        let slice = self.slices.get_mut(id.0)?;
        slice.duration = end - slice.start;
        if let (Some(thread_start), Some(thread_end)) = (slice.thread_start, thread_end) {
            slice.thread_duration = Some(thread_end - thread_start);
        }
        slice.did_not_finish = false;
        Some(id)
    }

    /// Adds a slice whose duration is already known.
    ///
    /// Thread-clock start and duration are recorded independently, so a start
    /// without a duration still counts toward the thread time bounds.
    #[allow(clippy::too_many_arguments)]
    pub fn push_complete_slice(
        &mut self,
        category: impl Into<String>,
        name: impl Into<String>,
        start: f64,
        duration: f64,
        thread_start: Option<f64>,
        thread_duration: Option<f64>,
        args: Map<String, Value>,
    ) -> SliceId {
        let id = self.push_slice(category, name, start, duration, args);
        if let Some(slice) = self.slices.get_mut(id.0) {
            slice.thread_start = thread_start;
            slice.thread_duration = thread_duration;
        }
        id
    }

    fn push_slice(
        &mut self,
        category: impl Into<String>,
        name: impl Into<String>,
        start: f64,
        duration: f64,
        args: Map<String, Value>,
    ) -> SliceId {
        let id = SliceId(self.slices.len());
        let mut slice = Slice::new(id, self.thread_ref, category, name, start, duration);
        slice.args = args;
        self.slices.push(slice);
        self.root_slices.push(id);
        id
    }

    /// Terminates every unfinished slice at `max_timestamp`.
    ///
    /// Thread-relative durations are closed at the maximum of `thread_time_bounds`
    /// when both are known. Running it again with the same inputs changes nothing.
    pub fn auto_close_open_slices(
        &mut self,
        max_timestamp: f64,
        thread_time_bounds: Option<&Bounds>,
    ) {
        let thread_max = thread_time_bounds.and_then(Bounds::max);
        let mut closed = 0usize;
        for slice in self.slices.iter_mut().filter(|slice| slice.did_not_finish) {
            slice.duration = max_timestamp - slice.start;
            if let (Some(thread_start), Some(thread_max)) = (slice.thread_start, thread_max) {
                slice.thread_duration = Some(thread_max - thread_start);
            }
            closed += 1;
        }
        self.open_slices.clear();
        if closed > 0 {
            trace!(thread = %self.thread_ref, closed, max_timestamp, "auto-closed open slices");
        }
    }

    /// Rebuilds the nesting hierarchy from time containment.
    ///
    /// Slices are visited by start ascending, longer first on ties, then by
    /// creation order. Each becomes a child of the innermost enclosing slice.
    pub fn finalize_import(&mut self, containment_epsilon: f64) {
        for slice in &mut self.slices {
            slice.parent_slice = None;
            slice.sub_slices.clear();
        }

        let mut order: Vec<SliceId> = (0..self.slices.len()).map(SliceId).collect();
        order.sort_by(|a, b| {
            let left = &self.slices[a.0];
            let right = &self.slices[b.0];
            OrderedFloat(left.start)
                .cmp(&OrderedFloat(right.start))
                .then_with(|| OrderedFloat(right.duration).cmp(&OrderedFloat(left.duration)))
                .then_with(|| a.cmp(b))
        });

        let mut roots = Vec::new();
        let mut ancestors: Vec<SliceId> = Vec::new();
        for id in order {
            let end = self.slices[id.0].end();
            while let Some(&top) = ancestors.last() {
                if self.slices[top.0].end() + containment_epsilon >= end {
                    break;
                }
                ancestors.pop();
            }

            match ancestors.last().copied() {
                Some(parent) => {
                    self.slices[id.0].parent_slice = Some(parent);
                    self.slices[parent.0].sub_slices.push(id);
                }
                None => roots.push(id),
            }
            ancestors.push(id);
        }
        self.root_slices = roots;
    }

    /// Duration not covered by direct sub-slices.
    #[must_use]
    pub fn self_time(&self, id: SliceId) -> Option<f64> {
        let slice = self.slice(id)?;
        let children: f64 = slice
            .sub_slices
            .iter()
            .filter_map(|child| self.slice(*child))
            .map(|child| child.duration)
            .sum();
        Some(slice.duration - children)
    }

    pub(crate) fn shift_start(&mut self, id: SliceId, amount: f64) {
        if let Some(slice) = self.slices.get_mut(id.0) {
            slice.start -= amount;
        }
    }
}
