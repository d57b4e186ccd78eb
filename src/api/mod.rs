mod config;
mod import_pipeline;
mod marker_matcher;
mod queries;
mod traversal;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::{Bounds, Process, ProcessId, Slice, SliceRef, Thread, ThreadRef};
use crate::error::{TimelineError, TimelineResult};
use crate::import::{FlowEvent, ImportError, ImporterKind, MetadataEntry, TraceData};

pub use config::TimelineModelConfig;
pub use marker_matcher::MarkerNames;

/// Lifecycle of a model. Transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModelState {
    Empty,
    Importing,
    Frozen,
}

/// Unified process/thread/slice model built from one or more traces.
///
/// A model accumulates data while importing, is finalized exactly once and is
/// read-only afterwards. Every mutating entry point fails with
/// [`TimelineError::AlreadyFrozen`] once finalized.
#[derive(Debug, Clone)]
pub struct TimelineModel {
    config: TimelineModelConfig,
    state: ModelState,
    bounds: Bounds,
    thread_time_bounds: IndexMap<ThreadRef, Bounds>,
    processes: IndexMap<ProcessId, Process>,
    browser_process: Option<ProcessId>,
    tab_ids_to_renderer_threads: IndexMap<String, ThreadRef>,
    import_errors: Vec<ImportError>,
    metadata: Vec<MetadataEntry>,
    flow_events: Vec<FlowEvent>,
    imported_by: Vec<ImporterKind>,
}

impl Default for TimelineModel {
    fn default() -> Self {
        Self::with_validated_config(TimelineModelConfig::default())
    }
}

impl TimelineModel {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: TimelineModelConfig) -> TimelineResult<Self> {
        Ok(Self::with_validated_config(config.validate()?))
    }

    /// Builds and freezes a model from `data`, shifting according to `config`.
    pub fn from_traces(
        data: impl Into<TraceData>,
        config: TimelineModelConfig,
    ) -> TimelineResult<Self> {
        let mut model = Self::with_config(config)?;
        model.import_traces(data, config.shift_world_to_zero)?;
        Ok(model)
    }

    fn with_validated_config(config: TimelineModelConfig) -> Self {
        Self {
            config,
            state: ModelState::Empty,
            bounds: Bounds::new(),
            thread_time_bounds: IndexMap::new(),
            processes: IndexMap::new(),
            browser_process: None,
            tab_ids_to_renderer_threads: IndexMap::new(),
            import_errors: Vec::new(),
            metadata: Vec::new(),
            flow_events: Vec::new(),
            imported_by: Vec::new(),
        }
    }

    #[must_use]
    pub fn config(&self) -> TimelineModelConfig {
        self.config
    }

    #[must_use]
    pub fn state(&self) -> ModelState {
        self.state
    }

    #[must_use]
    pub fn is_frozen(&self) -> bool {
        self.state == ModelState::Frozen
    }

    #[must_use]
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    #[must_use]
    pub fn thread_time_bounds(&self) -> &IndexMap<ThreadRef, Bounds> {
        &self.thread_time_bounds
    }

    #[must_use]
    pub fn processes(&self) -> &IndexMap<ProcessId, Process> {
        &self.processes
    }

    #[must_use]
    pub fn process(&self, pid: ProcessId) -> Option<&Process> {
        self.processes.get(&pid)
    }

    #[must_use]
    pub fn thread(&self, thread: ThreadRef) -> Option<&Thread> {
        self.process(thread.pid)?.thread(thread.tid)
    }

    #[must_use]
    pub fn slice(&self, slice: SliceRef) -> Option<&Slice> {
        self.thread(slice.thread)?.slice(slice.slice)
    }

    #[must_use]
    pub fn self_time(&self, slice: SliceRef) -> Option<f64> {
        self.thread(slice.thread)?.self_time(slice.slice)
    }

    pub(crate) fn thread_mut(&mut self, thread: ThreadRef) -> Option<&mut Thread> {
        self.processes.get_mut(&thread.pid)?.thread_mut(thread.tid)
    }

    #[must_use]
    pub fn browser_process(&self) -> Option<&Process> {
        self.process(self.browser_process?)
    }

    /// Designates the browser process. Plain assignment, legal in any state.
    pub fn set_browser_process(&mut self, pid: Option<ProcessId>) {
        self.browser_process = pid;
    }

    #[must_use]
    pub fn import_errors(&self) -> &[ImportError] {
        &self.import_errors
    }

    #[must_use]
    pub fn metadata(&self) -> &[MetadataEntry] {
        &self.metadata
    }

    #[must_use]
    pub fn flow_events(&self) -> &[FlowEvent] {
        &self.flow_events
    }

    /// Importer kinds in the order their `import_events` ran.
    #[must_use]
    pub fn imported_by(&self) -> &[ImporterKind] {
        &self.imported_by
    }

    pub(crate) fn ensure_not_frozen(&self, operation: &'static str) -> TimelineResult<()> {
        if self.is_frozen() {
            return Err(TimelineError::AlreadyFrozen { operation });
        }
        Ok(())
    }

    pub(crate) fn record_import_error(
        &mut self,
        importer: ImporterKind,
        message: impl Into<String>,
    ) {
        let message = message.into();
        warn!(importer = ?importer, %message, "trace import error");
        self.import_errors.push(ImportError { importer, message });
    }

    pub(crate) fn push_metadata(&mut self, entry: MetadataEntry) {
        self.metadata.push(entry);
    }

    pub(crate) fn push_flow_event(&mut self, flow: FlowEvent) {
        self.flow_events.push(flow);
    }
}
