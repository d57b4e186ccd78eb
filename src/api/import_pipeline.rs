use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::core::{Bounds, Process, ProcessId};
use crate::error::TimelineResult;
use crate::import::{Importer, TraceData, create_importers};

use super::{ModelState, TimelineModel};

impl TimelineModel {
    /// Imports every payload of `data` and finalizes the model.
    ///
    /// One importer is selected per payload; importers run in import-priority
    /// order so later ones can rely on processes created by earlier ones.
    pub fn import_traces(
        &mut self,
        data: impl Into<TraceData>,
        shift_world_to_zero: bool,
    ) -> TimelineResult<()> {
        self.ensure_not_frozen("add events")?;
        let mut importers = create_importers(data.into().into_payloads())?;
        self.state = ModelState::Importing;

        debug!(importer_count = importers.len(), "importing traces");
        for importer in &mut importers {
            trace!(importer = ?importer.kind(), "running importer");
            importer.import_events(self)?;
            self.imported_by.push(importer.kind());
        }
        self.finalize_with_importers(shift_world_to_zero, &mut importers)
    }

    /// Finalizes a model populated directly through [`TimelineModel::get_or_create_process`].
    pub fn finalize_import(&mut self, shift_world_to_zero: bool) -> TimelineResult<()> {
        self.finalize_with_importers(shift_world_to_zero, &mut [])
    }

    fn finalize_with_importers(
        &mut self,
        shift_world_to_zero: bool,
        importers: &mut [Importer],
    ) -> TimelineResult<()> {
        self.ensure_not_frozen("finalize import")?;

        self.update_bounds();
        if let Some(max) = self.bounds.max() {
            let thread_time_bounds = &self.thread_time_bounds;
            for process in self.processes.values_mut() {
                process.auto_close_open_slices(max, thread_time_bounds);
            }
        }

        for importer in importers.iter_mut() {
            importer.finalize_import(self)?;
        }
        let containment_epsilon = self.config.containment_epsilon;
        for process in self.processes.values_mut() {
            process.finalize_import(containment_epsilon);
        }

        if shift_world_to_zero {
            self.shift_world_to_zero()?;
        }
        self.update_bounds();
        self.state = ModelState::Frozen;
        debug!(
            process_count = self.processes.len(),
            import_error_count = self.import_errors.len(),
            bounds_min = ?self.bounds.min(),
            bounds_max = ?self.bounds.max(),
            "timeline model frozen"
        );
        Ok(())
    }

    /// Moves every event so the earliest one starts at time zero.
    ///
    /// Durations are unchanged. Does nothing when the model has no events.
    pub fn shift_world_to_zero(&mut self) -> TimelineResult<()> {
        self.ensure_not_frozen("shift events")?;
        self.update_bounds();
        let Some(shift_amount) = self.bounds.min() else {
            return Ok(());
        };

        for event in self.all_event_refs() {
            if let Some(thread) = self.thread_mut(event.thread) {
                thread.shift_start(event.slice, shift_amount);
            }
        }
        debug!(shift_amount, "shifted world to zero");
        Ok(())
    }

    /// Recomputes global and per-thread bounds from the current events.
    pub fn update_bounds(&mut self) {
        let mut bounds = Bounds::new();
        for event in self.all_events() {
            bounds.add_value(event.start);
            bounds.add_value(event.end());
        }

        let mut thread_time_bounds = IndexMap::new();
        for thread in self.all_threads() {
            let mut thread_bounds = Bounds::new();
            for slice in thread.root_slices().iter().filter_map(|id| thread.slice(*id)) {
                if let Some(thread_start) = slice.thread_start {
                    thread_bounds.add_value(thread_start);
                }
                if let Some(thread_end) = slice.thread_end() {
                    thread_bounds.add_value(thread_end);
                }
            }
            thread_time_bounds.insert(thread.thread_ref(), thread_bounds);
        }

        self.bounds = bounds;
        self.thread_time_bounds = thread_time_bounds;
    }

    /// Returns the process for `pid`, creating it when missing.
    pub fn get_or_create_process(&mut self, pid: ProcessId) -> TimelineResult<&mut Process> {
        self.ensure_not_frozen("create processes")?;
        if self.state == ModelState::Empty {
            self.state = ModelState::Importing;
        }
        Ok(self
            .processes
            .entry(pid)
            .or_insert_with(|| Process::new(pid)))
    }
}
