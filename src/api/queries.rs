use crate::core::{Process, Slice, Thread, ThreadRef};
use crate::error::{TimelineError, TimelineResult};

use super::TimelineModel;

impl TimelineModel {
    /// Events named exactly `name`, in traversal order.
    #[must_use]
    pub fn events_of_name(&self, name: &str, only_root_events: bool) -> Vec<&Slice> {
        self.all_events()
            .into_iter()
            .filter(|event| event.name == name)
            .filter(|event| !only_root_events || event.is_root())
            .collect()
    }

    /// The first event named `name` in traversal order.
    ///
    /// Fails when nothing matches, and when several match while
    /// `fail_if_more_than_one` is set.
    pub fn event_of_name(
        &self,
        name: &str,
        only_root_events: bool,
        fail_if_more_than_one: bool,
    ) -> TimelineResult<&Slice> {
        let events = self.events_of_name(name, only_root_events);
        if fail_if_more_than_one && events.len() > 1 {
            return Err(TimelineError::AmbiguousEvent {
                name: name.to_owned(),
                count: events.len(),
            });
        }
        events
            .into_iter()
            .next()
            .ok_or_else(|| TimelineError::EventNotFound {
                name: name.to_owned(),
            })
    }

    pub fn add_mapping_from_tab_id_to_renderer_thread(
        &mut self,
        tab_id: impl Into<String>,
        renderer_thread: ThreadRef,
    ) -> TimelineResult<()> {
        self.ensure_not_frozen("add mapping from tab id to renderer thread")?;
        self.tab_ids_to_renderer_threads
            .insert(tab_id.into(), renderer_thread);
        Ok(())
    }

    #[must_use]
    pub fn renderer_thread_from_tab_id(&self, tab_id: &str) -> Option<&Thread> {
        let thread_ref = self.tab_ids_to_renderer_threads.get(tab_id)?;
        self.thread(*thread_ref)
    }

    #[must_use]
    pub fn renderer_process_from_tab_id(&self, tab_id: &str) -> Option<&Process> {
        let thread = self.renderer_thread_from_tab_id(tab_id)?;
        self.process(thread.thread_ref().pid)
    }
}
