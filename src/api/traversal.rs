use crate::core::{ContainerRef, Process, Slice, SliceRef, Thread};

use super::TimelineModel;

impl TimelineModel {
    /// Every container of the model, depth-first from each process.
    ///
    /// The list is rebuilt on every call, so it always reflects the current tree.
    /// The walk keeps its own stack, so nesting depth is bounded by memory only.
    #[must_use]
    pub fn all_containers(&self) -> Vec<ContainerRef> {
        let mut containers = Vec::new();
        let mut pending: Vec<ContainerRef> = self
            .processes
            .keys()
            .rev()
            .map(|pid| ContainerRef::Process(*pid))
            .collect();
        while let Some(container) = pending.pop() {
            containers.push(container);
            pending.extend(self.child_containers(container).into_iter().rev());
        }
        containers
    }

    /// Direct child containers: threads of a process, root slices of a thread,
    /// sub-slices of a slice.
    #[must_use]
    pub fn child_containers(&self, container: ContainerRef) -> Vec<ContainerRef> {
        match container {
            ContainerRef::Process(pid) => self
                .process(pid)
                .map(|process| {
                    process
                        .threads()
                        .map(|thread| ContainerRef::Thread(thread.thread_ref()))
                        .collect()
                })
                .unwrap_or_default(),
            ContainerRef::Thread(_) | ContainerRef::Slice(_) => self
                .events_in_container(container)
                .into_iter()
                .map(ContainerRef::Slice)
                .collect(),
        }
    }

    /// Events owned directly by `container`. Processes own no events themselves.
    #[must_use]
    pub fn events_in_container(&self, container: ContainerRef) -> Vec<SliceRef> {
        match container {
            ContainerRef::Process(_) => Vec::new(),
            ContainerRef::Thread(thread_ref) => self
                .thread(thread_ref)
                .map(|thread| {
                    thread
                        .root_slices()
                        .iter()
                        .map(|id| SliceRef::new(thread_ref, *id))
                        .collect()
                })
                .unwrap_or_default(),
            ContainerRef::Slice(slice_ref) => self
                .slice(slice_ref)
                .map(|slice| {
                    slice
                        .sub_slices()
                        .iter()
                        .map(|id| SliceRef::new(slice_ref.thread, *id))
                        .collect()
                })
                .unwrap_or_default(),
        }
    }

    /// Handles to every event, container by container in traversal order.
    #[must_use]
    pub fn all_event_refs(&self) -> Vec<SliceRef> {
        self.all_containers()
            .into_iter()
            .flat_map(|container| self.events_in_container(container))
            .collect()
    }

    #[must_use]
    pub fn all_events(&self) -> Vec<&Slice> {
        self.all_event_refs()
            .into_iter()
            .filter_map(|event| self.slice(event))
            .collect()
    }

    #[must_use]
    pub fn all_processes(&self) -> Vec<&Process> {
        self.processes.values().collect()
    }

    #[must_use]
    pub fn all_threads(&self) -> Vec<&Thread> {
        self.processes
            .values()
            .flat_map(|process| process.threads())
            .collect()
    }
}
