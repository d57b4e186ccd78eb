use indexmap::IndexMap;

use super::{Bounds, ProcessId, Thread, ThreadId, ThreadRef};

/// A traced process and the threads it owns.
#[derive(Debug, Clone, PartialEq)]
pub struct Process {
    pid: ProcessId,
    name: Option<String>,
    labels: Vec<String>,
    threads: IndexMap<ThreadId, Thread>,
}

impl Process {
    #[must_use]
    pub fn new(pid: ProcessId) -> Self {
        Self {
            pid,
            name: None,
            labels: Vec::new(),
            threads: IndexMap::new(),
        }
    }

    #[must_use]
    pub fn pid(&self) -> ProcessId {
        self.pid
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
    }

    #[must_use]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn add_label(&mut self, label: impl Into<String>) {
        let label = label.into();
        if !self.labels.contains(&label) {
            self.labels.push(label);
        }
    }

    pub fn get_or_create_thread(&mut self, tid: ThreadId) -> &mut Thread {
        let pid = self.pid;
        self.threads
            .entry(tid)
            .or_insert_with(|| Thread::new(ThreadRef::new(pid, tid)))
    }

    #[must_use]
    pub fn thread(&self, tid: ThreadId) -> Option<&Thread> {
        self.threads.get(&tid)
    }

    pub(crate) fn thread_mut(&mut self, tid: ThreadId) -> Option<&mut Thread> {
        self.threads.get_mut(&tid)
    }

    pub fn threads(&self) -> impl Iterator<Item = &Thread> {
        self.threads.values()
    }

    #[must_use]
    pub fn thread_count(&self) -> usize {
        self.threads.len()
    }

    /// Closes every slice still open on this process' threads at `max_timestamp`.
    pub fn auto_close_open_slices(
        &mut self,
        max_timestamp: f64,
        thread_time_bounds: &IndexMap<ThreadRef, Bounds>,
    ) {
        for thread in self.threads.values_mut() {
            let bounds = thread_time_bounds.get(&thread.thread_ref());
            thread.auto_close_open_slices(max_timestamp, bounds);
        }
    }

    pub fn finalize_import(&mut self, containment_epsilon: f64) {
        for thread in self.threads.values_mut() {
            thread.finalize_import(containment_epsilon);
        }
    }
}
