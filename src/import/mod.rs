//! Trace importers and the registry that picks one per payload.
//!
//! The set of importers is closed: each [`ImporterKind`] knows how to probe a
//! payload, which priority it runs at, and how to build its [`Importer`].

pub mod empty;
pub mod inspector;
pub mod payload;
pub mod records;
pub mod trace_event;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::TimelineModel;
use crate::error::{TimelineError, TimelineResult};

pub use empty::EmptyImporter;
pub use inspector::{INSPECTOR_RENDERER_THREAD, InspectorImporter};
pub use payload::{TraceData, TracePayload};
pub use records::{FlowEvent, ImportError, MetadataEntry};
pub use trace_event::TraceEventImporter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImporterKind {
    Empty,
    Inspector,
    TraceEvent,
}

/// Probe order used when selecting an importer for a payload.
pub const IMPORTER_REGISTRY: [ImporterKind; 3] = [
    ImporterKind::Empty,
    ImporterKind::Inspector,
    ImporterKind::TraceEvent,
];

impl ImporterKind {
    /// Side-effect free capability probe.
    #[must_use]
    pub fn can_import(self, payload: &TracePayload) -> bool {
        match self {
            Self::Empty => EmptyImporter::can_import(payload),
            Self::Inspector => InspectorImporter::can_import(payload),
            Self::TraceEvent => TraceEventImporter::can_import(payload),
        }
    }

    /// Lower priorities import first.
    #[must_use]
    pub fn import_priority(self) -> i32 {
        match self {
            Self::Empty => 0,
            Self::TraceEvent => 1,
            Self::Inspector => 2,
        }
    }

    #[must_use]
    pub fn create(self, payload: TracePayload) -> Importer {
        match self {
            Self::Empty => Importer::Empty(EmptyImporter::new(payload)),
            Self::Inspector => Importer::Inspector(InspectorImporter::new(payload)),
            Self::TraceEvent => Importer::TraceEvent(TraceEventImporter::new(payload)),
        }
    }
}

/// An importer bound to the payload it will import.
#[derive(Debug, Clone)]
pub enum Importer {
    Empty(EmptyImporter),
    Inspector(InspectorImporter),
    TraceEvent(TraceEventImporter),
}

impl Importer {
    /// Builds the importer of the first registered kind accepting `payload`.
    pub fn for_payload(payload: TracePayload) -> TimelineResult<Self> {
        let kind = IMPORTER_REGISTRY
            .into_iter()
            .find(|kind| kind.can_import(&payload))
            .ok_or(TimelineError::NoImporterFound)?;
        debug!(importer = ?kind, "selected importer for payload");
        Ok(kind.create(payload))
    }

    #[must_use]
    pub fn kind(&self) -> ImporterKind {
        match self {
            Self::Empty(_) => ImporterKind::Empty,
            Self::Inspector(_) => ImporterKind::Inspector,
            Self::TraceEvent(_) => ImporterKind::TraceEvent,
        }
    }

    #[must_use]
    pub fn import_priority(&self) -> i32 {
        self.kind().import_priority()
    }

    pub fn import_events(&mut self, model: &mut TimelineModel) -> TimelineResult<()> {
        match self {
            Self::Empty(importer) => importer.import_events(model),
            Self::Inspector(importer) => importer.import_events(model),
            Self::TraceEvent(importer) => importer.import_events(model),
        }
    }

    pub fn finalize_import(&mut self, model: &mut TimelineModel) -> TimelineResult<()> {
        match self {
            Self::Empty(importer) => importer.finalize_import(model),
            Self::Inspector(importer) => importer.finalize_import(model),
            Self::TraceEvent(importer) => importer.finalize_import(model),
        }
    }
}

/// Selects one importer per payload and orders them by import priority.
///
/// Importers sharing a priority keep the order of their payloads.
pub fn create_importers(payloads: Vec<TracePayload>) -> TimelineResult<Vec<Importer>> {
    let mut importers = payloads
        .into_iter()
        .map(Importer::for_payload)
        .enumerate()
        .map(|(index, importer)| importer.map(|importer| (index, importer)))
        .collect::<TimelineResult<Vec<_>>>()?;

    importers.sort_by_key(|(index, importer)| (importer.import_priority(), *index));
    Ok(importers
        .into_iter()
        .map(|(_, importer)| importer)
        .collect())
}
