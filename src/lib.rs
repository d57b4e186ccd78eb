//! timeline-model: a unified process/thread/slice model for trace analysis.
//!
//! Trace payloads in different producer formats are each handed to one
//! importer, merged into a single [`TimelineModel`], finalized and frozen.
//! The frozen model answers by-name lookups and benchmark marker queries.

pub mod api;
pub mod core;
pub mod error;
pub mod import;
pub mod telemetry;

pub use api::{MarkerNames, ModelState, TimelineModel, TimelineModelConfig};
pub use error::{TimelineError, TimelineResult};
pub use import::{TraceData, TracePayload};
