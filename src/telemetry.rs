//! Telemetry helpers for applications embedding `timeline-model`.
//!
//! The crate only emits `tracing` events; targets are module paths:
//!
//! - `timeline_model::api`: `warn` for every per-event import error recorded
//!   on the model.
//! - `timeline_model::api::import_pipeline`: `debug` when traces are imported,
//!   the world is shifted and the model is frozen (process count, error count,
//!   bounds); `trace` for each importer run.
//! - `timeline_model::api::marker_matcher`: `debug` when requested marker
//!   names do not match the trace.
//! - `timeline_model::import`: `debug` with the importer picked for a payload.
//! - `timeline_model::import::trace_event`: `debug` with the event count;
//!   `trace` for skipped phases.
//! - `timeline_model::core::thread`: `trace` when open slices are auto-closed.
//!
//! With the default `warn` filter only import errors are printed. Use
//! `RUST_LOG=timeline_model=debug` to follow the import and finalize passes.

/// Filter used when `RUST_LOG` is unset or invalid.
#[cfg(feature = "telemetry")]
const DEFAULT_FILTER: &str = "warn";

/// Installs a compact `fmt` subscriber when the `telemetry` feature is enabled.
///
/// Returns `false` when the feature is disabled or the host already installed
/// a global subscriber.
#[must_use]
pub fn init_default_tracing() -> bool {
    #[cfg(feature = "telemetry")]
    {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_FILTER));
        return tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .compact()
            .try_init()
            .is_ok();
    }

    #[cfg(not(feature = "telemetry"))]
    {
        false
    }
}
