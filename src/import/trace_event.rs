use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, trace};

use crate::api::TimelineModel;
use crate::core::{ProcessId, SliceRef, Thread, ThreadId, ThreadRef};
use crate::error::TimelineResult;

use super::{FlowEvent, ImporterKind, MetadataEntry, TracePayload};

const MICROS_PER_MILLI: f64 = 1000.0;

/// Phases that are valid trace-event phases but have no counterpart in the model.
const SKIPPED_PHASES: &[&str] = &[
    "C", "b", "e", "n", "S", "T", "F", "p", "P", "O", "N", "D", "R", "c",
];

#[derive(Debug, Clone, Deserialize)]
struct RawTraceEvent {
    ph: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    cat: String,
    pid: Option<ProcessId>,
    tid: Option<ThreadId>,
    ts: Option<f64>,
    tts: Option<f64>,
    dur: Option<f64>,
    tdur: Option<f64>,
    id: Option<Value>,
    #[serde(default)]
    args: Map<String, Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FlowPhase {
    Start,
    Step,
    Finish,
}

#[derive(Debug, Clone)]
struct FlowStep {
    phase: FlowPhase,
    name: String,
    timestamp: f64,
    thread: ThreadRef,
}

/// Imports Chrome trace-event JSON: either a bare event array or an object
/// holding a `traceEvents` array.
#[derive(Debug, Clone)]
pub struct TraceEventImporter {
    payload: TracePayload,
    flows: IndexMap<(String, String), Vec<FlowStep>>,
}

impl TraceEventImporter {
    #[must_use]
    pub fn new(payload: TracePayload) -> Self {
        Self {
            payload,
            flows: IndexMap::new(),
        }
    }

    #[must_use]
    pub fn can_import(payload: &TracePayload) -> bool {
        match payload.as_value() {
            Value::Array(events) => first_has_phase(events),
            Value::Object(fields) => fields.get("traceEvents").is_some_and(Value::is_array),
            _ => false,
        }
    }

    #[must_use]
    pub fn payload(&self) -> &TracePayload {
        &self.payload
    }

    pub fn import_events(&mut self, model: &mut TimelineModel) -> TimelineResult<()> {
        let value = self.payload.as_value();
        let events: &[Value] = match value {
            Value::Array(events) => events,
            Value::Object(fields) => {
                if let Some(metadata) = fields.get("metadata") {
                    model.push_metadata(MetadataEntry {
                        name: "metadata".to_owned(),
                        pid: None,
                        tid: None,
                        value: metadata.clone(),
                    });
                }
                fields
                    .get("traceEvents")
                    .and_then(Value::as_array)
                    .map_or(&[][..], Vec::as_slice)
            }
            _ => &[],
        };

        debug!(event_count = events.len(), "importing trace events");
        let mut flows = IndexMap::new();
        for (index, event) in events.iter().enumerate() {
            let raw = match RawTraceEvent::deserialize(event) {
                Ok(raw) => raw,
                Err(err) => {
                    model.record_import_error(
                        ImporterKind::TraceEvent,
                        format!("malformed trace event #{index}: {err}"),
                    );
                    continue;
                }
            };
            if let Some(message) = process_event(model, &raw, &mut flows)? {
                model.record_import_error(ImporterKind::TraceEvent, message);
            }
        }
        self.flows = flows;
        Ok(())
    }

    /// Binds collected flow steps to their enclosing slices.
    pub fn finalize_import(&mut self, model: &mut TimelineModel) -> TimelineResult<()> {
        for ((category, id), steps) in std::mem::take(&mut self.flows) {
            if steps.len() < 2 {
                model.record_import_error(
                    ImporterKind::TraceEvent,
                    format!("flow `{id}` in category `{category}` has a single step"),
                );
                continue;
            }
            if steps[0].phase != FlowPhase::Start {
                model.record_import_error(
                    ImporterKind::TraceEvent,
                    format!("flow `{id}` in category `{category}` does not begin with a start"),
                );
                continue;
            }

            for pair in steps.windows(2) {
                let (from_step, to_step) = (&pair[0], &pair[1]);
                if from_step.phase == FlowPhase::Finish {
                    model.record_import_error(
                        ImporterKind::TraceEvent,
                        format!("flow `{id}` continues after its finish step"),
                    );
                    break;
                }
                let from = enclosing_slice(model, from_step);
                let to = enclosing_slice(model, to_step);
                match (from, to) {
                    (Some(from), Some(to)) => model.push_flow_event(FlowEvent {
                        id: id.clone(),
                        category: category.clone(),
                        name: from_step.name.clone(),
                        from,
                        to,
                    }),
                    _ => model.record_import_error(
                        ImporterKind::TraceEvent,
                        format!("flow `{id}` step has no enclosing slice"),
                    ),
                }
            }
        }
        Ok(())
    }
}

fn first_has_phase(events: &[Value]) -> bool {
    events
        .first()
        .and_then(Value::as_object)
        .is_some_and(|event| event.contains_key("ph"))
}

fn millis(micros: Option<f64>) -> Option<f64> {
    micros.map(|value| value / MICROS_PER_MILLI)
}

fn thread_for<'m>(
    model: &'m mut TimelineModel,
    raw: &RawTraceEvent,
) -> TimelineResult<Option<&'m mut Thread>> {
    let (Some(pid), Some(tid)) = (raw.pid, raw.tid) else {
        return Ok(None);
    };
    Ok(Some(model.get_or_create_process(pid)?.get_or_create_thread(tid)))
}

/// Applies one event to the model. `Ok(Some(_))` carries a soft import error.
fn process_event(
    model: &mut TimelineModel,
    raw: &RawTraceEvent,
    flows: &mut IndexMap<(String, String), Vec<FlowStep>>,
) -> TimelineResult<Option<String>> {
    let timestamp = millis(raw.ts);
    let thread_timestamp = millis(raw.tts);

    match raw.ph.as_str() {
        "B" | "E" | "X" | "I" | "i" => {
            let Some(ts) = timestamp else {
                return Ok(Some(format!(
                    "{} phase event `{}` has no timestamp",
                    raw.ph, raw.name
                )));
            };
            let Some(thread) = thread_for(model, raw)? else {
                return Ok(Some(format!(
                    "{} phase event `{}` has no pid/tid",
                    raw.ph, raw.name
                )));
            };

            match raw.ph.as_str() {
                "B" => {
                    thread.begin_slice(
                        raw.cat.clone(),
                        raw.name.clone(),
                        ts,
                        thread_timestamp,
                        raw.args.clone(),
                    );
                }
                "E" => {
                    let Some(id) = thread.end_slice(ts, thread_timestamp) else {
                        return Ok(Some(
                            "E phase event without a matching B phase event".to_owned(),
                        ));
                    };
                    if let Some(slice) = thread.slice_mut(id) {
                        for (key, value) in &raw.args {
                            slice.args.insert(key.clone(), value.clone());
                        }
                    }
                }
                "X" => {
                    let duration = millis(raw.dur).unwrap_or(0.0);
                    thread.push_complete_slice(
                        raw.cat.clone(),
                        raw.name.clone(),
                        ts,
                        duration,
                        thread_timestamp,
                        millis(raw.tdur),
                        raw.args.clone(),
                    );
                }
                _ => {
                    thread.push_complete_slice(
                        raw.cat.clone(),
                        raw.name.clone(),
                        ts,
                        0.0,
                        thread_timestamp,
                        thread_timestamp.map(|_| 0.0),
                        raw.args.clone(),
                    );
                }
            }
            Ok(None)
        }
        "M" => process_metadata(model, raw),
        "s" | "t" | "f" => {
            let phase = match raw.ph.as_str() {
                "s" => FlowPhase::Start,
                "t" => FlowPhase::Step,
                _ => FlowPhase::Finish,
            };
            let (Some(id), Some(timestamp), Some(pid), Some(tid)) =
                (flow_id(raw.id.as_ref()), timestamp, raw.pid, raw.tid)
            else {
                return Ok(Some(format!(
                    "flow event `{}` is missing id, ts, pid or tid",
                    raw.name
                )));
            };
            flows
                .entry((raw.cat.clone(), id))
                .or_insert_with(Vec::new)
                .push(FlowStep {
                    phase,
                    name: raw.name.clone(),
                    timestamp,
                    thread: ThreadRef::new(pid, tid),
                });
            Ok(None)
        }
        phase if SKIPPED_PHASES.contains(&phase) => {
            trace!(phase, name = %raw.name, "skipping unmodelled trace event phase");
            Ok(None)
        }
        phase => Ok(Some(format!(
            "Unrecognized event phase: {phase} ({})",
            raw.name
        ))),
    }
}

fn process_metadata(
    model: &mut TimelineModel,
    raw: &RawTraceEvent,
) -> TimelineResult<Option<String>> {
    model.push_metadata(MetadataEntry {
        name: raw.name.clone(),
        pid: raw.pid,
        tid: raw.tid,
        value: Value::Object(raw.args.clone()),
    });

    let arg_name = raw.args.get("name").and_then(Value::as_str);
    match raw.name.as_str() {
        "thread_name" => {
            let (Some(name), Some(thread)) = (arg_name, thread_for(model, raw)?) else {
                return Ok(Some("thread_name metadata without name, pid or tid".to_owned()));
            };
            thread.set_name(name);
        }
        "process_name" => {
            let (Some(name), Some(pid)) = (arg_name, raw.pid) else {
                return Ok(Some("process_name metadata without name or pid".to_owned()));
            };
            model.get_or_create_process(pid)?.set_name(name);
        }
        "process_labels" => {
            let (Some(labels), Some(pid)) =
                (raw.args.get("labels").and_then(Value::as_str), raw.pid)
            else {
                return Ok(Some("process_labels metadata without labels or pid".to_owned()));
            };
            let process = model.get_or_create_process(pid)?;
            for label in labels.split(',').map(str::trim).filter(|l| !l.is_empty()) {
                process.add_label(label);
            }
        }
        "thread_sort_index" | "process_sort_index" => {}
        other => return Ok(Some(format!("Unrecognized metadata name: {other}"))),
    }
    Ok(None)
}

fn flow_id(id: Option<&Value>) -> Option<String> {
    match id? {
        Value::String(id) => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}

/// Innermost slice on the step's thread whose interval covers the step.
fn enclosing_slice(model: &TimelineModel, step: &FlowStep) -> Option<SliceRef> {
    let thread = model.thread(step.thread)?;
    thread
        .all_slices()
        .iter()
        .filter(|slice| slice.start <= step.timestamp && step.timestamp <= slice.end())
        .max_by(|a, b| {
            a.start
                .total_cmp(&b.start)
                .then_with(|| b.duration.total_cmp(&a.duration))
        })
        .map(|slice| slice.slice_ref())
}
