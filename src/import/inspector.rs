use serde_json::{Map, Value};

use crate::api::TimelineModel;
use crate::core::{Thread, ThreadRef};
use crate::error::TimelineResult;

use super::{ImporterKind, TracePayload};

/// Renderer thread receiving every inspector record.
pub const INSPECTOR_RENDERER_THREAD: ThreadRef = ThreadRef { pid: 0, tid: 0 };

const INSPECTOR_CATEGORY: &str = "inspector";

/// Imports DevTools inspector timeline records (millisecond `startTime` /
/// `endTime`, nested `children`) onto the renderer thread.
#[derive(Debug, Clone)]
pub struct InspectorImporter {
    payload: TracePayload,
}

impl InspectorImporter {
    #[must_use]
    pub fn new(payload: TracePayload) -> Self {
        Self { payload }
    }

    #[must_use]
    pub fn can_import(payload: &TracePayload) -> bool {
        match payload.as_value() {
            Value::Object(record) => record.contains_key("startTime"),
            Value::Array(records) => records
                .first()
                .and_then(Value::as_object)
                .is_some_and(|record| record.contains_key("startTime")),
            _ => false,
        }
    }

    #[must_use]
    pub fn payload(&self) -> &TracePayload {
        &self.payload
    }

    pub fn import_events(&mut self, model: &mut TimelineModel) -> TimelineResult<()> {
        let records: &[Value] = match self.payload.as_value() {
            Value::Array(records) => records,
            record => std::slice::from_ref(record),
        };

        let mut errors = Vec::new();
        let thread = model
            .get_or_create_process(INSPECTOR_RENDERER_THREAD.pid)?
            .get_or_create_thread(INSPECTOR_RENDERER_THREAD.tid);
        let mut pending: Vec<&Value> = records.iter().rev().collect();
        while let Some(record) = pending.pop() {
            let children = add_record(thread, record, &mut errors);
            pending.extend(children.iter().rev());
        }

        for message in errors {
            model.record_import_error(ImporterKind::Inspector, message);
        }
        Ok(())
    }

    pub fn finalize_import(&mut self, _model: &mut TimelineModel) -> TimelineResult<()> {
        Ok(())
    }
}

/// Adds one record as a slice and returns its children, still to be visited.
fn add_record<'v>(
    thread: &mut Thread,
    record: &'v Value,
    errors: &mut Vec<String>,
) -> &'v [Value] {
    let Some(fields) = record.as_object() else {
        errors.push(format!("inspector record is not an object: {record}"));
        return &[];
    };
    let name = fields
        .get("type")
        .and_then(Value::as_str)
        .unwrap_or("unknown");
    let Some(start) = fields.get("startTime").and_then(Value::as_f64) else {
        errors.push(format!("inspector record `{name}` has no numeric startTime"));
        return &[];
    };
    let end = fields
        .get("endTime")
        .and_then(Value::as_f64)
        .unwrap_or(start);
    let args = fields
        .get("data")
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_else(Map::new);

    thread.push_complete_slice(
        INSPECTOR_CATEGORY,
        name,
        start,
        end - start,
        None,
        None,
        args,
    );

    fields
        .get("children")
        .and_then(Value::as_array)
        .map_or(&[][..], Vec::as_slice)
}
