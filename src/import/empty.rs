use serde_json::Value;

use crate::api::TimelineModel;
use crate::error::TimelineResult;

use super::TracePayload;

/// Accepts payloads carrying no data so that an empty trace still yields a model.
#[derive(Debug, Clone)]
pub struct EmptyImporter {
    payload: TracePayload,
}

impl EmptyImporter {
    #[must_use]
    pub fn new(payload: TracePayload) -> Self {
        Self { payload }
    }

    #[must_use]
    pub fn can_import(payload: &TracePayload) -> bool {
        match payload.as_value() {
            Value::Null => true,
            Value::String(text) => text.is_empty(),
            Value::Array(items) => items.is_empty(),
            Value::Object(fields) => fields.is_empty(),
            Value::Bool(_) | Value::Number(_) => false,
        }
    }

    #[must_use]
    pub fn payload(&self) -> &TracePayload {
        &self.payload
    }

    pub fn import_events(&mut self, _model: &mut TimelineModel) -> TimelineResult<()> {
        Ok(())
    }

    pub fn finalize_import(&mut self, _model: &mut TimelineModel) -> TimelineResult<()> {
        Ok(())
    }
}
