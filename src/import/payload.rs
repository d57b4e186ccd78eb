use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{TimelineError, TimelineResult};

/// One raw trace in any supported producer format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TracePayload(Value);

impl TracePayload {
    /// A payload carrying no trace data at all.
    #[must_use]
    pub fn empty() -> Self {
        Self(Value::Null)
    }

    #[must_use]
    pub fn from_value(value: Value) -> Self {
        Self(value)
    }

    /// Parses JSON trace text.
    ///
    /// Some trace writers cannot guarantee the closing `]` of a JSON array
    /// reaches the file, so a `[`-prefixed text missing it is closed before
    /// parsing. A trailing `,` left by an interrupted writer is dropped too.
    pub fn from_json_str(input: &str) -> TimelineResult<Self> {
        if input.trim().is_empty() {
            return Ok(Self::empty());
        }

        let repaired;
        let text = if input.starts_with('[') {
            let body = input.trim_end_matches(['\n', '\r']);
            if body.ends_with(']') {
                input
            } else {
                let body = body.trim_end().trim_end_matches(',');
                repaired = format!("{body}]");
                repaired.as_str()
            }
        } else {
            input
        };

        serde_json::from_str(text)
            .map(Self)
            .map_err(|e| TimelineError::InvalidData(format!("failed to parse trace json: {e}")))
    }

    #[must_use]
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    #[must_use]
    pub fn into_value(self) -> Value {
        self.0
    }
}

impl From<Value> for TracePayload {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// Either a single payload or several payloads imported together.
#[derive(Debug, Clone, PartialEq)]
pub enum TraceData {
    Single(TracePayload),
    Many(Vec<TracePayload>),
}

impl TraceData {
    #[must_use]
    pub fn into_payloads(self) -> Vec<TracePayload> {
        match self {
            Self::Single(payload) => vec![payload],
            Self::Many(payloads) => payloads,
        }
    }
}

impl From<TracePayload> for TraceData {
    fn from(payload: TracePayload) -> Self {
        Self::Single(payload)
    }
}

impl From<Vec<TracePayload>> for TraceData {
    fn from(payloads: Vec<TracePayload>) -> Self {
        Self::Many(payloads)
    }
}

impl From<Value> for TraceData {
    fn from(value: Value) -> Self {
        Self::Single(TracePayload::from(value))
    }
}
