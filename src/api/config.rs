use serde::{Deserialize, Serialize};

use crate::error::{TimelineError, TimelineResult};

/// Public model bootstrap configuration.
///
/// Serializable so hosts can keep analysis settings next to their traces.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimelineModelConfig {
    /// Anchor the earliest event at time zero after import.
    #[serde(default = "default_shift_world_to_zero")]
    pub shift_world_to_zero: bool,
    /// Tolerance when deciding whether a slice ends inside another one.
    #[serde(default = "default_containment_epsilon")]
    pub containment_epsilon: f64,
}

impl Default for TimelineModelConfig {
    fn default() -> Self {
        Self {
            shift_world_to_zero: default_shift_world_to_zero(),
            containment_epsilon: default_containment_epsilon(),
        }
    }
}

impl TimelineModelConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_shift_world_to_zero(mut self, shift_world_to_zero: bool) -> Self {
        self.shift_world_to_zero = shift_world_to_zero;
        self
    }

    #[must_use]
    pub fn with_containment_epsilon(mut self, containment_epsilon: f64) -> Self {
        self.containment_epsilon = containment_epsilon;
        self
    }

    pub fn validate(self) -> TimelineResult<Self> {
        if !self.containment_epsilon.is_finite() || self.containment_epsilon < 0.0 {
            return Err(TimelineError::InvalidData(
                "config `containment_epsilon` must be finite and >= 0".to_owned(),
            ));
        }
        Ok(self)
    }

    pub fn from_json_str(input: &str) -> TimelineResult<Self> {
        let config: Self = serde_json::from_str(input).map_err(|e| {
            TimelineError::InvalidData(format!("failed to parse model config json: {e}"))
        })?;
        config.validate()
    }

    pub fn to_json_pretty(self) -> TimelineResult<String> {
        serde_json::to_string_pretty(&self).map_err(|e| {
            TimelineError::InvalidData(format!("failed to serialize model config: {e}"))
        })
    }
}

fn default_shift_world_to_zero() -> bool {
    true
}

fn default_containment_epsilon() -> f64 {
    1e-9
}
