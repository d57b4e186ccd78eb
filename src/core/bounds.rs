use serde::{Deserialize, Serialize};

/// Interval tracker widened by every observed value.
///
/// `min <= max` holds whenever the bounds are non-empty.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    min: Option<f64>,
    max: Option<f64>,
}

impl Bounds {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds bounds covering every value in `values`.
    #[must_use]
    pub fn from_values(values: impl IntoIterator<Item = f64>) -> Self {
        let mut bounds = Self::new();
        for value in values {
            bounds.add_value(value);
        }
        bounds
    }

    pub fn add_value(&mut self, value: f64) {
        match (self.min, self.max) {
            (Some(min), Some(max)) => {
                self.min = Some(min.min(value));
                self.max = Some(max.max(value));
            }
            _ => {
                self.min = Some(value);
                self.max = Some(value);
            }
        }
    }

    pub fn add_bounds(&mut self, other: Bounds) {
        if let (Some(min), Some(max)) = (other.min, other.max) {
            self.add_value(min);
            self.add_value(max);
        }
    }

    pub fn reset(&mut self) {
        self.min = None;
        self.max = None;
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.min.is_none()
    }

    #[must_use]
    pub fn min(&self) -> Option<f64> {
        self.min
    }

    #[must_use]
    pub fn max(&self) -> Option<f64> {
        self.max
    }

    /// Width of the interval, `0.0` when empty.
    #[must_use]
    pub fn range(&self) -> f64 {
        match (self.min, self.max) {
            (Some(min), Some(max)) => max - min,
            _ => 0.0,
        }
    }

    #[must_use]
    pub fn center(&self) -> Option<f64> {
        match (self.min, self.max) {
            (Some(min), Some(max)) => Some(min + 0.5 * (max - min)),
            _ => None,
        }
    }

    #[must_use]
    pub fn contains_interval(&self, start: f64, end: f64) -> bool {
        match (self.min, self.max) {
            (Some(min), Some(max)) => start >= min && end <= max,
            _ => false,
        }
    }
}
