//! Metric entity - one point of a run's metric series

use serde::Serialize;

/// A single metric value at a given step.
///
/// `value` may be NaN. Two metrics compare equal when all fields match, with
/// NaN treated as equal to NaN so converted entities can be compared.
#[derive(Debug, Clone, Serialize)]
pub struct Metric {
    key: String,
    value: f64,
    timestamp: i64,
    step: i64,
}

impl Metric {
    /// Create a metric.
    ///
    /// # Arguments
    ///
    /// * `key` - Metric name (e.g., "loss")
    /// * `value` - Metric value, possibly NaN
    /// * `timestamp` - Epoch milliseconds when the value was logged
    /// * `step` - Training step
    #[must_use]
    pub fn new(key: impl Into<String>, value: f64, timestamp: i64, step: i64) -> Self {
        Self {
            key: key.into(),
            value,
            timestamp,
            step,
        }
    }

    /// Get the metric key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Get the metric value.
    #[must_use]
    pub const fn value(&self) -> f64 {
        self.value
    }

    /// Get the logging time in epoch milliseconds.
    #[must_use]
    pub const fn timestamp(&self) -> i64 {
        self.timestamp
    }

    /// Get the step.
    #[must_use]
    pub const fn step(&self) -> i64 {
        self.step
    }
}

impl PartialEq for Metric {
    fn eq(&self, other: &Self) -> bool {
        let same_value =
            (self.value.is_nan() && other.value.is_nan()) || self.value == other.value;
        self.key == other.key
            && same_value
            && self.timestamp == other.timestamp
            && self.step == other.step
    }
}
