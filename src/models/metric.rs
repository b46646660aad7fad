//! Metric records - time-series history and latest value per key

use std::cmp::Ordering;
use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ToMlflowEntity;
use crate::config::IndexConfig;
use crate::document::ElasticDocument;
use crate::entities::Metric;
use crate::error::require;
use crate::{serde_utils, Error, Result};

const METRIC: &str = "ElasticMetric";
const LATEST_METRIC: &str = "ElasticLatestMetric";

/// One entry of a run's metric history, as stored in the metrics index.
///
/// Elasticsearch cannot index NaN, so a NaN value is stored as `value = 0.0`
/// with `is_nan = true`. The flag always wins at conversion time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ElasticMetric {
    key: String,
    value: f64,
    #[serde(
        default,
        deserialize_with = "serde_utils::opt_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    timestamp: Option<DateTime<Utc>>,
    step: i64,
    is_nan: bool,
    #[serde(deserialize_with = "serde_utils::id_string")]
    run_id: String,
}

impl ElasticMetric {
    /// Create a metric record without a timestamp.
    ///
    /// A NaN `value` is stored as the `is_nan` sentinel.
    #[must_use]
    pub fn new(run_id: impl Into<String>, key: impl Into<String>, value: f64, step: i64) -> Self {
        let (value, is_nan) = split_nan(value);
        Self {
            key: key.into(),
            value,
            timestamp: None,
            step,
            is_nan,
            run_id: run_id.into(),
        }
    }

    /// Set the logging timestamp.
    ///
    /// The storage layer uses this to supply the persisted time for history
    /// entries written without one.
    #[must_use]
    pub const fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Build the stored form of a metric entity logged to `run_id`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidField`] if the entity timestamp is out of range.
    pub fn from_entity(run_id: impl Into<String>, metric: &Metric) -> Result<Self> {
        let timestamp = serde_utils::from_millis(metric.timestamp(), METRIC, "timestamp")?;
        Ok(Self::new(run_id, metric.key(), metric.value(), metric.step()).with_timestamp(timestamp))
    }

    /// Get the metric key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Get the stored numeric value (meaningless when `is_nan` is set).
    #[must_use]
    pub const fn value(&self) -> f64 {
        self.value
    }

    /// Get the value the entity will carry: NaN when flagged.
    #[must_use]
    pub const fn effective_value(&self) -> f64 {
        if self.is_nan {
            f64::NAN
        } else {
            self.value
        }
    }

    /// Get the logging timestamp, if persisted.
    #[must_use]
    pub const fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamp
    }

    /// Get the step.
    #[must_use]
    pub const fn step(&self) -> i64 {
        self.step
    }

    /// Whether the stored value stands for NaN.
    #[must_use]
    pub const fn is_nan(&self) -> bool {
        self.is_nan
    }

    /// Get the owning run ID.
    #[must_use]
    pub fn run_id(&self) -> &str {
        &self.run_id
    }
}

impl ToMlflowEntity for ElasticMetric {
    type Entity = Metric;
    const RECORD: &'static str = METRIC;

    fn to_mlflow_entity(&self) -> Result<Metric> {
        require(&self.run_id, METRIC, "run_id")?;
        to_metric(
            METRIC,
            &self.key,
            self.effective_value(),
            self.timestamp,
            self.step,
        )
    }
}

impl ElasticDocument for ElasticMetric {
    fn index_name(config: &IndexConfig) -> &str {
        config.metrics()
    }
}

/// Current value of one metric key, nested in its run document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ElasticLatestMetric {
    key: String,
    value: f64,
    #[serde(
        default,
        deserialize_with = "serde_utils::opt_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    timestamp: Option<DateTime<Utc>>,
    step: i64,
    is_nan: bool,
}

impl ElasticLatestMetric {
    /// Create a latest-metric record without a timestamp.
    #[must_use]
    pub fn new(key: impl Into<String>, value: f64, step: i64) -> Self {
        let (value, is_nan) = split_nan(value);
        Self {
            key: key.into(),
            value,
            timestamp: None,
            step,
            is_nan,
        }
    }

    /// Set the logging timestamp.
    #[must_use]
    pub const fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Build the stored form of a metric entity.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidField`] if the entity timestamp is out of range.
    pub fn from_entity(metric: &Metric) -> Result<Self> {
        let timestamp = serde_utils::from_millis(metric.timestamp(), LATEST_METRIC, "timestamp")?;
        Ok(Self::new(metric.key(), metric.value(), metric.step()).with_timestamp(timestamp))
    }

    /// Get the metric key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Get the stored numeric value (meaningless when `is_nan` is set).
    #[must_use]
    pub const fn value(&self) -> f64 {
        self.value
    }

    /// Get the value the entity will carry: NaN when flagged.
    #[must_use]
    pub const fn effective_value(&self) -> f64 {
        if self.is_nan {
            f64::NAN
        } else {
            self.value
        }
    }

    /// Get the logging timestamp, if persisted.
    #[must_use]
    pub const fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamp
    }

    /// Get the step.
    #[must_use]
    pub const fn step(&self) -> i64 {
        self.step
    }

    /// Whether the stored value stands for NaN.
    #[must_use]
    pub const fn is_nan(&self) -> bool {
        self.is_nan
    }

    /// Whether logging `candidate` should replace this latest value.
    ///
    /// Entries order by `(step, timestamp, value)`; a missing timestamp sorts
    /// first and values use the total order (NaN greatest).
    #[must_use]
    pub fn is_superseded_by(&self, candidate: &ElasticMetric) -> bool {
        let ordering = (candidate.step, candidate.timestamp)
            .cmp(&(self.step, self.timestamp))
            .then_with(|| candidate.effective_value().total_cmp(&self.effective_value()));
        ordering == Ordering::Greater
    }
}

impl From<&ElasticMetric> for ElasticLatestMetric {
    fn from(metric: &ElasticMetric) -> Self {
        Self {
            key: metric.key.clone(),
            value: metric.value,
            timestamp: metric.timestamp,
            step: metric.step,
            is_nan: metric.is_nan,
        }
    }
}

impl ToMlflowEntity for ElasticLatestMetric {
    type Entity = Metric;
    const RECORD: &'static str = LATEST_METRIC;

    fn to_mlflow_entity(&self) -> Result<Metric> {
        to_metric(
            LATEST_METRIC,
            &self.key,
            self.effective_value(),
            self.timestamp,
            self.step,
        )
    }
}

/// Fold a run's metric history into one latest entry per key.
///
/// All entries are expected to belong to the same run. Keys keep the order
/// of their first appearance in `history`.
#[must_use]
pub fn latest_metrics(history: &[ElasticMetric]) -> Vec<ElasticLatestMetric> {
    let mut latest: Vec<ElasticLatestMetric> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();

    for metric in history {
        if let Some(&i) = positions.get(metric.key()) {
            if latest[i].is_superseded_by(metric) {
                latest[i] = ElasticLatestMetric::from(metric);
            }
        } else {
            positions.insert(metric.key(), latest.len());
            latest.push(ElasticLatestMetric::from(metric));
        }
    }

    latest
}

fn split_nan(value: f64) -> (f64, bool) {
    if value.is_nan() {
        (0.0, true)
    } else {
        (value, false)
    }
}

fn to_metric(
    record: &'static str,
    key: &str,
    value: f64,
    timestamp: Option<DateTime<Utc>>,
    step: i64,
) -> Result<Metric> {
    require(key, record, "key")?;
    let timestamp = timestamp.ok_or(Error::MissingField {
        record,
        field: "timestamp",
    })?;
    Ok(Metric::new(key, value, timestamp.timestamp_millis(), step))
}
