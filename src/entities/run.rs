//! Run entity - execution instance of an experiment

use serde::Serialize;

use super::{LifecycleStage, Metric, RunStatus};

/// Run parameter. Values are always strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Param {
    key: String,
    value: String,
}

impl Param {
    /// Create a param.
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Get the param key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Get the param value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

/// Key/value tag attached to a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunTag {
    key: String,
    value: String,
}

impl RunTag {
    /// Create a run tag.
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Get the tag key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Get the tag value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

/// Run metadata: identity, provenance, status and timing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunInfo {
    run_id: String,
    run_name: String,
    experiment_id: String,
    user_id: String,
    status: RunStatus,
    start_time: Option<i64>,
    end_time: Option<i64>,
    source_type: String,
    source_name: String,
    source_version: String,
    lifecycle_stage: LifecycleStage,
    artifact_uri: String,
}

impl RunInfo {
    /// Create a builder with the identifying fields.
    #[must_use]
    pub fn builder(
        run_id: impl Into<String>,
        experiment_id: impl Into<String>,
        status: RunStatus,
    ) -> RunInfoBuilder {
        RunInfoBuilder::new(run_id, experiment_id, status)
    }

    /// Get the run ID.
    #[must_use]
    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    /// Get the run name.
    #[must_use]
    pub fn run_name(&self) -> &str {
        &self.run_name
    }

    /// Get the parent experiment ID.
    #[must_use]
    pub fn experiment_id(&self) -> &str {
        &self.experiment_id
    }

    /// Get the user who started the run.
    #[must_use]
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Get the run status.
    #[must_use]
    pub const fn status(&self) -> RunStatus {
        self.status
    }

    /// Get the start time (epoch milliseconds), if recorded.
    #[must_use]
    pub const fn start_time(&self) -> Option<i64> {
        self.start_time
    }

    /// Get the end time (epoch milliseconds), if the run has ended.
    #[must_use]
    pub const fn end_time(&self) -> Option<i64> {
        self.end_time
    }

    /// Get the source type (e.g., "NOTEBOOK", "JOB", "LOCAL").
    #[must_use]
    pub fn source_type(&self) -> &str {
        &self.source_type
    }

    /// Get the source name (script path, notebook, ...).
    #[must_use]
    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    /// Get the source version (usually a commit hash).
    #[must_use]
    pub fn source_version(&self) -> &str {
        &self.source_version
    }

    /// Get the lifecycle stage.
    #[must_use]
    pub const fn lifecycle_stage(&self) -> LifecycleStage {
        self.lifecycle_stage
    }

    /// Get the root artifact URI.
    #[must_use]
    pub fn artifact_uri(&self) -> &str {
        &self.artifact_uri
    }
}

/// Builder for `RunInfo`.
#[derive(Debug)]
pub struct RunInfoBuilder {
    info: RunInfo,
}

impl RunInfoBuilder {
    /// Create a new builder with required fields.
    #[must_use]
    pub fn new(run_id: impl Into<String>, experiment_id: impl Into<String>, status: RunStatus) -> Self {
        Self {
            info: RunInfo {
                run_id: run_id.into(),
                run_name: String::new(),
                experiment_id: experiment_id.into(),
                user_id: String::new(),
                status,
                start_time: None,
                end_time: None,
                source_type: String::new(),
                source_name: String::new(),
                source_version: String::new(),
                lifecycle_stage: LifecycleStage::Active,
                artifact_uri: String::new(),
            },
        }
    }

    /// Set the run name.
    #[must_use]
    pub fn run_name(mut self, name: impl Into<String>) -> Self {
        self.info.run_name = name.into();
        self
    }

    /// Set the user ID.
    #[must_use]
    pub fn user_id(mut self, user_id: impl Into<String>) -> Self {
        self.info.user_id = user_id.into();
        self
    }

    /// Set the start and end times (epoch milliseconds).
    #[must_use]
    pub const fn times(mut self, start_time: Option<i64>, end_time: Option<i64>) -> Self {
        self.info.start_time = start_time;
        self.info.end_time = end_time;
        self
    }

    /// Set the source type, name and version.
    #[must_use]
    pub fn source(
        mut self,
        source_type: impl Into<String>,
        source_name: impl Into<String>,
        source_version: impl Into<String>,
    ) -> Self {
        self.info.source_type = source_type.into();
        self.info.source_name = source_name.into();
        self.info.source_version = source_version.into();
        self
    }

    /// Set the lifecycle stage.
    #[must_use]
    pub const fn lifecycle_stage(mut self, stage: LifecycleStage) -> Self {
        self.info.lifecycle_stage = stage;
        self
    }

    /// Set the artifact URI.
    #[must_use]
    pub fn artifact_uri(mut self, uri: impl Into<String>) -> Self {
        self.info.artifact_uri = uri.into();
        self
    }

    /// Build the `RunInfo`.
    #[must_use]
    pub fn build(self) -> RunInfo {
        self.info
    }
}

/// Logged data of a run: latest metrics, params and tags.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct RunData {
    metrics: Vec<Metric>,
    params: Vec<Param>,
    tags: Vec<RunTag>,
}

impl RunData {
    /// Create run data. Collections keep the given order.
    #[must_use]
    pub const fn new(metrics: Vec<Metric>, params: Vec<Param>, tags: Vec<RunTag>) -> Self {
        Self {
            metrics,
            params,
            tags,
        }
    }

    /// Get the latest metrics.
    #[must_use]
    pub fn metrics(&self) -> &[Metric] {
        &self.metrics
    }

    /// Get the params.
    #[must_use]
    pub fn params(&self) -> &[Param] {
        &self.params
    }

    /// Get the tags.
    #[must_use]
    pub fn tags(&self) -> &[RunTag] {
        &self.tags
    }

    /// Look up a latest metric by key.
    #[must_use]
    pub fn metric(&self, key: &str) -> Option<&Metric> {
        self.metrics.iter().find(|m| m.key() == key)
    }

    /// Look up a param value by key.
    #[must_use]
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.iter().find(|p| p.key() == key).map(Param::value)
    }

    /// Look up a tag value by key.
    #[must_use]
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags.iter().find(|t| t.key() == key).map(RunTag::value)
    }
}

/// A run: metadata plus logged data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Run {
    info: RunInfo,
    data: RunData,
}

impl Run {
    /// Create a run.
    #[must_use]
    pub const fn new(info: RunInfo, data: RunData) -> Self {
        Self { info, data }
    }

    /// Get the run metadata.
    #[must_use]
    pub const fn info(&self) -> &RunInfo {
        &self.info
    }

    /// Get the logged data.
    #[must_use]
    pub const fn data(&self) -> &RunData {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_info_builder() {
        let info = RunInfo::builder("run-1", "0", RunStatus::Running)
            .run_name("warm-owl-42")
            .user_id("alice")
            .times(Some(1_000), None)
            .source("LOCAL", "train.py", "abc123")
            .artifact_uri("s3://bucket/0/run-1/artifacts")
            .build();

        assert_eq!(info.run_id(), "run-1");
        assert_eq!(info.run_name(), "warm-owl-42");
        assert_eq!(info.source_name(), "train.py");
        assert_eq!(info.lifecycle_stage(), LifecycleStage::Active);
        assert_eq!(info.start_time(), Some(1_000));
        assert!(info.end_time().is_none());
    }

    #[test]
    fn test_run_data_lookups() {
        let data = RunData::new(
            vec![Metric::new("loss", 0.5, 10, 3)],
            vec![Param::new("lr", "0.01")],
            vec![RunTag::new("mlflow.user", "alice")],
        );
        assert_eq!(data.metric("loss").map(Metric::step), Some(3));
        assert_eq!(data.param("lr"), Some("0.01"));
        assert_eq!(data.tag("mlflow.user"), Some("alice"));
        assert!(data.param("epochs").is_none());
    }
}
