//! Run record - document of the runs index

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{convert_all, ElasticLatestMetric, ElasticParam, ElasticTag, ToMlflowEntity};
use crate::config::IndexConfig;
use crate::document::{assign_owned_id, ElasticDocument};
use crate::entities::{LifecycleStage, Run, RunData, RunInfo, RunStatus};
use crate::error::require;
use crate::{serde_utils, Result};

const RUN: &str = "ElasticRun";

/// Stored run document with its latest metrics, params and tags nested.
///
/// `run_id` may be absent from `_source`; the storage layer fills it from
/// the hit `_id`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ElasticRun {
    #[serde(default, deserialize_with = "serde_utils::opt_id_string")]
    run_id: String,
    name: String,
    source_type: String,
    source_name: String,
    #[serde(deserialize_with = "serde_utils::id_string")]
    experiment_id: String,
    user_id: String,
    status: RunStatus,
    #[serde(
        default,
        deserialize_with = "serde_utils::opt_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    start_time: Option<DateTime<Utc>>,
    #[serde(
        default,
        deserialize_with = "serde_utils::opt_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    end_time: Option<DateTime<Utc>>,
    source_version: String,
    #[serde(default)]
    lifecycle_stage: LifecycleStage,
    artifact_uri: String,
    #[serde(default)]
    latest_metrics: Vec<ElasticLatestMetric>,
    #[serde(default)]
    params: Vec<ElasticParam>,
    #[serde(default)]
    tags: Vec<ElasticTag>,
}

impl ElasticRun {
    /// Create a builder with the identifying fields.
    #[must_use]
    pub fn builder(
        run_id: impl Into<String>,
        experiment_id: impl Into<String>,
        status: RunStatus,
    ) -> ElasticRunBuilder {
        ElasticRunBuilder::new(run_id, experiment_id, status)
    }

    /// Build the stored form of a run entity.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidField`] if a timestamp is out of range.
    pub fn from_entity(run: &Run) -> Result<Self> {
        let info = run.info();
        let data = run.data();
        let run_id = info.run_id();

        let latest_metrics = data
            .metrics()
            .iter()
            .map(ElasticLatestMetric::from_entity)
            .collect::<Result<Vec<_>>>()?;

        Ok(Self::builder(run_id, info.experiment_id(), info.status())
            .name(info.run_name())
            .user_id(info.user_id())
            .source(info.source_type(), info.source_name(), info.source_version())
            .times(
                serde_utils::from_opt_millis(info.start_time(), RUN, "start_time")?,
                serde_utils::from_opt_millis(info.end_time(), RUN, "end_time")?,
            )
            .lifecycle_stage(info.lifecycle_stage())
            .artifact_uri(info.artifact_uri())
            .latest_metrics(latest_metrics)
            .params(data.params().iter().map(|p| ElasticParam::from_entity(run_id, p)).collect())
            .tags(data.tags().iter().map(|t| ElasticTag::from_entity(run_id, t)).collect())
            .build())
    }

    /// Get the run ID.
    #[must_use]
    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    /// Get the run name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the source type.
    #[must_use]
    pub fn source_type(&self) -> &str {
        &self.source_type
    }

    /// Get the source name.
    #[must_use]
    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    /// Get the parent experiment ID.
    #[must_use]
    pub fn experiment_id(&self) -> &str {
        &self.experiment_id
    }

    /// Get the user ID.
    #[must_use]
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Get the run status.
    #[must_use]
    pub const fn status(&self) -> RunStatus {
        self.status
    }

    /// Get the start time, if persisted.
    #[must_use]
    pub const fn start_time(&self) -> Option<DateTime<Utc>> {
        self.start_time
    }

    /// Get the end time, if persisted.
    #[must_use]
    pub const fn end_time(&self) -> Option<DateTime<Utc>> {
        self.end_time
    }

    /// Get the source version.
    #[must_use]
    pub fn source_version(&self) -> &str {
        &self.source_version
    }

    /// Get the lifecycle stage.
    #[must_use]
    pub const fn lifecycle_stage(&self) -> LifecycleStage {
        self.lifecycle_stage
    }

    /// Get the artifact URI.
    #[must_use]
    pub fn artifact_uri(&self) -> &str {
        &self.artifact_uri
    }

    /// Get the nested latest metrics.
    #[must_use]
    pub fn latest_metrics(&self) -> &[ElasticLatestMetric] {
        &self.latest_metrics
    }

    /// Get the nested params.
    #[must_use]
    pub fn params(&self) -> &[ElasticParam] {
        &self.params
    }

    /// Get the nested tags.
    #[must_use]
    pub fn tags(&self) -> &[ElasticTag] {
        &self.tags
    }
}

impl ToMlflowEntity for ElasticRun {
    type Entity = Run;
    const RECORD: &'static str = RUN;

    fn to_mlflow_entity(&self) -> Result<Run> {
        require(&self.run_id, RUN, "run_id")?;
        require(&self.experiment_id, RUN, "experiment_id")?;

        let info = RunInfo::builder(
            self.run_id.as_str(),
            self.experiment_id.as_str(),
            self.status,
        )
        .run_name(self.name.as_str())
        .user_id(self.user_id.as_str())
        .times(
            self.start_time.map(|t| t.timestamp_millis()),
            self.end_time.map(|t| t.timestamp_millis()),
        )
        .source(
            self.source_type.as_str(),
            self.source_name.as_str(),
            self.source_version.as_str(),
        )
        .lifecycle_stage(self.lifecycle_stage)
        .artifact_uri(self.artifact_uri.as_str())
        .build();

        let data = RunData::new(
            convert_all(&self.latest_metrics)?,
            convert_all(&self.params)?,
            convert_all(&self.tags)?,
        );

        tracing::debug!(
            run_id = %self.run_id,
            metrics = data.metrics().len(),
            params = data.params().len(),
            tags = data.tags().len(),
            "converted run document"
        );

        Ok(Run::new(info, data))
    }
}

impl ElasticDocument for ElasticRun {
    fn index_name(config: &IndexConfig) -> &str {
        config.runs()
    }

    fn document_id(&self) -> Option<&str> {
        Some(self.run_id.as_str()).filter(|id| !id.is_empty())
    }

    fn assign_document_id(&mut self, id: &str) -> Result<()> {
        assign_owned_id(&mut self.run_id, id, RUN, "run_id")
    }
}

/// Builder for `ElasticRun`.
///
/// Start and end times stay unset unless given.
#[derive(Debug)]
pub struct ElasticRunBuilder {
    record: ElasticRun,
}

impl ElasticRunBuilder {
    /// Create a new builder with required fields.
    #[must_use]
    pub fn new(run_id: impl Into<String>, experiment_id: impl Into<String>, status: RunStatus) -> Self {
        Self {
            record: ElasticRun {
                run_id: run_id.into(),
                name: String::new(),
                source_type: String::new(),
                source_name: String::new(),
                experiment_id: experiment_id.into(),
                user_id: String::new(),
                status,
                start_time: None,
                end_time: None,
                source_version: String::new(),
                lifecycle_stage: LifecycleStage::Active,
                artifact_uri: String::new(),
                latest_metrics: Vec::new(),
                params: Vec::new(),
                tags: Vec::new(),
            },
        }
    }

    /// Set the run name.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.record.name = name.into();
        self
    }

    /// Set the user ID.
    #[must_use]
    pub fn user_id(mut self, user_id: impl Into<String>) -> Self {
        self.record.user_id = user_id.into();
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
        self.record.source_type = source_type.into();
        self.record.source_name = source_name.into();
        self.record.source_version = source_version.into();
        self
    }

    /// Set the persisted start and end times.
    #[must_use]
    pub const fn times(
        mut self,
        start_time: Option<DateTime<Utc>>,
        end_time: Option<DateTime<Utc>>,
    ) -> Self {
        self.record.start_time = start_time;
        self.record.end_time = end_time;
        self
    }

    /// Set the lifecycle stage.
    #[must_use]
    pub const fn lifecycle_stage(mut self, stage: LifecycleStage) -> Self {
        self.record.lifecycle_stage = stage;
        self
    }

    /// Set the artifact URI.
    #[must_use]
    pub fn artifact_uri(mut self, uri: impl Into<String>) -> Self {
        self.record.artifact_uri = uri.into();
        self
    }

    /// Set the latest metrics.
    #[must_use]
    pub fn latest_metrics(mut self, metrics: Vec<ElasticLatestMetric>) -> Self {
        self.record.latest_metrics = metrics;
        self
    }

    /// Set the params.
    #[must_use]
    pub fn params(mut self, params: Vec<ElasticParam>) -> Self {
        self.record.params = params;
        self
    }

    /// Set the tags.
    #[must_use]
    pub fn tags(mut self, tags: Vec<ElasticTag>) -> Self {
        self.record.tags = tags;
        self
    }

    /// Build the `ElasticRun`.
    #[must_use]
    pub fn build(self) -> ElasticRun {
        self.record
    }
}
