//! Tag records - run tags and experiment tags

use serde::{Deserialize, Serialize};

use super::ToMlflowEntity;
use crate::entities::{ExperimentTag, RunTag};
use crate::error::require;
use crate::{serde_utils, Result};

const TAG: &str = "ElasticTag";
const EXPERIMENT_TAG: &str = "ElasticExperimentTag";

/// Stored run tag. Unlike params, tags may be overwritten.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ElasticTag {
    key: String,
    value: String,
    #[serde(deserialize_with = "serde_utils::id_string")]
    run_id: String,
}

impl ElasticTag {
    /// Create a run tag record.
    #[must_use]
    pub fn new(run_id: impl Into<String>, key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            run_id: run_id.into(),
        }
    }

    /// Build the stored form of a tag set on `run_id`.
    #[must_use]
    pub fn from_entity(run_id: impl Into<String>, tag: &RunTag) -> Self {
        Self::new(run_id, tag.key(), tag.value())
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

    /// Get the owning run ID.
    #[must_use]
    pub fn run_id(&self) -> &str {
        &self.run_id
    }
}

impl ToMlflowEntity for ElasticTag {
    type Entity = RunTag;
    const RECORD: &'static str = TAG;

    fn to_mlflow_entity(&self) -> Result<RunTag> {
        require(&self.key, TAG, "key")?;
        require(&self.run_id, TAG, "run_id")?;
        Ok(RunTag::new(self.key.as_str(), self.value.as_str()))
    }
}

/// Stored experiment tag, nested in the experiment document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ElasticExperimentTag {
    key: String,
    value: String,
    #[serde(deserialize_with = "serde_utils::id_string")]
    experiment_id: String,
}

impl ElasticExperimentTag {
    /// Create an experiment tag record.
    #[must_use]
    pub fn new(
        experiment_id: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            experiment_id: experiment_id.into(),
        }
    }

    /// Build the stored form of a tag set on `experiment_id`.
    #[must_use]
    pub fn from_entity(experiment_id: impl Into<String>, tag: &ExperimentTag) -> Self {
        Self::new(experiment_id, tag.key(), tag.value())
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

    /// Get the owning experiment ID.
    #[must_use]
    pub fn experiment_id(&self) -> &str {
        &self.experiment_id
    }
}

impl ToMlflowEntity for ElasticExperimentTag {
    type Entity = ExperimentTag;
    const RECORD: &'static str = EXPERIMENT_TAG;

    fn to_mlflow_entity(&self) -> Result<ExperimentTag> {
        require(&self.key, EXPERIMENT_TAG, "key")?;
        require(&self.experiment_id, EXPERIMENT_TAG, "experiment_id")?;
        Ok(ExperimentTag::new(self.key.as_str(), self.value.as_str()))
    }
}
