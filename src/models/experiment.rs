//! Experiment record - document of the experiments index

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{convert_all, ElasticExperimentTag, ToMlflowEntity};
use crate::config::IndexConfig;
use crate::document::{assign_owned_id, ElasticDocument};
use crate::entities::{Experiment, LifecycleStage};
use crate::error::require;
use crate::{serde_utils, Result};

const EXPERIMENT: &str = "ElasticExperiment";

/// Stored experiment document.
///
/// `experiment_id` may be absent from `_source`; the storage layer fills it
/// from the hit `_id` (see [`crate::document::SearchHit::into_record`]).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ElasticExperiment {
    #[serde(default, deserialize_with = "serde_utils::opt_id_string")]
    experiment_id: String,
    name: String,
    artifact_location: String,
    #[serde(default)]
    tags: Vec<ElasticExperimentTag>,
    #[serde(default)]
    lifecycle_stage: LifecycleStage,
    #[serde(
        default,
        deserialize_with = "serde_utils::opt_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    creation_time: Option<DateTime<Utc>>,
    #[serde(
        default,
        deserialize_with = "serde_utils::opt_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    last_update_time: Option<DateTime<Utc>>,
}

impl ElasticExperiment {
    /// Create a builder with the required fields.
    #[must_use]
    pub fn builder(
        experiment_id: impl Into<String>,
        name: impl Into<String>,
        artifact_location: impl Into<String>,
    ) -> ElasticExperimentBuilder {
        ElasticExperimentBuilder::new(experiment_id, name, artifact_location)
    }

    /// Build the stored form of an experiment entity.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidField`] if a timestamp is out of range.
    pub fn from_entity(experiment: &Experiment) -> Result<Self> {
        let id = experiment.experiment_id();
        let tags = experiment
            .tags()
            .iter()
            .map(|tag| ElasticExperimentTag::from_entity(id, tag))
            .collect();

        Ok(Self::builder(id, experiment.name(), experiment.artifact_location())
            .lifecycle_stage(experiment.lifecycle_stage())
            .tags(tags)
            .creation_time(serde_utils::from_opt_millis(
                experiment.creation_time(),
                EXPERIMENT,
                "creation_time",
            )?)
            .last_update_time(serde_utils::from_opt_millis(
                experiment.last_update_time(),
                EXPERIMENT,
                "last_update_time",
            )?)
            .build())
    }

    /// Get the experiment ID.
    #[must_use]
    pub fn experiment_id(&self) -> &str {
        &self.experiment_id
    }

    /// Get the experiment name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the root artifact location.
    #[must_use]
    pub fn artifact_location(&self) -> &str {
        &self.artifact_location
    }

    /// Get the nested tags.
    #[must_use]
    pub fn tags(&self) -> &[ElasticExperimentTag] {
        &self.tags
    }

    /// Get the lifecycle stage.
    #[must_use]
    pub const fn lifecycle_stage(&self) -> LifecycleStage {
        self.lifecycle_stage
    }

    /// Get the creation time, if persisted.
    #[must_use]
    pub const fn creation_time(&self) -> Option<DateTime<Utc>> {
        self.creation_time
    }

    /// Get the last update time, if persisted.
    #[must_use]
    pub const fn last_update_time(&self) -> Option<DateTime<Utc>> {
        self.last_update_time
    }
}

impl ToMlflowEntity for ElasticExperiment {
    type Entity = Experiment;
    const RECORD: &'static str = EXPERIMENT;

    fn to_mlflow_entity(&self) -> Result<Experiment> {
        require(&self.experiment_id, EXPERIMENT, "experiment_id")?;
        require(&self.name, EXPERIMENT, "name")?;
        let tags = convert_all(&self.tags)?;

        tracing::debug!(
            experiment_id = %self.experiment_id,
            tags = tags.len(),
            "converted experiment document"
        );

        Ok(Experiment::builder(
            self.experiment_id.as_str(),
            self.name.as_str(),
            self.artifact_location.as_str(),
        )
        .lifecycle_stage(self.lifecycle_stage)
        .tags(tags)
        .creation_time(self.creation_time.map(|t| t.timestamp_millis()))
        .last_update_time(self.last_update_time.map(|t| t.timestamp_millis()))
        .build())
    }
}

impl ElasticDocument for ElasticExperiment {
    fn index_name(config: &IndexConfig) -> &str {
        config.experiments()
    }

    fn document_id(&self) -> Option<&str> {
        Some(self.experiment_id.as_str()).filter(|id| !id.is_empty())
    }

    fn assign_document_id(&mut self, id: &str) -> Result<()> {
        assign_owned_id(&mut self.experiment_id, id, EXPERIMENT, "experiment_id")
    }
}

/// Builder for `ElasticExperiment`.
///
/// Timestamps stay unset unless given; nothing is taken from the clock.
#[derive(Debug)]
pub struct ElasticExperimentBuilder {
    record: ElasticExperiment,
}

impl ElasticExperimentBuilder {
    /// Create a new builder with required fields.
    #[must_use]
    pub fn new(
        experiment_id: impl Into<String>,
        name: impl Into<String>,
        artifact_location: impl Into<String>,
    ) -> Self {
        Self {
            record: ElasticExperiment {
                experiment_id: experiment_id.into(),
                name: name.into(),
                artifact_location: artifact_location.into(),
                tags: Vec::new(),
                lifecycle_stage: LifecycleStage::Active,
                creation_time: None,
                last_update_time: None,
            },
        }
    }

    /// Set the nested tags.
    #[must_use]
    pub fn tags(mut self, tags: Vec<ElasticExperimentTag>) -> Self {
        self.record.tags = tags;
        self
    }

    /// Set the lifecycle stage.
    #[must_use]
    pub const fn lifecycle_stage(mut self, stage: LifecycleStage) -> Self {
        self.record.lifecycle_stage = stage;
        self
    }

    /// Set the persisted creation time.
    #[must_use]
    pub const fn creation_time(mut self, time: Option<DateTime<Utc>>) -> Self {
        self.record.creation_time = time;
        self
    }

    /// Set the persisted last update time.
    #[must_use]
    pub const fn last_update_time(mut self, time: Option<DateTime<Utc>>) -> Self {
        self.record.last_update_time = time;
        self
    }

    /// Build the `ElasticExperiment`.
    #[must_use]
    pub fn build(self) -> ElasticExperiment {
        self.record
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::ExperimentTag;

    #[test]
    fn test_experiment_defaults_from_document() {
        let record: ElasticExperiment = serde_json::from_value(serde_json::json!({
            "experiment_id": 0,
            "name": "Default",
            "artifact_location": "mlflow-artifacts:/0"
        }))
        .unwrap();

        assert_eq!(record.experiment_id(), "0");
        assert_eq!(record.lifecycle_stage(), LifecycleStage::Active);
        assert!(record.tags().is_empty());
        assert!(record.creation_time().is_none());

        let experiment = record.to_mlflow_entity().unwrap();
        assert_eq!(experiment.experiment_id(), "0");
        assert!(experiment.creation_time().is_none());
    }

    #[test]
    fn test_experiment_tags_keep_order() {
        let record = ElasticExperiment::builder("7", "vision", "s3://b/7")
            .tags(vec![
                ElasticExperimentTag::new("7", "b", "2"),
                ElasticExperimentTag::new("7", "a", "1"),
            ])
            .build();

        let experiment = record.to_mlflow_entity().unwrap();
        let keys: Vec<&str> = experiment.tags().iter().map(ExperimentTag::key).collect();
        assert_eq!(keys, vec!["b", "a"]);
    }

    #[test]
    fn test_experiment_empty_name_fails() {
        let err = ElasticExperiment::builder("7", "", "s3://b/7")
            .build()
            .to_mlflow_entity()
            .unwrap_err();
        assert_eq!(err.field(), Some("name"));
    }

    #[test]
    fn test_experiment_bad_tag_fails_whole_conversion() {
        let err = ElasticExperiment::builder("7", "vision", "s3://b/7")
            .tags(vec![
                ElasticExperimentTag::new("7", "ok", "1"),
                ElasticExperimentTag::new("7", "", "2"),
            ])
            .build()
            .to_mlflow_entity()
            .unwrap_err();
        assert_eq!(err.record(), Some("ElasticExperimentTag"));
    }

    #[test]
    fn test_experiment_document_id() {
        let mut record = ElasticExperiment::builder("", "vision", "s3://b/7").build();
        assert!(record.document_id().is_none());
        record.assign_document_id("7").unwrap();
        assert_eq!(record.document_id(), Some("7"));
        assert!(record.assign_document_id("8").is_err());
    }
}
