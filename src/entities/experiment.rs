//! Experiment entity - root of the tracking hierarchy

use serde::Serialize;

use super::LifecycleStage;

/// Key/value tag attached to an experiment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExperimentTag {
    key: String,
    value: String,
}

impl ExperimentTag {
    /// Create an experiment tag.
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

/// Experiment represents a named group of runs.
///
/// Timestamps are epoch milliseconds and are `None` when the stored
/// document never recorded them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Experiment {
    experiment_id: String,
    name: String,
    artifact_location: String,
    lifecycle_stage: LifecycleStage,
    tags: Vec<ExperimentTag>,
    creation_time: Option<i64>,
    last_update_time: Option<i64>,
}

impl Experiment {
    /// Create a builder with the required fields.
    #[must_use]
    pub fn builder(
        experiment_id: impl Into<String>,
        name: impl Into<String>,
        artifact_location: impl Into<String>,
    ) -> ExperimentBuilder {
        ExperimentBuilder::new(experiment_id, name, artifact_location)
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

    /// Get the lifecycle stage.
    #[must_use]
    pub const fn lifecycle_stage(&self) -> LifecycleStage {
        self.lifecycle_stage
    }

    /// Get the tags in stored order.
    #[must_use]
    pub fn tags(&self) -> &[ExperimentTag] {
        &self.tags
    }

    /// Look up a tag value by key.
    #[must_use]
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags.iter().find(|t| t.key() == key).map(ExperimentTag::value)
    }

    /// Get the creation time, if recorded.
    #[must_use]
    pub const fn creation_time(&self) -> Option<i64> {
        self.creation_time
    }

    /// Get the last update time, if recorded.
    #[must_use]
    pub const fn last_update_time(&self) -> Option<i64> {
        self.last_update_time
    }
}

/// Builder for `Experiment`.
#[derive(Debug)]
pub struct ExperimentBuilder {
    experiment_id: String,
    name: String,
    artifact_location: String,
    lifecycle_stage: LifecycleStage,
    tags: Vec<ExperimentTag>,
    creation_time: Option<i64>,
    last_update_time: Option<i64>,
}

impl ExperimentBuilder {
    /// Create a new builder with required fields.
    #[must_use]
    pub fn new(
        experiment_id: impl Into<String>,
        name: impl Into<String>,
        artifact_location: impl Into<String>,
    ) -> Self {
        Self {
            experiment_id: experiment_id.into(),
            name: name.into(),
            artifact_location: artifact_location.into(),
            lifecycle_stage: LifecycleStage::Active,
            tags: Vec::new(),
            creation_time: None,
            last_update_time: None,
        }
    }

    /// Set the lifecycle stage.
    #[must_use]
    pub const fn lifecycle_stage(mut self, stage: LifecycleStage) -> Self {
        self.lifecycle_stage = stage;
        self
    }

    /// Set the tags.
    #[must_use]
    pub fn tags(mut self, tags: Vec<ExperimentTag>) -> Self {
        self.tags = tags;
        self
    }

    /// Set the creation time (epoch milliseconds).
    #[must_use]
    pub const fn creation_time(mut self, millis: Option<i64>) -> Self {
        self.creation_time = millis;
        self
    }

    /// Set the last update time (epoch milliseconds).
    #[must_use]
    pub const fn last_update_time(mut self, millis: Option<i64>) -> Self {
        self.last_update_time = millis;
        self
    }

    /// Build the `Experiment`.
    #[must_use]
    pub fn build(self) -> Experiment {
        Experiment {
            experiment_id: self.experiment_id,
            name: self.name,
            artifact_location: self.artifact_location,
            lifecycle_stage: self.lifecycle_stage,
            tags: self.tags,
            creation_time: self.creation_time,
            last_update_time: self.last_update_time,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_experiment_builder_defaults() {
        let exp = Experiment::builder("1", "baseline", "s3://bucket/1").build();
        assert_eq!(exp.lifecycle_stage(), LifecycleStage::Active);
        assert!(exp.tags().is_empty());
        assert!(exp.creation_time().is_none());
        assert!(exp.last_update_time().is_none());
    }

    #[test]
    fn test_experiment_tag_lookup() {
        let exp = Experiment::builder("1", "baseline", "s3://bucket/1")
            .tags(vec![
                ExperimentTag::new("team", "vision"),
                ExperimentTag::new("owner", "ml-infra"),
            ])
            .build();
        assert_eq!(exp.tag("owner"), Some("ml-infra"));
        assert_eq!(exp.tag("missing"), None);
    }
}
