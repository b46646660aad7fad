//! Param record - run parameter nested in the run document

use serde::{Deserialize, Serialize};

use super::ToMlflowEntity;
use crate::entities::Param;
use crate::error::require;
use crate::{serde_utils, Result};

const PARAM: &str = "ElasticParam";

/// Stored run parameter. Params are written once and never updated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ElasticParam {
    key: String,
    value: String,
    #[serde(deserialize_with = "serde_utils::id_string")]
    run_id: String,
}

impl ElasticParam {
    /// Create a param record.
    #[must_use]
    pub fn new(run_id: impl Into<String>, key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            run_id: run_id.into(),
        }
    }

    /// Build the stored form of a param logged to `run_id`.
    #[must_use]
    pub fn from_entity(run_id: impl Into<String>, param: &Param) -> Self {
        Self::new(run_id, param.key(), param.value())
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

    /// Get the owning run ID.
    #[must_use]
    pub fn run_id(&self) -> &str {
        &self.run_id
    }
}

impl ToMlflowEntity for ElasticParam {
    type Entity = Param;
    const RECORD: &'static str = PARAM;

    fn to_mlflow_entity(&self) -> Result<Param> {
        require(&self.key, PARAM, "key")?;
        require(&self.run_id, PARAM, "run_id")?;
        Ok(Param::new(self.key.as_str(), self.value.as_str()))
    }
}
