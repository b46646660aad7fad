//! Elasticsearch document records
//!
//! One record per stored document shape. Every record converts into its
//! tracking entity through [`ToMlflowEntity`], and can be built from the
//! entity for the write path.
//!
//! ## Document Layout
//!
//! ```text
//! experiments index:  ElasticExperiment ──< ElasticExperimentTag (nested)
//!
//! runs index:         ElasticRun ──< ElasticLatestMetric (nested, one per key)
//!                                ├──< ElasticParam (nested)
//!                                └──< ElasticTag (nested)
//!
//! metrics index:      ElasticMetric (full history, one document per point)
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use mlflow_elasticsearchstore::models::{ElasticParam, ElasticRun, ToMlflowEntity};
//! use mlflow_elasticsearchstore::entities::RunStatus;
//!
//! let record = ElasticRun::builder("run-001", "0", RunStatus::Running)
//!     .params(vec![ElasticParam::new("run-001", "lr", "0.01")])
//!     .build();
//!
//! let run = record.to_mlflow_entity()?;
//! assert_eq!(run.data().param("lr"), Some("0.01"));
//! # Ok::<(), mlflow_elasticsearchstore::Error>(())
//! ```

mod experiment;
mod metric;
mod param;
mod run;
mod tag;

pub use experiment::{ElasticExperiment, ElasticExperimentBuilder};
pub use metric::{latest_metrics, ElasticLatestMetric, ElasticMetric};
pub use param::ElasticParam;
pub use run::{ElasticRun, ElasticRunBuilder};
pub use tag::{ElasticExperimentTag, ElasticTag};

use crate::Result;

/// Conversion from a stored record to its tracking entity.
///
/// Conversion is pure: it reads only the record's own fields and either
/// returns a complete entity or an error, never a partial entity.
pub trait ToMlflowEntity {
    /// Entity produced by the conversion.
    type Entity;

    /// Record kind used in error messages.
    const RECORD: &'static str;

    /// Convert the record into its entity.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::MissingField`] if a required identifier, key
    /// or timestamp is empty or absent, including in a nested record.
    fn to_mlflow_entity(&self) -> Result<Self::Entity>;
}

/// Convert nested records element-wise, keeping their order.
pub(crate) fn convert_all<T: ToMlflowEntity>(records: &[T]) -> Result<Vec<T::Entity>> {
    records.iter().map(ToMlflowEntity::to_mlflow_entity).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_all_preserves_order() {
        let params = vec![
            ElasticParam::new("r", "z", "1"),
            ElasticParam::new("r", "a", "2"),
            ElasticParam::new("r", "m", "3"),
        ];
        let converted = convert_all(&params).unwrap();
        let keys: Vec<&str> = converted.iter().map(crate::entities::Param::key).collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_convert_all_stops_on_first_error() {
        let params = vec![ElasticParam::new("r", "a", "1"), ElasticParam::new("r", "", "2")];
        assert!(convert_all(&params).is_err());
    }
}
