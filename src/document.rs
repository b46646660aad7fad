//! Loading records from Elasticsearch documents
//!
//! The storage layer fetches documents; this module turns the raw JSON into
//! records. [`SearchResponse`] mirrors the `hits` envelope of the search API
//! response body.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::IndexConfig;
use crate::models::ToMlflowEntity;
use crate::{Error, Result};

/// A record stored as a top-level document in its own index.
pub trait ElasticDocument: ToMlflowEntity + DeserializeOwned {
    /// Index holding documents of this kind.
    fn index_name(config: &IndexConfig) -> &str;

    /// Identifier the document is stored under, when the record owns one.
    fn document_id(&self) -> Option<&str> {
        None
    }

    /// Attach the hit `_id` to the record.
    ///
    /// Records without an owned identifier ignore it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidField`] if the record already carries a
    /// different identifier.
    fn assign_document_id(&mut self, _id: &str) -> Result<()> {
        Ok(())
    }
}

/// Deserialize a record from a `_source` object.
///
/// # Errors
///
/// Returns [`Error::InvalidDocument`] if a required field is missing or has
/// the wrong type.
pub fn from_source<T>(source: Value) -> Result<T>
where
    T: ToMlflowEntity + DeserializeOwned,
{
    serde_json::from_value(source).map_err(|source| Error::InvalidDocument {
        record: T::RECORD,
        source,
    })
}

/// Deserialize a record from a `_source` JSON string.
///
/// # Errors
///
/// Returns [`Error::InvalidDocument`] if the text is not valid JSON or does
/// not match the record shape.
pub fn from_json<T>(json: &str) -> Result<T>
where
    T: ToMlflowEntity + DeserializeOwned,
{
    serde_json::from_str(json).map_err(|source| Error::InvalidDocument {
        record: T::RECORD,
        source,
    })
}

/// Store `id` in an owned identifier field.
pub(crate) fn assign_owned_id(
    slot: &mut String,
    id: &str,
    record: &'static str,
    field: &'static str,
) -> Result<()> {
    if slot.is_empty() {
        tracing::trace!(record, field, id, "assigned document id");
        *slot = id.to_string();
        return Ok(());
    }
    if slot.as_str() != id {
        tracing::warn!(record, field, stored = %slot, id, "document id conflicts with _source");
        return Err(Error::InvalidField {
            record,
            field,
            reason: format!("_source holds {slot:?} but document _id is {id:?}"),
        });
    }
    Ok(())
}

/// One hit of a search (or a get) response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit<T = Value> {
    /// Index the document was found in
    #[serde(rename = "_index")]
    pub index: String,
    /// Document identifier
    #[serde(rename = "_id")]
    pub id: String,
    /// Relevance score, absent for sorted queries
    #[serde(rename = "_score", default)]
    pub score: Option<f64>,
    /// Stored document body
    #[serde(rename = "_source")]
    pub source: T,
}

impl SearchHit<Value> {
    /// Load the hit's `_source` as a record and attach its `_id`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDocument`] for a malformed `_source`, or
    /// [`Error::InvalidField`] when `_source` names a different identifier
    /// than `_id`.
    pub fn into_record<T: ElasticDocument>(self) -> Result<T> {
        let mut record: T = from_source(self.source)?;
        record.assign_document_id(&self.id)?;
        Ok(record)
    }
}

/// Whether `hits.total.value` is exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HitsTotalRelation {
    /// Exact count
    #[serde(rename = "eq")]
    Accurate,
    /// Lower bound (track_total_hits cut-off)
    #[serde(rename = "gte")]
    LowerBound,
}

/// Total hit count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HitsTotal {
    /// Number of matching documents
    pub value: u64,
    /// Whether `value` is exact
    pub relation: HitsTotalRelation,
}

/// The `hits` object of a search response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hits {
    /// Total hit count, absent when total tracking is disabled
    #[serde(default)]
    pub total: Option<HitsTotal>,
    /// Highest score among the hits
    #[serde(default)]
    pub max_score: Option<f64>,
    /// Returned page of hits
    pub hits: Vec<SearchHit>,
}

/// Body of a search response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    /// Milliseconds the search took
    #[serde(default)]
    pub took: Option<u64>,
    /// Whether the search timed out
    #[serde(default)]
    pub timed_out: Option<bool>,
    /// Matching documents
    pub hits: Hits,
}

impl SearchResponse {
    /// Parse a search response body.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDocument`] if the body is not a search response.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|source| Error::InvalidDocument {
            record: "SearchResponse",
            source,
        })
    }

    /// Load every hit as a record, in hit order.
    ///
    /// # Errors
    ///
    /// Fails on the first hit that does not load; see
    /// [`SearchHit::into_record`].
    pub fn records<T: ElasticDocument>(self) -> Result<Vec<T>> {
        tracing::debug!(
            record = T::RECORD,
            hits = self.hits.hits.len(),
            took_ms = ?self.took,
            "loading search hits"
        );
        self.hits
            .hits
            .into_iter()
            .map(|hit| hit.into_record::<T>())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ElasticMetric, ElasticRun, ElasticTag};

    fn run_source() -> Value {
        serde_json::json!({
            "name": "brave-fox-7",
            "source_type": "LOCAL",
            "source_name": "train.py",
            "experiment_id": 1,
            "user_id": "alice",
            "status": "RUNNING",
            "start_time": "2024-05-01T09:00:00Z",
            "source_version": "9f1c2ab",
            "artifact_uri": "s3://bucket/1/abc/artifacts"
        })
    }

    #[test]
    fn test_from_source_names_record_on_error() {
        let err = from_source::<ElasticTag>(serde_json::json!({"value": "v", "run_id": "r"}))
            .unwrap_err();
        assert_eq!(err.record(), Some("ElasticTag"));
        assert!(err.to_string().contains("key"));
    }

    #[test]
    fn test_from_json_rejects_malformed_text() {
        assert!(from_json::<ElasticTag>("{not json").is_err());
    }

    #[test]
    fn test_hit_assigns_id() {
        let hit = SearchHit {
            index: "mlflow-runs".to_string(),
            id: "abc".to_string(),
            score: None,
            source: run_source(),
        };
        let run: ElasticRun = hit.into_record().unwrap();
        assert_eq!(run.run_id(), "abc");
        assert_eq!(run.experiment_id(), "1");
    }

    #[test]
    fn test_hit_with_conflicting_id_fails() {
        let mut source = run_source();
        source["run_id"] = Value::from("other");
        let hit = SearchHit {
            index: "mlflow-runs".to_string(),
            id: "abc".to_string(),
            score: None,
            source,
        };
        let err = hit.into_record::<ElasticRun>().unwrap_err();
        assert_eq!(err.field(), Some("run_id"));
    }

    #[test]
    fn test_metric_ignores_hit_id() {
        let hit = SearchHit {
            index: "mlflow-metrics".to_string(),
            id: "generated-id".to_string(),
            score: Some(1.0),
            source: serde_json::json!({
                "key": "loss",
                "value": 0.25,
                "timestamp": 1_714_554_000_000_i64,
                "step": 4,
                "is_nan": false,
                "run_id": "abc"
            }),
        };
        let metric: ElasticMetric = hit.into_record().unwrap();
        assert!(metric.document_id().is_none());
        assert_eq!(metric.run_id(), "abc");
    }

    #[test]
    fn test_search_response_records() {
        let body = serde_json::json!({
            "took": 3,
            "timed_out": false,
            "hits": {
                "total": {"value": 1, "relation": "eq"},
                "max_score": 1.0,
                "hits": [
                    {"_index": "mlflow-runs", "_id": "abc", "_score": 1.0, "_source": run_source()}
                ]
            }
        });
        let response = SearchResponse::from_json(&body.to_string()).unwrap();
        assert_eq!(
            response.hits.total,
            Some(HitsTotal {
                value: 1,
                relation: HitsTotalRelation::Accurate
            })
        );
        let runs: Vec<ElasticRun> = response.records().unwrap();
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].run_id(), "abc");
    }

    #[test]
    fn test_index_names_follow_config() {
        let config = IndexConfig::builder().prefix("ci").build().unwrap();
        assert_eq!(ElasticRun::index_name(&config), "ci-mlflow-runs");
        assert_eq!(ElasticMetric::index_name(&config), "ci-mlflow-metrics");
    }
}
