//! # mlflow-elasticsearchstore: Elasticsearch document mapping for experiment tracking
//!
//! Records mirroring the documents an Elasticsearch-backed tracking store
//! keeps (experiments, runs, metric history), and their conversion into the
//! tracking framework's entities.
//!
//! ## Design Principles
//!
//! - **Pure conversion**: a record either yields a complete entity or a
//!   validation error; no partial entities, no side effects
//! - **No clock defaults**: timestamps reflect what was persisted, never the
//!   time of loading
//! - **NaN safety**: the stored `is_nan` flag always wins over the numeric
//!   field
//! - **Explicit identifiers**: the hit `_id` is assigned to the record's own
//!   id field, not kept as hidden metadata
//!
//! ## Example Usage
//!
//! ```rust
//! use mlflow_elasticsearchstore::document::SearchHit;
//! use mlflow_elasticsearchstore::models::{ElasticRun, ToMlflowEntity};
//!
//! let hit: SearchHit = serde_json::from_value(serde_json::json!({
//!     "_index": "mlflow-runs",
//!     "_id": "a1b2c3",
//!     "_source": {
//!         "name": "brave-fox-7",
//!         "source_type": "LOCAL",
//!         "source_name": "train.py",
//!         "experiment_id": 0,
//!         "user_id": "alice",
//!         "status": "FINISHED",
//!         "source_version": "9f1c2ab",
//!         "artifact_uri": "s3://bucket/0/a1b2c3/artifacts",
//!         "latest_metrics": [
//!             {"key": "loss", "value": 0.5, "timestamp": 1714554000000_i64, "step": 3, "is_nan": false}
//!         ],
//!         "params": [{"key": "lr", "value": "0.01", "run_id": "a1b2c3"}]
//!     }
//! }))?;
//!
//! let run = hit.into_record::<ElasticRun>()?.to_mlflow_entity()?;
//! assert_eq!(run.info().run_id(), "a1b2c3");
//! assert_eq!(run.data().param("lr"), Some("0.01"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod config;
pub mod document;
pub mod entities;
pub mod error;
pub mod models;
pub mod serde_utils;

pub use config::IndexConfig;
pub use error::{Error, Result};
pub use models::ToMlflowEntity;
