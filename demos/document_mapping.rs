//! Document Mapping Example
//!
//! Loads a search response from the runs index, converts every hit into a
//! tracking run, then writes one run back into its stored form.
//!
//! Run with: RUST_LOG=debug cargo run --example document_mapping

use anyhow::Context;
use mlflow_elasticsearchstore::document::SearchResponse;
use mlflow_elasticsearchstore::models::{latest_metrics, ElasticMetric, ElasticRun};
use mlflow_elasticsearchstore::{IndexConfig, ToMlflowEntity};
use tracing_subscriber::EnvFilter;

const RESPONSE: &str = r#"{
  "took": 4,
  "timed_out": false,
  "hits": {
    "total": {"value": 2, "relation": "eq"},
    "max_score": null,
    "hits": [
      {
        "_index": "mlflow-runs",
        "_id": "7c1e",
        "_score": null,
        "_source": {
          "name": "brave-fox-7",
          "source_type": "LOCAL",
          "source_name": "train.py",
          "experiment_id": 1,
          "user_id": "alice",
          "status": "FINISHED",
          "start_time": "2024-05-01T09:00:00Z",
          "end_time": 1714554300000,
          "source_version": "9f1c2ab",
          "artifact_uri": "s3://mlruns/1/7c1e/artifacts",
          "latest_metrics": [
            {"key": "loss", "value": 0.21, "timestamp": 1714554290000, "step": 99, "is_nan": false},
            {"key": "grad_norm", "value": 0.0, "timestamp": 1714554290000, "step": 99, "is_nan": true}
          ],
          "params": [{"key": "lr", "value": "0.001", "run_id": "7c1e"}],
          "tags": [{"key": "mlflow.user", "value": "alice", "run_id": "7c1e"}]
        }
      },
      {
        "_index": "mlflow-runs",
        "_id": "9d02",
        "_score": null,
        "_source": {
          "name": "calm-owl-3",
          "source_type": "NOTEBOOK",
          "source_name": "explore.ipynb",
          "experiment_id": "1",
          "user_id": "bob",
          "status": "RUNNING",
          "start_time": 1714560000000,
          "source_version": "",
          "lifecycle_stage": "active",
          "artifact_uri": "s3://mlruns/1/9d02/artifacts"
        }
      }
    ]
  }
}"#;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Elasticsearch Document Mapping ===\n");

    let config = IndexConfig::builder().build()?;
    println!("Runs index: {}", config.runs());

    // -------------------------------------------------------------------------
    // 1. Load hits and convert
    // -------------------------------------------------------------------------
    let response = SearchResponse::from_json(RESPONSE).context("parsing search response")?;
    let records: Vec<ElasticRun> = response.records()?;

    for record in &records {
        let run = record.to_mlflow_entity()?;
        let info = run.info();
        println!(
            "\nRun {} ({}) status={} user={}",
            info.run_id(),
            info.run_name(),
            info.status(),
            info.user_id()
        );
        for metric in run.data().metrics() {
            println!("   metric {} = {} @ step {}", metric.key(), metric.value(), metric.step());
        }
        for param in run.data().params() {
            println!("   param  {} = {}", param.key(), param.value());
        }
    }

    // -------------------------------------------------------------------------
    // 2. Fold a metric history into latest values
    // -------------------------------------------------------------------------
    let history: Vec<ElasticMetric> = (0..5)
        .map(|step| ElasticMetric::new("9d02", "loss", 1.0 / f64::from(step + 1), i64::from(step)))
        .map(|m| m.with_timestamp(chrono::Utc::now()))
        .collect();
    let latest = latest_metrics(&history);
    println!("\nLatest loss for 9d02: step {}", latest[0].step());

    // -------------------------------------------------------------------------
    // 3. Write path: entity back to document
    // -------------------------------------------------------------------------
    let run = records[0].to_mlflow_entity()?;
    let stored = ElasticRun::from_entity(&run)?;
    println!(
        "\nStored form:\n{}",
        serde_json::to_string_pretty(&stored).context("serializing run")?
    );

    Ok(())
}
