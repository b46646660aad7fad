//! Index configuration
//!
//! Names of the Elasticsearch indices the storage layer reads and writes.
//! Experiments and runs each live in their own index; tags, params and latest
//! metrics are nested inside their owner, and the full metric history has an
//! index of its own.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Default experiments index name.
pub const DEFAULT_EXPERIMENTS_INDEX: &str = "mlflow-experiments";
/// Default runs index name.
pub const DEFAULT_RUNS_INDEX: &str = "mlflow-runs";
/// Default metric history index name.
pub const DEFAULT_METRICS_INDEX: &str = "mlflow-metrics";

const FORBIDDEN_INDEX_CHARS: &[char] = &['\\', '/', '*', '?', '"', '<', '>', '|', ',', '#'];

/// Resolved index names.
///
/// Deserializing goes through [`IndexConfigBuilder`], so names loaded from a
/// configuration file are validated the same way as built ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "IndexConfigBuilder")]
pub struct IndexConfig {
    experiments: String,
    runs: String,
    metrics: String,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            experiments: DEFAULT_EXPERIMENTS_INDEX.to_string(),
            runs: DEFAULT_RUNS_INDEX.to_string(),
            metrics: DEFAULT_METRICS_INDEX.to_string(),
        }
    }
}

impl IndexConfig {
    /// Create a builder starting from the default index names.
    #[must_use]
    pub fn builder() -> IndexConfigBuilder {
        IndexConfigBuilder::default()
    }

    /// Get the experiments index.
    #[must_use]
    pub fn experiments(&self) -> &str {
        &self.experiments
    }

    /// Get the runs index.
    #[must_use]
    pub fn runs(&self) -> &str {
        &self.runs
    }

    /// Get the metric history index.
    #[must_use]
    pub fn metrics(&self) -> &str {
        &self.metrics
    }
}

/// Builder for `IndexConfig`.
///
/// Also the file form of the configuration: every field is optional and
/// missing names fall back to the defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IndexConfigBuilder {
    prefix: Option<String>,
    experiments: Option<String>,
    runs: Option<String>,
    metrics: Option<String>,
}

impl IndexConfigBuilder {
    /// Prefix every index name as `<prefix>-<index>`.
    #[must_use]
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Override the experiments index name.
    #[must_use]
    pub fn experiments(mut self, name: impl Into<String>) -> Self {
        self.experiments = Some(name.into());
        self
    }

    /// Override the runs index name.
    #[must_use]
    pub fn runs(mut self, name: impl Into<String>) -> Self {
        self.runs = Some(name.into());
        self
    }

    /// Override the metric history index name.
    #[must_use]
    pub fn metrics(mut self, name: impl Into<String>) -> Self {
        self.metrics = Some(name.into());
        self
    }

    /// Build the `IndexConfig`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if the prefix or any resolved index
    /// name breaks Elasticsearch index naming rules.
    pub fn build(self) -> Result<IndexConfig> {
        let Self {
            prefix,
            experiments,
            runs,
            metrics,
        } = self;
        if let Some(prefix) = &prefix {
            validate_index_name(prefix, "prefix")?;
        }
        let resolve = |name: Option<String>, default: &str| -> Result<String> {
            let name = name.unwrap_or_else(|| default.to_string());
            validate_index_name(&name, "index name")?;
            Ok(match &prefix {
                Some(prefix) => format!("{prefix}-{name}"),
                None => name,
            })
        };

        Ok(IndexConfig {
            experiments: resolve(experiments, DEFAULT_EXPERIMENTS_INDEX)?,
            runs: resolve(runs, DEFAULT_RUNS_INDEX)?,
            metrics: resolve(metrics, DEFAULT_METRICS_INDEX)?,
        })
    }
}

impl TryFrom<IndexConfigBuilder> for IndexConfig {
    type Error = Error;

    fn try_from(builder: IndexConfigBuilder) -> Result<Self> {
        builder.build()
    }
}

fn validate_index_name(name: &str, what: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::InvalidConfig(format!("{what} must not be blank")));
    }
    if name.chars().any(char::is_uppercase) {
        return Err(Error::InvalidConfig(format!("{what} {name:?} must be lowercase")));
    }
    if name
        .chars()
        .any(|c| c.is_whitespace() || FORBIDDEN_INDEX_CHARS.contains(&c))
    {
        return Err(Error::InvalidConfig(format!(
            "{what} {name:?} contains a forbidden character"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_index_names() {
        let config = IndexConfig::builder().build().unwrap();
        assert_eq!(config, IndexConfig::default());
        assert_eq!(config.experiments(), "mlflow-experiments");
        assert_eq!(config.runs(), "mlflow-runs");
        assert_eq!(config.metrics(), "mlflow-metrics");
    }

    #[test]
    fn test_prefix_applies_to_all_indices() {
        let config = IndexConfig::builder()
            .prefix("staging")
            .runs("runs-v2")
            .build()
            .unwrap();
        assert_eq!(config.experiments(), "staging-mlflow-experiments");
        assert_eq!(config.runs(), "staging-runs-v2");
        assert_eq!(config.metrics(), "staging-mlflow-metrics");
    }

    #[test]
    fn test_rejects_invalid_names() {
        assert!(IndexConfig::builder().prefix("").build().is_err());
        assert!(IndexConfig::builder().runs("Runs").build().is_err());
        assert!(IndexConfig::builder().metrics("metrics/raw").build().is_err());
        assert!(IndexConfig::builder().experiments("my exps").build().is_err());
    }

    #[test]
    fn test_config_deserializes() {
        let config: IndexConfig = serde_json::from_value(serde_json::json!({
            "experiments": "e",
            "runs": "r",
            "metrics": "m"
        }))
        .unwrap();
        assert_eq!(config.runs(), "r");
    }

    #[test]
    fn test_deserialize_rejects_invalid_names() {
        let err = serde_json::from_value::<IndexConfig>(serde_json::json!({
            "experiments": "My Exps",
            "runs": "",
            "metrics": "a/b"
        }))
        .unwrap_err();
        assert!(err.to_string().contains("Invalid index configuration"));

        assert!(serde_json::from_value::<IndexConfig>(serde_json::json!({"runs": ""})).is_err());
        assert!(
            serde_json::from_value::<IndexConfig>(serde_json::json!({"metrics": "a/b"})).is_err()
        );
    }

    #[test]
    fn test_deserialize_applies_defaults_and_prefix() {
        let config: IndexConfig =
            serde_json::from_value(serde_json::json!({"prefix": "staging"})).unwrap();
        assert_eq!(config.runs(), "staging-mlflow-runs");
        assert_eq!(config.experiments(), "staging-mlflow-experiments");
    }

    #[test]
    fn test_serialized_config_reloads() {
        let config = IndexConfig::builder().prefix("prod").build().unwrap();
        let reloaded: IndexConfig =
            serde_json::from_value(serde_json::to_value(&config).unwrap()).unwrap();
        assert_eq!(reloaded, config);
    }
}
