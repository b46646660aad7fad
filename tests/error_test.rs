//! Tests for error types

use mlflow_elasticsearchstore::document::from_source;
use mlflow_elasticsearchstore::models::ElasticRun;
use mlflow_elasticsearchstore::Error;

#[test]
fn test_missing_field_error() {
    let error = Error::MissingField {
        record: "ElasticTag",
        field: "key",
    };
    let error_str = format!("{error}");
    assert!(error_str.contains("Missing required field `key`"));
    assert!(error_str.contains("ElasticTag"));
    assert_eq!(error.field(), Some("key"));
}

#[test]
fn test_invalid_field_error() {
    let error = Error::InvalidField {
        record: "ElasticRun",
        field: "run_id",
        reason: "_source holds \"a\" but document _id is \"b\"".to_string(),
    };
    let error_str = format!("{error}");
    assert!(error_str.contains("Invalid value for `run_id`"));
    assert!(error_str.contains("document _id"));
    assert_eq!(error.record(), Some("ElasticRun"));
}

#[test]
fn test_invalid_document_error_keeps_source() {
    let error = from_source::<ElasticRun>(serde_json::json!({"status": "RUNNING"})).unwrap_err();
    let error_str = format!("{error}");
    assert!(error_str.contains("Invalid ElasticRun document"));
    assert!(std::error::Error::source(&error).is_some());
    assert!(error.field().is_none());
}

#[test]
fn test_invalid_config_error() {
    let error = Error::InvalidConfig("prefix must not be blank".to_string());
    let error_str = format!("{error}");
    assert!(error_str.contains("Invalid index configuration"));
    assert!(error_str.contains("prefix"));
}

#[test]
fn test_error_debug() {
    let error = Error::InvalidConfig("debug test".to_string());
    let debug_str = format!("{error:?}");
    assert!(debug_str.contains("InvalidConfig"));
}
