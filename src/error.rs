//! Error types for the document mapper
//!
//! Every failure is a validation failure: the stored document (or the record
//! built from it) cannot produce a complete tracking entity.

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Mapper error types
#[derive(Error, Debug)]
pub enum Error {
    /// A required field is absent or empty
    #[error("Missing required field `{field}` on {record}")]
    MissingField {
        /// Record kind, e.g. `ElasticTag`
        record: &'static str,
        /// Field name as stored in the document
        field: &'static str,
    },

    /// A field is present but its value cannot be used
    #[error("Invalid value for `{field}` on {record}: {reason}")]
    InvalidField {
        /// Record kind, e.g. `ElasticRun`
        record: &'static str,
        /// Field name as stored in the document
        field: &'static str,
        /// What is wrong with the value
        reason: String,
    },

    /// The document could not be deserialized into the record shape
    #[error("Invalid {record} document: {source}")]
    InvalidDocument {
        /// Record kind the document was loaded as
        record: &'static str,
        /// Underlying serde error (names the missing or mistyped field)
        #[source]
        source: serde_json::Error,
    },

    /// Index configuration rejected
    #[error("Invalid index configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    /// Name of the offending field, when the error is tied to one.
    #[must_use]
    pub const fn field(&self) -> Option<&'static str> {
        match self {
            Self::MissingField { field, .. } | Self::InvalidField { field, .. } => Some(*field),
            Self::InvalidDocument { .. } | Self::InvalidConfig(_) => None,
        }
    }

    /// Record kind the error was raised for, when known.
    #[must_use]
    pub const fn record(&self) -> Option<&'static str> {
        match self {
            Self::MissingField { record, .. }
            | Self::InvalidField { record, .. }
            | Self::InvalidDocument { record, .. } => Some(*record),
            Self::InvalidConfig(_) => None,
        }
    }
}

/// Fail with [`Error::MissingField`] when a required string is empty.
pub(crate) fn require(value: &str, record: &'static str, field: &'static str) -> Result<()> {
    if value.is_empty() {
        return Err(Error::MissingField { record, field });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_rejects_empty() {
        let err = require("", "ElasticTag", "key").unwrap_err();
        assert_eq!(err.field(), Some("key"));
        assert_eq!(err.record(), Some("ElasticTag"));
    }

    #[test]
    fn test_require_accepts_value() {
        assert!(require("lr", "ElasticParam", "key").is_ok());
    }

    #[test]
    fn test_config_error_has_no_field() {
        let err = Error::InvalidConfig("empty prefix".to_string());
        assert!(err.field().is_none());
        assert!(err.record().is_none());
    }
}
