//! Serde helpers for stored document fields
//!
//! Elasticsearch keeps whatever JSON the writer sent in `_source`, so the same
//! logical field can come back in more than one shape. These helpers accept
//! every shape the store produces and normalize it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::{Error, Result};

/// Deserialize an identifier stored either as a string or as an integer.
///
/// Experiment ids in particular are numeric strings that older writers
/// indexed as plain numbers.
pub fn id_string<'de, D>(d: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    id_from_value(Value::deserialize(d)?)
}

/// Like [`id_string`], but `null` becomes an empty identifier.
///
/// Used on identifiers the document `_id` can fill in, so a writer that
/// serialized the id as `null` still loads.
pub fn opt_id_string<'de, D>(d: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(d)? {
        Value::Null => Ok(String::new()),
        other => id_from_value(other),
    }
}

fn id_from_value<E: serde::de::Error>(value: Value) -> std::result::Result<String, E> {
    match value {
        Value::String(s) => Ok(s),
        Value::Number(num) if num.is_i64() || num.is_u64() => Ok(num.to_string()),
        other => Err(E::custom(format!(
            "identifier must be a string or integer, got: {other}"
        ))),
    }
}

/// Deserialize an optional timestamp stored as RFC 3339 or epoch milliseconds.
///
/// `null` and absent fields (with `#[serde(default)]`) map to `None`. The
/// value is never substituted with the current time.
pub fn opt_timestamp<'de, D>(d: D) -> std::result::Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt: Option<Value> = Option::deserialize(d)?;
    match opt {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => DateTime::parse_from_rfc3339(&s)
            .map(|dt| Some(dt.with_timezone(&Utc)))
            .map_err(|e| serde::de::Error::custom(format!("invalid timestamp {s:?}: {e}"))),
        Some(Value::Number(num)) => {
            let millis = num
                .as_i64()
                .ok_or_else(|| serde::de::Error::custom("epoch timestamp must be an integer"))?;
            DateTime::<Utc>::from_timestamp_millis(millis)
                .map(Some)
                .ok_or_else(|| {
                    serde::de::Error::custom(format!("epoch timestamp out of range: {millis}"))
                })
        }
        Some(other) => Err(serde::de::Error::custom(format!(
            "timestamp must be a string, integer or null, got: {other}"
        ))),
    }
}

/// Convert entity epoch milliseconds into a stored timestamp.
pub(crate) fn from_millis(
    millis: i64,
    record: &'static str,
    field: &'static str,
) -> Result<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp_millis(millis).ok_or_else(|| Error::InvalidField {
        record,
        field,
        reason: format!("epoch milliseconds out of range: {millis}"),
    })
}

/// Optional variant of [`from_millis`].
pub(crate) fn from_opt_millis(
    millis: Option<i64>,
    record: &'static str,
    field: &'static str,
) -> Result<Option<DateTime<Utc>>> {
    millis.map(|m| from_millis(m, record, field)).transpose()
}
