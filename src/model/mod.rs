//! Types that represent the records served by the admin backend, such as `Record`,
//! `ContactQuery`, `User` and `Employee`.
mod amount;
mod contact_query;
mod employee;
mod record;
mod timestamp;
mod user;

pub use amount::{Amount, AmountError, AmountFormat};
pub use contact_query::{ContactQuery, QueryStatus};
pub use employee::Employee;
pub use record::Record;
pub use timestamp::{parse_timestamp, Timestamp};
pub use user::User;

use crate::error::Res;
use anyhow::bail;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::warn;

/// Decodes a batch of JSON values into `T`, skipping (and logging) any entry that does not
/// decode. A malformed entry never fails the batch.
pub(crate) fn decode_batch<T>(kind: &str, values: Vec<Value>) -> Vec<T>
where
    T: DeserializeOwned,
{
    values
        .into_iter()
        .enumerate()
        .filter_map(|(ix, value)| match serde_json::from_value::<T>(value) {
            Ok(item) => Some(item),
            Err(e) => {
                warn!("Skipping malformed {kind} at index {ix}: {e}");
                None
            }
        })
        .collect()
}

/// Unwraps a list response. Backends either return a bare array or wrap it as `{"data": [...]}`.
pub(crate) fn unwrap_envelope(body: Value) -> Res<Vec<Value>> {
    match body {
        Value::Array(items) => Ok(items),
        Value::Object(mut map) => match map.remove("data") {
            Some(Value::Array(items)) => Ok(items),
            Some(other) => bail!("Expected 'data' to be an array but found {}", kind_of(&other)),
            None => bail!("Expected an array or an object with a 'data' array"),
        },
        other => bail!("Expected an array of records but found {}", kind_of(&other)),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Deserializes an optional string field that some backends send as a number (e.g. numeric ids).
/// Absence and `null` stay `None`.
pub(crate) fn lenient_opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

/// Deserializes a required id that may arrive as a string or a number.
pub(crate) fn lenient_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    lenient_opt_string(deserializer)?.ok_or_else(|| serde::de::Error::custom("id is null"))
}

/// Deserializes an optional amount, treating anything unparseable as absent.
pub(crate) fn lenient_amount<'de, D>(deserializer: D) -> Result<Option<Amount>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| serde_json::from_value::<Amount>(v).ok()))
}
