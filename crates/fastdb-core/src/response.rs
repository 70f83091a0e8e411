//! Response envelope returned by the query endpoint.

use crate::types::TabularResult;
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Top-level response body.
///
/// `success: false` carries the service's `error` message. `success: true`
/// with `data: null` is the documented "no matches" outcome.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct QueryResponse {
    pub success: bool,
    #[serde(default)]
    pub data: Option<TabularResult>,
    #[serde(default)]
    pub error: Option<String>,
    /// Server-side wall time in milliseconds. `0.0` when the service sends
    /// null or something that is not a number.
    #[serde(default, deserialize_with = "lenient_millis")]
    pub elapsed_ms: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics: Option<QueryMetrics>,
}

impl QueryResponse {
    pub fn ok(data: Option<TabularResult>) -> Self {
        Self {
            success: true,
            data,
            ..Self::default()
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            ..Self::default()
        }
    }

    pub fn with_metrics(mut self, metrics: QueryMetrics) -> Self {
        self.metrics = Some(metrics);
        self
    }
}

/// Execution metrics reported by the service, plus the client's own round
/// trip time once the response has been reduced.
///
/// Fields the client does not know about are kept in `extra`, and so is a
/// known field whose value has an unexpected type. Counts accept whole-number
/// floats (`5000.0`).
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct QueryMetrics {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_time_ms: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_time_ms: Option<f64>,
    /// Time spent in the service's dataframe engine.
    #[serde(rename = "polars_time_ms", default, skip_serializing_if = "Option::is_none")]
    pub engine_time_ms: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rows_examined: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rows_returned: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub used_index: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan_type: Option<String>,
    /// Round trip measured by the client, set after the call completes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_elapsed_ms: Option<u64>,
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

impl<'de> Deserialize<'de> for QueryMetrics {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut extra = IndexMap::<String, Value>::deserialize(deserializer)?;
        Ok(Self {
            total_time_ms: take(&mut extra, "total_time_ms", Value::as_f64),
            search_time_ms: take(&mut extra, "search_time_ms", Value::as_f64),
            engine_time_ms: take(&mut extra, "polars_time_ms", Value::as_f64),
            rows_examined: take(&mut extra, "rows_examined", as_count),
            rows_returned: take(&mut extra, "rows_returned", as_count),
            used_index: take(&mut extra, "used_index", Value::as_bool),
            plan_type: take(&mut extra, "plan_type", |v| v.as_str().map(str::to_string)),
            client_elapsed_ms: take(&mut extra, "client_elapsed_ms", as_count),
            extra,
        })
    }
}

/// Remove `key` from `extra` if it decodes. Nulls are dropped; values of the
/// wrong type stay where they are.
fn take<T>(
    extra: &mut IndexMap<String, Value>,
    key: &str,
    decode: impl Fn(&Value) -> Option<T>,
) -> Option<T> {
    let decoded = match extra.get(key)? {
        Value::Null => None,
        value => Some(decode(value)?),
    };
    extra.shift_remove(key);
    decoded
}

fn as_count(value: &Value) -> Option<u64> {
    value.as_u64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.fract() == 0.0 && *f >= 0.0 && *f <= u64::MAX as f64)
            .map(|f| f as u64)
    })
}

fn lenient_millis<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(Value::deserialize(deserializer)?.as_f64().unwrap_or_default())
}
