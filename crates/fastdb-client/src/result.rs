//! Response interpretation: raw HTTP exchange → [`BatchSearchResult`].
//!
//! ```text
//! RawResponse ──status──► NetworkError::Status
//!      │
//!      └─decode─► QueryResponse ──success:false──► SearchError::QueryFailed
//!                       │
//!                       ├─data:null──► empty result
//!                       └─data──► records ──► groups
//! ```

use crate::error::{NetworkError, Result, SearchError};
use crate::transport::RawResponse;
use fastdb_core::{
    compute_stats, group_by_hash, into_records, GroupedResults, QueryMetrics, QueryResponse,
    Record, SearchStats,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Message used when the service reports failure without saying why.
pub const DEFAULT_FAILURE_MESSAGE: &str = "Query failed";

/// Outcome of one batch search.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct BatchSearchResult {
    /// Every record, in service row order.
    pub results: Vec<Record>,
    /// The same records partitioned by search group hash.
    pub grouped: GroupedResults,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics: Option<QueryMetrics>,
    pub total_results: usize,
}

impl BatchSearchResult {
    pub fn is_empty(&self) -> bool {
        self.total_results == 0
    }

    pub fn stats(&self) -> SearchStats {
        compute_stats(&self.grouped)
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// Reject error statuses, then decode the body.
///
/// An error status is reported with the body's `error` field if the body is
/// JSON carrying one, else with the status text. A success body that does not
/// decode is passed on unclassified.
pub fn interpret(raw: RawResponse) -> Result<QueryResponse> {
    if !raw.status.is_success() {
        let message = serde_json::from_slice::<ErrorBody>(&raw.body)
            .ok()
            .and_then(|b| b.error)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| {
                raw.status
                    .canonical_reason()
                    .map(str::to_string)
                    .unwrap_or_else(|| raw.status.to_string())
            });
        return Err(NetworkError::Status {
            status: raw.status.as_u16(),
            message,
        }
        .into());
    }

    serde_json::from_slice(&raw.body).map_err(|e| SearchError::Unclassified(Box::new(e)))
}

/// Turn a decoded response into grouped records.
///
/// `client_elapsed` is recorded into the metrics when rows were returned.
pub fn reduce(response: QueryResponse, client_elapsed: Duration) -> Result<BatchSearchResult> {
    if !response.success {
        let message = response
            .error
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| DEFAULT_FAILURE_MESSAGE.to_string());
        return Err(SearchError::QueryFailed(message));
    }

    let Some(data) = response.data else {
        return Ok(BatchSearchResult {
            metrics: response.metrics,
            ..BatchSearchResult::default()
        });
    };

    let results = into_records(data);
    let grouped = group_by_hash(results.iter().cloned());
    let mut metrics = response.metrics.unwrap_or_default();
    let elapsed_ms = u64::try_from(client_elapsed.as_millis()).unwrap_or(u64::MAX);
    metrics.client_elapsed_ms = Some(elapsed_ms);

    Ok(BatchSearchResult {
        total_results: results.len(),
        results,
        grouped,
        metrics: Some(metrics),
    })
}
