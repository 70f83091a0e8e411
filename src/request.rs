//! Request files accepted by the `fastdb` binary, and the report it prints.

use fastdb_client::{BatchSearchClient, BatchSearchResult, Transport};
use fastdb_core::{BatchQuerySpec, GroupedResults, JoinQuerySpec, QueryMetrics, SearchStats};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;

/// A batch search described in JSON: a join spec when the object has a
/// `tables` key, a single-table spec otherwise.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchRequest {
    Join(JoinQuerySpec),
    Simple(BatchQuerySpec),
}

impl<'de> Deserialize<'de> for SearchRequest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        let request = if value.get("tables").is_some() {
            serde_json::from_value(value).map(SearchRequest::Join)
        } else {
            serde_json::from_value(value).map(SearchRequest::Simple)
        };
        request.map_err(D::Error::custom)
    }
}

impl SearchRequest {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    pub async fn run<T: Transport>(
        &self,
        client: &BatchSearchClient<T>,
    ) -> fastdb_client::Result<BatchSearchResult> {
        match self {
            SearchRequest::Join(spec) => client.batch_search_with_joins(spec).await,
            SearchRequest::Simple(spec) => client.batch_search(spec).await,
        }
    }
}

/// What the binary prints: the groups, their stats and the metrics.
#[derive(Debug, Serialize)]
pub struct Report {
    pub total_results: usize,
    pub groups: GroupedResults,
    pub stats: SearchStats,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics: Option<QueryMetrics>,
}

impl From<BatchSearchResult> for Report {
    fn from(result: BatchSearchResult) -> Self {
        Self {
            stats: result.stats(),
            total_results: result.total_results,
            groups: result.grouped,
            metrics: result.metrics,
        }
    }
}
