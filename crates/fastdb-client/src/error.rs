//! Error types for the batch search client.

use fastdb_core::BuildError;
use std::time::Duration;
use thiserror::Error;

/// Boxed error for failures the client has no classification for.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

pub type Result<T, E = SearchError> = std::result::Result<T, E>;

/// Failures reported by a [`Transport`](crate::Transport).
#[derive(Debug, Error)]
pub enum TransportError {
    /// The request could not be delivered or no response came back
    /// (connection refused, reset, closed mid-response).
    #[error("no response from server: {0}")]
    NoResponse(String),

    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// Anything else, passed through untouched.
    #[error(transparent)]
    Other(BoxError),
}

/// The exchange with the service failed at the HTTP level.
#[derive(Debug, Error)]
pub enum NetworkError {
    /// The server answered with an error status. `message` is the body's
    /// `error` field when present, otherwise the status text.
    #[error("API error: {message}")]
    Status { status: u16, message: String },

    #[error("network error: no response from server ({reason})")]
    NoResponse { reason: String },

    #[error("network error: no response from server within {0:?}")]
    Timeout(Duration),
}

/// Errors surfaced by [`BatchSearchClient`](crate::BatchSearchClient).
#[derive(Debug, Error)]
pub enum SearchError {
    /// The request was structurally invalid and was never sent.
    #[error("invalid batch search: {0}")]
    Build(#[from] BuildError),

    /// The service answered `success: false`. Displays as the service's own
    /// message.
    #[error("{0}")]
    QueryFailed(String),

    #[error(transparent)]
    Network(#[from] NetworkError),

    /// Any failure of neither shape above, propagated as-is.
    #[error(transparent)]
    Unclassified(BoxError),
}

impl SearchError {
    pub fn is_query_failed(&self) -> bool {
        matches!(self, SearchError::QueryFailed(_))
    }

    pub fn is_network(&self) -> bool {
        matches!(self, SearchError::Network(_))
    }
}

impl From<TransportError> for SearchError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::NoResponse(reason) => NetworkError::NoResponse { reason }.into(),
            TransportError::Timeout(after) => NetworkError::Timeout(after).into(),
            TransportError::Other(source) => SearchError::Unclassified(source),
        }
    }
}
