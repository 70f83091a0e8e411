//! fastdb: Fast-DB batch search client.
//!
//! Facade over the two workspace crates so that integration tests, benches
//! and the `fastdb` binary can import everything from one place.
//!
//! # Architecture
//!
//! ```text
//! fastdb-core:   spec ──► query builder ──► WireQuery
//!                                              │
//! fastdb-client:                         Transport::post
//!                                              │
//! fastdb-core:   SearchStats ◄── GroupedResults ◄── reducer
//! ```
//!
//! The query builder and reducer are pure and synchronous; the only await
//! point of a batch search is the transport call.

pub use fastdb_client::{
    albums_by_artist, BatchSearchClient, BatchSearchResult, BoxError, HttpTransport,
    NetworkError, RawResponse, SearchError, Transport, TransportError, DEFAULT_MAX_PER_TARGET,
};
pub use fastdb_core::{
    build_join_query, build_simple_query, compute_stats, group_by_hash, into_records,
    to_records, BatchPredicate, BatchQuerySpec, BuildError, CellValue, ClientConfig, Config,
    GroupedResults, JoinCondition, JoinKind, JoinQuerySpec, Projection, QueryMetrics,
    QueryRequest, QueryResponse, Record, SearchStats, SortOrder, Source, TabularResult,
    WireQuery, UNKNOWN_GROUP,
};

pub mod request;
