//! fastdb-core: protocol layer of the Fast-DB batch search client.
//!
//! A batch search matches one fixed *node* value (an author, an artist)
//! against many *target* values (titles, albums) in a single round trip. This
//! crate holds everything about that exchange that does not touch the
//! network:
//!
//! ```text
//! BatchQuerySpec / JoinQuerySpec ──► query ──► WireQuery ──► (transport)
//!                                                               │
//! SearchStats ◄── stats ◄── GroupedResults ◄── reducer ◄── QueryResponse
//! ```
//!
//! Every value here is built per request and owned by the caller; there is no
//! shared state.

pub mod config;
pub mod error;
pub mod query;
pub mod reducer;
pub mod response;
pub mod stats;
pub mod types;

pub use config::{ClientConfig, Config};
pub use error::BuildError;
pub use query::{
    build_join_query, build_simple_query, BatchPredicate, BatchQuerySpec, JoinCondition,
    JoinKind, JoinQuerySpec, Projection, QueryRequest, SortOrder, Source, WireQuery,
};
pub use reducer::{group_by_hash, into_records, to_records};
pub use response::{QueryMetrics, QueryResponse};
pub use stats::{compute_stats, SearchStats};
pub use types::{CellValue, GroupedResults, Record, TabularResult, UNKNOWN_GROUP};
