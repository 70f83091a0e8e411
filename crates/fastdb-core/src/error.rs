//! Errors raised while building a query document.

use thiserror::Error;

/// Structural problems with a batch search request.
///
/// Only the shape of the request is checked. Whether a table or column
/// actually exists is for the service to decide.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    /// A required name (table, node field, target field) was empty.
    #[error("{0} must not be empty")]
    EmptyName(&'static str),

    #[error("at least one target query is required")]
    NoTargetQueries,

    #[error("target query #{0} is empty")]
    EmptyTargetQuery(usize),

    #[error("results_per_query must be greater than zero")]
    ZeroResultsPerQuery,

    #[error("at least one table is required")]
    NoTables,

    /// More than one table was declared but nothing joins them.
    #[error("{0} tables declared but no join given")]
    MissingJoin(usize),

    /// A join names a table that is not in the declared table list.
    #[error("join #{index} references undeclared table {table:?}")]
    UndeclaredTable { index: usize, table: String },

    /// A declared table is not reachable from the first table through joins.
    #[error("table {0:?} is not connected to the join graph")]
    DisconnectedTable(String),
}
