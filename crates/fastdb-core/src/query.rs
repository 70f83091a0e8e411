//! Query builder: turns batch search specs into the service's query document.
//!
//! Two entry points: [`build_simple_query`] for a batch search over one table
//! and [`build_join_query`] for a batch search over an explicit join chain with
//! optional ordering and a global limit. Both are pure and only check the
//! shape of the request; table and column names are passed through unresolved
//! for the remote planner to qualify.
//!
//! # Wire shape
//!
//! ```text
//! { "query": { "$select", "$from", "$join"?, "$where": { "$batch": {..} },
//!              "$orderBy"?, "$limit"? },
//!   "include_metrics": bool }
//! ```

use crate::error::BuildError;
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::{HashMap, HashSet, VecDeque};

/// Per-target result cap used when the caller does not choose one.
pub const DEFAULT_RESULTS_PER_QUERY: u32 = 10;

/// Projection entry selecting every column.
pub const WILDCARD: &str = "*";

fn default_fuzzy() -> bool { true }
fn default_results_per_query() -> u32 { DEFAULT_RESULTS_PER_QUERY }

// ---------------------------------------------------------------------------
// Projection
// ---------------------------------------------------------------------------

/// The `$select` clause: either a list of (possibly qualified) columns, or a
/// mapping from output alias to (possibly qualified) column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Projection {
    Columns(Vec<String>),
    Rename(IndexMap<String, String>),
}

impl Projection {
    /// `["*"]`
    pub fn all() -> Self {
        Projection::Columns(vec![WILDCARD.to_string()])
    }

    pub fn columns<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Projection::Columns(columns.into_iter().map(Into::into).collect())
    }

    /// Alias → column pairs, kept in the order given.
    pub fn rename<I, A, C>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (A, C)>,
        A: Into<String>,
        C: Into<String>,
    {
        Projection::Rename(
            pairs
                .into_iter()
                .map(|(alias, column)| (alias.into(), column.into()))
                .collect(),
        )
    }
}

impl Default for Projection {
    fn default() -> Self {
        Self::all()
    }
}

// ---------------------------------------------------------------------------
// Joins and ordering
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JoinKind {
    #[default]
    Inner,
    Left,
    Right,
    Full,
}

impl std::fmt::Display for JoinKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JoinKind::Inner => write!(f, "inner"),
            JoinKind::Left => write!(f, "left"),
            JoinKind::Right => write!(f, "right"),
            JoinKind::Full => write!(f, "full"),
        }
    }
}

/// One link of a join chain. The service evaluates joins left to right in
/// the order they are listed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinCondition {
    #[serde(rename = "$type")]
    pub kind: JoinKind,
    #[serde(rename = "$left")]
    pub left: String,
    #[serde(rename = "$right")]
    pub right: String,
    /// `(left column, right column)`
    #[serde(rename = "$on")]
    pub on: (String, String),
}

impl JoinCondition {
    pub fn new(
        kind: JoinKind,
        left: impl Into<String>,
        right: impl Into<String>,
        left_column: impl Into<String>,
        right_column: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            left: left.into(),
            right: right.into(),
            on: (left_column.into(), right_column.into()),
        }
    }

    pub fn inner(
        left: impl Into<String>,
        right: impl Into<String>,
        left_column: impl Into<String>,
        right_column: impl Into<String>,
    ) -> Self {
        Self::new(JoinKind::Inner, left, right, left_column, right_column)
    }
}

/// Sort direction for `$orderBy`, encoded on the wire as `1` / `-1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl Serialize for SortOrder {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            SortOrder::Ascending => serializer.serialize_i8(1),
            SortOrder::Descending => serializer.serialize_i8(-1),
        }
    }
}

impl<'de> Deserialize<'de> for SortOrder {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match i64::deserialize(deserializer)? {
            n if n > 0 => Ok(SortOrder::Ascending),
            n if n < 0 => Ok(SortOrder::Descending),
            _ => Err(serde::de::Error::custom("sort order must be 1 or -1")),
        }
    }
}

// ---------------------------------------------------------------------------
// Caller-facing specs
// ---------------------------------------------------------------------------

/// A batch search over a single table: one fixed node value, many targets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchQuerySpec {
    pub table: String,
    pub node_field: String,
    pub node_query: String,
    pub target_field: String,
    pub target_queries: Vec<String>,
    #[serde(default)]
    pub projection: Projection,
    #[serde(default = "default_fuzzy")]
    pub fuzzy: bool,
    #[serde(default = "default_results_per_query")]
    pub results_per_query: u32,
}

impl BatchQuerySpec {
    /// New spec with the documented fallbacks: projection `["*"]`, fuzzy
    /// matching on, [`DEFAULT_RESULTS_PER_QUERY`] results per target.
    pub fn new<I, S>(
        table: impl Into<String>,
        node_field: impl Into<String>,
        node_query: impl Into<String>,
        target_field: impl Into<String>,
        target_queries: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            table: table.into(),
            node_field: node_field.into(),
            node_query: node_query.into(),
            target_field: target_field.into(),
            target_queries: target_queries.into_iter().map(Into::into).collect(),
            projection: Projection::default(),
            fuzzy: default_fuzzy(),
            results_per_query: DEFAULT_RESULTS_PER_QUERY,
        }
    }

    pub fn with_projection(mut self, projection: Projection) -> Self {
        self.projection = projection;
        self
    }

    pub fn with_fuzzy(mut self, fuzzy: bool) -> Self {
        self.fuzzy = fuzzy;
        self
    }

    pub fn with_results_per_query(mut self, n: u32) -> Self {
        self.results_per_query = n;
        self
    }
}

/// A batch search over an explicit join chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinQuerySpec {
    pub tables: Vec<String>,
    pub joins: Vec<JoinCondition>,
    pub node_field: String,
    pub node_query: String,
    pub target_field: String,
    pub target_queries: Vec<String>,
    /// `None` selects every column.
    #[serde(default)]
    pub projection: Option<Projection>,
    #[serde(default = "default_fuzzy")]
    pub fuzzy: bool,
    #[serde(default = "default_results_per_query")]
    pub results_per_query: u32,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub order_by: IndexMap<String, SortOrder>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
}

impl JoinQuerySpec {
    pub fn new<T, S, Q, R>(
        tables: T,
        joins: Vec<JoinCondition>,
        node_field: impl Into<String>,
        node_query: impl Into<String>,
        target_field: impl Into<String>,
        target_queries: Q,
    ) -> Self
    where
        T: IntoIterator<Item = S>,
        S: Into<String>,
        Q: IntoIterator<Item = R>,
        R: Into<String>,
    {
        Self {
            tables: tables.into_iter().map(Into::into).collect(),
            joins,
            node_field: node_field.into(),
            node_query: node_query.into(),
            target_field: target_field.into(),
            target_queries: target_queries.into_iter().map(Into::into).collect(),
            projection: None,
            fuzzy: default_fuzzy(),
            results_per_query: DEFAULT_RESULTS_PER_QUERY,
            order_by: IndexMap::new(),
            limit: None,
        }
    }

    pub fn with_projection(mut self, projection: Projection) -> Self {
        self.projection = Some(projection);
        self
    }

    pub fn with_fuzzy(mut self, fuzzy: bool) -> Self {
        self.fuzzy = fuzzy;
        self
    }

    pub fn with_results_per_query(mut self, n: u32) -> Self {
        self.results_per_query = n;
        self
    }

    /// Add a sort key. New keys sort after those already present; setting an
    /// existing key again changes its direction but keeps its position.
    pub fn order_by(mut self, field: impl Into<String>, order: SortOrder) -> Self {
        self.order_by.insert(field.into(), order);
        self
    }

    pub fn with_limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }
}

// ---------------------------------------------------------------------------
// Wire document
// ---------------------------------------------------------------------------

/// Request body posted to the query endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryRequest {
    pub query: WireQuery,
    #[serde(default)]
    pub include_metrics: bool,
}

impl QueryRequest {
    pub fn new(query: WireQuery, include_metrics: bool) -> Self {
        Self {
            query,
            include_metrics,
        }
    }
}

/// The query document itself. Built fresh for every call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireQuery {
    #[serde(rename = "$select")]
    pub select: Projection,
    #[serde(rename = "$from")]
    pub from: Source,
    #[serde(rename = "$join", default, skip_serializing_if = "Option::is_none")]
    pub join: Option<Vec<JoinCondition>>,
    #[serde(rename = "$where")]
    pub filter: WhereClause,
    #[serde(rename = "$orderBy", default, skip_serializing_if = "Option::is_none")]
    pub order_by: Option<IndexMap<String, SortOrder>>,
    #[serde(rename = "$limit", default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
}

impl WireQuery {
    pub fn batch(&self) -> &BatchPredicate {
        &self.filter.batch
    }
}

/// `$from`: a single table, or the table list of a join chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Source {
    Table(String),
    Tables(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WhereClause {
    #[serde(rename = "$batch")]
    pub batch: BatchPredicate,
}

/// The batch predicate evaluated by the service: one node criterion, many
/// target criteria, fuzziness and a per-target cap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchPredicate {
    #[serde(rename = "$node_field")]
    pub node_field: String,
    #[serde(rename = "$node_query")]
    pub node_query: String,
    #[serde(rename = "$target_field")]
    pub target_field: String,
    #[serde(rename = "$target_queries")]
    pub target_queries: Vec<String>,
    #[serde(rename = "$fuzzy")]
    pub fuzzy: bool,
    #[serde(rename = "$results_per_query")]
    pub results_per_query: u32,
}

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

/// Build the query document for a single-table batch search.
pub fn build_simple_query(spec: &BatchQuerySpec) -> Result<WireQuery, BuildError> {
    require_name("table", &spec.table)?;
    let batch = batch_predicate(
        &spec.node_field,
        &spec.node_query,
        &spec.target_field,
        &spec.target_queries,
        spec.fuzzy,
        spec.results_per_query,
    )?;

    Ok(WireQuery {
        select: spec.projection.clone(),
        from: Source::Table(spec.table.clone()),
        join: None,
        filter: WhereClause { batch },
        order_by: None,
        limit: None,
    })
}

/// Build the query document for a batch search over a join chain.
///
/// The join list is emitted in the order supplied.
pub fn build_join_query(spec: &JoinQuerySpec) -> Result<WireQuery, BuildError> {
    check_join_graph(&spec.tables, &spec.joins)?;
    let batch = batch_predicate(
        &spec.node_field,
        &spec.node_query,
        &spec.target_field,
        &spec.target_queries,
        spec.fuzzy,
        spec.results_per_query,
    )?;

    Ok(WireQuery {
        select: spec.projection.clone().unwrap_or_default(),
        from: Source::Tables(spec.tables.clone()),
        join: (!spec.joins.is_empty()).then(|| spec.joins.clone()),
        filter: WhereClause { batch },
        order_by: (!spec.order_by.is_empty()).then(|| spec.order_by.clone()),
        limit: spec.limit,
    })
}

fn require_name(what: &'static str, value: &str) -> Result<(), BuildError> {
    if value.trim().is_empty() {
        Err(BuildError::EmptyName(what))
    } else {
        Ok(())
    }
}

fn batch_predicate(
    node_field: &str,
    node_query: &str,
    target_field: &str,
    target_queries: &[String],
    fuzzy: bool,
    results_per_query: u32,
) -> Result<BatchPredicate, BuildError> {
    require_name("node_field", node_field)?;
    require_name("target_field", target_field)?;
    if target_queries.is_empty() {
        return Err(BuildError::NoTargetQueries);
    }
    if let Some(i) = target_queries.iter().position(|q| q.trim().is_empty()) {
        return Err(BuildError::EmptyTargetQuery(i));
    }
    if results_per_query == 0 {
        return Err(BuildError::ZeroResultsPerQuery);
    }

    Ok(BatchPredicate {
        node_field: node_field.to_string(),
        node_query: node_query.to_string(),
        target_field: target_field.to_string(),
        target_queries: target_queries.to_vec(),
        fuzzy,
        results_per_query,
    })
}

/// Every join must name declared tables, and every declared table must be
/// reachable from the first one.
fn check_join_graph(tables: &[String], joins: &[JoinCondition]) -> Result<(), BuildError> {
    let Some(first) = tables.first() else {
        return Err(BuildError::NoTables);
    };
    for table in tables {
        require_name("table", table)?;
    }
    if tables.len() > 1 && joins.is_empty() {
        return Err(BuildError::MissingJoin(tables.len()));
    }

    let declared: HashSet<&str> = tables.iter().map(String::as_str).collect();
    let mut edges: HashMap<&str, Vec<&str>> = HashMap::new();
    for (index, join) in joins.iter().enumerate() {
        for side in [&join.left, &join.right] {
            if !declared.contains(side.as_str()) {
                return Err(BuildError::UndeclaredTable {
                    index,
                    table: side.clone(),
                });
            }
        }
        edges.entry(&join.left).or_default().push(&join.right);
        edges.entry(&join.right).or_default().push(&join.left);
    }

    let mut reached: HashSet<&str> = HashSet::from([first.as_str()]);
    let mut queue = VecDeque::from([first.as_str()]);
    while let Some(table) = queue.pop_front() {
        for &next in edges.get(table).into_iter().flatten() {
            if reached.insert(next) {
                queue.push_back(next);
            }
        }
    }

    match tables.iter().find(|t| !reached.contains(t.as_str())) {
        Some(isolated) => Err(BuildError::DisconnectedTable(isolated.clone())),
        None => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
