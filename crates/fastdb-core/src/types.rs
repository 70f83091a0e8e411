//! Core types for fastdb-core.
//!
//! This module defines the data structures shared by the reducer, the stats
//! helper and the client: the closed [`CellValue`] variant, the service's
//! columnar [`TabularResult`], the per-row [`Record`], and the
//! insertion-ordered [`GroupedResults`].

use indexmap::IndexMap;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// Column carrying the service-assigned group hash on every result row.
pub const SEARCH_GROUP_HASH: &str = "search_group_hash";

/// Column carrying the match score, when the service reports one.
pub const SCORE: &str = "score";

/// Group key used for rows whose hash is missing or empty.
pub const UNKNOWN_GROUP: &str = "unknown";

// ---------------------------------------------------------------------------
// CellValue
// ---------------------------------------------------------------------------

/// A single cell of a tabular response.
///
/// The service only ever emits strings, numbers, booleans and nulls, so the
/// variant is closed. Numbers keep their JSON representation (an integer year
/// stays `1998`, not `1998.0`).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    #[default]
    Null,
    Bool(bool),
    Number(serde_json::Number),
    String(String),
}

impl CellValue {
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            CellValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => n.as_f64(),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            CellValue::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            CellValue::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl std::fmt::Display for CellValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CellValue::Null => write!(f, "null"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Number(n) => write!(f, "{n}"),
            CellValue::String(s) => write!(f, "{s}"),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::String(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::String(s)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

impl From<i64> for CellValue {
    fn from(n: i64) -> Self {
        CellValue::Number(n.into())
    }
}

impl From<f64> for CellValue {
    /// Non-finite floats have no JSON form and become [`CellValue::Null`].
    fn from(n: f64) -> Self {
        serde_json::Number::from_f64(n)
            .map(CellValue::Number)
            .unwrap_or(CellValue::Null)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(CellValue::Null)
    }
}

// ---------------------------------------------------------------------------
// TabularResult
// ---------------------------------------------------------------------------

/// The service's columnar payload: one shared column list and a row-major
/// cell matrix.
///
/// Every row is expected to carry exactly `columns.len()` cells. That is a
/// protocol guarantee of the service and is not re-validated here.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TabularResult {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
    /// Row count as reported by the service.
    #[serde(default)]
    pub row_count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

impl TabularResult {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        let row_count = rows.len();
        Self {
            columns,
            rows,
            row_count,
            metadata: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Record
// ---------------------------------------------------------------------------

/// One result row, keyed by column name in column order.
///
/// Besides the raw columns, a record always knows which target query produced
/// it (`search_group_hash`, [`UNKNOWN_GROUP`] when the service left it out)
/// and its numeric `score`, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    fields: IndexMap<String, CellValue>,
    search_group_hash: String,
    score: Option<f64>,
}

impl Record {
    /// Build a record from its columns, deriving the group hash and score.
    pub fn from_fields(fields: IndexMap<String, CellValue>) -> Self {
        let search_group_hash = group_key(fields.get(SEARCH_GROUP_HASH));
        let score = fields.get(SCORE).and_then(CellValue::as_f64);
        Self {
            fields,
            search_group_hash,
            score,
        }
    }

    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.fields.get(column)
    }

    pub fn search_group_hash(&self) -> &str {
        &self.search_group_hash
    }

    pub fn score(&self) -> Option<f64> {
        self.score
    }

    pub fn fields(&self) -> &IndexMap<String, CellValue> {
        &self.fields
    }

    /// Columns and their values, in service column order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CellValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Normalise a raw hash cell into a group key.
///
/// Only strings and numbers name a group. A non-empty string is the key as
/// is; any number, `0` included, keys by its decimal form. Booleans, nulls,
/// empty strings and a missing column all fall into [`UNKNOWN_GROUP`].
fn group_key(cell: Option<&CellValue>) -> String {
    match cell {
        Some(CellValue::String(s)) if !s.is_empty() => s.clone(),
        Some(CellValue::Number(n)) => n.to_string(),
        _ => UNKNOWN_GROUP.to_string(),
    }
}

/// Serialises as a flat object of every column, with `search_group_hash`
/// always present and normalised.
impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let has_hash = self.fields.contains_key(SEARCH_GROUP_HASH);
        let len = self.fields.len() + usize::from(!has_hash);

        let mut map = serializer.serialize_map(Some(len))?;
        for (k, v) in &self.fields {
            if k == SEARCH_GROUP_HASH {
                map.serialize_entry(k, &self.search_group_hash)?;
            } else {
                map.serialize_entry(k, v)?;
            }
        }
        if !has_hash {
            map.serialize_entry(SEARCH_GROUP_HASH, &self.search_group_hash)?;
        }
        map.end()
    }
}

// ---------------------------------------------------------------------------
// GroupedResults
// ---------------------------------------------------------------------------

/// Records partitioned by search group hash.
///
/// Groups iterate in discovery order (the order in which each hash first
/// appeared in the response) and records keep service row order inside each
/// group.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct GroupedResults {
    groups: IndexMap<String, Vec<Record>>,
}

impl GroupedResults {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, hash: &str) -> Option<&[Record]> {
        self.groups.get(hash).map(Vec::as_slice)
    }

    /// Number of distinct groups.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Record])> {
        self.groups.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Total number of records across every group.
    pub fn total_records(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    /// Insert (or replace) a whole group.
    ///
    /// The reducer never produces an empty group; this is the only way one
    /// can exist.
    pub fn insert_group(&mut self, hash: impl Into<String>, records: Vec<Record>) {
        self.groups.insert(hash.into(), records);
    }

    /// Append a record to the group named by its own hash, creating the group
    /// at the end of the iteration order if it is new.
    pub(crate) fn push(&mut self, record: Record) {
        self.groups
            .entry(record.search_group_hash.clone())
            .or_default()
            .push(record);
    }
}

impl<'a> IntoIterator for &'a GroupedResults {
    type Item = (&'a String, &'a Vec<Record>);
    type IntoIter = indexmap::map::Iter<'a, String, Vec<Record>>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.iter()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
