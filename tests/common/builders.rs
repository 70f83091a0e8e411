//! Test builders: ergonomic constructors for tabular payloads, response
//! bodies and specs.
//!
//! These builders are designed for readability in test assertions, not for
//! production use. They panic on invalid input rather than returning `Result`.

use fastdb::{BatchQuerySpec, CellValue, TabularResult};

// ---------------------------------------------------------------------------
// TabularBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for [`TabularResult`] fixtures.
///
/// # Example
///
/// ```rust
/// let tabular = TabularBuilder::new(["titre", "auteurs", "search_group_hash"])
///     .row(["Emma", "Jane Austen", "h1"])
///     .row(["Foundation", "Isaac Asimov", "h2"])
///     .build();
/// ```
pub struct TabularBuilder {
    columns: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl TabularBuilder {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a row. Panics if its width does not match the columns.
    pub fn row<I, C>(mut self, cells: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<CellValue>,
    {
        let row: Vec<CellValue> = cells.into_iter().map(Into::into).collect();
        assert_eq!(
            row.len(),
            self.columns.len(),
            "row width must match column count"
        );
        self.rows.push(row);
        self
    }

    pub fn build(self) -> TabularResult {
        TabularResult::new(self.columns, self.rows)
    }
}

// ---------------------------------------------------------------------------
// Response bodies
// ---------------------------------------------------------------------------

/// `success: true` body carrying `tabular`.
pub fn success_body(tabular: &TabularResult) -> serde_json::Value {
    serde_json::json!({
        "success": true,
        "data": tabular,
        "error": null,
        "elapsed_ms": 3.5,
        "metrics": {
            "search_time_ms": 1.25,
            "rows_examined": 1000,
            "rows_returned": tabular.rows.len(),
            "used_index": true,
            "plan_type": "batch"
        }
    })
}

/// `success: true, data: null`: the "no matches" body.
pub fn no_match_body() -> serde_json::Value {
    serde_json::json!({ "success": true, "data": null, "error": null, "elapsed_ms": 0.8 })
}

/// `success: false` body with the given service message.
pub fn failure_body(message: &str) -> serde_json::Value {
    serde_json::json!({ "success": false, "data": null, "error": message, "elapsed_ms": 0.1 })
}

// ---------------------------------------------------------------------------
// Specs
// ---------------------------------------------------------------------------

/// Batch search for titles by one author in the `books` table.
pub fn books_spec(author: &str, titles: &[&str]) -> BatchQuerySpec {
    BatchQuerySpec::new("books", "auteurs", author, "titre", titles.iter().copied())
}
