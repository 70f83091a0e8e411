//! [`BatchSearchClient`]: build, send, reduce.
//!
//! A client holds only its immutable [`ClientConfig`] and a transport, so one
//! instance can serve any number of concurrent batch searches. Each call
//! builds its own query document and reduces its own response; the client
//! adds no locking, ordering, retries or timeouts of its own.

use crate::error::{Result, SearchError};
use crate::result::{interpret, reduce, BatchSearchResult};
use crate::transport::{HttpTransport, Transport};
use bytes::Bytes;
use fastdb_core::{
    build_join_query, build_simple_query, compute_stats, BatchQuerySpec, ClientConfig,
    GroupedResults, JoinCondition, JoinQuerySpec, Projection, QueryRequest, SearchStats,
    WireQuery,
};
use std::time::Instant;
use tracing::{debug, warn};

/// Per-target cap of the convenience searches.
pub const DEFAULT_MAX_PER_TARGET: u32 = 3;

pub struct BatchSearchClient<T = HttpTransport> {
    config: ClientConfig,
    transport: T,
}

impl BatchSearchClient<HttpTransport> {
    /// Client over plain HTTP, pointed at `config.base_url`.
    pub fn new(config: ClientConfig) -> Self {
        let transport = HttpTransport::from_config(&config);
        Self { config, transport }
    }
}

impl Default for BatchSearchClient<HttpTransport> {
    fn default() -> Self {
        Self::new(ClientConfig::default())
    }
}

impl<T: Transport> BatchSearchClient<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Batch search over a single table.
    pub async fn batch_search(&self, spec: &BatchQuerySpec) -> Result<BatchSearchResult> {
        let query = build_simple_query(spec)?;
        self.execute(query).await
    }

    /// Batch search over an explicit join chain.
    pub async fn batch_search_with_joins(&self, spec: &JoinQuerySpec) -> Result<BatchSearchResult> {
        let query = build_join_query(spec)?;
        self.execute(query).await
    }

    /// Search `target_values` within the scope of `node_value`, fuzzily, with
    /// at most `max_per_target` rows per target. `None` projects every column.
    #[allow(clippy::too_many_arguments)]
    pub async fn search_related_items<I, S>(
        &self,
        table: &str,
        node_field: &str,
        node_value: &str,
        target_field: &str,
        target_values: I,
        projection: Option<Projection>,
        max_per_target: u32,
    ) -> Result<BatchSearchResult>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let spec = BatchQuerySpec::new(table, node_field, node_value, target_field, target_values)
            .with_projection(projection.unwrap_or_default())
            .with_fuzzy(true)
            .with_results_per_query(max_per_target);
        self.batch_search(&spec).await
    }

    /// Titles by one author in the `books` table.
    #[deprecated(note = "use `search_related_items` instead")]
    pub async fn search_book_series<I, S>(
        &self,
        author: &str,
        titles: I,
        max_per_title: u32,
    ) -> Result<BatchSearchResult>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.search_related_items(
            "books",
            "auteurs",
            author,
            "titre",
            titles,
            Some(Projection::columns(["titre", "auteurs"])),
            max_per_title,
        )
        .await
    }

    /// Albums by one artist, through the `id_artists ⋈ album_artist ⋈ albums`
    /// chain. Rows carry `artist`, `album_title` and `release_year`.
    pub async fn search_albums_by_artist<I, S>(
        &self,
        artist: &str,
        albums: I,
        max_per_album: u32,
    ) -> Result<BatchSearchResult>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.batch_search_with_joins(&albums_by_artist(artist, albums, max_per_album))
            .await
    }

    pub fn search_stats(&self, grouped: &GroupedResults) -> SearchStats {
        compute_stats(grouped)
    }

    /// Send an already-built query document and reduce the response.
    pub async fn execute(&self, query: WireQuery) -> Result<BatchSearchResult> {
        let targets = query.batch().target_queries.len();
        let request = QueryRequest::new(query, self.config.include_metrics);
        let body =
            serde_json::to_vec(&request).map_err(|e| SearchError::Unclassified(Box::new(e)))?;

        debug!(path = %self.config.query_path, targets, "sending batch search");
        let started = Instant::now();
        let raw = self
            .transport
            .post(&self.config.query_path, Bytes::from(body))
            .await
            .map_err(|e| {
                warn!(error = %e, "batch search transport failure");
                SearchError::from(e)
            })?;
        let elapsed = started.elapsed();
        debug!(
            status = %raw.status,
            elapsed_ms = elapsed.as_millis() as u64,
            "batch search response"
        );

        let result = interpret(raw).and_then(|response| reduce(response, elapsed));
        match &result {
            Ok(r) => debug!(
                rows = r.total_results,
                groups = r.grouped.len(),
                "batch search reduced"
            ),
            Err(e) => warn!(error = %e, "batch search failed"),
        }
        result
    }
}

/// The fixed artist → albums join used by
/// [`BatchSearchClient::search_albums_by_artist`].
pub fn albums_by_artist<I, S>(artist: &str, albums: I, max_per_album: u32) -> JoinQuerySpec
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    JoinQuerySpec::new(
        ["id_artists", "album_artist", "albums"],
        vec![
            JoinCondition::inner(
                "id_artists",
                "album_artist",
                "id_artists.id",
                "album_artist.artist_id",
            ),
            JoinCondition::inner("album_artist", "albums", "album_artist.cb", "albums.cb"),
        ],
        "id_artists.artiste",
        artist,
        "albums.album",
        albums,
    )
    .with_projection(Projection::rename([
        ("artist", "id_artists.artiste"),
        ("album_title", "albums.album"),
        ("release_year", "albums.street_date"),
    ]))
    .with_results_per_query(max_per_album)
}

impl<T> std::fmt::Debug for BatchSearchClient<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchSearchClient")
            .field("base_url", &self.config.base_url)
            .field("query_path", &self.config.query_path)
            .field("include_metrics", &self.config.include_metrics)
            .finish()
    }
}
