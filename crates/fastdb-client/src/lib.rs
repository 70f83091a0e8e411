//! fastdb-client: talks to a Fast-DB query endpoint.
//!
//! The [`BatchSearchClient`] builds a query document with `fastdb-core`,
//! posts it through a [`Transport`], and reduces the tabular reply into
//! grouped records:
//!
//! ```text
//! spec ──► build ──► Transport::post ──► interpret ──► reduce ──► BatchSearchResult
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! # async fn demo() -> fastdb_client::Result<()> {
//! use fastdb_client::BatchSearchClient;
//! use fastdb_core::{BatchQuerySpec, ClientConfig};
//!
//! let client = BatchSearchClient::new(ClientConfig::with_base_url("http://localhost:8080"));
//! let spec = BatchQuerySpec::new(
//!     "books", "auteurs", "Isaac Asimov", "titre",
//!     ["Foundation", "I, Robot"],
//! );
//! let result = client.batch_search(&spec).await?;
//! for (hash, records) in &result.grouped {
//!     println!("{hash}: {} matches", records.len());
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
pub mod result;
pub mod transport;

pub use client::{albums_by_artist, BatchSearchClient, DEFAULT_MAX_PER_TARGET};
pub use error::{BoxError, NetworkError, Result, SearchError, TransportError};
pub use result::BatchSearchResult;
pub use transport::{HttpTransport, RawResponse, Transport};
