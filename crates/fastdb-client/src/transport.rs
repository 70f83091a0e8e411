//! Transport boundary: the only place the client touches the network.
//!
//! [`Transport`] is a single `post` operation. The client hands it a path and
//! a JSON body and gets back the raw status and body; retries, pooling, TLS
//! and auth are the transport's business, not the client's.
//!
//! [`HttpTransport`] is the default implementation over a `hyper-util`
//! connection-pooled HTTP/1 client with a per-request timeout.

use crate::error::TransportError;
use async_trait::async_trait;
use bytes::Bytes;
use fastdb_core::ClientConfig;
use http_body_util::{BodyExt, Full};
use hyper::{header, Method, Request, StatusCode, Uri};
use hyper_util::client::legacy::{connect::HttpConnector, Client};
use hyper_util::rt::TokioExecutor;
use std::sync::Arc;
use std::time::Duration;

/// Status and body of a completed HTTP exchange, whatever the status.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub body: Bytes,
}

impl RawResponse {
    pub fn new(status: StatusCode, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Something that can POST a body to a path relative to the service root.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post(&self, path: &str, body: Bytes) -> Result<RawResponse, TransportError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn post(&self, path: &str, body: Bytes) -> Result<RawResponse, TransportError> {
        (**self).post(path, body).await
    }
}

// ---------------------------------------------------------------------------
// HttpTransport
// ---------------------------------------------------------------------------

/// Plain-HTTP transport. Cheap to clone; clones share the connection pool.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client<HttpConnector, Full<Bytes>>,
    base_url: String,
    timeout: Duration,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: Client::builder(TokioExecutor::new()).build_http(),
            base_url: base_url.into(),
            timeout,
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.base_url.clone(), config.timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn uri(&self, path: &str) -> Result<Uri, TransportError> {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
        .parse::<Uri>()
        .map_err(|e| TransportError::Other(Box::new(e)))
    }

    async fn exchange(&self, request: Request<Full<Bytes>>) -> Result<RawResponse, TransportError> {
        let response = self
            .client
            .request(request)
            .await
            .map_err(|e| TransportError::NoResponse(e.to_string()))?;

        let status = response.status();
        let body = response
            .into_body()
            .collect()
            .await
            .map_err(|e| TransportError::NoResponse(e.to_string()))?
            .to_bytes();

        Ok(RawResponse { status, body })
    }
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post(&self, path: &str, body: Bytes) -> Result<RawResponse, TransportError> {
        let request = Request::builder()
            .method(Method::POST)
            .uri(self.uri(path)?)
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::ACCEPT, "application/json")
            .body(Full::new(body))
            .map_err(|e| TransportError::Other(Box::new(e)))?;

        tokio::time::timeout(self.timeout, self.exchange(request))
            .await
            .map_err(|_| TransportError::Timeout(self.timeout))?
    }
}
