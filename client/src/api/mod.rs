//! API Gateway
//!
//! Thin wrapper over the marketplace REST service. Attaches the bearer token when
//! one is set, turns non-2xx responses into [`ClientError::Api`] using the body's
//! `detail`, and decodes 2xx bodies into the typed entities of `skillswap-common`.
//!
//! Endpoints are grouped by resource in the submodules, each adding an
//! `impl ApiClient` block.

mod admin;
mod auth;
mod coins;
mod skills;
mod swaps;

use std::sync::Arc;

use reqwest::{Client as HttpClient, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use skillswap_common::ErrorBody;
use tokio::sync::RwLock;
use tracing::{debug, error, warn};

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

pub use auth::PhotoUpload;

/// HTTP client for the marketplace API.
///
/// Cheap to clone; clones share the connection pool and the token slot.
#[derive(Clone)]
pub struct ApiClient {
    http: HttpClient,
    base_url: String,
    token: Arc<RwLock<Option<String>>>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Build a client from configuration.
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let http = HttpClient::builder()
            .timeout(config.request_timeout)
            .user_agent(concat!("skillswap-client/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                error!("Failed to build HTTP client: {}", e);
                ClientError::network(&e)
            })?;
        Ok(Self::with_http(http, config.api_base()))
    }

    /// Wrap an existing `reqwest` client. `base_url` includes the API prefix.
    pub fn with_http(http: HttpClient, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: Arc::new(RwLock::new(None)),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ========================================================================
    // Token
    // ========================================================================

    pub async fn set_token(&self, token: impl Into<String>) {
        *self.token.write().await = Some(token.into());
    }

    pub async fn clear_token(&self) {
        *self.token.write().await = None;
    }

    pub async fn has_token(&self) -> bool {
        self.token.read().await.is_some()
    }

    // ========================================================================
    // Request plumbing
    // ========================================================================

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn builder(&self, method: Method, path: &str) -> RequestBuilder {
        let request = self.http.request(method, self.url(path));
        match self.token.read().await.as_deref() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Send and fail on non-2xx, returning the raw response otherwise.
    async fn execute(&self, request: RequestBuilder, path: &str) -> ClientResult<Response> {
        debug!(path = %path, "Sending request");

        let response = request.send().await.map_err(|e| {
            error!(path = %path, "Request failed: {}", e);
            ClientError::network(&e)
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let raw = response.text().await.unwrap_or_default();
        let body = ErrorBody::parse(&raw);
        let detail = body.detail_text();
        warn!(path = %path, status = %status, detail = %detail, "Request rejected");

        Err(ClientError::Api {
            status: status.as_u16(),
            detail,
            message: body.message,
        })
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder, path: &str) -> ClientResult<T> {
        let response = self.execute(request, path).await?;
        let raw = response.text().await.map_err(|e| {
            error!(path = %path, "Failed to read response body: {}", e);
            ClientError::network(&e)
        })?;
        decode(&raw, path)
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let request = self.builder(Method::GET, path).await;
        self.send(request, path).await
    }

    pub(crate) async fn get_with_query<T, Q>(&self, path: &str, query: &Q) -> ClientResult<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let request = self.builder(Method::GET, path).await.query(query);
        self.send(request, path).await
    }

    pub(crate) async fn post<T, B>(&self, path: &str, body: &B) -> ClientResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request = self.builder(Method::POST, path).await.json(body);
        self.send(request, path).await
    }

    pub(crate) async fn post_with_query<T, Q>(&self, path: &str, query: &Q) -> ClientResult<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let request = self.builder(Method::POST, path).await.query(query);
        self.send(request, path).await
    }

    pub(crate) async fn put<T, B>(&self, path: &str, body: &B) -> ClientResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request = self.builder(Method::PUT, path).await.json(body);
        self.send(request, path).await
    }

    pub(crate) async fn put_empty<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let request = self.builder(Method::PUT, path).await;
        self.send(request, path).await
    }

    pub(crate) async fn delete<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let request = self.builder(Method::DELETE, path).await;
        self.send(request, path).await
    }
}

/// Decode a 2xx body. An empty body decodes as JSON `null`.
fn decode<T: DeserializeOwned>(raw: &str, path: &str) -> ClientResult<T> {
    let raw = if raw.trim().is_empty() { "null" } else { raw };
    serde_json::from_str(raw).map_err(|e| {
        error!(path = %path, "Failed to parse response: {}", e);
        ClientError::Decode(e.to_string())
    })
}
