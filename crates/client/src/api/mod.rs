//! REST client for the shop backend.
//!
//! Every request carries an `X-Request-Id` header and, when a session exists,
//! a bearer token. Endpoints are grouped by resource in the submodules; each
//! adds methods to [`ApiClient`].
//!
//! The product catalogue is cached in memory via `moka`. Admin product
//! mutations invalidate it.

mod admin;
mod analytics;
mod auth;
mod cart;
mod favourites;
mod orders;
mod products;

pub use auth::Credentials;
pub use cart::AddToCart;

use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use moka::future::Cache;
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use shopfront_core::catalog::Product;
use shopfront_core::session::BearerToken;
use thiserror::Error;
use url::Url;

/// Header used to correlate client requests with backend logs.
pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

/// Longest slice of a response body that is logged.
const LOGGED_BODY_LIMIT: usize = 500;

/// Errors that can occur when talking to the backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend returned an error response.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// Missing or rejected credentials (401/403).
    #[error("{0}")]
    Unauthorized(String),

    /// Failed to decode a response body.
    #[error("Parse error: {0}")]
    Parse(String),

    /// An upload file could not be read.
    #[error("Failed to read {path}: {source}")]
    Upload {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl ApiError {
    /// HTTP status of a backend rejection, if any.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Unauthorized(_) => Some(401),
            _ => None,
        }
    }
}

/// Which session's token a request should carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Scope {
    /// Customer endpoints: the customer token.
    Customer,
    /// Admin and analytics endpoints: the admin token, falling back to the
    /// customer token.
    Admin,
}

#[derive(Default)]
struct Tokens {
    customer: Option<BearerToken>,
    admin: Option<BearerToken>,
}

/// Catalogue cache keys.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
enum CatalogueKey {
    All,
    Featured,
}

/// Backend error body.
#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// Shop backend API client.
///
/// Cheap to clone; clones share the HTTP pool, tokens, and cache.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: String,
    tokens: RwLock<Tokens>,
    catalogue: Cache<CatalogueKey, Arc<Vec<Product>>>,
}

impl ApiClient {
    /// Create a new client rooted at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(base_url: &Url, cache_ttl: Duration) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder().build()?;

        let catalogue = Cache::builder()
            .max_capacity(8)
            .time_to_live(cache_ttl)
            .build();

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url: base_url.as_str().trim_end_matches('/').to_string(),
                tokens: RwLock::new(Tokens::default()),
                catalogue,
            }),
        })
    }

    /// The base URL endpoint paths are appended to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Set or clear the customer token.
    pub fn set_customer_token(&self, token: Option<BearerToken>) {
        self.inner
            .tokens
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .customer = token;
    }

    /// Set or clear the admin token.
    pub fn set_admin_token(&self, token: Option<BearerToken>) {
        self.inner
            .tokens
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .admin = token;
    }

    /// Drop cached catalogue listings.
    pub fn invalidate_catalogue(&self) {
        self.inner.catalogue.invalidate_all();
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.inner.base_url, path.trim_start_matches('/'))
    }

    fn token_for(&self, scope: Scope) -> Option<BearerToken> {
        let tokens = self
            .inner
            .tokens
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        match scope {
            Scope::Customer => tokens.customer.clone(),
            Scope::Admin => tokens.admin.clone().or_else(|| tokens.customer.clone()),
        }
    }

    /// Start a request with the request id and bearer token applied.
    pub(crate) fn request(&self, method: Method, path: &str, scope: Scope) -> RequestBuilder {
        let request_id = uuid::Uuid::new_v4().to_string();
        let mut builder = self
            .inner
            .client
            .request(method, self.url(path))
            .header(REQUEST_ID_HEADER, request_id);
        if let Some(token) = self.token_for(scope) {
            builder = builder.bearer_auth(token.expose());
        }
        builder
    }

    /// Execute a GET request and decode the JSON body.
    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        scope: Scope,
    ) -> Result<T, ApiError> {
        self.send(self.request(Method::GET, path, scope)).await
    }

    /// Execute a request with a JSON body and decode the JSON response.
    pub(crate) async fn send_json<T: DeserializeOwned, B: serde::Serialize + Sync>(
        &self,
        method: Method,
        path: &str,
        scope: Scope,
        body: &B,
    ) -> Result<T, ApiError> {
        self.send(self.request(method, path, scope).json(body)).await
    }

    /// Execute a request and decode the JSON response.
    pub(crate) async fn send<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> Result<T, ApiError> {
        let response = builder.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(self.parse_error(status, &text));
        }

        serde_json::from_str(&text).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %truncate(&text),
                "Failed to parse backend response"
            );
            ApiError::Parse(e.to_string())
        })
    }

    /// Execute a request whose response body is ignored.
    pub(crate) async fn send_empty(&self, builder: RequestBuilder) -> Result<(), ApiError> {
        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let text = response.text().await.unwrap_or_default();
        Err(self.parse_error(status, &text))
    }

    /// Turn an error response into an [`ApiError`], surfacing the backend's
    /// `message` verbatim when present.
    fn parse_error(&self, status: StatusCode, body: &str) -> ApiError {
        tracing::warn!(
            status = %status,
            base_url = %self.inner.base_url,
            body = %truncate(body),
            "Backend returned non-success status"
        );

        let message = serde_json::from_str::<ErrorBody>(body).map_or_else(
            |_| {
                if body.trim().is_empty() {
                    status
                        .canonical_reason()
                        .unwrap_or("Request failed")
                        .to_string()
                } else {
                    body.trim().to_string()
                }
            },
            |e| e.message,
        );

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return ApiError::Unauthorized(message);
        }
        ApiError::Api {
            status: status.as_u16(),
            message,
        }
    }
}

fn truncate(body: &str) -> String {
    body.chars().take(LOGGED_BODY_LIMIT).collect()
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url)
            .finish_non_exhaustive()
    }
}
