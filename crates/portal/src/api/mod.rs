//! Typed client for the upstream assignment API.
//!
//! Every authenticated call attaches `Authorization: Bearer <token>`; the
//! underlying reqwest client keeps a cookie store for session continuity
//! with the API server. Failures are mapped into [`ApiError`], with the
//! server's `{"detail": …}` body surfaced as the human-readable message.
//!
//! # Example
//!
//! ```rust,ignore
//! use tutorhub_portal::api::ApiClient;
//!
//! let api = ApiClient::new(config.api_base_url.clone())?;
//!
//! let session = api.login("student@example.com", "hunter2").await?;
//! let me = api.current_user(&token).await?;
//! let assignments = api.list_assignments(&token).await?;
//! ```

mod assignments;
mod auth;
mod comments;
mod subjects;
mod users;
pub mod types;

pub use types::*;

use std::sync::Arc;

use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use thiserror::Error;
use url::Url;

/// Errors that can occur when talking to the upstream API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network or transport failure.
    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server rejected the credentials or the bearer token.
    #[error("{0}")]
    Unauthorized(String),

    /// The requested record does not exist.
    #[error("{0}")]
    NotFound(String),

    /// Any other server-reported failure (validation errors and the like).
    #[error("{detail}")]
    Api {
        /// HTTP status the server answered with.
        status: StatusCode,
        /// Server-provided detail message.
        detail: String,
    },
}

/// Extract the FastAPI-style `{"detail": "…"}` message from an error body.
fn extract_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value.get("detail")?.as_str().map(ToOwned::to_owned)
}

/// Client for the upstream assignment API.
///
/// Cheaply cloneable; all clones share one connection pool and cookie store.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    http: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    /// Create a new API client for the given base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be constructed.
    pub fn new(base_url: Url) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder().cookie_store(true).build()?;
        Ok(Self {
            inner: Arc::new(ApiClientInner { http, base_url }),
        })
    }

    /// The API base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Build an absolute download URL from a server-supplied relative path.
    #[must_use]
    pub fn file_url(&self, relative: &str) -> String {
        let base = self.inner.base_url.as_str().trim_end_matches('/');
        format!("{}/{}", base, relative.trim_start_matches('/'))
    }

    pub(crate) fn url(&self, path: &str) -> String {
        self.file_url(path)
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.inner.http
    }

    /// Attach the bearer credential to a request builder.
    pub(crate) fn authed(
        &self,
        builder: reqwest::RequestBuilder,
        token: &SecretString,
    ) -> reqwest::RequestBuilder {
        builder.bearer_auth(token.expose_secret())
    }

    /// Check the response status, mapping failures to [`ApiError`].
    pub(crate) async fn check(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let detail = response
            .text()
            .await
            .ok()
            .as_deref()
            .and_then(extract_detail)
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_owned()
            });

        Err(match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ApiError::Unauthorized(detail),
            StatusCode::NOT_FOUND => ApiError::NotFound(detail),
            _ => ApiError::Api { status, detail },
        })
    }

    /// Check the response and deserialize its JSON body.
    pub(crate) async fn parse<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let response = Self::check(response).await?;
        Ok(response.json::<T>().await?)
    }
}
