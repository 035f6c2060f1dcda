//! Unified error handling for route handlers.
//!
//! Provides a unified `AppError` type. All route handlers should return
//! `Result<T, AppError>`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use thiserror::Error;

use crate::api::ApiError;
use crate::middleware::AuthRejection;
use crate::store::StoreError;

/// Application-level error type for the portal.
#[derive(Debug, Error)]
pub enum AppError {
    /// Upstream API operation failed.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Store operation failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Session operation failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),

    /// Navigation rejected by the capability gate.
    #[error("navigation denied")]
    Denied(AuthRejection),
}

impl From<AuthRejection> for AppError {
    fn from(rejection: AuthRejection) -> Self {
        Self::Denied(rejection)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            // The gate already knows where the browser should go.
            Self::Denied(rejection) => rejection.into_response(),

            // An expired or revoked token means the portal session is
            // stale. Send the browser back through login rather than
            // rendering a 401.
            Self::Api(ApiError::Unauthorized(_)) => Redirect::to("/auth/login").into_response(),

            // A superseded store operation means a newer navigation already
            // owns the state; its response is the one that matters.
            Self::Store(StoreError::Superseded) => Redirect::to("/dashboard").into_response(),

            other => {
                if matches!(
                    other,
                    Self::Api(_) | Self::Session(_) | Self::Internal(_) | Self::Store(_)
                ) {
                    tracing::error!(error = %other, "Request error");
                }

                let status = match &other {
                    Self::Api(ApiError::NotFound(_)) | Self::NotFound(_) => StatusCode::NOT_FOUND,
                    Self::Api(ApiError::Api { status, .. }) if status.is_client_error() => {
                        StatusCode::BAD_REQUEST
                    }
                    Self::Api(_) => StatusCode::BAD_GATEWAY,
                    Self::BadRequest(_) => StatusCode::BAD_REQUEST,
                    _ => StatusCode::INTERNAL_SERVER_ERROR,
                };

                // Don't expose internal error details to clients
                let message = match other {
                    Self::Api(ApiError::Api { detail, .. }) => detail,
                    Self::Api(ApiError::NotFound(what)) | Self::NotFound(what) => {
                        format!("Not found: {what}")
                    }
                    Self::Api(_) => "External service error".to_string(),
                    Self::BadRequest(msg) => msg,
                    _ => "Internal server error".to_string(),
                };

                (status, message).into_response()
            }
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
