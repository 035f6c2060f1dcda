//! TutorHub portal library.
//!
//! This crate provides the portal functionality as a library, allowing it to
//! be tested and reused. The portal is a server-rendered front end for the
//! upstream assignment API: pages dispatch operations against session-scoped
//! resource stores, which call the API through a typed client and mirror its
//! responses locally.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod context;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod state;
pub mod store;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use axum::routing::get;

use crate::state::AppState;

/// Health check endpoint handler.
async fn health() -> StatusCode {
    StatusCode::OK
}

/// Build the full portal router, including the session layer and tracing.
///
/// Shared by `main` and the integration tests so both exercise the same
/// middleware stack.
#[must_use]
pub fn build_router(state: AppState) -> Router {
    let session_layer = middleware::create_session_layer(state.config());

    // Uploads are size-checked per file in the handlers; the body limit only
    // needs headroom for multipart framing.
    let body_limit = state.config().max_upload_bytes + 64 * 1024;

    Router::new()
        .route("/health", get(health))
        .merge(routes::routes())
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(axum::middleware::from_fn(
            middleware::request_id_middleware,
        ))
        .layer(session_layer)
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state)
}
