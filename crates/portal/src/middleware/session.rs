//! Session middleware configuration.
//!
//! Cookie sessions backed by an in-memory store. The cookie carries only
//! the session id; the authenticated state it points at lives in the
//! [`ContextRegistry`](crate::context::ContextRegistry).

use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use crate::config::PortalConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "th_session";

/// Session expiry time in seconds (7 days).
const SESSION_EXPIRY_SECONDS: i64 = 7 * 24 * 60 * 60;

/// Create the session layer.
#[must_use]
pub fn create_session_layer(config: &PortalConfig) -> SessionManagerLayer<MemoryStore> {
    let store = MemoryStore::default();

    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(config.is_secure())
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}
