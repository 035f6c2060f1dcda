//! Application state shared across handlers.

use std::sync::Arc;

use crate::api::{ApiClient, ApiError};
use crate::config::PortalConfig;
use crate::context::ContextRegistry;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the upstream API client and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: PortalConfig,
    api: ApiClient,
    contexts: ContextRegistry,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: PortalConfig) -> Result<Self, ApiError> {
        let api = ApiClient::new(config.api_base_url.clone())?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                api,
                contexts: ContextRegistry::new(),
            }),
        })
    }

    /// Get a reference to the portal configuration.
    #[must_use]
    pub fn config(&self) -> &PortalConfig {
        &self.inner.config
    }

    /// Get a reference to the upstream API client.
    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    /// Get a reference to the session context registry.
    #[must_use]
    pub fn contexts(&self) -> &ContextRegistry {
        &self.inner.contexts
    }
}
