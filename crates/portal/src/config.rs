//! Portal configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `PORTAL_API_BASE_URL` - Base URL of the upstream assignment API
//!
//! ## Optional
//! - `PORTAL_HOST` - Bind address (default: 127.0.0.1)
//! - `PORTAL_PORT` - Listen port (default: 3000)
//! - `PORTAL_BASE_URL` - Public URL of the portal (default:
//!   `http://localhost:3000`; secure cookies are enabled iff this is https)
//! - `PORTAL_MAX_UPLOAD_BYTES` - Upload size ceiling enforced before any
//!   dispatch to the API (default: 10 MiB)

use std::net::{IpAddr, SocketAddr};

use thiserror::Error;
use url::Url;

/// Default upload ceiling: 10 MiB, matching the API server's limit.
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Portal application configuration.
#[derive(Debug, Clone)]
pub struct PortalConfig {
    /// Base URL of the upstream assignment API.
    pub api_base_url: Url,
    /// IP address to bind the server to.
    pub host: IpAddr,
    /// Port to listen on.
    pub port: u16,
    /// Public base URL for the portal.
    pub base_url: String,
    /// Upload size ceiling in bytes.
    pub max_upload_bytes: usize,
}

impl PortalConfig {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is missing or any variable
    /// fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_base_url = require_env("PORTAL_API_BASE_URL")?;
        let api_base_url = Url::parse(&api_base_url).map_err(|e| {
            ConfigError::InvalidEnvVar("PORTAL_API_BASE_URL".to_owned(), e.to_string())
        })?;

        let host = parse_env("PORTAL_HOST", IpAddr::from([127, 0, 0, 1]))?;
        let port = parse_env("PORTAL_PORT", 3000)?;
        let base_url =
            std::env::var("PORTAL_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_owned());
        let max_upload_bytes = parse_env("PORTAL_MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?;

        Ok(Self {
            api_base_url,
            host,
            port,
            base_url,
            max_upload_bytes,
        })
    }

    /// Socket address to bind the server to.
    #[must_use]
    pub const fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether the portal is served over https (controls secure cookies).
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

fn require_env(name: &str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.to_owned()))
}

fn parse_env<T: std::str::FromStr>(name: &str, default: T) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|e: T::Err| ConfigError::InvalidEnvVar(name.to_owned(), e.to_string())),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config(api_base_url: &str) -> PortalConfig {
        PortalConfig {
            api_base_url: Url::parse(api_base_url).expect("valid url"),
            host: IpAddr::from([127, 0, 0, 1]),
            port: 3000,
            base_url: "http://localhost:3000".to_owned(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }

    #[test]
    fn test_secure_detection() {
        let mut config = test_config("http://api.local:8000");
        assert!(!config.is_secure());
        config.base_url = "https://portal.example.com".to_owned();
        assert!(config.is_secure());
    }

    #[test]
    fn test_bind_addr() {
        let config = test_config("http://api.local:8000");
        assert_eq!(config.bind_addr().to_string(), "127.0.0.1:3000");
    }
}
