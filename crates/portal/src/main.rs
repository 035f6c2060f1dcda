//! TutorHub portal - server-rendered front end for the assignment API.
//!
//! This binary serves the portal: students submit assignments, tutors
//! review them, and admins assign tutors and manage subjects. All data
//! lives behind the upstream API; the portal holds only session-scoped
//! mirrors of it.

#![cfg_attr(not(test), forbid(unsafe_code))]

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tutorhub_portal::config::PortalConfig;
use tutorhub_portal::state::AppState;

#[tokio::main]
async fn main() {
    // Load environment from .env if present (development convenience)
    dotenvy::dotenv().ok();

    // Initialize tracing with EnvFilter
    // Defaults to info level for our crate if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "tutorhub_portal=info,tower_http=debug".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration from environment
    let config = PortalConfig::from_env().expect("Failed to load configuration");
    let addr = config.bind_addr();

    // Build application state
    let state = AppState::new(config).expect("Failed to initialize application state");

    let app = tutorhub_portal::build_router(state);

    tracing::info!("portal listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
