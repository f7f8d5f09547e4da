mod config;
mod errors;
mod matching;
mod models;
mod routes;
mod session;
mod state;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::matching::remote::RemoteRoleMatcher;
use crate::matching::{RoleMatcher, StaticRoleMatcher};
use crate::routes::build_router;
use crate::session::SessionStore;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting RoleJump API v{}", env!("CARGO_PKG_VERSION"));

    // Built-in dataset unless an external match service is configured
    let matcher: Arc<dyn RoleMatcher> = match &config.match_service_url {
        Some(url) => {
            let remote = RemoteRoleMatcher::new(url)?;
            info!("Matcher: remote ({})", remote.endpoint());
            Arc::new(remote)
        }
        None => {
            info!("Matcher: static demo dataset");
            Arc::new(StaticRoleMatcher)
        }
    };

    let ttl = chrono::Duration::try_minutes(config.session_ttl_minutes)
        .context("SESSION_TTL_MINUTES is out of range")?;
    info!("Session TTL: {} minutes", config.session_ttl_minutes);

    let state = AppState {
        config: config.clone(),
        matcher,
        sessions: SessionStore::new(ttl),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the page has a fixed host

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
