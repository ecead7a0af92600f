mod bootstrap;
mod config;

use std::sync::Arc;

use rand::Rng;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use moov_api::session::SessionKeys;
use moov_api::{AppState, AppStateInner};

use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "moov=debug,moov_api=debug,moov_db=info,tower_http=debug".into()
            }),
        )
        .init();

    let config = Config::from_env()?;

    let db = moov_db::Database::open(&config.db_path)?;
    let venues = bootstrap::run(&db, &config)?;

    let secret = match &config.session_secret {
        Some(secret) => secret.as_bytes().to_vec(),
        None => {
            warn!("MOOV_SESSION_SECRET is unset; sessions will not survive a restart");
            let mut bytes = [0u8; 32];
            rand::rng().fill(&mut bytes);
            bytes.to_vec()
        }
    };
    let session = SessionKeys::new(&secret, chrono::Duration::hours(config.session_ttl_hours));

    let state: AppState = Arc::new(AppStateInner {
        db,
        venues,
        session,
    });

    let app = moov_api::router(state).layer(TraceLayer::new_for_http());

    info!("MOOV listening on {}", config.addr);
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();
    #[cfg(unix)]
    {
        let mut sigterm =
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(sigterm) => sigterm,
                Err(e) => {
                    warn!("Failed to install SIGTERM handler: {}", e);
                    ctrl_c.await.ok();
                    return;
                }
            };
        tokio::select! {
            _ = ctrl_c => info!("Received Ctrl+C, shutting down..."),
            _ = sigterm.recv() => info!("Received SIGTERM, shutting down..."),
        }
    }
    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
        info!("Received Ctrl+C, shutting down...");
    }
}
