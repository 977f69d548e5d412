mod config;

use std::sync::Arc;

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use dealership_api::session::{SessionManager, run_prune_loop};
use dealership_api::{AppState, AppStateInner};
use dealership_remote::{HttpDealerService, HttpSentimentAnalyzer};

use crate::config::Config;

/// How often expired sessions are dropped.
const SESSION_PRUNE_INTERVAL_SECS: u64 = 600;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dealership=debug,tower_http=debug".into()),
        )
        .init();

    let config = Config::from_env()?;
    if config.uses_placeholder_secret() {
        warn!("DEALERSHIP_SESSION_SECRET is unset or a placeholder; sessions are forgeable");
    }

    // Init database
    let db = dealership_db::Database::open(&config.db_path)?;

    // Remote collaborators
    let dealers = HttpDealerService::new(config.dealer_service_url.clone(), config.remote_timeout)?;
    let sentiment = HttpSentimentAnalyzer::new(config.sentiment_url.clone(), config.remote_timeout)?;
    info!("Dealer service at {}", config.dealer_service_url);
    info!("Sentiment analyzer at {}", config.sentiment_url);

    // Shared state
    let sessions = SessionManager::new(config.session_secret.clone(), config.session_ttl);
    let state: AppState = Arc::new(AppStateInner {
        db,
        sessions: sessions.clone(),
        dealers: Arc::new(dealers),
        sentiment: Arc::new(sentiment),
        sentiment_concurrency: config.sentiment_concurrency,
    });

    tokio::spawn(run_prune_loop(sessions, SESSION_PRUNE_INTERVAL_SECS));

    let app = dealership_api::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    info!("Dealership server listening on {}", config.addr);

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
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = ctrl_c => info!("Received Ctrl+C, shutting down..."),
                    _ = sigterm.recv() => info!("Received SIGTERM, shutting down..."),
                }
            }
            Err(e) => {
                warn!("SIGTERM handler unavailable: {}", e);
                ctrl_c.await.ok();
                info!("Received Ctrl+C, shutting down...");
            }
        }
    }
    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
        info!("Received Ctrl+C, shutting down...");
    }
}
