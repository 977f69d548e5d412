pub mod auth;
pub mod cars;
pub mod dealers;
pub mod error;
pub mod middleware;
pub mod reviews;
pub mod session;

use std::sync::Arc;

use axum::{
    Json, Router,
    routing::{get, post},
};

use dealership_db::Database;
use dealership_remote::{DealerService, SentimentAnalyzer};
use dealership_types::api::HealthResponse;

use crate::session::SessionManager;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub sessions: SessionManager,
    pub dealers: Arc<dyn DealerService>,
    pub sentiment: Arc<dyn SentimentAnalyzer>,
    /// Max classifications in flight per reviews request.
    pub sentiment_concurrency: usize,
}

/// All public routes, with the session context attached to every request.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/cars", get(cars::list_cars))
        .route("/login", post(auth::login))
        .route("/logout", get(auth::logout).post(auth::logout))
        .route("/register", post(auth::register))
        .route("/dealers", get(dealers::list_dealers))
        .route("/dealers/{state}", get(dealers::list_dealers_in_state))
        .route("/dealer/{dealer_id}", get(dealers::get_dealer))
        .route("/dealer/{dealer_id}/reviews", get(reviews::get_dealer_reviews))
        .route("/review", post(reviews::submit_review))
        .route("/health", get(health))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::attach_session,
        ))
        .with_state(state)
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}
