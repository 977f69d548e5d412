use axum::{
    Extension, Json,
    body::Bytes,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use futures_util::{StreamExt, stream};
use serde_json::Value;
use tracing::{error, info, warn};

use dealership_remote::SentimentAnalyzer;
use dealership_types::api::{ReviewsResponse, StatusResponse};
use dealership_types::models::Review;

use crate::AppState;
use crate::dealers::{bad_request, parse_dealer_id};
use crate::error::{ApiError, json_body};
use crate::middleware::RequestSession;

/// Label used whenever a review cannot be classified.
pub const NEUTRAL: &str = "neutral";

/// GET /dealer/{dealer_id}/reviews: the dealer's reviews, each labelled with
/// a sentiment.
pub async fn get_dealer_reviews(
    State(state): State<AppState>,
    Path(dealer_id): Path<String>,
) -> Result<Response, ApiError> {
    let Some(dealer_id) = parse_dealer_id(&dealer_id) else {
        return Ok(bad_request());
    };

    let reviews = state.dealers.fetch_reviews(dealer_id).await?;
    let reviews =
        attach_sentiments(state.sentiment.as_ref(), reviews, state.sentiment_concurrency).await;

    Ok(Json(ReviewsResponse {
        status: 200,
        reviews,
    })
    .into_response())
}

/// Label every review. Up to `concurrency` classifications run at once and
/// the output keeps the input order. A failed classification only affects
/// its own review, which falls back to `NEUTRAL`.
pub async fn attach_sentiments(
    analyzer: &dyn SentimentAnalyzer,
    reviews: Vec<Review>,
    concurrency: usize,
) -> Vec<Review> {
    stream::iter(reviews)
        .map(move |mut review| async move {
            review.sentiment = Some(classify_or_neutral(analyzer, &review.review).await);
            review
        })
        .buffered(concurrency.max(1))
        .collect()
        .await
}

async fn classify_or_neutral(analyzer: &dyn SentimentAnalyzer, text: &str) -> String {
    if text.trim().is_empty() {
        return NEUTRAL.to_string();
    }

    match analyzer.classify(text).await {
        Ok(label) => label,
        Err(e) => {
            warn!("Sentiment unavailable, labelling review {}: {}", NEUTRAL, e);
            NEUTRAL.to_string()
        }
    }
}

/// POST /review: forward a review to the dealer service on behalf of a
/// signed-in user.
pub async fn submit_review(
    State(state): State<AppState>,
    Extension(session): Extension<RequestSession>,
    body: Bytes,
) -> Result<Json<StatusResponse>, ApiError> {
    let Some(identity) = session.identity else {
        return Ok(Json(StatusResponse::with_message(403, "Unauthorized")));
    };
    let review: Value = json_body(&body)?;

    match state.dealers.submit_review(&review).await {
        Ok(()) => {
            info!("Review posted by {}", identity.username);
            Ok(Json(StatusResponse::ok()))
        }
        // 401 here means "remote submission failed", kept for client compatibility
        Err(e) => {
            error!("Posting review for {} failed: {}", identity.username, e);
            Ok(Json(StatusResponse::with_message(401, "Error in posting review")))
        }
    }
}
