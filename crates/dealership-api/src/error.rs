use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, error};

use dealership_remote::RemoteError;
use dealership_types::api::StatusResponse;

pub const BAD_REQUEST_MESSAGE: &str = "Bad Request";

/// Faults that end a request without a domain-level outcome. Domain outcomes
/// (bad id, unauthorized, rejected review) are ordinary 200 envelopes and do
/// not go through here.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("malformed request: {0}")]
    BadRequest(String),

    #[error("dealer service failure: {0}")]
    Upstream(#[from] RemoteError),

    #[error("blocking task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, BAD_REQUEST_MESSAGE),
            ApiError::Upstream(_) => (StatusCode::BAD_GATEWAY, "Dealer service unavailable"),
            ApiError::Join(_) | ApiError::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
            }
        };

        if status == StatusCode::BAD_REQUEST {
            debug!("{}", self);
        } else {
            error!("{}", self);
        }

        (status, Json(StatusResponse::with_message(status.as_u16(), message))).into_response()
    }
}

/// Parse a request body as JSON whatever its Content-Type, failing closed
/// with a 400.
pub fn json_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    serde_json::from_slice(body).map_err(|e| ApiError::BadRequest(e.to_string()))
}

/// Run store or hashing work on the blocking pool.
pub async fn blocking<F, T>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> anyhow::Result<T> + Send + 'static,
    T: Send + 'static,
{
    Ok(tokio::task::spawn_blocking(f).await??)
}
