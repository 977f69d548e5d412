use reqwest::StatusCode;
use thiserror::Error;

/// Failure of a single remote call. Timeouts surface as `Transport`.
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("remote answered {0}")]
    Status(StatusCode),

    #[error("undecodable response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("response carried no sentiment label")]
    MissingSentiment,

    #[error("cannot build endpoint from base url {0}")]
    InvalidUrl(String),
}
