use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::{RemoteError, join_segments};

/// Port onto the remote text classifier.
#[async_trait]
pub trait SentimentAnalyzer: Send + Sync {
    /// Returns the classifier's label for `text`, e.g. "positive".
    async fn classify(&self, text: &str) -> Result<String, RemoteError>;
}

#[derive(Debug, Deserialize)]
struct SentimentReply {
    #[serde(default)]
    sentiment: Option<Value>,
}

impl SentimentReply {
    fn into_label(self) -> Result<String, RemoteError> {
        match self.sentiment {
            Some(Value::String(label)) if !label.trim().is_empty() => Ok(label),
            _ => Err(RemoteError::MissingSentiment),
        }
    }
}

/// Reqwest-backed classifier client: `GET {base}/analyze/{text}`.
pub struct HttpSentimentAnalyzer {
    client: Client,
    base_url: Url,
}

impl HttpSentimentAnalyzer {
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, RemoteError> {
        if base_url.cannot_be_a_base() {
            return Err(RemoteError::InvalidUrl(base_url.to_string()));
        }
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url })
    }
}

#[async_trait]
impl SentimentAnalyzer for HttpSentimentAnalyzer {
    async fn classify(&self, text: &str) -> Result<String, RemoteError> {
        let url = join_segments(&self.base_url, &["analyze", text])?;
        debug!("Classifying review ({} chars)", text.len());

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(RemoteError::Status(status));
        }

        let body = response.bytes().await?;
        let reply: SentimentReply = serde_json::from_slice(&body)?;
        reply.into_label()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::serve;

    use axum::{Json, Router, extract::Path, http::StatusCode, routing::get};
    use serde_json::json;

    fn classifier() -> Router {
        Router::new().route(
            "/analyze/{text}",
            get(|Path(text): Path<String>| async move {
                match text.as_str() {
                    "unlabelled" => Ok(Json(json!({ "score": 0.4 }))),
                    "blank" => Ok(Json(json!({ "sentiment": "" }))),
                    "numeric" => Ok(Json(json!({ "sentiment": 1 }))),
                    "broken" => Err(StatusCode::INTERNAL_SERVER_ERROR),
                    "slow" => {
                        tokio::time::sleep(Duration::from_secs(2)).await;
                        Ok(Json(json!({ "sentiment": "positive" })))
                    }
                    t if t.contains("terrible") => Ok(Json(json!({ "sentiment": "negative" }))),
                    _ => Ok(Json(json!({ "sentiment": "positive" }))),
                }
            }),
        )
    }

    async fn analyzer(timeout: Duration) -> HttpSentimentAnalyzer {
        let base = serve(classifier()).await;
        HttpSentimentAnalyzer::new(base, timeout).unwrap()
    }

    #[tokio::test]
    async fn returns_label_for_free_text() {
        let analyzer = analyzer(Duration::from_secs(5)).await;
        assert_eq!(analyzer.classify("Fantastic / friendly staff").await.unwrap(), "positive");
        assert_eq!(analyzer.classify("A terrible experience").await.unwrap(), "negative");
    }

    #[tokio::test]
    async fn unusable_labels_are_missing_sentiment() {
        let analyzer = analyzer(Duration::from_secs(5)).await;
        for text in ["unlabelled", "blank", "numeric"] {
            let err = analyzer.classify(text).await.unwrap_err();
            assert!(matches!(err, RemoteError::MissingSentiment), "{text}: {err}");
        }
    }

    #[tokio::test]
    async fn server_error_is_a_status_error() {
        let analyzer = analyzer(Duration::from_secs(5)).await;
        let err = analyzer.classify("broken").await.unwrap_err();
        assert!(matches!(err, RemoteError::Status(StatusCode::INTERNAL_SERVER_ERROR)));
    }

    #[tokio::test]
    async fn timeout_is_a_transport_error() {
        let analyzer = analyzer(Duration::from_millis(200)).await;
        let err = analyzer.classify("slow").await.unwrap_err();
        assert!(matches!(err, RemoteError::Transport(ref e) if e.is_timeout()));
    }
}
