use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use dealership_types::models::{Dealer, Review};

use crate::{RemoteError, join_segments};

/// Port onto the dealer/review data service.
#[async_trait]
pub trait DealerService: Send + Sync {
    async fn fetch_dealers(&self) -> Result<Vec<Dealer>, RemoteError>;

    /// `state` is forwarded verbatim; the service decides what it matches.
    async fn fetch_dealers_by_state(&self, state: &str) -> Result<Vec<Dealer>, RemoteError>;

    async fn fetch_dealer(&self, dealer_id: i64) -> Result<Dealer, RemoteError>;

    async fn fetch_reviews(&self, dealer_id: i64) -> Result<Vec<Review>, RemoteError>;

    /// The payload shape is owned by the service and is not inspected here.
    async fn submit_review(&self, review: &Value) -> Result<(), RemoteError>;
}

/// Reqwest-backed dealer service client.
pub struct HttpDealerService {
    client: Client,
    base_url: Url,
}

impl HttpDealerService {
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, RemoteError> {
        if base_url.cannot_be_a_base() {
            return Err(RemoteError::InvalidUrl(base_url.to_string()));
        }
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url })
    }

    async fn get_json<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, RemoteError> {
        let url = join_segments(&self.base_url, segments)?;
        debug!("GET {}", url);

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(RemoteError::Status(status));
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl DealerService for HttpDealerService {
    async fn fetch_dealers(&self) -> Result<Vec<Dealer>, RemoteError> {
        self.get_json(&["fetchDealers"]).await
    }

    async fn fetch_dealers_by_state(&self, state: &str) -> Result<Vec<Dealer>, RemoteError> {
        self.get_json(&["fetchDealers", state]).await
    }

    async fn fetch_dealer(&self, dealer_id: i64) -> Result<Dealer, RemoteError> {
        let id = dealer_id.to_string();
        self.get_json(&["fetchDealer", &id]).await
    }

    async fn fetch_reviews(&self, dealer_id: i64) -> Result<Vec<Review>, RemoteError> {
        let id = dealer_id.to_string();
        self.get_json(&["fetchReviews", "dealer", &id]).await
    }

    async fn submit_review(&self, review: &Value) -> Result<(), RemoteError> {
        let url = join_segments(&self.base_url, &["insert_review"])?;
        debug!("POST {}", url);

        let response = self.client.post(url).json(review).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(RemoteError::Status(status));
        }
        Ok(())
    }
}
