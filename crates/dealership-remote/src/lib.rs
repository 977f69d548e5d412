//! Clients for the two remote collaborators: the dealer/review data service
//! and the sentiment classifier. Each sits behind an `async_trait` port so the
//! request handlers can be exercised against in-process fakes.

pub mod dealer;
pub mod error;
pub mod sentiment;

pub use dealer::{DealerService, HttpDealerService};
pub use error::RemoteError;
pub use reqwest::Url;
pub use sentiment::{HttpSentimentAnalyzer, SentimentAnalyzer};

/// Append percent-encoded path segments to a base URL, tolerating a trailing
/// slash on the base.
pub(crate) fn join_segments(base: &Url, segments: &[&str]) -> Result<Url, RemoteError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| RemoteError::InvalidUrl(base.to_string()))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_segments_encodes_and_drops_trailing_slash() {
        let base = Url::parse("http://dealers.local/api/").unwrap();
        let url = join_segments(&base, &["fetchDealers", "New York"]).unwrap();
        assert_eq!(url.as_str(), "http://dealers.local/api/fetchDealers/New%20York");
    }

    #[test]
    fn join_segments_rejects_opaque_urls() {
        let base = Url::parse("mailto:dealers@example.com").unwrap();
        let err = join_segments(&base, &["fetchDealers"]).unwrap_err();
        assert!(matches!(err, RemoteError::InvalidUrl(_)));
    }
}
