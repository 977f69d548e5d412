use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use dealership_remote::Url;

/// Placeholder session secret used when none is configured.
pub const PLACEHOLDER_SECRET: &str = "dev-secret-change-me";

/// Upper bound on the session lifetime: one year.
pub const MAX_SESSION_TTL_HOURS: i64 = 24 * 366;

pub struct Config {
    pub addr: SocketAddr,
    pub db_path: PathBuf,
    pub session_secret: String,
    pub session_ttl: chrono::Duration,
    pub dealer_service_url: Url,
    pub sentiment_url: Url,
    pub remote_timeout: Duration,
    pub sentiment_concurrency: usize,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.into());

        let host = var("DEALERSHIP_HOST", "0.0.0.0");
        let port: u16 = var("DEALERSHIP_PORT", "8000")
            .parse()
            .context("DEALERSHIP_PORT must be a port number")?;
        let addr: SocketAddr = format!("{}:{}", host, port)
            .parse()
            .context("DEALERSHIP_HOST must be an IP address")?;

        let ttl_hours: i64 = var("DEALERSHIP_SESSION_TTL_HOURS", "336")
            .parse()
            .context("DEALERSHIP_SESSION_TTL_HOURS must be a whole number of hours")?;
        if !(1..=MAX_SESSION_TTL_HOURS).contains(&ttl_hours) {
            anyhow::bail!(
                "DEALERSHIP_SESSION_TTL_HOURS must be between 1 and {}, got {}",
                MAX_SESSION_TTL_HOURS,
                ttl_hours
            );
        }
        let session_ttl = chrono::Duration::try_hours(ttl_hours)
            .context("DEALERSHIP_SESSION_TTL_HOURS is out of range")?;
        let timeout_secs: u64 = var("REMOTE_TIMEOUT_SECS", "10")
            .parse()
            .context("REMOTE_TIMEOUT_SECS must be a whole number of seconds")?;
        let sentiment_concurrency: usize = var("SENTIMENT_CONCURRENCY", "4")
            .parse()
            .context("SENTIMENT_CONCURRENCY must be a positive integer")?;

        Ok(Self {
            addr,
            db_path: var("DEALERSHIP_DB_PATH", "dealership.db").into(),
            session_secret: var("DEALERSHIP_SESSION_SECRET", PLACEHOLDER_SECRET),
            session_ttl,
            dealer_service_url: Url::parse(&var("DEALER_SERVICE_URL", "http://localhost:3030"))
                .context("DEALER_SERVICE_URL is not a valid URL")?,
            sentiment_url: Url::parse(&var("SENTIMENT_ANALYZER_URL", "http://localhost:5050"))
                .context("SENTIMENT_ANALYZER_URL is not a valid URL")?,
            remote_timeout: Duration::from_secs(timeout_secs),
            sentiment_concurrency: sentiment_concurrency.max(1),
        })
    }

    pub fn uses_placeholder_secret(&self) -> bool {
        self.session_secret.is_empty() || self.session_secret == PLACEHOLDER_SECRET
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> anyhow::Result<Config> {
        let vars: HashMap<String, String> =
            vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = config(&[]).unwrap();
        assert_eq!(config.addr.port(), 8000);
        assert_eq!(config.db_path, PathBuf::from("dealership.db"));
        assert_eq!(config.session_ttl, chrono::Duration::hours(336));
        assert_eq!(config.dealer_service_url.as_str(), "http://localhost:3030/");
        assert_eq!(config.remote_timeout, Duration::from_secs(10));
        assert_eq!(config.sentiment_concurrency, 4);
        assert!(config.uses_placeholder_secret());
    }

    #[test]
    fn overrides_are_read() {
        let config = config(&[
            ("DEALERSHIP_PORT", "9000"),
            ("DEALERSHIP_SESSION_SECRET", "s3cret"),
            ("SENTIMENT_ANALYZER_URL", "https://sentiment.example.com/api/"),
            ("SENTIMENT_CONCURRENCY", "0"),
        ])
        .unwrap();
        assert_eq!(config.addr.port(), 9000);
        assert!(!config.uses_placeholder_secret());
        assert_eq!(config.sentiment_url.path(), "/api/");
        assert_eq!(config.sentiment_concurrency, 1);
    }

    #[test]
    fn invalid_values_are_errors() {
        assert!(config(&[("DEALERSHIP_PORT", "eighty")]).is_err());
        assert!(config(&[("DEALER_SERVICE_URL", "not a url")]).is_err());
    }

    #[test]
    fn session_ttl_must_be_in_range() {
        for hours in ["0", "-5", "1000000000"] {
            assert!(
                config(&[("DEALERSHIP_SESSION_TTL_HOURS", hours)]).is_err(),
                "{} hours should be rejected",
                hours
            );
        }

        let max = MAX_SESSION_TTL_HOURS.to_string();
        let config = config(&[("DEALERSHIP_SESSION_TTL_HOURS", max.as_str())]).unwrap();
        assert_eq!(config.session_ttl, chrono::Duration::hours(MAX_SESSION_TTL_HOURS));
    }
}
