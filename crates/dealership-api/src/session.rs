use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use chrono::{DateTime, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use dealership_types::api::Claims;

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE: &str = "sessionid";

/// The authenticated user behind a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: i64,
    pub username: String,
    pub session_id: Uuid,
}

struct SessionEntry {
    user_id: i64,
    username: String,
    expires_at: DateTime<Utc>,
}

/// Registry of live sessions. Tokens are signed JWTs naming a session id;
/// a token only resolves while its session is still registered here.
#[derive(Clone)]
pub struct SessionManager {
    inner: Arc<SessionManagerInner>,
}

struct SessionManagerInner {
    secret: String,
    ttl: chrono::Duration,

    /// session_id -> owner and expiry
    sessions: RwLock<HashMap<Uuid, SessionEntry>>,
}

impl SessionManager {
    pub fn new(secret: impl Into<String>, ttl: chrono::Duration) -> Self {
        Self {
            inner: Arc::new(SessionManagerInner {
                secret: secret.into(),
                ttl,
                sessions: RwLock::new(HashMap::new()),
            }),
        }
    }

    /// Open a session for a user and return it with its signed token.
    pub async fn establish(&self, user_id: i64, username: &str) -> anyhow::Result<(Identity, String)> {
        let session_id = Uuid::new_v4();
        let expires_at = Utc::now()
            .checked_add_signed(self.inner.ttl)
            .context("Session lifetime overflows the clock")?;

        let claims = Claims {
            sub: user_id,
            username: username.to_string(),
            sid: session_id,
            exp: expires_at.timestamp().max(0) as usize,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.inner.secret.as_bytes()),
        )?;

        self.inner.sessions.write().await.insert(
            session_id,
            SessionEntry {
                user_id,
                username: username.to_string(),
                expires_at,
            },
        );
        info!("Session {} opened for {}", session_id, username);

        Ok((
            Identity {
                user_id,
                username: username.to_string(),
                session_id,
            },
            token,
        ))
    }

    /// Resolve a token to its identity. Bad signatures, expired tokens and
    /// revoked or expired sessions all resolve to `None`.
    pub async fn resolve(&self, token: &str) -> Option<Identity> {
        let claims = match decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.inner.secret.as_bytes()),
            &Validation::default(),
        ) {
            Ok(data) => data.claims,
            Err(e) => {
                debug!("Rejected session token: {}", e);
                return None;
            }
        };

        let sessions = self.inner.sessions.read().await;
        let entry = sessions.get(&claims.sid)?;
        if entry.expires_at <= Utc::now() || entry.user_id != claims.sub {
            return None;
        }

        Some(Identity {
            user_id: entry.user_id,
            username: entry.username.clone(),
            session_id: claims.sid,
        })
    }

    /// Drop a session. Returns false when it was not registered.
    pub async fn revoke(&self, session_id: Uuid) -> bool {
        let removed = self.inner.sessions.write().await.remove(&session_id);
        if let Some(entry) = &removed {
            info!("Session {} closed for {}", session_id, entry.username);
        }
        removed.is_some()
    }

    pub async fn prune_expired(&self) -> usize {
        let now = Utc::now();
        let mut sessions = self.inner.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, entry| entry.expires_at > now);
        before - sessions.len()
    }

    pub async fn active_count(&self) -> usize {
        self.inner.sessions.read().await.len()
    }
}

/// Background task that drops expired sessions on an interval.
pub async fn run_prune_loop(sessions: SessionManager, interval_secs: u64) {
    let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));

    loop {
        interval.tick().await;

        let pruned = sessions.prune_expired().await;
        if pruned > 0 {
            info!("Session cleanup: pruned {} expired sessions", pruned);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> SessionManager {
        SessionManager::new("test-secret", chrono::Duration::hours(1))
    }

    #[tokio::test]
    async fn token_resolves_to_its_user() {
        let sessions = manager();
        let (identity, token) = sessions.establish(7, "ada").await.unwrap();

        let resolved = sessions.resolve(&token).await.unwrap();
        assert_eq!(resolved, identity);
        assert_eq!(resolved.user_id, 7);
        assert_eq!(resolved.username, "ada");
    }

    #[tokio::test]
    async fn revoked_session_is_anonymous() {
        let sessions = manager();
        let (identity, token) = sessions.establish(7, "ada").await.unwrap();

        assert!(sessions.revoke(identity.session_id).await);
        assert!(sessions.resolve(&token).await.is_none());
        assert!(!sessions.revoke(identity.session_id).await);
    }

    #[tokio::test]
    async fn foreign_and_garbage_tokens_are_anonymous() {
        let sessions = manager();
        let (_, token) = sessions.establish(7, "ada").await.unwrap();

        let other = SessionManager::new("other-secret", chrono::Duration::hours(1));
        assert!(other.resolve(&token).await.is_none());
        assert!(sessions.resolve("not-a-token").await.is_none());
    }

    #[tokio::test]
    async fn expired_sessions_resolve_to_nothing_and_are_pruned() {
        let sessions = SessionManager::new("test-secret", chrono::Duration::zero());
        let (_, token) = sessions.establish(7, "ada").await.unwrap();

        assert!(sessions.resolve(&token).await.is_none());
        assert_eq!(sessions.active_count().await, 1);
        assert_eq!(sessions.prune_expired().await, 1);
        assert_eq!(sessions.active_count().await, 0);
    }

    #[tokio::test]
    async fn sessions_are_independent() {
        let sessions = manager();
        let (first, first_token) = sessions.establish(1, "ada").await.unwrap();
        let (_, second_token) = sessions.establish(2, "grace").await.unwrap();

        sessions.revoke(first.session_id).await;
        assert!(sessions.resolve(&first_token).await.is_none());
        assert_eq!(sessions.resolve(&second_token).await.unwrap().username, "grace");
    }

    #[tokio::test]
    async fn overflowing_lifetime_is_an_error() {
        let sessions = SessionManager::new("test-secret", chrono::Duration::hours(2_300_000_000));
        assert!(sessions.establish(7, "ada").await.is_err());
        assert_eq!(sessions.active_count().await, 0);
    }
}
