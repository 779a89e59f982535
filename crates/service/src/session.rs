use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use rand::{distributions::Alphanumeric, Rng};
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Clone, Debug)]
struct Session {
    user_id: String,
    expires_at: DateTime<Utc>,
}

/// In-process bearer-token registry. Tokens are opaque strings built from
/// the user id, issue time, and a random suffix; they are not
/// cryptographically secure and are lost on restart. Expiry is checked
/// lazily at validation, there is no background sweep.
pub struct SessionRegistry {
    inner: RwLock<HashMap<String, Session>>,
    ttl: Duration,
}

impl SessionRegistry {
    pub fn new(ttl: Duration) -> Arc<Self> {
        Arc::new(Self { inner: RwLock::new(HashMap::new()), ttl })
    }

    /// Default 24-hour session lifetime.
    pub fn with_default_ttl() -> Arc<Self> {
        Self::new(Duration::hours(24))
    }

    pub fn with_ttl_hours(hours: i64) -> Arc<Self> {
        Self::new(Duration::hours(hours))
    }

    /// Issue a token for the user. Always succeeds; nothing limits how many
    /// live sessions a user may hold.
    pub async fn create_session(&self, user_id: &str) -> String {
        let suffix: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(12)
            .map(char::from)
            .collect();
        let token = format!("token_{}_{}_{}", user_id, Utc::now().timestamp_millis(), suffix);

        let session = Session { user_id: user_id.to_string(), expires_at: Utc::now() + self.ttl };
        let mut sessions = self.inner.write().await;
        sessions.insert(token.clone(), session);
        debug!(%user_id, "session_created");
        token
    }

    /// Resolve a token to its user id. Unknown tokens yield `None`; an
    /// expired entry is deleted as a side effect and also yields `None`.
    pub async fn validate(&self, token: &str) -> Option<String> {
        {
            let sessions = self.inner.read().await;
            match sessions.get(token) {
                None => return None,
                Some(s) if s.expires_at > Utc::now() => return Some(s.user_id.clone()),
                Some(_) => {}
            }
        }
        // Expired: upgrade to a write lock and drop the entry.
        let mut sessions = self.inner.write().await;
        sessions.remove(token);
        None
    }

    /// Drop the session unconditionally; no-op for unknown tokens.
    pub async fn logout(&self, token: &str) {
        let mut sessions = self.inner.write().await;
        sessions.remove(token);
    }

    #[cfg(test)]
    async fn session_count(&self) -> usize {
        self.inner.read().await.len()
    }
}
