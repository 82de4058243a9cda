/// In-memory session store
///
/// Sessions live in a `HashMap` behind a tokio `RwLock` and are lost when the
/// process exits. Expired entries are dropped when they are next read and
/// swept whenever a new session is stored.

use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;

use super::{SessionError, SessionStore};

#[derive(Debug, Clone, Copy)]
struct SessionEntry {
    user_id: i64,
    expires_at: Instant,
}

impl SessionEntry {
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// Process-local session store
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<String, SessionEntry>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored sessions, including expired ones not yet swept
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn get(&self, token: &str) -> Result<Option<i64>, SessionError> {
        let now = Instant::now();

        {
            let sessions = self.sessions.read().await;
            match sessions.get(token) {
                None => return Ok(None),
                Some(entry) if !entry.is_expired(now) => return Ok(Some(entry.user_id)),
                Some(_) => {}
            }
        }

        let mut sessions = self.sessions.write().await;
        if sessions.get(token).is_some_and(|entry| entry.is_expired(now)) {
            sessions.remove(token);
            tracing::debug!("Dropped expired session");
        }

        Ok(None)
    }

    async fn set(&self, token: &str, user_id: i64, ttl: Duration) -> Result<(), SessionError> {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;

        sessions.retain(|_, entry| !entry.is_expired(now));
        sessions.insert(
            token.to_string(),
            SessionEntry {
                user_id,
                expires_at: now + ttl,
            },
        );

        Ok(())
    }

    async fn clear(&self, token: &str) -> Result<(), SessionError> {
        self.sessions.write().await.remove(token);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_get_clear() {
        let store = MemorySessionStore::new();
        assert_eq!(store.get("abc").await.unwrap(), None);

        store.set("abc", 1, Duration::from_secs(60)).await.unwrap();
        assert_eq!(store.get("abc").await.unwrap(), Some(1));

        store.clear("abc").await.unwrap();
        assert_eq!(store.get("abc").await.unwrap(), None);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_set_replaces_binding() {
        let store = MemorySessionStore::new();
        store.set("abc", 1, Duration::from_secs(60)).await.unwrap();
        store.set("abc", 2, Duration::from_secs(60)).await.unwrap();

        assert_eq!(store.get("abc").await.unwrap(), Some(2));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_clear_unknown_token_is_ok() {
        let store = MemorySessionStore::new();
        assert!(store.clear("missing").await.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_sessions_expire() {
        let store = MemorySessionStore::new();
        store.set("short", 1, Duration::from_secs(10)).await.unwrap();
        store.set("long", 2, Duration::from_secs(100)).await.unwrap();

        tokio::time::advance(Duration::from_secs(11)).await;

        assert_eq!(store.get("short").await.unwrap(), None);
        assert_eq!(store.get("long").await.unwrap(), Some(2));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_set_sweeps_expired_sessions() {
        let store = MemorySessionStore::new();
        store.set("old", 1, Duration::from_secs(5)).await.unwrap();

        tokio::time::advance(Duration::from_secs(6)).await;
        store.set("new", 2, Duration::from_secs(5)).await.unwrap();

        assert_eq!(store.len().await, 1);
    }
}
