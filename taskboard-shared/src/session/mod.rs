/// Server-side session storage
///
/// A session maps an opaque token (see [`crate::auth::session`]) to the ID
/// of the logged-in user, with an expiry. The store is injected into the
/// API state as `Arc<dyn SessionStore>`.
///
/// # Implementations
///
/// - [`MemorySessionStore`]: process-local map, used by default and in tests
/// - [`RedisSessionStore`]: `SETEX session:{token}`, used when Redis is configured
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use taskboard_shared::session::{MemorySessionStore, SessionStore};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let store = MemorySessionStore::new();
///
/// store.set("token", 42, Duration::from_secs(3600)).await?;
/// assert_eq!(store.get("token").await?, Some(42));
///
/// store.clear("token").await?;
/// assert_eq!(store.get("token").await?, None);
/// # Ok(())
/// # }
/// ```

use async_trait::async_trait;
use std::time::Duration;

pub mod memory;
pub mod redis;

pub use self::memory::MemorySessionStore;
pub use self::redis::RedisSessionStore;

use crate::redis::RedisClientError;

/// Error type for session store operations
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The backing store failed
    #[error("Session store error: {0}")]
    Backend(String),
}

impl From<RedisClientError> for SessionError {
    fn from(err: RedisClientError) -> Self {
        SessionError::Backend(err.to_string())
    }
}

/// Token → user ID storage with expiry
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Returns the user bound to `token`, or None if absent or expired
    async fn get(&self, token: &str) -> Result<Option<i64>, SessionError>;

    /// Binds `token` to `user_id` for `ttl`, replacing any existing binding
    async fn set(&self, token: &str, user_id: i64, ttl: Duration) -> Result<(), SessionError>;

    /// Removes `token`; clearing an unknown token is not an error
    async fn clear(&self, token: &str) -> Result<(), SessionError>;
}
