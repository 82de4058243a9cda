/// Redis-backed session store
///
/// Each session is a string key `session:{token}` holding the user ID, with
/// a Redis TTL equal to the session lifetime.

use async_trait::async_trait;
use redis::AsyncCommands;
use std::time::Duration;

use super::{SessionError, SessionStore};
use crate::redis::RedisClient;

const KEY_PREFIX: &str = "session:";

fn session_key(token: &str) -> String {
    format!("{}{}", KEY_PREFIX, token)
}

/// Session store shared through Redis
#[derive(Clone)]
pub struct RedisSessionStore {
    client: RedisClient,
}

impl RedisSessionStore {
    pub fn new(client: RedisClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn get(&self, token: &str) -> Result<Option<i64>, SessionError> {
        let mut conn = self.client.get_connection();
        let key = session_key(token);

        let value: Option<String> = self.client.with_timeout(conn.get(&key)).await?;

        // A value that is not a user ID is treated as no session
        Ok(value.and_then(|v| v.parse::<i64>().ok()))
    }

    async fn set(&self, token: &str, user_id: i64, ttl: Duration) -> Result<(), SessionError> {
        let mut conn = self.client.get_connection();
        let key = session_key(token);
        let seconds = ttl.as_secs().max(1);

        let _: () = self
            .client
            .with_timeout(conn.set_ex(&key, user_id.to_string(), seconds))
            .await?;

        Ok(())
    }

    async fn clear(&self, token: &str) -> Result<(), SessionError> {
        let mut conn = self.client.get_connection();
        let key = session_key(token);

        let _: () = self.client.with_timeout(conn.del(&key)).await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::redis::RedisConfig;

    #[test]
    fn test_session_key() {
        assert_eq!(session_key("abc123"), "session:abc123");
    }

    #[tokio::test]
    #[ignore] // Requires running Redis instance
    async fn test_redis_session_roundtrip() {
        let client = RedisClient::new(RedisConfig::new("redis://localhost:6379"))
            .await
            .unwrap();
        let store = RedisSessionStore::new(client);

        store.set("redis-test-token", 9, Duration::from_secs(30)).await.unwrap();
        assert_eq!(store.get("redis-test-token").await.unwrap(), Some(9));

        store.clear("redis-test-token").await.unwrap();
        assert_eq!(store.get("redis-test-token").await.unwrap(), None);
    }
}
