/// Redis integration
///
/// Redis is optional. When configured it backs the session store so
/// sessions survive API restarts and are shared between API instances.
///
/// # Example
///
/// ```no_run
/// use taskboard_shared::redis::{RedisClient, RedisConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = RedisClient::new(RedisConfig::new("redis://localhost:6379")).await?;
/// let healthy = client.ping().await?;
/// # Ok(())
/// # }
/// ```

pub mod client;

pub use client::{RedisClient, RedisClientError, RedisConfig};
