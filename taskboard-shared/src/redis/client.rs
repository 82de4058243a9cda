/// Redis client wrapper with connection management and health checks
///
/// Wraps `redis::aio::ConnectionManager`, which reconnects transparently
/// after a dropped connection. Cloning the client is cheap and shares the
/// underlying connection.
///
/// # Example
///
/// ```no_run
/// use taskboard_shared::redis::client::{RedisClient, RedisConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = RedisClient::new(RedisConfig::new("redis://localhost:6379")).await?;
///
/// let healthy = client.ping().await?;
/// println!("Redis healthy: {}", healthy);
/// # Ok(())
/// # }
/// ```

use redis::aio::ConnectionManager;
use redis::{Client, RedisError};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Redis client errors
#[derive(Error, Debug)]
pub enum RedisClientError {
    /// Connection error
    #[error("Redis connection error: {0}")]
    ConnectionError(String),

    /// Command execution error
    #[error("Redis command error: {0}")]
    CommandError(String),

    /// Configuration error
    #[error("Redis configuration error: {0}")]
    ConfigError(String),

    /// Command did not complete within the configured timeout
    #[error("Redis command timed out after {0:?}")]
    Timeout(Duration),
}

impl From<RedisError> for RedisClientError {
    fn from(err: RedisError) -> Self {
        match err.kind() {
            redis::ErrorKind::IoError => {
                RedisClientError::ConnectionError(format!("IO error: {}", err))
            }
            redis::ErrorKind::ResponseError => {
                RedisClientError::CommandError(format!("Response error: {}", err))
            }
            _ => RedisClientError::CommandError(err.to_string()),
        }
    }
}

/// Redis connection settings
#[derive(Debug, Clone)]
pub struct RedisConfig {
    /// Redis connection URL
    ///
    /// Format: redis://[username:password@]host:port[/db]
    pub url: String,

    /// Connection timeout in seconds
    pub connection_timeout_secs: u64,

    /// Command timeout in seconds
    pub command_timeout_secs: u64,
}

impl RedisConfig {
    /// Configuration for `url` with default timeouts (5s connect, 10s command)
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            connection_timeout_secs: 5,
            command_timeout_secs: 10,
        }
    }
}

/// Redis client with connection management
#[derive(Clone)]
pub struct RedisClient {
    manager: ConnectionManager,
    config: Arc<RedisConfig>,
}

impl RedisClient {
    /// Connects to Redis
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the connection cannot be
    /// established within `connection_timeout_secs`.
    pub async fn new(config: RedisConfig) -> Result<Self, RedisClientError> {
        let client = Client::open(config.url.as_str())
            .map_err(|e| RedisClientError::ConfigError(format!("Invalid Redis URL: {}", e)))?;

        let connect_timeout = Duration::from_secs(config.connection_timeout_secs);
        let manager = tokio::time::timeout(connect_timeout, ConnectionManager::new(client))
            .await
            .map_err(|_| RedisClientError::Timeout(connect_timeout))?
            .map_err(|e| {
                RedisClientError::ConnectionError(format!("Failed to connect to Redis: {}", e))
            })?;

        tracing::info!(
            "Redis client connected successfully to {}",
            sanitize_url(&config.url)
        );

        Ok(Self {
            manager,
            config: Arc::new(config),
        })
    }

    /// Sends PING and reports whether Redis answered PONG
    pub async fn ping(&self) -> Result<bool, RedisClientError> {
        let mut conn = self.get_connection();

        let pong: String = self
            .with_timeout(redis::cmd("PING").query_async(&mut conn))
            .await?;

        if pong == "PONG" {
            tracing::debug!("Redis health check: PONG received");
            Ok(true)
        } else {
            tracing::warn!("Redis health check: unexpected response: {}", pong);
            Ok(false)
        }
    }

    /// Runs a Redis future under the configured command timeout
    pub async fn with_timeout<T, F>(&self, fut: F) -> Result<T, RedisClientError>
    where
        F: std::future::Future<Output = Result<T, RedisError>>,
    {
        let limit = Duration::from_secs(self.config.command_timeout_secs);

        tokio::time::timeout(limit, fut)
            .await
            .map_err(|_| RedisClientError::Timeout(limit))?
            .map_err(RedisClientError::from)
    }

    /// Returns a handle for issuing commands
    ///
    /// The handle shares the managed connection and reconnects on its own.
    pub fn get_connection(&self) -> ConnectionManager {
        self.manager.clone()
    }

    /// Gets the Redis configuration
    pub fn config(&self) -> &RedisConfig {
        &self.config
    }
}

/// Replaces credentials in a Redis URL with `***:***` for logging
pub fn sanitize_url(url: &str) -> String {
    if let Some(at_pos) = url.find('@') {
        if let Some(scheme_end) = url.find("://") {
            let scheme = &url[..scheme_end + 3];
            let host = &url[at_pos + 1..];
            return format!("{}***:***@{}", scheme, host);
        }
    }
    url.to_string()
}
