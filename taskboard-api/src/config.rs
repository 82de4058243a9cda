/// Configuration management for the API server
///
/// This module loads configuration from environment variables (and a `.env`
/// file when present) into a type-safe configuration struct.
///
/// # Environment Variables
///
/// - `API_HOST` / `API_PORT`: Bind address (default: 0.0.0.0:5555)
/// - `CORS_ORIGINS`: Comma-separated allowed origins, `*` for any (default: http://localhost:3000)
/// - `APP_ENV`: `production` enables HSTS and `Secure` cookies (default: development)
/// - `DATABASE_URL`: SQLite connection string (default: sqlite://taskboard.db)
/// - `DATABASE_MAX_CONNECTIONS`: Pool size (default: 5)
/// - `SECRET_KEY`: Session cookie signing key, at least 32 characters (required)
/// - `SESSION_LIFETIME_HOURS`: Session lifetime (default: 168)
/// - `REDIS_URL`: Store sessions in Redis instead of process memory (optional)
/// - `ITEMS_PER_PAGE` / `MAX_ITEMS_PER_PAGE`: List page sizes (default: 10 / 100)
/// - `OPENAI_API_KEY`: Enables AI description generation (optional)
/// - `OPENAI_BASE_URL` / `OPENAI_MODEL` / `OPENAI_MAX_TOKENS`: Provider settings
///
/// # Example
///
/// ```no_run
/// use taskboard_api::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("Server will listen on {}", config.bind_address());
/// # Ok(())
/// # }
/// ```

use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use std::time::Duration;
use taskboard_shared::ai::openai::{DEFAULT_BASE_URL, DEFAULT_MAX_TOKENS, DEFAULT_MODEL};

/// Minimum length of `SECRET_KEY`
pub const MIN_SECRET_KEY_LENGTH: usize = 32;

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// API server configuration
    pub api: ApiConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Session configuration
    pub session: SessionConfig,

    /// List pagination configuration
    pub pagination: PaginationConfig,

    /// AI provider configuration (None disables the AI endpoint)
    pub ai: Option<AiConfig>,
}

/// API server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,

    /// Allowed CORS origins (`*` allows any)
    pub cors_origins: Vec<String>,

    /// Production mode (HSTS, `Secure` cookies)
    pub production: bool,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite connection URL
    pub url: String,

    /// Maximum number of connections in pool
    pub max_connections: u32,
}

/// Session configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Key for signing session cookies
    ///
    /// IMPORTANT: This must be kept secret and should be at least 32 bytes.
    /// Generate with: `openssl rand -hex 32`
    #[serde(skip_serializing)]
    pub secret_key: String,

    /// Session lifetime in hours
    pub lifetime_hours: u64,

    /// Redis URL for the shared session store
    pub redis_url: Option<String>,
}

/// List pagination configuration
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PaginationConfig {
    /// Page size when `per_page` is absent or invalid
    pub default_per_page: i64,

    /// Upper bound for `per_page`
    pub max_per_page: i64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_per_page: 10,
            max_per_page: 100,
        }
    }
}

/// AI provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiConfig {
    /// Provider API key
    #[serde(skip_serializing)]
    pub api_key: String,

    /// OpenAI-compatible base URL
    pub base_url: String,

    /// Model name
    pub model: String,

    /// Cap on generated tokens
    pub max_tokens: u32,
}

impl Config {
    /// Loads configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `SECRET_KEY` is missing or shorter than 32 characters
    /// - A numeric variable has an invalid value
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present (for development)
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let api_host = var("API_HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let api_port = parse_or(&var, "API_PORT", 5555u16)?;

        let cors_origins: Vec<String> = var("CORS_ORIGINS")
            .unwrap_or_else(|| "http://localhost:3000".to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        let production = var("APP_ENV")
            .map(|value| value.eq_ignore_ascii_case("production"))
            .unwrap_or(false);

        let database_url = var("DATABASE_URL").unwrap_or_else(|| "sqlite://taskboard.db".to_string());
        let max_connections = parse_or(&var, "DATABASE_MAX_CONNECTIONS", 5u32)?;

        let secret_key = var("SECRET_KEY")
            .ok_or_else(|| anyhow::anyhow!("SECRET_KEY environment variable is required"))?;

        if secret_key.len() < MIN_SECRET_KEY_LENGTH {
            anyhow::bail!("SECRET_KEY must be at least 32 characters long");
        }

        let lifetime_hours = parse_or(&var, "SESSION_LIFETIME_HOURS", 168u64)?;
        if lifetime_hours == 0 {
            anyhow::bail!("SESSION_LIFETIME_HOURS must be positive");
        }

        let default_per_page = parse_or(&var, "ITEMS_PER_PAGE", 10i64)?;
        let max_per_page = parse_or(&var, "MAX_ITEMS_PER_PAGE", 100i64)?;
        if default_per_page < 1 || max_per_page < default_per_page {
            anyhow::bail!("ITEMS_PER_PAGE must be between 1 and MAX_ITEMS_PER_PAGE");
        }

        let ai = match var("OPENAI_API_KEY") {
            Some(api_key) => Some(AiConfig {
                api_key,
                base_url: var("OPENAI_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
                model: var("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
                max_tokens: parse_or(&var, "OPENAI_MAX_TOKENS", DEFAULT_MAX_TOKENS)?,
            }),
            None => None,
        };

        Ok(Self {
            api: ApiConfig {
                host: api_host,
                port: api_port,
                cors_origins,
                production,
            },
            database: DatabaseConfig {
                url: database_url,
                max_connections,
            },
            session: SessionConfig {
                secret_key,
                lifetime_hours,
                redis_url: var("REDIS_URL"),
            },
            pagination: PaginationConfig {
                default_per_page,
                max_per_page,
            },
            ai,
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }

    /// Session lifetime as a duration
    pub fn session_lifetime(&self) -> Duration {
        Duration::from_secs(self.session.lifetime_hours * 3600)
    }
}

fn parse_or<T, F>(var: &F, key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match var(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("Invalid value for {}: {}", key, e)),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    fn config_from(vars: &[(&str, &str)]) -> anyhow::Result<Config> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[("SECRET_KEY", SECRET)]).unwrap();

        assert_eq!(config.bind_address(), "0.0.0.0:5555");
        assert_eq!(config.api.cors_origins, vec!["http://localhost:3000"]);
        assert!(!config.api.production);
        assert_eq!(config.database.url, "sqlite://taskboard.db");
        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.session.lifetime_hours, 168);
        assert_eq!(config.session_lifetime(), Duration::from_secs(7 * 24 * 3600));
        assert!(config.session.redis_url.is_none());
        assert_eq!(config.pagination.default_per_page, 10);
        assert_eq!(config.pagination.max_per_page, 100);
        assert!(config.ai.is_none());
    }

    #[test]
    fn test_secret_key_required() {
        assert!(config_from(&[]).is_err());
        assert!(config_from(&[("SECRET_KEY", "too-short")]).is_err());
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("SECRET_KEY", SECRET),
            ("API_HOST", "127.0.0.1"),
            ("API_PORT", "8080"),
            ("CORS_ORIGINS", "http://a.test, http://b.test"),
            ("APP_ENV", "production"),
            ("REDIS_URL", "redis://localhost:6379"),
            ("ITEMS_PER_PAGE", "20"),
            ("OPENAI_API_KEY", "sk-test"),
            ("OPENAI_MODEL", "gpt-4o-mini"),
        ])
        .unwrap();

        assert_eq!(config.bind_address(), "127.0.0.1:8080");
        assert_eq!(config.api.cors_origins, vec!["http://a.test", "http://b.test"]);
        assert!(config.api.production);
        assert_eq!(config.session.redis_url.as_deref(), Some("redis://localhost:6379"));
        assert_eq!(config.pagination.default_per_page, 20);

        let ai = config.ai.unwrap();
        assert_eq!(ai.model, "gpt-4o-mini");
        assert_eq!(ai.base_url, "https://api.openai.com/v1");
        assert_eq!(ai.max_tokens, 200);
    }

    #[test]
    fn test_invalid_numbers_are_errors() {
        assert!(config_from(&[("SECRET_KEY", SECRET), ("API_PORT", "http")]).is_err());
        assert!(config_from(&[("SECRET_KEY", SECRET), ("ITEMS_PER_PAGE", "0")]).is_err());
        assert!(config_from(&[("SECRET_KEY", SECRET), ("SESSION_LIFETIME_HOURS", "0")]).is_err());
    }

    #[test]
    fn test_empty_values_use_defaults() {
        let config = config_from(&[("SECRET_KEY", SECRET), ("OPENAI_API_KEY", ""), ("REDIS_URL", " ")]).unwrap();
        assert!(config.ai.is_none());
        assert!(config.session.redis_url.is_none());
    }

    #[test]
    fn test_secret_not_serialized() {
        let config = config_from(&[("SECRET_KEY", SECRET)]).unwrap();
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains(SECRET));
    }
}
