//! # Taskboard API Server
//!
//! HTTP server for the Taskboard project/task management service.
//!
//! ## Startup
//!
//! 1. Load configuration from the environment (and `.env`)
//! 2. Open the SQLite pool and apply migrations
//! 3. Pick the session store (Redis when `REDIS_URL` is set, else in-memory)
//! 4. Configure the AI provider when `OPENAI_API_KEY` is set
//! 5. Serve until Ctrl-C
//!
//! ## Usage
//!
//! ```bash
//! SECRET_KEY=$(openssl rand -hex 32) cargo run -p taskboard-api
//! ```

use std::sync::Arc;

use taskboard_api::{
    app::{build_router, AppState},
    config::Config,
};
use taskboard_shared::{
    ai::{OpenAiConfig, OpenAiGenerator},
    db::{
        migrations::run_migrations,
        pool::{close_pool, create_pool, DatabaseConfig},
    },
    redis::{client::sanitize_url, RedisClient, RedisConfig},
    session::{MemorySessionStore, RedisSessionStore, SessionStore},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    tracing::info!(
        "Taskboard API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env()?;

    let pool = create_pool(DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        ..Default::default()
    })
    .await?;
    run_migrations(&pool).await?;

    let sessions: Arc<dyn SessionStore> = match &config.session.redis_url {
        Some(url) => {
            tracing::info!(url = %sanitize_url(url), "Using Redis session store");
            let client = RedisClient::new(RedisConfig::new(url.clone())).await?;
            Arc::new(RedisSessionStore::new(client))
        }
        None => {
            tracing::info!("Using in-memory session store");
            Arc::new(MemorySessionStore::new())
        }
    };

    let generator = match &config.ai {
        Some(ai) => {
            tracing::info!(model = %ai.model, "AI description generation enabled");
            Some(OpenAiGenerator::new(OpenAiConfig {
                api_key: ai.api_key.clone(),
                base_url: ai.base_url.clone(),
                model: ai.model.clone(),
                max_tokens: ai.max_tokens,
            })?)
        }
        None => {
            tracing::info!("AI description generation disabled (OPENAI_API_KEY not set)");
            None
        }
    };

    let bind_address = config.bind_address();
    let mut state = AppState::new(pool.clone(), config, sessions);
    if let Some(generator) = generator {
        state = state.with_ai(Arc::new(generator));
    }

    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    close_pool(pool).await;
    tracing::info!("Server stopped");

    Ok(())
}

/// Installs the global subscriber
///
/// `RUST_LOG` overrides the default filter; `LOG_FORMAT=json` switches to
/// JSON lines.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "taskboard_api=debug,taskboard_shared=info,tower_http=debug".into());

    let json = std::env::var("LOG_FORMAT")
        .map(|format| format.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    tracing::info!("Shutdown signal received, draining connections...");
}
