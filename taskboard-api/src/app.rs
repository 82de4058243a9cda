/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use taskboard_api::{app::AppState, config::Config};
/// use taskboard_shared::session::MemorySessionStore;
/// use sqlx::SqlitePool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = SqlitePool::connect(&config.database.url).await?;
/// let state = AppState::new(pool, config, Arc::new(MemorySessionStore::new()));
/// let app = taskboard_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::{
    config::Config,
    middleware::{security::SecurityHeadersLayer, session::require_session},
};
use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use sqlx::SqlitePool;
use std::sync::Arc;
use taskboard_shared::{ai::DescriptionGenerator, session::SessionStore};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// This is cloned for each request handler via Axum's `State` extractor.
/// Uses Arc internally for cheap cloning.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,

    /// Application configuration
    pub config: Arc<Config>,

    /// Server-side session store
    pub sessions: Arc<dyn SessionStore>,

    /// Task description generator (None when no provider is configured)
    pub ai: Option<Arc<dyn DescriptionGenerator>>,
}

impl AppState {
    /// Creates new application state without an AI provider
    pub fn new(db: SqlitePool, config: Config, sessions: Arc<dyn SessionStore>) -> Self {
        Self {
            db,
            config: Arc::new(config),
            sessions,
            ai: None,
        }
    }

    /// Attaches a description generator
    pub fn with_ai(mut self, generator: Arc<dyn DescriptionGenerator>) -> Self {
        self.ai = Some(generator);
        self
    }

    /// Gets the key used to sign session cookies
    pub fn secret_key(&self) -> &str {
        &self.config.session.secret_key
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health                          # Health check (public)
/// └── /api/
///     ├── POST /signup                 # Public
///     ├── POST /login
///     ├── POST /logout
///     ├── GET  /check-session
///     ├── GET|POST /projects           # Session required from here on
///     ├── GET|PATCH|DELETE /projects/:id
///     ├── GET|POST /projects/:id/tasks
///     ├── GET|PATCH|DELETE /tasks/:id
///     ├── GET  /dashboard
///     └── POST /ai/generate-task-description
/// ```
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. Logging (tower-http TraceLayer)
/// 2. CORS (tower-http CorsLayer)
/// 3. Security headers
/// 4. Session authentication (matched protected routes only)
///
/// Unmatched paths get the JSON 404 body.
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    // Health check (public, no auth)
    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    // Auth routes (public, no session required)
    let auth_routes = Router::new()
        .route("/signup", post(routes::auth::signup))
        .route("/login", post(routes::auth::login))
        .route("/logout", post(routes::auth::logout))
        .route("/check-session", get(routes::auth::check_session));

    // Resource routes (require a session)
    let protected_routes = Router::new()
        .route(
            "/projects",
            get(routes::projects::list_projects).post(routes::projects::create_project),
        )
        .route(
            "/projects/:id",
            get(routes::projects::get_project)
                .patch(routes::projects::update_project)
                .delete(routes::projects::delete_project),
        )
        .route(
            "/projects/:id/tasks",
            get(routes::tasks::list_tasks).post(routes::tasks::create_task),
        )
        .route(
            "/tasks/:id",
            get(routes::tasks::get_task)
                .patch(routes::tasks::update_task)
                .delete(routes::tasks::delete_task),
        )
        .route("/dashboard", get(routes::dashboard::get_dashboard))
        .route(
            "/ai/generate-task-description",
            post(routes::ai::generate_task_description),
        )
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            require_session,
        ));

    let api_routes = Router::new().merge(auth_routes).merge(protected_routes);

    // Configure CORS based on environment
    let cors = if state.config.api.cors_origins.iter().any(|origin| origin == "*") {
        // Development mode: permissive CORS
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PATCH,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    };

    Router::new()
        .merge(health_routes)
        .nest("/api", api_routes)
        .fallback(routes::not_found)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .layer(SecurityHeadersLayer::new(state.config.api.production))
        .with_state(state)
}
