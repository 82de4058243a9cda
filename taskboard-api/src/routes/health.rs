/// Health check endpoint
///
/// Provides a simple health check endpoint that verifies:
/// - The server is running
/// - Database connectivity and the applied schema version
///
/// # Endpoint
///
/// ```text
/// GET /health
/// ```
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "database": "connected",
///   "schema_version": 20250101000000
/// }
/// ```

use crate::{app::AppState, error::ApiResult};
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use taskboard_shared::db::migrations::get_migration_status;

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status (`healthy` or `degraded`)
    pub status: String,

    /// Application version
    pub version: String,

    /// Database status
    pub database: String,

    /// Latest applied migration, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema_version: Option<i64>,
}

/// Health check handler
///
/// Always answers 200; a database failure is reported as `degraded`.
pub async fn health_check(State(state): State<AppState>) -> ApiResult<Json<HealthResponse>> {
    let response = match get_migration_status(&state.db).await {
        Ok(status) => HealthResponse {
            status: "healthy".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            database: "connected".to_string(),
            schema_version: status.latest_version,
        },
        Err(e) => {
            tracing::warn!(error = %e, "Health check could not reach the database");
            HealthResponse {
                status: "degraded".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                database: "disconnected".to_string(),
                schema_version: None,
            }
        }
    };

    Ok(Json(response))
}
