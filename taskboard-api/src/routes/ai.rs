/// AI task description endpoint
///
/// # Endpoint
///
/// ```text
/// POST /api/ai/generate-task-description
/// Content-Type: application/json
///
/// { "title": "Design homepage mockup" }
/// ```
///
/// # Response
///
/// ```json
/// { "description": "..." }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Missing or empty title
/// - `503 Service Unavailable`: No provider configured
/// - `500 Internal Server Error`: Provider call failed

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::ApiJson,
    middleware::session::AuthContext,
};
use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};

/// Generate description request
#[derive(Debug, Default, Deserialize)]
pub struct GenerateDescriptionRequest {
    #[serde(default)]
    pub title: Option<String>,
}

/// Generate description response
#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateDescriptionResponse {
    pub description: String,
}

/// Generate a task description from its title
pub async fn generate_task_description(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ApiJson(req): ApiJson<GenerateDescriptionRequest>,
) -> ApiResult<Json<GenerateDescriptionResponse>> {
    let generator = state
        .ai
        .as_ref()
        .ok_or_else(|| ApiError::ServiceUnavailable("AI provider not configured".to_string()))?;

    let title = req
        .title
        .as_deref()
        .map(str::trim)
        .filter(|title| !title.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Task title is required".to_string()))?;

    let description = generator.generate(title).await?;

    tracing::debug!(user_id = auth.user_id, "Generated task description");

    Ok(Json(GenerateDescriptionResponse { description }))
}
