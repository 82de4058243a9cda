/// Dashboard endpoint
///
/// # Endpoint
///
/// ```text
/// GET /api/dashboard
/// ```
///
/// # Response
///
/// ```json
/// {
///   "projects": { "total": 3, "active": 2, "completed": 1 },
///   "tasks": { "total": 5, "todo": 2, "in_progress": 2, "completed": 1 },
///   "recent_tasks": [ ... ]
/// }
/// ```

use crate::{
    app::AppState, error::ApiResult, middleware::session::AuthContext,
    routes::tasks::TaskResponse,
};
use axum::{extract::State, Extension, Json};
use serde::Serialize;
use taskboard_shared::models::dashboard::{DashboardStats, ProjectCounts, TaskCounts};

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub projects: ProjectCounts,
    pub tasks: TaskCounts,

    /// Five most recently created tasks, newest first
    pub recent_tasks: Vec<TaskResponse>,
}

impl From<DashboardStats> for DashboardResponse {
    fn from(stats: DashboardStats) -> Self {
        Self {
            projects: stats.projects,
            tasks: stats.tasks,
            recent_tasks: stats
                .recent_tasks
                .into_iter()
                .map(TaskResponse::from)
                .collect(),
        }
    }
}

/// Aggregate counts for the session user
pub async fn get_dashboard(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<DashboardResponse>> {
    let stats = DashboardStats::for_user(&state.db, auth.user_id).await?;

    Ok(Json(stats.into()))
}
