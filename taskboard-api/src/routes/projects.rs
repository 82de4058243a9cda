/// Project endpoints
///
/// All handlers run behind the session middleware and only ever touch
/// projects owned by the session user. Fetching someone else's project is a
/// 403, an unknown ID a 404.
///
/// # Endpoints
///
/// - `GET /api/projects` - List own projects (paginated, optional `status`)
/// - `POST /api/projects` - Create a project
/// - `GET /api/projects/:id` - Get a project
/// - `PATCH /api/projects/:id` - Partially update a project
/// - `DELETE /api/projects/:id` - Delete a project and its tasks

use crate::{
    app::AppState,
    error::ApiResult,
    extract::{ApiJson, ApiPath},
    middleware::session::AuthContext,
    routes::{deserialize_some, ListQuery},
};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use taskboard_shared::{
    auth::authorization::authorize_project,
    models::project::{CreateProject, Project, ProjectStatus, UpdateProject},
    pagination::{Page, PageMeta},
};
use validator::Validate;

/// Create project request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateProjectRequest {
    #[validate(
        required(message = "Project name must be at least 2 characters long"),
        length(min = 2, message = "Project name must be at least 2 characters long")
    )]
    pub name: Option<String>,

    pub description: Option<String>,

    /// Defaults to `active`
    pub status: Option<String>,
}

/// Update project request
///
/// Only keys present in the body are applied. `description: null` clears
/// the description; `null` for `name` or `status` is ignored.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateProjectRequest {
    #[validate(length(min = 2, message = "Project name must be at least 2 characters long"))]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "deserialize_some")]
    pub description: Option<Option<String>>,

    pub status: Option<String>,
}

/// Public project representation
#[derive(Debug, Serialize, Deserialize)]
pub struct ProjectResponse {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub status: ProjectStatus,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Project> for ProjectResponse {
    fn from(project: Project) -> Self {
        Self {
            id: project.id,
            name: project.name,
            description: project.description,
            status: project.status,
            user_id: project.user_id,
            created_at: project.created_at,
            updated_at: project.updated_at,
        }
    }
}

/// Project list response
#[derive(Debug, Serialize)]
pub struct ProjectListResponse {
    pub projects: Vec<ProjectResponse>,

    #[serde(flatten)]
    pub meta: PageMeta,
}

impl From<Page<Project>> for ProjectListResponse {
    fn from(page: Page<Project>) -> Self {
        let page = page.map(ProjectResponse::from);
        Self {
            meta: page.meta(),
            projects: page.items,
        }
    }
}

/// List the session user's projects
///
/// # Endpoint
///
/// ```text
/// GET /api/projects?status=completed&page=1&per_page=10
/// ```
///
/// # Response
///
/// ```json
/// {
///   "projects": [ ... ],
///   "total": 1,
///   "pages": 1,
///   "current_page": 1
/// }
/// ```
pub async fn list_projects(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<ProjectListResponse>> {
    let request = query.page_request(state.config.pagination);
    let status = query.status();

    let total = Project::count_for_user(&state.db, auth.user_id, status).await?;
    let projects = Project::list_for_user(&state.db, auth.user_id, status, request).await?;

    Ok(Json(Page::new(projects, total, request).into()))
}

/// Create a project owned by the session user
///
/// # Errors
///
/// - `400 Bad Request`: Name too short or unknown status
pub async fn create_project(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ApiJson(req): ApiJson<CreateProjectRequest>,
) -> ApiResult<(StatusCode, Json<ProjectResponse>)> {
    req.validate()?;

    let status = match req.status.as_deref() {
        Some(raw) => raw.parse::<ProjectStatus>()?,
        None => ProjectStatus::default(),
    };

    let mut tx = state.db.begin().await?;
    let project = Project::create(
        &mut *tx,
        CreateProject {
            user_id: auth.user_id,
            name: req.name.unwrap_or_default(),
            description: req.description,
            status,
        },
    )
    .await?;
    tx.commit().await?;

    tracing::info!(
        project_id = project.id,
        user_id = auth.user_id,
        "Project created"
    );

    Ok((StatusCode::CREATED, Json(project.into())))
}

/// Get one of the session user's projects
///
/// # Errors
///
/// - `403 Forbidden`: Project belongs to another user
/// - `404 Not Found`: No such project
pub async fn get_project(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ApiPath(project_id): ApiPath<i64>,
) -> ApiResult<Json<ProjectResponse>> {
    let project = authorize_project(&state.db, project_id, auth.user_id).await?;

    Ok(Json(project.into()))
}

/// Partially update a project
///
/// # Errors
///
/// - `400 Bad Request`: Name too short or unknown status (nothing is written)
/// - `403 Forbidden`: Project belongs to another user
/// - `404 Not Found`: No such project
pub async fn update_project(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ApiPath(project_id): ApiPath<i64>,
    ApiJson(req): ApiJson<UpdateProjectRequest>,
) -> ApiResult<Json<ProjectResponse>> {
    let mut tx = state.db.begin().await?;
    let existing = authorize_project(&mut *tx, project_id, auth.user_id).await?;

    req.validate()?;
    let status = req
        .status
        .as_deref()
        .map(str::parse::<ProjectStatus>)
        .transpose()?;

    let project = Project::update(
        &mut *tx,
        &existing,
        UpdateProject {
            name: req.name,
            description: req.description,
            status,
        },
    )
    .await?;
    tx.commit().await?;

    tracing::info!(project_id, user_id = auth.user_id, "Project updated");

    Ok(Json(project.into()))
}

/// Delete a project and, by cascade, all of its tasks
///
/// # Errors
///
/// - `403 Forbidden`: Project belongs to another user
/// - `404 Not Found`: No such project
pub async fn delete_project(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ApiPath(project_id): ApiPath<i64>,
) -> ApiResult<Json<Value>> {
    let mut tx = state.db.begin().await?;
    authorize_project(&mut *tx, project_id, auth.user_id).await?;
    Project::delete(&mut *tx, project_id).await?;
    tx.commit().await?;

    tracing::info!(project_id, user_id = auth.user_id, "Project deleted");

    Ok(Json(json!({ "message": "Project deleted successfully" })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskboard_shared::validation::PROJECT_NAME_TOO_SHORT;

    #[test]
    fn test_create_request_name_rules() {
        let req: CreateProjectRequest = serde_json::from_str(r#"{"description": "x"}"#).unwrap();
        let errors = req.validate().unwrap_err();
        assert_eq!(
            errors.field_errors()["name"][0].message.as_deref(),
            Some(PROJECT_NAME_TOO_SHORT)
        );

        let req: CreateProjectRequest = serde_json::from_str(r#"{"name": "A"}"#).unwrap();
        assert!(req.validate().is_err());

        let req: CreateProjectRequest = serde_json::from_str(r#"{"name": "AB"}"#).unwrap();
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_update_request_presence() {
        let req: UpdateProjectRequest = serde_json::from_str(r#"{"status": "completed"}"#).unwrap();
        assert!(req.name.is_none());
        assert!(req.description.is_none());
        assert!(req.validate().is_ok());

        let req: UpdateProjectRequest =
            serde_json::from_str(r#"{"name": null, "description": null}"#).unwrap();
        assert!(req.name.is_none());
        assert_eq!(req.description, Some(None));
    }
}
