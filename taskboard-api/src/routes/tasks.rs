/// Task endpoints
///
/// Tasks are reached either through their project (list/create) or
/// directly by ID. Either way the session user must own the project.
///
/// # Endpoints
///
/// - `GET /api/projects/:id/tasks` - List a project's tasks (paginated, optional `status`)
/// - `POST /api/projects/:id/tasks` - Create a task in a project
/// - `GET /api/tasks/:id` - Get a task
/// - `PATCH /api/tasks/:id` - Partially update a task
/// - `DELETE /api/tasks/:id` - Delete a task

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
    auth::authorization::{authorize_project, authorize_task},
    models::task::{CreateTask, Task, TaskPriority, TaskStatus, UpdateTask},
    pagination::{Page, PageMeta},
    validation::{parse_due_date, ValidationError},
};
use validator::Validate;

/// Create task request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTaskRequest {
    #[validate(
        required(message = "Task title must be at least 2 characters long"),
        length(min = 2, message = "Task title must be at least 2 characters long")
    )]
    pub title: Option<String>,

    pub description: Option<String>,

    /// Defaults to `todo`
    pub status: Option<String>,

    /// Defaults to `medium`
    pub priority: Option<String>,

    /// ISO 8601 date or date-time; empty means none
    pub due_date: Option<String>,
}

/// Update task request
///
/// Only keys present in the body are applied. `description` and
/// `due_date` accept `null` (or, for `due_date`, an empty string) to clear.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateTaskRequest {
    #[validate(length(min = 2, message = "Task title must be at least 2 characters long"))]
    pub title: Option<String>,

    #[serde(default, deserialize_with = "deserialize_some")]
    pub description: Option<Option<String>>,

    pub status: Option<String>,

    pub priority: Option<String>,

    #[serde(default, deserialize_with = "deserialize_some")]
    pub due_date: Option<Option<String>>,
}

/// Public task representation
#[derive(Debug, Serialize, Deserialize)]
pub struct TaskResponse {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub due_date: Option<DateTime<Utc>>,
    pub project_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Task> for TaskResponse {
    fn from(task: Task) -> Self {
        Self {
            id: task.id,
            title: task.title,
            description: task.description,
            status: task.status,
            priority: task.priority,
            due_date: task.due_date,
            project_id: task.project_id,
            created_at: task.created_at,
            updated_at: task.updated_at,
        }
    }
}

/// Task list response
#[derive(Debug, Serialize)]
pub struct TaskListResponse {
    pub tasks: Vec<TaskResponse>,

    #[serde(flatten)]
    pub meta: PageMeta,
}

impl From<Page<Task>> for TaskListResponse {
    fn from(page: Page<Task>) -> Self {
        let page = page.map(TaskResponse::from);
        Self {
            meta: page.meta(),
            tasks: page.items,
        }
    }
}

fn optional_due_date(raw: Option<&str>) -> Result<Option<DateTime<Utc>>, ValidationError> {
    match raw {
        Some(raw) if !raw.trim().is_empty() => parse_due_date(raw).map(Some),
        _ => Ok(None),
    }
}

/// List a project's tasks
///
/// # Response
///
/// ```json
/// {
///   "tasks": [ ... ],
///   "total": 3,
///   "pages": 1,
///   "current_page": 1
/// }
/// ```
///
/// # Errors
///
/// - `403 Forbidden`: Project belongs to another user
/// - `404 Not Found`: No such project
pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ApiPath(project_id): ApiPath<i64>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<TaskListResponse>> {
    authorize_project(&state.db, project_id, auth.user_id).await?;

    let request = query.page_request(state.config.pagination);
    let status = query.status();

    let total = Task::count_for_project(&state.db, project_id, status).await?;
    let tasks = Task::list_for_project(&state.db, project_id, status, request).await?;

    Ok(Json(Page::new(tasks, total, request).into()))
}

/// Create a task in one of the session user's projects
///
/// # Errors
///
/// - `400 Bad Request`: Title too short, unknown status/priority, bad due date
/// - `403 Forbidden`: Project belongs to another user
/// - `404 Not Found`: No such project
pub async fn create_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ApiPath(project_id): ApiPath<i64>,
    ApiJson(req): ApiJson<CreateTaskRequest>,
) -> ApiResult<(StatusCode, Json<TaskResponse>)> {
    let mut tx = state.db.begin().await?;
    authorize_project(&mut *tx, project_id, auth.user_id).await?;

    req.validate()?;
    let status = match req.status.as_deref() {
        Some(raw) => raw.parse::<TaskStatus>()?,
        None => TaskStatus::default(),
    };
    let priority = match req.priority.as_deref() {
        Some(raw) => raw.parse::<TaskPriority>()?,
        None => TaskPriority::default(),
    };
    let due_date = optional_due_date(req.due_date.as_deref())?;

    let task = Task::create(
        &mut *tx,
        CreateTask {
            project_id,
            title: req.title.unwrap_or_default(),
            description: req.description,
            status,
            priority,
            due_date,
        },
    )
    .await?;
    tx.commit().await?;

    tracing::info!(
        task_id = task.id,
        project_id,
        user_id = auth.user_id,
        "Task created"
    );

    Ok((StatusCode::CREATED, Json(task.into())))
}

/// Get a task
///
/// # Errors
///
/// - `403 Forbidden`: Task's project belongs to another user
/// - `404 Not Found`: No such task
pub async fn get_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ApiPath(task_id): ApiPath<i64>,
) -> ApiResult<Json<TaskResponse>> {
    let task = authorize_task(&state.db, task_id, auth.user_id).await?;

    Ok(Json(task.into()))
}

/// Partially update a task
///
/// # Errors
///
/// - `400 Bad Request`: Invalid field value (nothing is written)
/// - `403 Forbidden`: Task's project belongs to another user
/// - `404 Not Found`: No such task
pub async fn update_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ApiPath(task_id): ApiPath<i64>,
    ApiJson(req): ApiJson<UpdateTaskRequest>,
) -> ApiResult<Json<TaskResponse>> {
    let mut tx = state.db.begin().await?;
    let existing = authorize_task(&mut *tx, task_id, auth.user_id).await?;

    req.validate()?;
    let status = req
        .status
        .as_deref()
        .map(str::parse::<TaskStatus>)
        .transpose()?;
    let priority = req
        .priority
        .as_deref()
        .map(str::parse::<TaskPriority>)
        .transpose()?;
    let due_date = req
        .due_date
        .map(|raw| optional_due_date(raw.as_deref()))
        .transpose()?;

    let task = Task::update(
        &mut *tx,
        &existing,
        UpdateTask {
            title: req.title,
            description: req.description,
            status,
            priority,
            due_date,
        },
    )
    .await?;
    tx.commit().await?;

    tracing::info!(task_id, user_id = auth.user_id, "Task updated");

    Ok(Json(task.into()))
}

/// Delete a task
///
/// # Errors
///
/// - `403 Forbidden`: Task's project belongs to another user
/// - `404 Not Found`: No such task
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ApiPath(task_id): ApiPath<i64>,
) -> ApiResult<Json<Value>> {
    let mut tx = state.db.begin().await?;
    authorize_task(&mut *tx, task_id, auth.user_id).await?;
    Task::delete(&mut *tx, task_id).await?;
    tx.commit().await?;

    tracing::info!(task_id, user_id = auth.user_id, "Task deleted");

    Ok(Json(json!({ "message": "Task deleted successfully" })))
}
