/// Ownership checks for projects and tasks
///
/// Every project belongs to one user and every task to one project, so
/// access is decided by walking that chain back to the session user:
///
/// 1. **Existence**: a missing record fails with [`AuthzError::NotFound`]
/// 2. **Ownership**: a record owned by someone else fails with [`AuthzError::Forbidden`]
///
/// The existence check runs first, so a non-owner learns that the record
/// exists.
///
/// # Example
///
/// ```no_run
/// use taskboard_shared::auth::authorization::{authorize_project, AuthzError};
/// use sqlx::SqlitePool;
///
/// async fn rename(pool: &SqlitePool, user_id: i64, project_id: i64) -> Result<(), AuthzError> {
///     let project = authorize_project(pool, project_id, user_id).await?;
///     println!("{} may edit {}", user_id, project.name);
///     Ok(())
/// }
/// ```

use sqlx::{Executor, Sqlite};
use std::fmt;

use crate::models::project::Project;
use crate::models::task::Task;

/// Kind of record an ownership check was about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Project,
    Task,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resource::Project => f.write_str("Project"),
            Resource::Task => f.write_str("Task"),
        }
    }
}

/// Error type for authorization checks
#[derive(Debug, thiserror::Error)]
pub enum AuthzError {
    /// The record does not exist
    #[error("{0} not found")]
    NotFound(Resource),

    /// The record exists but belongs to another user
    #[error("Unauthorized access")]
    Forbidden,

    /// Database error
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

/// Checks that `owner_id` is the acting user
pub fn require_owner(owner_id: i64, user_id: i64) -> Result<(), AuthzError> {
    if owner_id == user_id {
        Ok(())
    } else {
        Err(AuthzError::Forbidden)
    }
}

/// Loads a project the user owns
///
/// # Errors
///
/// - `NotFound(Project)` if no project has this ID
/// - `Forbidden` if the project belongs to another user
pub async fn authorize_project<'e, E>(
    executor: E,
    project_id: i64,
    user_id: i64,
) -> Result<Project, AuthzError>
where
    E: Executor<'e, Database = Sqlite>,
{
    let project = Project::find_by_id(executor, project_id)
        .await?
        .ok_or(AuthzError::NotFound(Resource::Project))?;

    require_owner(project.user_id, user_id)?;

    Ok(project)
}

/// Loads a task whose project the user owns
///
/// # Errors
///
/// - `NotFound(Task)` if no task has this ID
/// - `Forbidden` if the task's project belongs to another user
pub async fn authorize_task<'e, E>(
    executor: E,
    task_id: i64,
    user_id: i64,
) -> Result<Task, AuthzError>
where
    E: Executor<'e, Database = Sqlite>,
{
    let owned = Task::find_with_owner(executor, task_id)
        .await?
        .ok_or(AuthzError::NotFound(Resource::Task))?;

    require_owner(owned.owner_id, user_id)?;

    Ok(owned.task)
}
