/// Task model and database operations
///
/// Tasks belong to exactly one project and are owned transitively by the
/// project's user. Ownership checks load a task together with its owner via
/// [`Task::find_with_owner`].
///
/// # Schema
///
/// ```sql
/// CREATE TABLE tasks (
///     id INTEGER PRIMARY KEY AUTOINCREMENT,
///     title TEXT NOT NULL CHECK (length(title) >= 2),
///     description TEXT,
///     status TEXT NOT NULL DEFAULT 'todo'
///         CHECK (status IN ('todo', 'in_progress', 'completed')),
///     priority TEXT NOT NULL DEFAULT 'medium'
///         CHECK (priority IN ('low', 'medium', 'high')),
///     due_date TEXT,
///     project_id INTEGER NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
///     created_at TEXT NOT NULL,
///     updated_at TEXT NOT NULL
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use taskboard_shared::models::task::{Task, CreateTask, TaskPriority, TaskStatus};
/// use sqlx::SqlitePool;
///
/// # async fn example(pool: SqlitePool, project_id: i64) -> Result<(), sqlx::Error> {
/// let task = Task::create(&pool, CreateTask {
///     project_id,
///     title: "Design homepage mockup".to_string(),
///     description: None,
///     status: TaskStatus::Todo,
///     priority: TaskPriority::High,
///     due_date: None,
/// }).await?;
///
/// let owned = Task::find_with_owner(&pool, task.id).await?;
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Executor, QueryBuilder, Sqlite};
use std::fmt;
use std::str::FromStr;

use super::{now, touched_at};
use crate::pagination::PageRequest;
use crate::validation::ValidationError;

const TASK_COLUMNS: &str =
    "id, title, description, status, priority, due_date, project_id, created_at, updated_at";

/// Task progress status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Not started
    #[default]
    Todo,

    /// Being worked on
    InProgress,

    /// Done
    Completed,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 3] = [TaskStatus::Todo, TaskStatus::InProgress, TaskStatus::Completed];

    /// Converts status to its stored string form
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| {
                let allowed: Vec<&str> = Self::ALL.iter().map(|s| s.as_str()).collect();
                ValidationError::not_one_of("status", "Status", &allowed)
            })
    }
}

/// Task priority
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
}

impl TaskPriority {
    pub const ALL: [TaskPriority; 3] = [TaskPriority::Low, TaskPriority::Medium, TaskPriority::High];

    /// Converts priority to its stored string form
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::Low => "low",
            TaskPriority::Medium => "medium",
            TaskPriority::High => "high",
        }
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskPriority {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|priority| priority.as_str() == s)
            .ok_or_else(|| {
                let allowed: Vec<&str> = Self::ALL.iter().map(|p| p.as_str()).collect();
                ValidationError::not_one_of("priority", "Priority", &allowed)
            })
    }
}

/// Task model
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Task {
    /// Unique task ID
    pub id: i64,

    /// Task title (at least 2 characters)
    pub title: String,

    /// Optional free-form description
    pub description: Option<String>,

    /// Current status
    pub status: TaskStatus,

    /// Priority
    pub priority: TaskPriority,

    /// Optional due date/time (UTC)
    pub due_date: Option<DateTime<Utc>>,

    /// Owning project (immutable)
    pub project_id: i64,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was last mutated
    pub updated_at: DateTime<Utc>,
}

/// A task together with the user who owns its project
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct OwnedTask {
    #[sqlx(flatten)]
    pub task: Task,

    /// `projects.user_id` of the task's project
    pub owner_id: i64,
}

/// Input for creating a new task
#[derive(Debug, Clone)]
pub struct CreateTask {
    pub project_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub due_date: Option<DateTime<Utc>>,
}

/// Input for a partial task update
///
/// Only `Some` fields are written. `description` and `due_date` use
/// `Some(None)` to clear the stored value.
#[derive(Debug, Clone, Default)]
pub struct UpdateTask {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub due_date: Option<Option<DateTime<Utc>>>,
}

impl Task {
    /// Creates a new task in `data.project_id`
    ///
    /// # Errors
    ///
    /// Returns an error if the project does not exist (foreign key
    /// violation) or the database operation fails.
    pub async fn create<'e, E>(executor: E, data: CreateTask) -> Result<Self, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let timestamp = now();
        let query = format!(
            r#"
            INSERT INTO tasks (title, description, status, priority, due_date, project_id, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)
            RETURNING {TASK_COLUMNS}
            "#
        );

        let task = sqlx::query_as::<_, Task>(&query)
            .bind(data.title)
            .bind(data.description)
            .bind(data.status)
            .bind(data.priority)
            .bind(data.due_date)
            .bind(data.project_id)
            .bind(timestamp)
            .fetch_one(executor)
            .await?;

        Ok(task)
    }

    /// Finds a task by ID
    pub async fn find_by_id<'e, E>(executor: E, id: i64) -> Result<Option<Self>, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let query = format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1");

        let task = sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await?;

        Ok(task)
    }

    /// Finds a task by ID along with the owner of its project
    pub async fn find_with_owner<'e, E>(
        executor: E,
        id: i64,
    ) -> Result<Option<OwnedTask>, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let task = sqlx::query_as::<_, OwnedTask>(
            r#"
            SELECT t.id, t.title, t.description, t.status, t.priority, t.due_date,
                   t.project_id, t.created_at, t.updated_at, p.user_id AS owner_id
            FROM tasks t
            JOIN projects p ON p.id = t.project_id
            WHERE t.id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(executor)
        .await?;

        Ok(task)
    }

    /// Lists a project's tasks, most recently created first
    ///
    /// `status` is matched exactly against the stored value.
    pub async fn list_for_project<'e, E>(
        executor: E,
        project_id: i64,
        status: Option<&str>,
        page: PageRequest,
    ) -> Result<Vec<Self>, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let query = format!(
            r#"
            SELECT {TASK_COLUMNS}
            FROM tasks
            WHERE project_id = ?1 AND (?2 IS NULL OR status = ?2)
            ORDER BY created_at DESC, id DESC
            LIMIT ?3 OFFSET ?4
            "#
        );

        let tasks = sqlx::query_as::<_, Task>(&query)
            .bind(project_id)
            .bind(status)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(executor)
            .await?;

        Ok(tasks)
    }

    /// Counts a project's tasks, with the same filter as [`Task::list_for_project`]
    pub async fn count_for_project<'e, E>(
        executor: E,
        project_id: i64,
        status: Option<&str>,
    ) -> Result<i64, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM tasks WHERE project_id = ?1 AND (?2 IS NULL OR status = ?2)",
        )
        .bind(project_id)
        .bind(status)
        .fetch_one(executor)
        .await?;

        Ok(count)
    }

    /// Lists the most recently created tasks across all of a user's projects
    pub async fn list_recent_for_user<'e, E>(
        executor: E,
        user_id: i64,
        limit: i64,
    ) -> Result<Vec<Self>, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT t.id, t.title, t.description, t.status, t.priority, t.due_date,
                   t.project_id, t.created_at, t.updated_at
            FROM tasks t
            JOIN projects p ON p.id = t.project_id
            WHERE p.user_id = ?1
            ORDER BY t.created_at DESC, t.id DESC
            LIMIT ?2
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(executor)
        .await?;

        Ok(tasks)
    }

    /// Applies a partial update and refreshes `updated_at`
    ///
    /// `updated_at` always advances past `existing.updated_at`.
    pub async fn update<'e, E>(
        executor: E,
        existing: &Task,
        data: UpdateTask,
    ) -> Result<Self, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let mut builder = QueryBuilder::<Sqlite>::new("UPDATE tasks SET updated_at = ");
        builder.push_bind(touched_at(existing.updated_at));

        if let Some(title) = data.title {
            builder.push(", title = ").push_bind(title);
        }
        if let Some(description) = data.description {
            builder.push(", description = ").push_bind(description);
        }
        if let Some(status) = data.status {
            builder.push(", status = ").push_bind(status);
        }
        if let Some(priority) = data.priority {
            builder.push(", priority = ").push_bind(priority);
        }
        if let Some(due_date) = data.due_date {
            builder.push(", due_date = ").push_bind(due_date);
        }

        builder
            .push(" WHERE id = ")
            .push_bind(existing.id)
            .push(" RETURNING ")
            .push(TASK_COLUMNS);

        let task = builder.build_query_as::<Task>().fetch_one(executor).await?;

        Ok(task)
    }

    /// Deletes a task by ID
    ///
    /// Returns true if the task existed.
    pub async fn delete<'e, E>(executor: E, id: i64) -> Result<bool, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("DELETE FROM tasks WHERE id = ?1")
            .bind(id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse() {
        assert_eq!("todo".parse::<TaskStatus>().unwrap(), TaskStatus::Todo);
        assert_eq!("in_progress".parse::<TaskStatus>().unwrap(), TaskStatus::InProgress);
        assert_eq!("completed".parse::<TaskStatus>().unwrap(), TaskStatus::Completed);
    }

    #[test]
    fn test_status_rejects_blocked() {
        let err = "blocked".parse::<TaskStatus>().unwrap_err();
        assert_eq!(err.message, "Status must be one of: todo, in_progress, completed");
    }

    #[test]
    fn test_priority_parse() {
        assert_eq!("high".parse::<TaskPriority>().unwrap(), TaskPriority::High);

        let err = "urgent".parse::<TaskPriority>().unwrap_err();
        assert_eq!(err.field, "priority");
        assert_eq!(err.message, "Priority must be one of: low, medium, high");
    }

    #[test]
    fn test_defaults() {
        assert_eq!(TaskStatus::default(), TaskStatus::Todo);
        assert_eq!(TaskPriority::default(), TaskPriority::Medium);
    }

    #[test]
    fn test_serde_snake_case() {
        assert_eq!(
            serde_json::to_string(&TaskStatus::InProgress).unwrap(),
            "\"in_progress\""
        );
        assert_eq!(serde_json::to_string(&TaskPriority::Low).unwrap(), "\"low\"");
    }
}
