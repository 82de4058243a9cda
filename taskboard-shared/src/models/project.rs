/// Project model and database operations
///
/// Projects are owned by exactly one user and own zero or more tasks.
/// Deleting a project cascades to its tasks.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE projects (
///     id INTEGER PRIMARY KEY AUTOINCREMENT,
///     name TEXT NOT NULL CHECK (length(name) >= 2),
///     description TEXT,
///     status TEXT NOT NULL DEFAULT 'active'
///         CHECK (status IN ('active', 'completed', 'archived')),
///     user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     created_at TEXT NOT NULL,
///     updated_at TEXT NOT NULL
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use taskboard_shared::models::project::{Project, CreateProject, ProjectStatus, UpdateProject};
/// use sqlx::SqlitePool;
///
/// # async fn example(pool: SqlitePool, user_id: i64) -> Result<(), sqlx::Error> {
/// let mut tx = pool.begin().await?;
///
/// let project = Project::create(&mut *tx, CreateProject {
///     user_id,
///     name: "Website Redesign".to_string(),
///     description: None,
///     status: ProjectStatus::Active,
/// }).await?;
///
/// let project = Project::update(&mut *tx, &project, UpdateProject {
///     status: Some(ProjectStatus::Completed),
///     ..Default::default()
/// }).await?;
///
/// tx.commit().await?;
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

/// Project lifecycle status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    /// Work in progress
    #[default]
    Active,

    /// Finished
    Completed,

    /// Kept for reference, no longer worked on
    Archived,
}

impl ProjectStatus {
    pub const ALL: [ProjectStatus; 3] = [
        ProjectStatus::Active,
        ProjectStatus::Completed,
        ProjectStatus::Archived,
    ];

    /// Converts status to its stored string form
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Active => "active",
            ProjectStatus::Completed => "completed",
            ProjectStatus::Archived => "archived",
        }
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProjectStatus {
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

/// Project model
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Project {
    /// Unique project ID
    pub id: i64,

    /// Project name (at least 2 characters)
    pub name: String,

    /// Optional free-form description
    pub description: Option<String>,

    /// Current status
    pub status: ProjectStatus,

    /// Owning user (immutable)
    pub user_id: i64,

    /// When the project was created
    pub created_at: DateTime<Utc>,

    /// When the project was last mutated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new project
#[derive(Debug, Clone)]
pub struct CreateProject {
    pub user_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub status: ProjectStatus,
}

/// Input for a partial project update
///
/// Only `Some` fields are written. `description: Some(None)` clears the
/// description.
#[derive(Debug, Clone, Default)]
pub struct UpdateProject {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub status: Option<ProjectStatus>,
}

impl Project {
    /// Creates a new project owned by `data.user_id`
    ///
    /// # Errors
    ///
    /// Returns an error if the owning user does not exist (foreign key
    /// violation) or the database operation fails.
    pub async fn create<'e, E>(executor: E, data: CreateProject) -> Result<Self, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let timestamp = now();

        let project = sqlx::query_as::<_, Project>(
            r#"
            INSERT INTO projects (name, description, status, user_id, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?5)
            RETURNING id, name, description, status, user_id, created_at, updated_at
            "#,
        )
        .bind(data.name)
        .bind(data.description)
        .bind(data.status)
        .bind(data.user_id)
        .bind(timestamp)
        .fetch_one(executor)
        .await?;

        Ok(project)
    }

    /// Finds a project by ID
    pub async fn find_by_id<'e, E>(executor: E, id: i64) -> Result<Option<Self>, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let project = sqlx::query_as::<_, Project>(
            r#"
            SELECT id, name, description, status, user_id, created_at, updated_at
            FROM projects
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(executor)
        .await?;

        Ok(project)
    }

    /// Lists a user's projects, most recently updated first
    ///
    /// `status` is matched exactly against the stored value, so an unknown
    /// status simply matches nothing.
    pub async fn list_for_user<'e, E>(
        executor: E,
        user_id: i64,
        status: Option<&str>,
        page: PageRequest,
    ) -> Result<Vec<Self>, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let projects = sqlx::query_as::<_, Project>(
            r#"
            SELECT id, name, description, status, user_id, created_at, updated_at
            FROM projects
            WHERE user_id = ?1 AND (?2 IS NULL OR status = ?2)
            ORDER BY updated_at DESC, id DESC
            LIMIT ?3 OFFSET ?4
            "#,
        )
        .bind(user_id)
        .bind(status)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(executor)
        .await?;

        Ok(projects)
    }

    /// Counts a user's projects, with the same filter as [`Project::list_for_user`]
    pub async fn count_for_user<'e, E>(
        executor: E,
        user_id: i64,
        status: Option<&str>,
    ) -> Result<i64, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM projects WHERE user_id = ?1 AND (?2 IS NULL OR status = ?2)",
        )
        .bind(user_id)
        .bind(status)
        .fetch_one(executor)
        .await?;

        Ok(count)
    }

    /// Applies a partial update and refreshes `updated_at`
    ///
    /// `updated_at` always advances past `existing.updated_at`, even when no
    /// field changes.
    pub async fn update<'e, E>(
        executor: E,
        existing: &Project,
        data: UpdateProject,
    ) -> Result<Self, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let mut builder = QueryBuilder::<Sqlite>::new("UPDATE projects SET updated_at = ");
        builder.push_bind(touched_at(existing.updated_at));

        if let Some(name) = data.name {
            builder.push(", name = ").push_bind(name);
        }
        if let Some(description) = data.description {
            builder.push(", description = ").push_bind(description);
        }
        if let Some(status) = data.status {
            builder.push(", status = ").push_bind(status);
        }

        builder
            .push(" WHERE id = ")
            .push_bind(existing.id)
            .push(" RETURNING id, name, description, status, user_id, created_at, updated_at");

        let project = builder
            .build_query_as::<Project>()
            .fetch_one(executor)
            .await?;

        Ok(project)
    }

    /// Deletes a project by ID, cascading to its tasks
    ///
    /// Returns true if the project existed.
    pub async fn delete<'e, E>(executor: E, id: i64) -> Result<bool, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("DELETE FROM projects WHERE id = ?1")
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
        assert_eq!("active".parse::<ProjectStatus>().unwrap(), ProjectStatus::Active);
        assert_eq!("completed".parse::<ProjectStatus>().unwrap(), ProjectStatus::Completed);
        assert_eq!("archived".parse::<ProjectStatus>().unwrap(), ProjectStatus::Archived);
    }

    #[test]
    fn test_status_parse_rejects_unknown() {
        let err = "paused".parse::<ProjectStatus>().unwrap_err();
        assert_eq!(err.field, "status");
        assert_eq!(err.message, "Status must be one of: active, completed, archived");

        assert!("Active".parse::<ProjectStatus>().is_err());
    }

    #[test]
    fn test_status_default_and_display() {
        assert_eq!(ProjectStatus::default(), ProjectStatus::Active);
        assert_eq!(ProjectStatus::Archived.to_string(), "archived");
    }

    #[test]
    fn test_status_serde() {
        let json = serde_json::to_string(&ProjectStatus::Completed).unwrap();
        assert_eq!(json, "\"completed\"");
    }
}
