/// Per-user dashboard aggregates
///
/// Read-only counts over a user's projects and the tasks inside them, plus
/// the most recently created tasks.

use serde::Serialize;
use sqlx::SqlitePool;

use super::task::Task;

/// Number of tasks returned in [`DashboardStats::recent_tasks`]
pub const RECENT_TASKS_LIMIT: i64 = 5;

/// Project counts by status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct ProjectCounts {
    pub total: i64,
    pub active: i64,
    pub completed: i64,
}

/// Task counts by status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct TaskCounts {
    pub total: i64,
    pub todo: i64,
    pub in_progress: i64,
    pub completed: i64,
}

/// Everything the dashboard shows for one user
#[derive(Debug, Clone)]
pub struct DashboardStats {
    pub projects: ProjectCounts,
    pub tasks: TaskCounts,
    pub recent_tasks: Vec<Task>,
}

impl DashboardStats {
    /// Computes the dashboard for `user_id`
    pub async fn for_user(pool: &SqlitePool, user_id: i64) -> Result<Self, sqlx::Error> {
        let projects = sqlx::query_as::<_, ProjectCounts>(
            r#"
            SELECT COUNT(*) AS total,
                   COALESCE(SUM(CASE WHEN status = 'active' THEN 1 ELSE 0 END), 0) AS active,
                   COALESCE(SUM(CASE WHEN status = 'completed' THEN 1 ELSE 0 END), 0) AS completed
            FROM projects
            WHERE user_id = ?1
            "#,
        )
        .bind(user_id)
        .fetch_one(pool)
        .await?;

        let tasks = sqlx::query_as::<_, TaskCounts>(
            r#"
            SELECT COUNT(t.id) AS total,
                   COALESCE(SUM(CASE WHEN t.status = 'todo' THEN 1 ELSE 0 END), 0) AS todo,
                   COALESCE(SUM(CASE WHEN t.status = 'in_progress' THEN 1 ELSE 0 END), 0) AS in_progress,
                   COALESCE(SUM(CASE WHEN t.status = 'completed' THEN 1 ELSE 0 END), 0) AS completed
            FROM tasks t
            JOIN projects p ON p.id = t.project_id
            WHERE p.user_id = ?1
            "#,
        )
        .bind(user_id)
        .fetch_one(pool)
        .await?;

        let recent_tasks = Task::list_recent_for_user(pool, user_id, RECENT_TASKS_LIMIT).await?;

        Ok(Self {
            projects,
            tasks,
            recent_tasks,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_counts_serialize_as_flat_objects() {
        let projects = ProjectCounts {
            total: 3,
            active: 2,
            completed: 1,
        };
        let tasks = TaskCounts {
            total: 5,
            todo: 2,
            in_progress: 2,
            completed: 1,
        };

        assert_eq!(
            serde_json::to_value(projects).unwrap(),
            json!({"total": 3, "active": 2, "completed": 1})
        );
        assert_eq!(
            serde_json::to_value(tasks).unwrap(),
            json!({"total": 5, "todo": 2, "in_progress": 2, "completed": 1})
        );
    }
}
