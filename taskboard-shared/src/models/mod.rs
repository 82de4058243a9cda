/// Database models for Taskboard
///
/// This module contains all database models and their CRUD operations.
///
/// # Models
///
/// - `user`: User accounts and authentication
/// - `project`: Projects owned by a user
/// - `task`: Tasks belonging to a project
/// - `dashboard`: Read-only per-user aggregates
///
/// Model functions take any `sqlx::Executor` over SQLite, so the same call
/// works against the pool for reads and against an open transaction
/// (`&mut *tx`) for writes.
///
/// # Example
///
/// ```no_run
/// use taskboard_shared::models::user::{User, CreateUser};
/// use taskboard_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::in_memory()).await?;
///
/// let mut tx = pool.begin().await?;
/// let user = User::create(&mut *tx, CreateUser {
///     username: "demo_user".to_string(),
///     email: "demo@example.com".to_string(),
///     password_hash: "$argon2id$...".to_string(),
/// }).await?;
/// tx.commit().await?;
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Duration, SubsecRound, Utc};

pub mod dashboard;
pub mod project;
pub mod task;
pub mod user;

/// Current time at the precision stored in the database (microseconds)
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// Timestamp for a mutation of a record last touched at `previous`
///
/// Always strictly later than `previous`, even when the clock has not moved
/// past it.
pub fn touched_at(previous: DateTime<Utc>) -> DateTime<Utc> {
    let current = now();
    if current > previous {
        current
    } else {
        previous + Duration::microseconds(1)
    }
}
