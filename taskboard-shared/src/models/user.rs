/// User model and database operations
///
/// This module provides the User model and the operations the auth flow
/// needs. Users own projects; deleting a user cascades to its projects and
/// their tasks.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id INTEGER PRIMARY KEY AUTOINCREMENT,
///     username TEXT NOT NULL UNIQUE CHECK (length(username) >= 3),
///     email TEXT NOT NULL UNIQUE CHECK (instr(email, '@') > 0),
///     password_hash TEXT NOT NULL,
///     created_at TEXT NOT NULL
/// );
/// ```
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
/// let user = User::create(&pool, CreateUser {
///     username: "demo_user".to_string(),
///     email: "demo@example.com".to_string(),
///     password_hash: "$argon2id$...".to_string(),
/// }).await?;
///
/// let found = User::find_by_username(&pool, "demo_user").await?;
/// assert_eq!(found.map(|u| u.id), Some(user.id));
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use sqlx::{Executor, Sqlite};

use super::now;

/// User model representing an account
///
/// Passwords are stored as Argon2id hashes, never in plaintext. This type is
/// not serializable; API responses use a dedicated representation without
/// the hash.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    /// Unique user ID
    pub id: i64,

    /// Unique login name
    pub username: String,

    /// Unique email address
    pub email: String,

    /// Argon2id password hash (PHC string)
    pub password_hash: String,

    /// When the account was created
    pub created_at: DateTime<Utc>,
}

/// Input for creating a new user
///
/// Fields must already be validated and the password already hashed.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub username: String,
    pub email: String,

    /// Argon2id password hash (NOT plaintext password!)
    pub password_hash: String,
}

/// Which unique column a failed insert collided with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicateField {
    Username,
    Email,
}

impl User {
    /// Creates a new user
    ///
    /// # Errors
    ///
    /// Returns an error if the username or email already exists (unique
    /// constraint violation, see [`User::duplicate_field`]) or the database
    /// operation fails.
    pub async fn create<'e, E>(executor: E, data: CreateUser) -> Result<Self, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, email, password_hash, created_at)
            VALUES (?1, ?2, ?3, ?4)
            RETURNING id, username, email, password_hash, created_at
            "#,
        )
        .bind(data.username)
        .bind(data.email)
        .bind(data.password_hash)
        .bind(now())
        .fetch_one(executor)
        .await?;

        Ok(user)
    }

    /// Finds a user by ID
    pub async fn find_by_id<'e, E>(executor: E, id: i64) -> Result<Option<Self>, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, created_at
            FROM users
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(executor)
        .await?;

        Ok(user)
    }

    /// Finds a user by username (exact match)
    pub async fn find_by_username<'e, E>(
        executor: E,
        username: &str,
    ) -> Result<Option<Self>, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, created_at
            FROM users
            WHERE username = ?1
            "#,
        )
        .bind(username)
        .fetch_optional(executor)
        .await?;

        Ok(user)
    }

    /// Finds a user by email (exact match)
    pub async fn find_by_email<'e, E>(executor: E, email: &str) -> Result<Option<Self>, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, created_at
            FROM users
            WHERE email = ?1
            "#,
        )
        .bind(email)
        .fetch_optional(executor)
        .await?;

        Ok(user)
    }

    /// Deletes a user by ID, cascading to projects and tasks
    ///
    /// Returns true if the user existed.
    pub async fn delete<'e, E>(executor: E, id: i64) -> Result<bool, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("DELETE FROM users WHERE id = ?1")
            .bind(id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Counts all users
    pub async fn count<'e, E>(executor: E) -> Result<i64, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(executor)
            .await?;

        Ok(count)
    }

    /// Classifies a failed insert as a duplicate username or email
    ///
    /// Returns None for any other error.
    pub fn duplicate_field(err: &sqlx::Error) -> Option<DuplicateField> {
        let db_err = err.as_database_error()?;
        if !db_err.is_unique_violation() {
            return None;
        }

        let message = db_err.message();
        if message.contains("users.username") {
            Some(DuplicateField::Username)
        } else if message.contains("users.email") {
            Some(DuplicateField::Email)
        } else {
            None
        }
    }
}
