//! # Taskboard Shared Library
//!
//! This crate contains the data layer, validation rules, session handling
//! and external collaborators used by the Taskboard API server.
//!
//! ## Module Organization
//!
//! - `models`: Database models (users, projects, tasks) and dashboard aggregation
//! - `db`: SQLite connection pool and migrations
//! - `validation`: Field rules and closed enumerations
//! - `pagination`: Page/per-page arithmetic shared by list endpoints
//! - `auth`: Password hashing, session tokens and ownership checks
//! - `session`: Server-side session stores (in-memory and Redis)
//! - `redis`: Redis client wrapper
//! - `ai`: Task description generation via an external provider

pub mod ai;
pub mod auth;
pub mod db;
pub mod models;
pub mod pagination;
pub mod redis;
pub mod session;
pub mod validation;

/// Current version of the Taskboard shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
