//! Common test utilities for integration tests
//!
//! This module provides shared infrastructure for integration tests:
//! - Private in-memory SQLite database with migrations applied
//! - In-memory session store
//! - Stub AI generator
//! - Request helpers that carry the session cookie between calls

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use sqlx::SqlitePool;
use std::{collections::HashMap, sync::Arc};
use taskboard_api::{
    app::{build_router, AppState},
    config::Config,
};
use taskboard_shared::{
    ai::{AiError, DescriptionGenerator},
    db::{
        migrations::run_migrations,
        pool::{create_pool, DatabaseConfig},
    },
    session::MemorySessionStore,
};
use tower::Service as _;

pub const TEST_SECRET: &str = "integration-test-secret-key-0123456789";
pub const TEST_PASSWORD: &str = "password123";

/// How the stub generator answers
#[derive(Debug, Clone, Copy)]
pub enum AiMode {
    /// No generator configured
    Disabled,
    /// Echoes the title back
    Echo,
    /// Fails like an unreachable provider
    Failing,
}

/// Stub description generator
pub struct StubGenerator {
    fail: bool,
}

#[async_trait]
impl DescriptionGenerator for StubGenerator {
    async fn generate(&self, title: &str) -> Result<String, AiError> {
        if self.fail {
            Err(AiError::Provider {
                status: 502,
                body: "upstream unavailable".to_string(),
            })
        } else {
            Ok(format!("Steps to complete: {}", title))
        }
    }
}

/// Test context containing all necessary resources
pub struct TestContext {
    pub db: SqlitePool,
    pub sessions: Arc<MemorySessionStore>,
    pub app: Router,
    pub config: Config,
}

/// A fully read response
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    /// `name=value` pair of the session cookie set by this response
    pub fn session_cookie(&self) -> Option<String> {
        self.headers
            .get(header::SET_COOKIE)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(';').next())
            .map(str::to_string)
    }

    /// The `message` field of an error body
    pub fn message(&self) -> &str {
        self.body["message"].as_str().unwrap_or_default()
    }
}

/// A logged-in user
pub struct TestUser {
    pub id: i64,
    pub username: String,
    pub cookie: String,
}

pub fn test_config(vars: &[(&str, &str)]) -> Config {
    let mut map: HashMap<String, String> = HashMap::new();
    map.insert("SECRET_KEY".to_string(), TEST_SECRET.to_string());
    for (key, value) in vars {
        map.insert(key.to_string(), value.to_string());
    }
    Config::from_lookup(|key| map.get(key).cloned()).unwrap()
}

impl TestContext {
    /// Creates a new test context with a fresh database and no AI provider
    pub async fn new() -> Self {
        Self::with_ai(AiMode::Disabled).await
    }

    pub async fn with_ai(mode: AiMode) -> Self {
        let config = test_config(&[]);

        let db = create_pool(DatabaseConfig::in_memory()).await.unwrap();
        run_migrations(&db).await.unwrap();

        let sessions = Arc::new(MemorySessionStore::new());

        let mut state = AppState::new(db.clone(), config.clone(), sessions.clone());
        match mode {
            AiMode::Disabled => {}
            AiMode::Echo => state = state.with_ai(Arc::new(StubGenerator { fail: false })),
            AiMode::Failing => state = state.with_ai(Arc::new(StubGenerator { fail: true })),
        }

        TestContext {
            db,
            sessions,
            app: build_router(state),
            config,
        }
    }

    /// Sends a request and reads the JSON body (Null when empty)
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        cookie: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().call(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> TestResponse {
        self.request(Method::GET, uri, cookie, None).await
    }

    pub async fn post(&self, uri: &str, cookie: Option<&str>, body: Value) -> TestResponse {
        self.request(Method::POST, uri, cookie, Some(body)).await
    }

    pub async fn patch(&self, uri: &str, cookie: Option<&str>, body: Value) -> TestResponse {
        self.request(Method::PATCH, uri, cookie, Some(body)).await
    }

    pub async fn delete(&self, uri: &str, cookie: Option<&str>) -> TestResponse {
        self.request(Method::DELETE, uri, cookie, None).await
    }

    /// Signs up `username` and returns the logged-in user
    pub async fn signup(&self, username: &str) -> TestUser {
        let response = self
            .post(
                "/api/signup",
                None,
                json!({
                    "username": username,
                    "email": format!("{}@example.com", username),
                    "password": TEST_PASSWORD,
                }),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);

        TestUser {
            id: response.body["id"].as_i64().unwrap(),
            username: username.to_string(),
            cookie: response.session_cookie().unwrap(),
        }
    }

    /// Creates a project through the API and returns its ID
    pub async fn create_project(&self, user: &TestUser, body: Value) -> i64 {
        let response = self.post("/api/projects", Some(&user.cookie), body).await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
        response.body["id"].as_i64().unwrap()
    }

    /// Creates a task through the API and returns its ID
    pub async fn create_task(&self, user: &TestUser, project_id: i64, body: Value) -> i64 {
        let response = self
            .post(
                &format!("/api/projects/{}/tasks", project_id),
                Some(&user.cookie),
                body,
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
        response.body["id"].as_i64().unwrap()
    }
}
