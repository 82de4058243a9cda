/// Authentication endpoints
///
/// Session lifecycle: anonymous → signup/login → authenticated → logout →
/// anonymous. Signup and login always start a fresh session (the previous
/// token, if any, is discarded).
///
/// # Endpoints
///
/// - `POST /api/signup` - Create an account and log in
/// - `POST /api/login` - Log in with username and password
/// - `POST /api/logout` - End the current session
/// - `GET /api/check-session` - Current user, or 401

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::ApiJson,
    middleware::session::{
        expired_session_cookie_header, resolve_session, session_cookie, start_session,
    },
};
use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use taskboard_shared::{
    auth::{password, session::verify_signed_token},
    models::user::{CreateUser, DuplicateField, User},
};
use validator::Validate;

/// Signup request
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Signup fields after the presence check
#[derive(Debug, Validate)]
struct NewAccount {
    #[validate(length(min = 3, message = "Username must be at least 3 characters long"))]
    username: String,

    #[validate(contains(pattern = "@", message = "Invalid email address"))]
    email: String,

    password: String,
}

impl SignupRequest {
    fn into_account(self) -> ApiResult<NewAccount> {
        match (self.username, self.email, self.password) {
            (Some(username), Some(email), Some(password))
                if !username.is_empty() && !email.is_empty() && !password.is_empty() =>
            {
                Ok(NewAccount {
                    username,
                    email,
                    password,
                })
            }
            _ => Err(ApiError::BadRequest(
                "Username, email, and password are required".to_string(),
            )),
        }
    }
}

/// Login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Public user representation
///
/// The password hash is never part of it.
#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            created_at: user.created_at,
        }
    }
}

/// Session token carried by the request, if its cookie signature is valid
fn presented_token(state: &AppState, headers: &HeaderMap) -> Option<String> {
    session_cookie(headers).and_then(|raw| verify_signed_token(&raw, state.secret_key()))
}

/// Create an account
///
/// # Endpoint
///
/// ```text
/// POST /api/signup
/// Content-Type: application/json
///
/// {
///   "username": "demo_user",
///   "email": "demo@example.com",
///   "password": "password123"
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Missing field, failed validation, or duplicate username/email
/// - `500 Internal Server Error`: Server error
pub async fn signup(
    State(state): State<AppState>,
    headers: HeaderMap,
    ApiJson(req): ApiJson<SignupRequest>,
) -> ApiResult<impl IntoResponse> {
    let account = req.into_account()?;
    account.validate()?;

    if User::find_by_username(&state.db, &account.username)
        .await?
        .is_some()
    {
        return Err(ApiError::BadRequest("Username already exists".to_string()));
    }
    if User::find_by_email(&state.db, &account.email).await?.is_some() {
        return Err(ApiError::BadRequest("Email already exists".to_string()));
    }

    let password_hash = password::hash_password(&account.password)?;

    let mut tx = state.db.begin().await?;
    let user = User::create(
        &mut *tx,
        CreateUser {
            username: account.username,
            email: account.email,
            password_hash,
        },
    )
    .await
    .map_err(|e| match User::duplicate_field(&e) {
        // Lost a race with a concurrent signup
        Some(DuplicateField::Username) => {
            ApiError::BadRequest("Username already exists".to_string())
        }
        Some(DuplicateField::Email) => ApiError::BadRequest("Email already exists".to_string()),
        None => e.into(),
    })?;
    tx.commit().await?;

    let previous = presented_token(&state, &headers);
    let cookie = start_session(&state, user.id, previous.as_deref()).await?;

    tracing::info!(user_id = user.id, username = %user.username, "User signed up");

    Ok((
        StatusCode::CREATED,
        [(header::SET_COOKIE, cookie)],
        Json(UserResponse::from(user)),
    ))
}

/// Log in
///
/// Unknown usernames and wrong passwords get the same 401.
///
/// # Errors
///
/// - `400 Bad Request`: Missing username or password
/// - `401 Unauthorized`: Invalid credentials
pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    ApiJson(req): ApiJson<LoginRequest>,
) -> ApiResult<impl IntoResponse> {
    let (username, password) = match (req.username, req.password) {
        (Some(username), Some(password)) if !username.is_empty() && !password.is_empty() => {
            (username, password)
        }
        _ => {
            return Err(ApiError::BadRequest(
                "Username and password are required".to_string(),
            ))
        }
    };

    let invalid = || ApiError::Unauthorized("Invalid username or password".to_string());

    let Some(user) = User::find_by_username(&state.db, &username).await? else {
        tracing::warn!(username = %username, "Login failed: unknown username");
        return Err(invalid());
    };

    if !password::verify_password(&password, &user.password_hash)? {
        tracing::warn!(user_id = user.id, "Login failed: wrong password");
        return Err(invalid());
    }

    let previous = presented_token(&state, &headers);
    let cookie = start_session(&state, user.id, previous.as_deref()).await?;

    tracing::info!(user_id = user.id, "User logged in");

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(UserResponse::from(user)),
    ))
}

/// Log out
///
/// Succeeds whether or not a session exists.
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<impl IntoResponse> {
    if let Some(token) = presented_token(&state, &headers) {
        state.sessions.clear(&token).await?;
        tracing::info!("Session cleared");
    }

    let cookie = expired_session_cookie_header(state.config.api.production)?;

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(json!({ "message": "Logged out successfully" })),
    ))
}

/// Current user
///
/// # Errors
///
/// - `401 Unauthorized`: No session, or its user no longer exists
pub async fn check_session(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<UserResponse>> {
    let not_authenticated = || ApiError::Unauthorized("Not authenticated".to_string());

    let (token, user_id) = resolve_session(&state, &headers)
        .await?
        .ok_or_else(not_authenticated)?;

    match User::find_by_id(&state.db, user_id).await? {
        Some(user) => Ok(Json(UserResponse::from(user))),
        None => {
            state.sessions.clear(&token).await?;
            Err(not_authenticated())
        }
    }
}
