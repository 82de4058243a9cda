/// Error handling for the API server
///
/// This module provides a unified error type that maps to HTTP responses.
/// All handlers return `Result<T, ApiError>`; errors from the shared crate
/// convert with `?`.
///
/// Every error response has the same JSON shape:
///
/// ```json
/// {
///   "error": "not_found",
///   "message": "Project not found"
/// }
/// ```
///
/// Validation failures additionally carry `details`, one entry per violated
/// rule, and use the first violation as `message`.
///
/// # Example
///
/// ```
/// use taskboard_api::error::{ApiError, ApiResult};
/// use axum::Json;
/// use serde_json::{json, Value};
///
/// async fn handler(id: i64) -> ApiResult<Json<Value>> {
///     if id <= 0 {
///         return Err(ApiError::NotFound("Project not found".to_string()));
///     }
///     Ok(Json(json!({ "id": id })))
/// }
/// ```

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use taskboard_shared::{
    ai::AiError,
    auth::{authorization::AuthzError, password::PasswordError},
    session::SessionError,
    validation::ValidationError,
};

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Bad request (400)
    BadRequest(String),

    /// Bad request (400) with per-field details
    ValidationError(Vec<ValidationErrorDetail>),

    /// Unauthorized (401)
    Unauthorized(String),

    /// Forbidden (403)
    Forbidden(String),

    /// Not found (404)
    NotFound(String),

    /// Internal server error (500)
    InternalError(String),

    /// Service unavailable (503)
    ServiceUnavailable(String),
}

/// Validation error detail
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationErrorDetail {
    /// Field that failed validation
    pub field: String,

    /// Error message
    pub message: String,
}

/// Error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code (e.g., "bad_request", "unauthorized")
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// Optional validation errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<ValidationErrorDetail>>,
}

impl ApiError {
    /// HTTP status for this error
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) | ApiError::ValidationError(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::ValidationError(errors) => {
                write!(f, "Validation failed: {} errors", errors.len())
            }
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
            ApiError::ServiceUnavailable(msg) => write!(f, "Service unavailable: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let (error_code, message, details) = match self {
            ApiError::BadRequest(msg) => ("bad_request", msg, None),
            ApiError::ValidationError(errors) => {
                let message = errors
                    .first()
                    .map(|e| e.message.clone())
                    .unwrap_or_else(|| "Request validation failed".to_string());
                ("validation_error", message, Some(errors))
            }
            ApiError::Unauthorized(msg) => ("unauthorized", msg, None),
            ApiError::Forbidden(msg) => ("forbidden", msg, None),
            ApiError::NotFound(msg) => ("not_found", msg, None),
            ApiError::InternalError(msg) => {
                // Log internal errors but don't expose details to clients
                tracing::error!("Internal error: {}", msg);
                (
                    "internal_error",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
            ApiError::ServiceUnavailable(msg) => ("service_unavailable", msg, None),
        };

        let body = Json(ErrorResponse {
            error: error_code.to_string(),
            message,
            details,
        });

        (status, body).into_response()
    }
}

/// Convert sqlx errors to API errors
///
/// Handlers that can hit expected constraint violations (duplicate
/// usernames) check for them before falling back to this conversion.
impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        ApiError::InternalError(format!("Database error: {}", err))
    }
}

/// Convert `validator` failures to API errors
///
/// Details are ordered by field name so the reported message is stable.
impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut details: Vec<ValidationErrorDetail> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| ValidationErrorDetail {
                    field: field.to_string(),
                    message: error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("Invalid value for {}", field)),
                })
            })
            .collect();

        details.sort_by(|a, b| a.field.cmp(&b.field));
        ApiError::ValidationError(details)
    }
}

/// Convert single-field validation errors to API errors
impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::ValidationError(vec![ValidationErrorDetail {
            field: err.field.to_string(),
            message: err.message,
        }])
    }
}

/// Convert malformed JSON bodies to API errors
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

/// Convert unparsable path parameters to API errors
impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        tracing::debug!(reason = %rejection.body_text(), "Rejected path parameter");
        ApiError::NotFound("Not found".to_string())
    }
}

/// Convert ownership check failures to API errors
impl From<AuthzError> for ApiError {
    fn from(err: AuthzError) -> Self {
        match err {
            AuthzError::NotFound(_) => ApiError::NotFound(err.to_string()),
            AuthzError::Forbidden => ApiError::Forbidden(err.to_string()),
            AuthzError::DatabaseError(err) => {
                ApiError::InternalError(format!("Database error: {}", err))
            }
        }
    }
}

/// Convert password errors to API errors
impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        ApiError::InternalError(format!("Password operation failed: {}", err))
    }
}

/// Convert session store errors to API errors
impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        ApiError::InternalError(err.to_string())
    }
}

/// Convert AI provider errors to API errors
impl From<AiError> for ApiError {
    fn from(err: AiError) -> Self {
        ApiError::InternalError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskboard_shared::auth::authorization::Resource;

    #[test]
    fn test_error_display() {
        let err = ApiError::BadRequest("Invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: Invalid input");

        let err = ApiError::NotFound("Project not found".to_string());
        assert_eq!(err.to_string(), "Not found: Project not found");
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiError::ValidationError(vec![]).status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::Unauthorized(String::new()).status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::Forbidden(String::new()).status(), StatusCode::FORBIDDEN);
        assert_eq!(
            ApiError::ServiceUnavailable(String::new()).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_authz_conversion() {
        let err: ApiError = AuthzError::NotFound(Resource::Task).into();
        assert!(matches!(err, ApiError::NotFound(ref msg) if msg == "Task not found"));

        let err: ApiError = AuthzError::Forbidden.into();
        assert!(matches!(err, ApiError::Forbidden(ref msg) if msg == "Unauthorized access"));
    }

    #[test]
    fn test_single_field_validation_conversion() {
        let err: ApiError = ValidationError::new("status", "Status must be one of: todo").into();
        match err {
            ApiError::ValidationError(details) => {
                assert_eq!(details.len(), 1);
                assert_eq!(details[0].field, "status");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_validation_response_uses_first_message() {
        let err = ApiError::ValidationError(vec![
            ValidationErrorDetail {
                field: "name".to_string(),
                message: "Project name must be at least 2 characters long".to_string(),
            },
            ValidationErrorDetail {
                field: "status".to_string(),
                message: "Status must be one of: active, completed, archived".to_string(),
            },
        ]);

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "validation_error");
        assert_eq!(json["message"], "Project name must be at least 2 characters long");
        assert_eq!(json["details"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_internal_error_hides_detail() {
        let response = ApiError::InternalError("disk on fire".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let text = String::from_utf8(body.to_vec()).unwrap();
        assert!(!text.contains("disk on fire"));
        assert!(!text.contains("details"));
    }
}
