/// Error handling for the API server
///
/// Provides a unified error type that maps to HTTP responses. Handlers
/// return `Result<T, ApiError>` which converts into a JSON error body with
/// the appropriate status code.
///
/// Two mappings are deliberate policy rather than convenience:
///
/// - An object-level authorization denial maps to 404, never 403, so a task
///   belonging to another user is indistinguishable from a missing one.
/// - A duplicate email on registration maps to 400 (validation failure, as
///   the original service reports it), not 409.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;

use taskboard_shared::auth::{
    authorization::AuthzError, jwt::JwtError, middleware::AuthError, password::PasswordError,
};

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Bad request (400) - malformed payload, duplicate email, weak password
    BadRequest(String),

    /// Unauthorized (401) - missing/invalid credentials, login failure
    Unauthorized(String),

    /// Forbidden (403) - authenticated but insufficient role
    Forbidden(String),

    /// Not found (404) - absent resource, or object-level denial
    NotFound(String),

    /// Bad request (400) with per-field validation details
    ValidationError(Vec<ValidationErrorDetail>),

    /// Internal server error (500)
    InternalError(String),
}

/// Validation error detail
#[derive(Debug, Clone, Serialize, Deserialize)]
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

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::ValidationError(errors) => {
                write!(f, "Validation failed: {} errors", errors.len())
            }
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message, details) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg, None),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "unauthorized", msg, None),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, "forbidden", msg, None),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg, None),
            ApiError::ValidationError(errors) => (
                StatusCode::BAD_REQUEST,
                "validation_error",
                "Request validation failed".to_string(),
                Some(errors),
            ),
            ApiError::InternalError(msg) => {
                // Log internal errors but don't expose details to clients
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
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
impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ApiError::NotFound("Resource not found".to_string()),
            sqlx::Error::Database(db_err) => {
                // Unique constraint violations surface as validation errors;
                // for registration this is the duplicate-email case.
                if let Some(constraint) = db_err.constraint() {
                    if constraint.contains("email") {
                        return ApiError::ValidationError(vec![ValidationErrorDetail {
                            field: "email".to_string(),
                            message: "A user with this email already exists".to_string(),
                        }]);
                    }
                    return ApiError::BadRequest(format!("Constraint violation: {}", constraint));
                }

                ApiError::InternalError(format!("Database error: {}", db_err))
            }
            _ => ApiError::InternalError(format!("Database error: {}", err)),
        }
    }
}

/// Convert auth middleware errors to API errors
///
/// Every variant is an authentication failure, so every variant maps to 401.
impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingCredentials => {
                ApiError::Unauthorized("Missing credentials".to_string())
            }
            AuthError::InvalidFormat(msg) => ApiError::Unauthorized(msg),
            AuthError::InvalidToken(msg) => ApiError::Unauthorized(msg),
        }
    }
}

/// Convert authorization errors to API errors
///
/// The admin-only denial is the single place that reports 403; object-level
/// denials read as 404 to prevent existence probing.
impl From<AuthzError> for ApiError {
    fn from(err: AuthzError) -> Self {
        match err {
            AuthzError::AdminOnly => ApiError::Forbidden(err.to_string()),
            AuthzError::NotVisible(_) => ApiError::NotFound("Task not found".to_string()),
        }
    }
}

/// Convert validator failures into per-field validation details
impl From<validator::ValidationErrors> for ApiError {
    fn from(err: validator::ValidationErrors) -> Self {
        let details: Vec<ValidationErrorDetail> = err
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| ValidationErrorDetail {
                    field: field.to_string(),
                    message: error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| "Validation failed".to_string()),
                })
            })
            .collect();

        ApiError::ValidationError(details)
    }
}

/// Convert password errors to API errors
impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        ApiError::InternalError(format!("Password operation failed: {}", err))
    }
}

/// Convert JWT errors to API errors
impl From<JwtError> for ApiError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::Expired => ApiError::Unauthorized("Token expired".to_string()),
            JwtError::WrongTokenType { expected, .. } => {
                ApiError::Unauthorized(format!("Expected {} token", expected))
            }
            _ => ApiError::Unauthorized(format!("Invalid token: {}", err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_error_display() {
        let err = ApiError::BadRequest("Invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: Invalid input");

        let err = ApiError::NotFound("Task not found".to_string());
        assert_eq!(err.to_string(), "Not found: Task not found");
    }

    #[test]
    fn test_validation_error_display() {
        let errors = vec![
            ValidationErrorDetail {
                field: "email".to_string(),
                message: "Invalid email format".to_string(),
            },
            ValidationErrorDetail {
                field: "password".to_string(),
                message: "Password too short".to_string(),
            },
        ];

        let err = ApiError::ValidationError(errors);
        assert_eq!(err.to_string(), "Validation failed: 2 errors");
    }

    #[test]
    fn test_admin_denial_maps_to_forbidden() {
        let err = ApiError::from(AuthzError::AdminOnly);
        match err {
            ApiError::Forbidden(msg) => {
                assert_eq!(msg, "Access restricted to admin users only.");
            }
            other => panic!("Expected Forbidden, got {:?}", other),
        }
    }

    #[test]
    fn test_object_denial_maps_to_not_found() {
        let err = ApiError::from(AuthzError::NotVisible(Uuid::new_v4()));
        match err {
            ApiError::NotFound(msg) => assert_eq!(msg, "Task not found"),
            other => panic!("Expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_validation_error_status() {
        let response = ApiError::ValidationError(vec![]).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_every_auth_failure_maps_to_unauthorized() {
        let cases = [
            AuthError::MissingCredentials,
            AuthError::InvalidFormat("Expected Bearer token".to_string()),
            AuthError::InvalidToken("Token expired".to_string()),
        ];

        for err in cases {
            let response = ApiError::from(err).into_response();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        }
    }
}
