/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /api/auth/register` - Register new user
/// - `POST /api/auth/login` - Login and get tokens
/// - `POST /api/auth/refresh` - Refresh access token
///
/// Registration always creates a regular user: there is no way to obtain the
/// admin role through the API, whatever the request body claims. Login
/// failures are reported with one undifferentiated message so callers cannot
/// tell an unknown email from a wrong password.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult, ValidationErrorDetail},
};
use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use taskboard_shared::{
    auth::{jwt, password},
    models::user::{CreateUser, User, UserRole, UserSummary},
};
use validator::Validate;

/// Login failure message, identical for unknown email and wrong password
const INVALID_CREDENTIALS: &str = "Invalid email or password.";

/// Register request
///
/// Any extra fields in the body (including a `role`) are ignored.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Display name
    #[validate(length(min = 1, max = 150, message = "Username must be 1-150 characters"))]
    pub username: String,

    /// Email address (login key)
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password (also checked against the strength policy)
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// Access token (1 hour)
    pub access: String,

    /// Refresh token (7 days)
    pub refresh: String,

    /// The authenticated user, without the password hash
    pub user: UserSummary,
}

/// Refresh token request
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    /// Refresh token
    pub refresh: String,
}

/// Refresh token response
#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    /// New access token (1 hour)
    pub access: String,
}

/// Register a new user
///
/// # Endpoint
///
/// ```text
/// POST /api/auth/register
/// Content-Type: application/json
///
/// {
///   "username": "newuser",
///   "email": "new@example.com",
///   "password": "securepass123"
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: invalid payload, weak password, or duplicate email
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<UserSummary>)> {
    req.validate()?;

    // Strength policy beyond the basic length annotation
    password::validate_password_strength(&req.password).map_err(|e| {
        ApiError::ValidationError(vec![ValidationErrorDetail {
            field: "password".to_string(),
            message: e,
        }])
    })?;

    let password_hash = password::hash_password(&req.password)?;

    // Role is forced to `user`; duplicate emails surface from the unique
    // constraint as a validation error (covers the concurrent case too).
    let user = User::create(
        &state.db,
        CreateUser {
            email: req.email,
            username: req.username,
            password_hash,
            role: UserRole::User,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(UserSummary::from(user))))
}

/// Login endpoint
///
/// Authenticates a user and returns JWT tokens plus an identity summary.
///
/// # Endpoint
///
/// ```text
/// POST /api/auth/login
/// Content-Type: application/json
///
/// {
///   "email": "user@example.com",
///   "password": "securepass123"
/// }
/// ```
///
/// # Response
///
/// ```json
/// {
///   "access": "eyJ...",
///   "refresh": "eyJ...",
///   "user": { "id": "...", "email": "...", "username": "...", "role": "user" }
/// }
/// ```
///
/// # Errors
///
/// - `401 Unauthorized`: unknown email or wrong password (indistinguishable)
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    req.validate()
        .map_err(|_| ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()))?;

    let user = User::find_by_email(&state.db, &req.email)
        .await?
        .ok_or_else(|| ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()))?;

    let valid = password::verify_password(&req.password, &user.password_hash)?;
    if !valid {
        return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    }

    let access_claims = jwt::Claims::new(user.id, user.role, jwt::TokenType::Access);
    let refresh_claims = jwt::Claims::new(user.id, user.role, jwt::TokenType::Refresh);

    let access = jwt::create_token(&access_claims, state.jwt_secret())?;
    let refresh = jwt::create_token(&refresh_claims, state.jwt_secret())?;

    Ok(Json(LoginResponse {
        access,
        refresh,
        user: UserSummary::from(user),
    }))
}

/// Token refresh endpoint
///
/// Exchanges a valid refresh token for a new access token.
///
/// # Endpoint
///
/// ```text
/// POST /api/auth/refresh
/// Content-Type: application/json
///
/// { "refresh": "eyJ..." }
/// ```
///
/// # Errors
///
/// - `401 Unauthorized`: invalid, expired, or non-refresh token
pub async fn refresh(
    State(state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> ApiResult<Json<RefreshResponse>> {
    let access = jwt::refresh_access_token(&req.refresh, state.jwt_secret())?;

    Ok(Json(RefreshResponse { access }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_register_request_ignores_role_field() {
        // A caller-supplied role must never take effect; the request type
        // does not even carry one.
        let req: RegisterRequest = serde_json::from_value(json!({
            "username": "sneaky",
            "email": "sneaky@example.com",
            "password": "securepass123",
            "role": "admin"
        }))
        .expect("Unknown fields are ignored");

        assert_eq!(req.username, "sneaky");
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_register_request_validation() {
        let req = RegisterRequest {
            username: String::new(),
            email: "not-an-email".to_string(),
            password: "123".to_string(),
        };

        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("username"));
        assert!(errors.field_errors().contains_key("email"));
        assert!(errors.field_errors().contains_key("password"));
    }

    #[test]
    fn test_login_request_validation() {
        let req = LoginRequest {
            email: "user@example.com".to_string(),
            password: "anything".to_string(),
        };
        assert!(req.validate().is_ok());
    }
}
