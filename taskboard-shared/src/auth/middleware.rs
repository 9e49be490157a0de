/// Authentication middleware for Axum
///
/// Extracts the `Authorization: Bearer <token>` header, validates the access
/// token, and injects a [`CurrentUser`] into request extensions. Handlers on
/// protected routes extract it with Axum's `Extension` extractor.
///
/// Because the role claim travels inside the token (roles are immutable),
/// authentication requires no database round trip.
///
/// # Example
///
/// ```no_run
/// use axum::{middleware, routing::get, Extension, Router};
/// use taskboard_shared::auth::middleware::{create_jwt_middleware, CurrentUser};
///
/// async fn protected_handler(Extension(user): Extension<CurrentUser>) -> String {
///     format!("Hello, user {}!", user.id)
/// }
///
/// let app: Router = Router::new()
///     .route("/protected", get(protected_handler))
///     .layer(middleware::from_fn(create_jwt_middleware("your-jwt-secret")));
/// ```

use axum::{
    extract::Request,
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::jwt::{validate_access_token, JwtError};
use crate::models::user::{User, UserRole};

/// The authenticated actor of a request
///
/// Built from validated access token claims and added to request extensions
/// by the JWT middleware.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CurrentUser {
    /// Authenticated user ID
    pub id: Uuid,

    /// Role carried by the token
    pub role: UserRole,
}

impl CurrentUser {
    /// Creates the actor from validated claims
    pub fn from_claims(user_id: Uuid, role: UserRole) -> Self {
        Self { id: user_id, role }
    }
}

impl From<&User> for CurrentUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            role: user.role,
        }
    }
}

/// Error type for authentication middleware
#[derive(Debug)]
pub enum AuthError {
    /// Missing authorization header
    MissingCredentials,

    /// Authorization header present but not a usable Bearer credential
    ///
    /// Still an authentication failure: the caller presented no credential
    /// this API accepts, so the response is 401, not 400.
    InvalidFormat(String),

    /// Token validation failed
    InvalidToken(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match self {
            AuthError::MissingCredentials => {
                (StatusCode::UNAUTHORIZED, "Missing credentials").into_response()
            }
            AuthError::InvalidFormat(msg) => (StatusCode::UNAUTHORIZED, msg).into_response(),
            AuthError::InvalidToken(msg) => (StatusCode::UNAUTHORIZED, msg).into_response(),
        }
    }
}

/// JWT authentication middleware
///
/// Validates access tokens from the `Authorization: Bearer <token>` header.
///
/// # Errors
///
/// Returns 401 Unauthorized if:
/// - Authorization header is missing or not a Bearer credential
/// - Token validation fails or the token has expired
/// - A refresh token is presented instead of an access token
pub async fn jwt_auth_middleware(
    secret: String,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingCredentials)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AuthError::InvalidFormat("Expected Bearer token".to_string()))?;

    let claims = validate_access_token(token, &secret).map_err(|e| match e {
        JwtError::Expired => AuthError::InvalidToken("Token expired".to_string()),
        JwtError::WrongTokenType { .. } => {
            AuthError::InvalidToken("Expected an access token".to_string())
        }
        _ => AuthError::InvalidToken(format!("Invalid token: {}", e)),
    })?;

    let current_user = CurrentUser::from_claims(claims.sub, claims.role);
    req.extensions_mut().insert(current_user);

    Ok(next.run(req).await)
}

/// Creates a JWT authentication middleware closure
///
/// Helper that captures the JWT secret and returns a middleware function
/// suitable for `axum::middleware::from_fn`.
pub fn create_jwt_middleware(
    secret: impl Into<String>,
) -> impl Fn(
    Request,
    Next,
) -> std::pin::Pin<
    Box<dyn std::future::Future<Output = Result<Response, AuthError>> + Send>,
> + Clone {
    let secret = secret.into();
    move |req, next| {
        let secret = secret.clone();
        Box::pin(jwt_auth_middleware(secret, req, next))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_current_user_from_claims() {
        let user_id = Uuid::new_v4();
        let current = CurrentUser::from_claims(user_id, UserRole::Admin);

        assert_eq!(current.id, user_id);
        assert_eq!(current.role, UserRole::Admin);
    }

    #[test]
    fn test_current_user_from_user_model() {
        let user = User {
            id: Uuid::new_v4(),
            email: "test@example.com".to_string(),
            username: "testuser".to_string(),
            password_hash: "hash".to_string(),
            role: UserRole::User,
            created_at: Utc::now(),
        };

        let current = CurrentUser::from(&user);
        assert_eq!(current.id, user.id);
        assert_eq!(current.role, UserRole::User);
    }

    #[test]
    fn test_auth_error_into_response() {
        // Every authentication failure reads as 401, including a non-Bearer
        // Authorization header
        let response = AuthError::MissingCredentials.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = AuthError::InvalidFormat("test".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = AuthError::InvalidToken("test".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
