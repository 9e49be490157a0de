/// JWT token generation and validation
///
/// Tokens are signed with HS256 and carry the user's identity and role. The
/// role claim is safe to embed because roles are immutable after account
/// creation: there is no endpoint that changes them.
///
/// # Token Types
///
/// - **Access Token**: short-lived (1 hour), presented as a Bearer credential
/// - **Refresh Token**: long-lived (7 days), exchanged for new access tokens
///
/// # Example
///
/// ```
/// use taskboard_shared::auth::jwt::{create_token, validate_token, Claims, TokenType};
/// use taskboard_shared::models::user::UserRole;
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let user_id = Uuid::new_v4();
///
/// let claims = Claims::new(user_id, UserRole::User, TokenType::Access);
/// let token = create_token(&claims, "your-secret-key-at-least-32-bytes")?;
///
/// let validated = validate_token(&token, "your-secret-key-at-least-32-bytes")?;
/// assert_eq!(validated.sub, user_id);
/// # Ok(())
/// # }
/// ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::user::UserRole;

/// Token issuer claim value
const ISSUER: &str = "taskboard";

/// Error type for JWT operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Failed to create token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Failed to validate token
    #[error("Failed to validate token: {0}")]
    ValidationError(String),

    /// Token has expired
    #[error("Token has expired")]
    Expired,

    /// Wrong token type for this operation
    #[error("Wrong token type: expected {expected}, got {actual}")]
    WrongTokenType {
        expected: &'static str,
        actual: &'static str,
    },
}

/// Token type identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    /// Access token (short-lived, 1 hour)
    Access,

    /// Refresh token (long-lived, 7 days)
    Refresh,
}

impl TokenType {
    /// Gets default expiration duration for token type
    pub fn default_expiration(&self) -> Duration {
        match self {
            TokenType::Access => Duration::hours(1),
            TokenType::Refresh => Duration::days(7),
        }
    }

    /// Gets token type as string
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenType::Access => "access",
            TokenType::Refresh => "refresh",
        }
    }
}

/// JWT claims structure
///
/// Standard claims (`sub`, `iss`, `iat`, `exp`, `nbf`) plus TaskBoard's
/// custom claims: the user's role and the token type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - user ID
    pub sub: Uuid,

    /// Issuer - always "taskboard"
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Not before (Unix timestamp)
    pub nbf: i64,

    /// User role (custom claim)
    pub role: UserRole,

    /// Token type (custom claim)
    pub token_type: TokenType,
}

impl Claims {
    /// Creates new claims with the default expiration for the token type
    pub fn new(user_id: Uuid, role: UserRole, token_type: TokenType) -> Self {
        Self::with_expiration(user_id, role, token_type, token_type.default_expiration())
    }

    /// Creates claims with a custom expiration
    pub fn with_expiration(
        user_id: Uuid,
        role: UserRole,
        token_type: TokenType,
        expires_in: Duration,
    ) -> Self {
        let now = Utc::now();
        let expiration = now + expires_in;

        Self {
            sub: user_id,
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
            nbf: now.timestamp(),
            role,
            token_type,
        }
    }

    /// Checks if token has expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}

/// Creates a JWT token from claims
///
/// Signs the token using HS256 with the provided secret. The secret should
/// be at least 32 bytes and randomly generated.
///
/// # Errors
///
/// Returns `JwtError::CreateError` if token encoding fails
pub fn create_token(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&header, claims, &key)
        .map_err(|e| JwtError::CreateError(format!("Token encoding failed: {}", e)))
}

/// Validates a JWT token and extracts claims
///
/// Verifies the signature, expiration, not-before time, and issuer.
///
/// # Errors
///
/// Returns an error if the signature is invalid, the token has expired, the
/// issuer doesn't match, or the token format is invalid
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);
    validation.validate_exp = true;
    validation.validate_nbf = true;

    let token_data = decode::<Claims>(token, &key, &validation).map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
        _ => JwtError::ValidationError(format!("Token validation failed: {}", e)),
    })?;

    Ok(token_data.claims)
}

/// Validates a token and checks it is an access token
///
/// A refresh token presented as a Bearer credential is rejected.
pub fn validate_access_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let claims = validate_token(token, secret)?;

    if claims.token_type != TokenType::Access {
        return Err(JwtError::WrongTokenType {
            expected: TokenType::Access.as_str(),
            actual: claims.token_type.as_str(),
        });
    }

    Ok(claims)
}

/// Validates a token and checks it is a refresh token
pub fn validate_refresh_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let claims = validate_token(token, secret)?;

    if claims.token_type != TokenType::Refresh {
        return Err(JwtError::WrongTokenType {
            expected: TokenType::Refresh.as_str(),
            actual: claims.token_type.as_str(),
        });
    }

    Ok(claims)
}

/// Exchanges a valid refresh token for a new access token
///
/// The new access token carries the same user identity and role.
///
/// # Errors
///
/// Returns an error if the refresh token is invalid, expired, or is not a
/// refresh token
pub fn refresh_access_token(refresh_token: &str, secret: &str) -> Result<String, JwtError> {
    let refresh_claims = validate_refresh_token(refresh_token, secret)?;

    let access_claims = Claims::new(refresh_claims.sub, refresh_claims.role, TokenType::Access);

    create_token(&access_claims, secret)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    #[test]
    fn test_token_type_expiration() {
        assert_eq!(TokenType::Access.default_expiration(), Duration::hours(1));
        assert_eq!(TokenType::Refresh.default_expiration(), Duration::days(7));
    }

    #[test]
    fn test_claims_creation() {
        let user_id = Uuid::new_v4();
        let claims = Claims::new(user_id, UserRole::User, TokenType::Access);

        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.iss, "taskboard");
        assert_eq!(claims.role, UserRole::User);
        assert_eq!(claims.token_type, TokenType::Access);
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_create_and_validate_token() {
        let user_id = Uuid::new_v4();

        let claims = Claims::new(user_id, UserRole::Admin, TokenType::Access);
        let token = create_token(&claims, SECRET).expect("Should create token");

        let validated = validate_token(&token, SECRET).expect("Should validate token");
        assert_eq!(validated.sub, user_id);
        assert_eq!(validated.role, UserRole::Admin);
        assert_eq!(validated.token_type, TokenType::Access);
        assert_eq!(validated.iss, "taskboard");
    }

    #[test]
    fn test_validate_with_wrong_secret() {
        let claims = Claims::new(Uuid::new_v4(), UserRole::User, TokenType::Access);
        let token = create_token(&claims, SECRET).expect("Should create token");

        assert!(validate_token(&token, "wrong-secret").is_err());
    }

    #[test]
    fn test_validate_expired_token() {
        let claims = Claims::with_expiration(
            Uuid::new_v4(),
            UserRole::User,
            TokenType::Access,
            Duration::seconds(-3600), // already expired
        );

        assert!(claims.is_expired());

        let token = create_token(&claims, SECRET).expect("Should create token");
        let result = validate_token(&token, SECRET);

        assert!(matches!(result, Err(JwtError::Expired)));
    }

    #[test]
    fn test_access_and_refresh_are_not_interchangeable() {
        let access_claims = Claims::new(Uuid::new_v4(), UserRole::User, TokenType::Access);
        let access_token = create_token(&access_claims, SECRET).unwrap();

        let refresh_claims = Claims::new(Uuid::new_v4(), UserRole::User, TokenType::Refresh);
        let refresh_token = create_token(&refresh_claims, SECRET).unwrap();

        assert!(validate_access_token(&access_token, SECRET).is_ok());
        assert!(validate_access_token(&refresh_token, SECRET).is_err());

        assert!(validate_refresh_token(&refresh_token, SECRET).is_ok());
        assert!(validate_refresh_token(&access_token, SECRET).is_err());
    }

    #[test]
    fn test_refresh_access_token() {
        let user_id = Uuid::new_v4();

        let refresh_claims = Claims::new(user_id, UserRole::Admin, TokenType::Refresh);
        let refresh_token = create_token(&refresh_claims, SECRET).unwrap();

        let new_access_token = refresh_access_token(&refresh_token, SECRET).unwrap();

        // Role and identity carry over into the new access token
        let validated = validate_access_token(&new_access_token, SECRET).unwrap();
        assert_eq!(validated.sub, user_id);
        assert_eq!(validated.role, UserRole::Admin);
        assert_eq!(validated.token_type, TokenType::Access);
    }

    #[test]
    fn test_refresh_with_access_token_fails() {
        let access_claims = Claims::new(Uuid::new_v4(), UserRole::User, TokenType::Access);
        let access_token = create_token(&access_claims, SECRET).unwrap();

        assert!(refresh_access_token(&access_token, SECRET).is_err());
    }
}
