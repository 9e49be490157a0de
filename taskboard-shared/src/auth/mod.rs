/// Authentication and authorization utilities
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and the strength policy
/// - [`jwt`]: JWT issuance and validation (access + refresh tokens)
/// - [`middleware`]: Axum middleware injecting the authenticated [`middleware::CurrentUser`]
/// - [`authorization`]: role and ownership predicates (the authorization engine)
///
/// # Example
///
/// ```
/// use taskboard_shared::auth::password::{hash_password, verify_password};
/// use taskboard_shared::auth::jwt::{create_token, Claims, TokenType};
/// use taskboard_shared::models::user::UserRole;
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("user_password")?;
/// assert!(verify_password("user_password", &hash)?);
///
/// let claims = Claims::new(Uuid::new_v4(), UserRole::User, TokenType::Access);
/// let token = create_token(&claims, "secret-key-at-least-32-bytes-long")?;
/// # Ok(())
/// # }
/// ```

pub mod authorization;
pub mod jwt;
pub mod middleware;
pub mod password;
