/// User model and database operations
///
/// This module provides the User model and CRUD operations for managing user
/// accounts. Every user carries a role (`admin` or `user`) that drives the
/// authorization engine; the role is assigned at creation and there is no
/// endpoint that changes it afterwards.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE user_role AS ENUM ('admin', 'user');
///
/// CREATE TABLE users (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     email CITEXT NOT NULL UNIQUE,
///     username VARCHAR(150) NOT NULL,
///     password_hash VARCHAR(255) NOT NULL,
///     role user_role NOT NULL DEFAULT 'user',
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use taskboard_shared::models::user::{CreateUser, User, UserRole};
/// # use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), sqlx::Error> {
/// let user = User::create(&pool, CreateUser {
///     email: "user@example.com".to_string(),
///     username: "testuser".to_string(),
///     password_hash: "$argon2id$...".to_string(),
///     role: UserRole::User,
/// }).await?;
///
/// let found = User::find_by_email(&pool, "user@example.com").await?;
/// assert!(found.is_some());
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Role attribute deciding what a user may administer
///
/// Admins see and manage every task and may list all users; regular users
/// only ever see their own tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Administrator: unrestricted access to all tasks and the user listing
    Admin,

    /// Regular user: access restricted to owned tasks
    User,
}

impl UserRole {
    /// Gets role as string
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::User => "user",
        }
    }

    /// Checks if this role grants administrative access
    pub fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }
}

/// User model representing an account
///
/// Passwords are stored as Argon2id hashes, never in plaintext, and the hash
/// is never serialized into API responses.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID (UUID v4)
    pub id: Uuid,

    /// Email address (case-insensitive via CITEXT), used as the login key
    ///
    /// Must be unique across all users
    pub email: String,

    /// Display name
    pub username: String,

    /// Argon2id password hash
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// Role assigned at creation, immutable afterwards
    pub role: UserRole,

    /// When the account was created
    pub created_at: DateTime<Utc>,
}

/// Input for creating a new user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    /// Email address (unique, case-insensitive)
    pub email: String,

    /// Display name
    pub username: String,

    /// Argon2id password hash (NOT the plaintext password!)
    pub password_hash: String,

    /// Role to assign
    pub role: UserRole,
}

/// Public view of a user account
///
/// This is what API responses carry: everything except the password hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSummary {
    /// User ID
    pub id: Uuid,

    /// Email address
    pub email: String,

    /// Display name
    pub username: String,

    /// Role
    pub role: UserRole,

    /// When the account was created
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserSummary {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            username: user.username,
            role: user.role,
            created_at: user.created_at,
        }
    }
}

impl User {
    /// Creates a new user in the database
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Email already exists (unique constraint violation)
    /// - Database connection fails
    ///
    /// When two registrations race on the same email, the unique constraint
    /// guarantees exactly one succeeds; the loser surfaces here as a
    /// database error carrying the constraint name.
    pub async fn create(pool: &PgPool, data: CreateUser) -> Result<Self, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, username, password_hash, role)
            VALUES ($1, $2, $3, $4)
            RETURNING id, email::text AS email, username, password_hash, role, created_at
            "#,
        )
        .bind(data.email)
        .bind(data.username)
        .bind(data.password_hash)
        .bind(data.role)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by ID
    ///
    /// # Errors
    ///
    /// Returns an error if database connection fails
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email::text AS email, username, password_hash, role, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by email address
    ///
    /// Email lookup is case-insensitive (via CITEXT column type).
    ///
    /// # Errors
    ///
    /// Returns an error if database connection fails
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email::text AS email, username, password_hash, role, created_at
            FROM users
            WHERE email = $1::citext
            "#,
        )
        .bind(email)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Lists all users with pagination
    ///
    /// Ordered by creation date ascending, so the listing is stable as new
    /// accounts register.
    ///
    /// # Errors
    ///
    /// Returns an error if database connection fails
    pub async fn list(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<Self>, sqlx::Error> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email::text AS email, username, password_hash, role, created_at
            FROM users
            ORDER BY created_at ASC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

        Ok(users)
    }

    /// Counts total number of users
    ///
    /// # Errors
    ///
    /// Returns an error if database connection fails
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(pool)
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_as_str() {
        assert_eq!(UserRole::Admin.as_str(), "admin");
        assert_eq!(UserRole::User.as_str(), "user");
    }

    #[test]
    fn test_role_is_admin() {
        assert!(UserRole::Admin.is_admin());
        assert!(!UserRole::User.is_admin());
    }

    #[test]
    fn test_role_serde_lowercase() {
        let json = serde_json::to_string(&UserRole::Admin).unwrap();
        assert_eq!(json, "\"admin\"");

        let role: UserRole = serde_json::from_str("\"user\"").unwrap();
        assert_eq!(role, UserRole::User);
    }

    #[test]
    fn test_summary_excludes_password_hash() {
        let user = User {
            id: Uuid::new_v4(),
            email: "test@example.com".to_string(),
            username: "testuser".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            role: UserRole::User,
            created_at: Utc::now(),
        };

        let summary = UserSummary::from(user.clone());
        let json = serde_json::to_string(&summary).unwrap();
        assert!(!json.contains("argon2id"));
        assert!(json.contains("test@example.com"));

        // The model itself also refuses to serialize the hash
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("argon2id"));
    }
}
