/// Database models for TaskBoard
///
/// This module contains all database models and their CRUD operations.
///
/// # Models
///
/// - `user`: User accounts with roles (the identity store)
/// - `task`: To-do items owned by exactly one user, with scoped queries
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
/// # Ok(())
/// # }
/// ```

pub mod task;
pub mod user;
