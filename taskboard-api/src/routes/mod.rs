/// API route handlers
///
/// - `auth`: registration, login, token refresh
/// - `users`: admin-only user listing
/// - `tasks`: owner-scoped task CRUD
/// - `health`: liveness and database connectivity

pub mod auth;
pub mod health;
pub mod tasks;
pub mod users;
