//! # TaskBoard Shared Library
//!
//! This crate contains the types and business logic shared by the TaskBoard
//! API server: database models, the authorization engine, and authentication
//! primitives.
//!
//! ## Module Organization
//!
//! - `models`: Database models (users, tasks) and their scoped queries
//! - `auth`: Password hashing, JWT issuance, middleware, authorization
//! - `db`: Connection pool and migration runner

pub mod auth;
pub mod db;
pub mod models;

/// Current version of the TaskBoard shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
