/// Password hashing using Argon2id
///
/// Passwords are hashed with Argon2id and stored in PHC string format. The
/// parameters (64 MB memory, 3 iterations, 4 lanes) follow the usual
/// recommendations for interactive logins.
///
/// The strength policy is deliberately minimal: registration only enforces a
/// minimum length. Anything stricter is a product decision, not a storage
/// concern.
///
/// # Example
///
/// ```
/// use taskboard_shared::auth::password::{hash_password, verify_password};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("strongpass123")?;
/// assert!(verify_password("strongpass123", &hash)?);
/// assert!(!verify_password("wrongpass", &hash)?);
/// # Ok(())
/// # }
/// ```

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2, ParamsBuilder, Version,
};

/// Minimum accepted password length
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Error type for password hashing operations
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    /// Failed to hash password
    #[error("Failed to hash password: {0}")]
    HashError(String),

    /// Failed to verify password
    #[error("Failed to verify password: {0}")]
    VerifyError(String),

    /// Invalid password hash format
    #[error("Invalid password hash format: {0}")]
    InvalidHash(String),
}

/// Hashes a password using Argon2id
///
/// # Returns
///
/// PHC string format hash (includes algorithm, parameters, salt, and hash),
/// e.g. `$argon2id$v=19$m=65536,t=3,p=4$...`
///
/// # Errors
///
/// Returns `PasswordError::HashError` if hashing fails
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);

    let params = ParamsBuilder::new()
        .m_cost(65536) // 64 MB
        .t_cost(3)
        .p_cost(4)
        .output_len(32)
        .build()
        .map_err(|e| PasswordError::HashError(format!("Invalid parameters: {}", e)))?;

    let argon2 = Argon2::new(argon2::Algorithm::Argon2id, Version::V0x13, params);

    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PasswordError::HashError(format!("Hash generation failed: {}", e)))?;

    Ok(password_hash.to_string())
}

/// Verifies a password against a stored hash
///
/// Verification is constant-time; parameters are read from the hash itself.
///
/// # Returns
///
/// `Ok(true)` if the password matches, `Ok(false)` if it doesn't
///
/// # Errors
///
/// Returns `PasswordError::InvalidHash` if the stored hash cannot be parsed
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| PasswordError::InvalidHash(format!("Failed to parse hash: {}", e)))?;

    let argon2 = Argon2::default();

    match argon2.verify_password(password.as_bytes(), &parsed_hash) {
        Ok(_) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::VerifyError(format!(
            "Verification failed: {}",
            e
        ))),
    }
}

/// Validates password strength
///
/// The only requirement is a minimum length of [`MIN_PASSWORD_LENGTH`]
/// characters.
///
/// # Returns
///
/// `Ok(())` if the password is acceptable, `Err` with a description if not
///
/// # Example
///
/// ```
/// use taskboard_shared::auth::password::validate_password_strength;
///
/// assert!(validate_password_strength("securepass123").is_ok());
/// assert!(validate_password_strength("123").is_err());
/// ```
pub fn validate_password_strength(password: &str) -> Result<(), String> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(format!(
            "Password must be at least {} characters long",
            MIN_PASSWORD_LENGTH
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_password() {
        let hash = hash_password("test_password_123").expect("Hash should succeed");

        assert!(hash.starts_with("$argon2id$"));
        assert!(hash.contains("v=19"));
        assert!(hash.contains("m=65536"));
        assert!(hash.contains("t=3"));
        assert!(hash.contains("p=4"));
    }

    #[test]
    fn test_hash_password_produces_different_salts() {
        let hash1 = hash_password("same_password").expect("Hash 1 should succeed");
        let hash2 = hash_password("same_password").expect("Hash 2 should succeed");

        // Different salts = different hashes
        assert_ne!(hash1, hash2);
    }

    #[test]
    fn test_verify_password_correct() {
        let hash = hash_password("correct_password").expect("Hash should succeed");
        assert!(verify_password("correct_password", &hash).expect("Verify should succeed"));
    }

    #[test]
    fn test_verify_password_incorrect() {
        let hash = hash_password("correct_password").expect("Hash should succeed");
        assert!(!verify_password("wrong_password", &hash).expect("Verify should succeed"));
    }

    #[test]
    fn test_verify_password_empty() {
        let hash = hash_password("password").expect("Hash should succeed");
        assert!(!verify_password("", &hash).expect("Verify should succeed"));
    }

    #[test]
    fn test_verify_password_invalid_hash() {
        assert!(verify_password("password", "invalid_hash").is_err());
        assert!(verify_password("password", "$argon2id$invalid").is_err());
    }

    #[test]
    fn test_hash_verify_roundtrip() {
        let passwords = vec![
            "simple-enough",
            "with spaces in it",
            "with-special-chars!@#$%",
            "unicode-密码-パスワード",
        ];

        for password in passwords {
            let hash = hash_password(password).expect("Hash should succeed");
            assert!(
                verify_password(password, &hash).expect("Verify should succeed"),
                "Password '{}' should verify",
                password
            );
        }
    }

    #[test]
    fn test_validate_password_strength_minimum_length() {
        assert!(validate_password_strength("strongpass123").is_ok());
        assert!(validate_password_strength("12345678").is_ok());

        let result = validate_password_strength("123");
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("at least 8 characters"));

        assert!(validate_password_strength("").is_err());
    }
}
