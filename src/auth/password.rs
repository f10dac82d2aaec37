/// Password hashing using Argon2id
///
/// Provides one-way password hashing, constant-time verification, and the
/// account password policy applied before an account is persisted.
///
/// # Security
///
/// - **Algorithm**: Argon2id
/// - **Memory**: 64 MB (65536 KB)
/// - **Iterations**: 3 passes
/// - **Parallelism**: 4 lanes
/// - **Output**: 32-byte hash, PHC string format
///
/// # Example
///
/// ```
/// use taskhive_core::auth::password::{hash_password, verify_password};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("super_secret_1")?;
/// assert!(verify_password("super_secret_1", &hash)?);
/// assert!(!verify_password("wrong_guess", &hash)?);
/// # Ok(())
/// # }
/// ```

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2, ParamsBuilder, Version,
};

/// Minimum password length after trimming
pub const MIN_PASSWORD_LENGTH: usize = 7;

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

/// Hashes a password using Argon2id with a fixed cost configuration
///
/// A fresh 16-byte salt is generated from the OS RNG per call, so hashing the
/// same password twice yields different outputs.
///
/// # Errors
///
/// Returns `PasswordError::HashError` if hashing fails.
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
/// Uses the argon2 library's constant-time comparison; never compare a
/// plaintext against a hash with string equality.
///
/// # Errors
///
/// Returns `PasswordError::InvalidHash` if the stored hash cannot be parsed,
/// `PasswordError::VerifyError` for other verification failures.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| PasswordError::InvalidHash(format!("Failed to parse hash: {}", e)))?;

    // Parameters are embedded in the PHC string
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

/// Validates a plaintext password against the account policy
///
/// The policy, applied to the trimmed value:
/// - at least 7 characters long
/// - must not contain the word "password" (case-insensitive)
///
/// # Example
///
/// ```
/// use taskhive_core::auth::password::validate_password;
///
/// assert!(validate_password("abc1234").is_ok());
/// assert!(validate_password("short").is_err());
/// assert!(validate_password("password123").is_err());
/// ```
pub fn validate_password(password: &str) -> Result<(), String> {
    let trimmed = password.trim();

    if trimmed.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(format!(
            "Password must be at least {} characters long",
            MIN_PASSWORD_LENGTH
        ));
    }

    if trimmed.to_lowercase().contains("password") {
        return Err("Password can not contain the word \"password\"".to_string());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_password_phc_format() {
        let hash = hash_password("test_secret_123").expect("Hash should succeed");

        assert!(hash.starts_with("$argon2id$"));
        assert!(hash.contains("v=19"));
        assert!(hash.contains("m=65536"));
        assert!(hash.contains("t=3"));
        assert!(hash.contains("p=4"));
    }

    #[test]
    fn test_hash_password_produces_different_salts() {
        let hash1 = hash_password("same_secret").expect("Hash 1 should succeed");
        let hash2 = hash_password("same_secret").expect("Hash 2 should succeed");

        // Different salts = different hashes
        assert_ne!(hash1, hash2);
    }

    #[test]
    fn test_hash_never_equals_plaintext() {
        let plaintext = "abc1234";
        let hash = hash_password(plaintext).expect("Hash should succeed");
        assert_ne!(hash, plaintext);
    }

    #[test]
    fn test_verify_password_correct() {
        let hash = hash_password("correct_secret").expect("Hash should succeed");
        assert!(verify_password("correct_secret", &hash).expect("Verify should succeed"));
    }

    #[test]
    fn test_verify_password_incorrect() {
        let hash = hash_password("correct_secret").expect("Hash should succeed");
        assert!(!verify_password("wrong_secret", &hash).expect("Verify should succeed"));
    }

    #[test]
    fn test_verify_password_invalid_hash() {
        assert!(verify_password("anything", "not_a_phc_string").is_err());
    }

    #[test]
    fn test_validate_password_minimum_length() {
        // Exactly 7 characters passes
        assert!(validate_password("abc1234").is_ok());

        // Fewer than 7 fails
        let result = validate_password("short");
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("at least 7"));
    }

    #[test]
    fn test_validate_password_rejects_password_substring() {
        for candidate in ["password123", "PASSWORD123", "myPassWord1"] {
            let result = validate_password(candidate);
            assert!(result.is_err(), "'{}' should be rejected", candidate);
            assert!(result.unwrap_err().contains("password"));
        }
    }

    #[test]
    fn test_validate_password_trims_before_checking() {
        // 6 characters padded with whitespace still fails
        assert!(validate_password("  abc123  ").is_err());
        assert!(validate_password("  abc1234  ").is_ok());
    }
}
