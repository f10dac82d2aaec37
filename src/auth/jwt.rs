/// Bearer token creation and validation
///
/// Tokens are JWTs signed with HS256 (HMAC-SHA256). The payload carries the
/// account id as the `sub` claim. Tokens have **no expiration**: an issued
/// token stays valid until it disappears from the account's token list, which
/// matches how the service has always behaved. Verification on incoming
/// requests is the job of the HTTP layer's auth middleware, using the same
/// secret.
///
/// # Example
///
/// ```
/// use taskhive_core::auth::jwt::{create_token, validate_token, Claims};
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let user_id = Uuid::new_v4();
/// let secret = "test-secret-key-at-least-32-bytes-long";
///
/// let token = create_token(&Claims::new(user_id), secret)?;
/// let claims = validate_token(&token, secret)?;
/// assert_eq!(claims.sub, user_id);
/// # Ok(())
/// # }
/// ```

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Issuer claim embedded in every token
const ISSUER: &str = "taskhive";

/// Error type for token operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Failed to create token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Failed to validate token
    #[error("Failed to validate token: {0}")]
    ValidationError(String),
}

/// Token claims
///
/// - `sub`: the account id
/// - `iss`: always "taskhive"
/// - `iat`: issued-at timestamp
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - account ID
    pub sub: Uuid,

    /// Issuer
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,
}

impl Claims {
    /// Creates claims for an account
    pub fn new(user_id: Uuid) -> Self {
        Self {
            sub: user_id,
            iss: ISSUER.to_string(),
            iat: Utc::now().timestamp(),
        }
    }
}

/// Creates a signed token from claims
///
/// # Errors
///
/// Returns `JwtError::CreateError` if encoding fails.
pub fn create_token(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&header, claims, &key)
        .map_err(|e| JwtError::CreateError(format!("Token encoding failed: {}", e)))
}

/// Validates a token and extracts its claims
///
/// Verifies the signature and the issuer. Expiration is deliberately not
/// checked since issued tokens carry no `exp` claim.
///
/// # Errors
///
/// Returns `JwtError::ValidationError` if the signature is invalid, the
/// issuer does not match, or the token is malformed.
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);
    validation.set_required_spec_claims(&["iss"]);
    validation.validate_exp = false;

    let token_data = decode::<Claims>(token, &key, &validation)
        .map_err(|e| JwtError::ValidationError(format!("Token validation failed: {}", e)))?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claims_carry_account_id_and_issuer() {
        let user_id = Uuid::new_v4();
        let claims = Claims::new(user_id);

        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.iss, "taskhive");
        assert!(claims.iat <= Utc::now().timestamp());
    }

    #[test]
    fn test_create_and_validate_token() {
        let user_id = Uuid::new_v4();
        let secret = "test-secret-key-at-least-32-bytes-long";

        let token = create_token(&Claims::new(user_id), secret).expect("Should create token");
        let validated = validate_token(&token, secret).expect("Should validate token");

        assert_eq!(validated.sub, user_id);
        assert_eq!(validated.iss, "taskhive");
    }

    #[test]
    fn test_validate_with_wrong_secret_fails() {
        let token = create_token(&Claims::new(Uuid::new_v4()), "secret-one").unwrap();
        assert!(validate_token(&token, "secret-two").is_err());
    }

    #[test]
    fn test_validate_garbage_token_fails() {
        assert!(validate_token("not.a.token", "secret").is_err());
    }

    #[test]
    fn test_tokens_are_opaque_strings() {
        let token = create_token(&Claims::new(Uuid::new_v4()), "secret").unwrap();

        // Three base64url segments separated by dots
        assert_eq!(token.split('.').count(), 3);
    }
}
