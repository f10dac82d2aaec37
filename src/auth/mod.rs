/// Authentication primitives
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing, verification, and the account
///   password policy
/// - [`jwt`]: Bearer token creation and validation
///
/// # Example
///
/// ```
/// use taskhive_core::auth::password::{hash_password, verify_password};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("abc1234")?;
/// assert!(verify_password("abc1234", &hash)?);
/// # Ok(())
/// # }
/// ```

pub mod jwt;
pub mod password;
