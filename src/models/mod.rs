/// Database models
///
/// # Models
///
/// - `user`: User accounts, credentials, and token issuance
/// - `task`: Tasks owned by user accounts
///
/// # Example
///
/// ```no_run
/// use taskhive_core::models::user::{NewUser, User};
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), Box<dyn std::error::Error>> {
/// let user = User::create(&pool, NewUser {
///     name: Some("Ada".to_string()),
///     email: "ada@example.com".to_string(),
///     password: "abc1234".to_string(),
///     avatar: None,
///     age: 36,
/// }).await?;
/// # Ok(())
/// # }
/// ```

pub mod task;
pub mod user;
