/// User account model and database operations
///
/// This module owns the account record: schema validation, credential hashing
/// before persistence, bearer-token issuance, credential verification on
/// login, the public (redacted) projection, and cascading deletion of the
/// account's tasks.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name VARCHAR(255),
///     email CITEXT NOT NULL UNIQUE,
///     password_hash VARCHAR(255) NOT NULL,
///     avatar BYTEA,
///     age INTEGER NOT NULL DEFAULT 0 CHECK (age >= 0),
///     tokens JSONB NOT NULL DEFAULT '[]',
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use taskhive_core::config::JwtConfig;
/// use taskhive_core::models::user::{NewUser, User};
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool, jwt: JwtConfig) -> Result<(), Box<dyn std::error::Error>> {
/// let mut user = User::create(&pool, NewUser {
///     name: Some("Ada".to_string()),
///     email: "ada@example.com".to_string(),
///     password: "abc1234".to_string(),
///     avatar: None,
///     age: 36,
/// }).await?;
///
/// // Login and hand the token to the client
/// let token = user.issue_auth_token(&pool, &jwt).await?;
/// let profile = user.public();
/// # Ok(())
/// # }
/// ```

use crate::auth::{jwt, password};
use crate::config::JwtConfig;
use crate::error::{UserError, UserResult};
use crate::models::task::Task;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;
use validator::ValidateEmail;

/// Login failure message when no account matches the email
pub const LOGIN_FAILED: &str = "Unable to login";

/// Login failure message when the password hash comparison fails
///
/// Note the asymmetry with [`LOGIN_FAILED`]: a caller can tell whether the
/// email exists. This mirrors the service's historical behavior and is kept
/// deliberately; do not "fix" one message to match the other.
pub const BAD_CREDENTIALS: &str = "Email or password is incorrect";

/// One issued bearer token
///
/// Stored in the account's `tokens` JSONB list as `{"token": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthToken {
    /// The signed token string
    pub token: String,
}

/// User account record
///
/// The `password_hash` field only ever holds Argon2id output; plaintext
/// passwords exist in memory only inside [`NewUser`]/[`UpdateUser`] until
/// they are hashed. The token list is append-only from this module's
/// perspective: logins add entries, nothing here removes them.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique account ID, assigned by the store
    pub id: Uuid,

    /// Optional display name, stored trimmed
    pub name: Option<String>,

    /// Email address, unique and case-insensitive (CITEXT), stored lowercase
    pub email: String,

    /// Argon2id hash of the account password
    pub password_hash: String,

    /// Optional avatar image bytes
    pub avatar: Option<Vec<u8>>,

    /// Age in years, never negative
    pub age: i32,

    /// Every bearer token issued to this account, in issuance order
    pub tokens: Json<Vec<AuthToken>>,

    /// When the account was created
    pub created_at: DateTime<Utc>,

    /// When the account was last updated
    pub updated_at: DateTime<Utc>,
}

/// Public projection of an account
///
/// Exactly the fields safe to return to clients. `password_hash`, `tokens`,
/// and `avatar` never appear here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicUser {
    /// Account ID
    pub id: Uuid,

    /// Display name
    pub name: Option<String>,

    /// Email address
    pub email: String,

    /// Age in years
    pub age: i32,

    /// When the account was created
    pub created_at: DateTime<Utc>,

    /// When the account was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating an account
///
/// Carries the plaintext password; [`User::create`] validates and hashes it
/// before anything touches the database.
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    /// Optional display name
    pub name: Option<String>,

    /// Email address
    pub email: String,

    /// Plaintext password (validated, then hashed)
    pub password: String,

    /// Optional avatar image bytes
    pub avatar: Option<Vec<u8>>,

    /// Age in years
    #[serde(default)]
    pub age: i32,
}

/// Input for updating an account
///
/// All fields are optional; only provided fields are written. A provided
/// password is re-validated and re-hashed; an absent one leaves the stored
/// hash untouched, so an already-hashed value is never hashed twice.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUser {
    /// New display name
    pub name: Option<String>,

    /// New email address
    pub email: Option<String>,

    /// New plaintext password
    pub password: Option<String>,

    /// New avatar image bytes
    pub avatar: Option<Vec<u8>>,

    /// New age
    pub age: Option<i32>,
}

fn validate_email(email: &str) -> UserResult<()> {
    if !email.validate_email() {
        return Err(UserError::validation("email", "Enter a valid email."));
    }
    Ok(())
}

fn validate_age(age: i32) -> UserResult<()> {
    if age < 0 {
        return Err(UserError::validation("age", "Age must be positive"));
    }
    Ok(())
}

impl NewUser {
    /// Trims and normalizes fields, then checks every constraint
    ///
    /// - name: trimmed, empty becomes `None`
    /// - email: trimmed, lowercased, must be valid email syntax
    /// - password: trimmed, at least 7 chars, must not contain "password"
    /// - age: must be >= 0
    ///
    /// Returns the normalized input, ready for hashing and insertion.
    pub fn validated(mut self) -> UserResult<Self> {
        self.name = self
            .name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());
        self.email = self.email.trim().to_lowercase();
        self.password = self.password.trim().to_string();

        validate_email(&self.email)?;
        password::validate_password(&self.password)
            .map_err(|message| UserError::validation("password", message))?;
        validate_age(self.age)?;

        Ok(self)
    }
}

impl UpdateUser {
    /// Normalizes and validates the provided fields, leaving absent ones alone
    pub fn validated(mut self) -> UserResult<Self> {
        self.name = self.name.map(|n| n.trim().to_string());

        if let Some(email) = self.email {
            let email = email.trim().to_lowercase();
            validate_email(&email)?;
            self.email = Some(email);
        }

        if let Some(pw) = self.password {
            let pw = pw.trim().to_string();
            password::validate_password(&pw)
                .map_err(|message| UserError::validation("password", message))?;
            self.password = Some(pw);
        }

        if let Some(age) = self.age {
            validate_age(age)?;
        }

        Ok(self)
    }
}

impl User {
    /// Creates a new account
    ///
    /// Validates every field, hashes the password, and inserts the record.
    /// The plaintext password never reaches the database.
    ///
    /// # Errors
    ///
    /// - [`UserError::Validation`] if a field constraint is violated
    /// - [`UserError::DuplicateEmail`] if the email is already taken
    /// - [`UserError::Persistence`] on store failure
    pub async fn create(pool: &PgPool, data: NewUser) -> UserResult<Self> {
        let data = data.validated()?;
        let password_hash = password::hash_password(&data.password)?;
        let email_for_err = data.email.clone();

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, password_hash, avatar, age)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, email, password_hash, avatar, age, tokens,
                      created_at, updated_at
            "#,
        )
        .bind(data.name)
        .bind(data.email)
        .bind(password_hash)
        .bind(data.avatar)
        .bind(data.age)
        .fetch_one(pool)
        .await
        .map_err(|e| UserError::from_insert(e, &email_for_err))?;

        debug!(user_id = %user.id, "Created user account");
        Ok(user)
    }

    /// Finds an account by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> UserResult<Option<Self>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, avatar, age, tokens,
                   created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Finds an account by email address (case-insensitive via CITEXT)
    pub async fn find_by_email(pool: &PgPool, email: &str) -> UserResult<Option<Self>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, avatar, age, tokens,
                   created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email.trim())
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Authenticates an account by email and plaintext password
    ///
    /// On success returns the full record, hash and tokens included; this
    /// layer trusts its callers, and redaction is the caller's job via
    /// [`User::public`].
    ///
    /// # Errors
    ///
    /// - [`UserError::Authentication`] with [`LOGIN_FAILED`] when no account
    ///   matches the email
    /// - [`UserError::Authentication`] with [`BAD_CREDENTIALS`] when the
    ///   account exists but the hash comparison fails
    pub async fn find_by_credentials(
        pool: &PgPool,
        email: &str,
        plaintext: &str,
    ) -> UserResult<Self> {
        let user = Self::find_by_email(pool, email)
            .await?
            .ok_or(UserError::Authentication(LOGIN_FAILED))?;

        if !password::verify_password(plaintext, &user.password_hash)? {
            return Err(UserError::Authentication(BAD_CREDENTIALS));
        }

        Ok(user)
    }

    /// Issues a bearer token for this account
    ///
    /// Signs a token carrying the account id, appends it to the token list,
    /// and persists the list before returning the token string.
    ///
    /// Not idempotent: if the save fails after the token was minted, a retry
    /// mints and appends a second token. Two concurrent calls on the same
    /// account race on the list write and the last save wins; accepted risk.
    ///
    /// # Errors
    ///
    /// - [`UserError::Token`] if signing fails
    /// - [`UserError::Persistence`] if the save fails
    pub async fn issue_auth_token(
        &mut self,
        pool: &PgPool,
        jwt_config: &JwtConfig,
    ) -> UserResult<String> {
        let claims = jwt::Claims::new(self.id);
        let token = jwt::create_token(&claims, &jwt_config.secret)?;

        self.tokens.0.push(AuthToken {
            token: token.clone(),
        });

        let (updated_at,): (DateTime<Utc>,) = sqlx::query_as(
            r#"
            UPDATE users
            SET tokens = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING updated_at
            "#,
        )
        .bind(self.id)
        .bind(Json(&self.tokens.0))
        .fetch_one(pool)
        .await?;

        self.updated_at = updated_at;

        debug!(user_id = %self.id, token_count = self.tokens.0.len(), "Issued auth token");
        Ok(token)
    }

    /// Updates an account
    ///
    /// Only provided fields are written. A provided password is validated and
    /// hashed here; the hash is recomputed only when the password actually
    /// changes.
    ///
    /// # Errors
    ///
    /// - [`UserError::Validation`] if a provided field is invalid
    /// - [`UserError::DuplicateEmail`] if the new email is already taken
    /// - [`UserError::Persistence`] on store failure
    pub async fn update(pool: &PgPool, id: Uuid, data: UpdateUser) -> UserResult<Option<Self>> {
        let data = data.validated()?;

        let password_hash = match &data.password {
            Some(plaintext) => Some(password::hash_password(plaintext)?),
            None => None,
        };
        let email_for_err = data.email.clone().unwrap_or_default();

        // Build dynamic update query based on which fields are present
        let mut query = String::from("UPDATE users SET updated_at = NOW()");
        let mut bind_count = 1;

        if data.name.is_some() {
            bind_count += 1;
            query.push_str(&format!(", name = ${}", bind_count));
        }
        if data.email.is_some() {
            bind_count += 1;
            query.push_str(&format!(", email = ${}", bind_count));
        }
        if password_hash.is_some() {
            bind_count += 1;
            query.push_str(&format!(", password_hash = ${}", bind_count));
        }
        if data.avatar.is_some() {
            bind_count += 1;
            query.push_str(&format!(", avatar = ${}", bind_count));
        }
        if data.age.is_some() {
            bind_count += 1;
            query.push_str(&format!(", age = ${}", bind_count));
        }

        query.push_str(
            " WHERE id = $1 RETURNING id, name, email, password_hash, avatar, age, tokens, created_at, updated_at",
        );

        let mut q = sqlx::query_as::<_, User>(&query).bind(id);

        if let Some(name) = data.name {
            q = q.bind(name);
        }
        if let Some(email) = data.email {
            q = q.bind(email);
        }
        if let Some(hash) = password_hash {
            q = q.bind(hash);
        }
        if let Some(avatar) = data.avatar {
            q = q.bind(avatar);
        }
        if let Some(age) = data.age {
            q = q.bind(age);
        }

        let user = q
            .fetch_optional(pool)
            .await
            .map_err(|e| UserError::from_insert(e, &email_for_err))?;

        Ok(user)
    }

    /// Deletes an account and everything it owns
    ///
    /// Runs in a single transaction: first every task whose owner is this
    /// account, then the account itself. Either both deletions commit or
    /// neither does; a partial cascade never survives.
    ///
    /// # Returns
    ///
    /// True if the account existed and was deleted, false otherwise.
    pub async fn delete(pool: &PgPool, id: Uuid) -> UserResult<bool> {
        let mut tx = pool.begin().await?;

        let tasks_removed = Task::delete_by_owner(&mut *tx, id).await?;

        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        debug!(user_id = %id, tasks_removed, "Deleted user account");
        Ok(result.rows_affected() > 0)
    }

    /// Returns the public projection of this account
    ///
    /// Pure and infallible. The hash, token list, and avatar never leave
    /// through this boundary.
    pub fn public(&self) -> PublicUser {
        PublicUser {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            age: self.age,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            id: Uuid::new_v4(),
            name: Some("Ada".to_string()),
            email: "ada@example.com".to_string(),
            password_hash: "$argon2id$v=19$m=65536,t=3,p=4$salt$hash".to_string(),
            avatar: Some(vec![0xFF, 0xD8, 0xFF]),
            age: 36,
            tokens: Json(vec![AuthToken {
                token: "header.payload.sig".to_string(),
            }]),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_public_view_excludes_secrets() {
        let user = sample_user();
        let public = serde_json::to_value(user.public()).unwrap();
        let keys: Vec<&str> = public.as_object().unwrap().keys().map(|k| k.as_str()).collect();

        assert!(!keys.contains(&"password_hash"));
        assert!(!keys.contains(&"password"));
        assert!(!keys.contains(&"tokens"));
        assert!(!keys.contains(&"avatar"));
    }

    #[test]
    fn test_public_view_exact_fields() {
        let user = sample_user();
        let public = serde_json::to_value(user.public()).unwrap();
        let mut keys: Vec<&str> = public.as_object().unwrap().keys().map(|k| k.as_str()).collect();
        keys.sort_unstable();

        assert_eq!(
            keys,
            vec!["age", "created_at", "email", "id", "name", "updated_at"]
        );
    }

    #[test]
    fn test_new_user_normalization() {
        let data = NewUser {
            name: Some("  Ada  ".to_string()),
            email: "  Ada@Example.COM ".to_string(),
            password: " abc1234 ".to_string(),
            avatar: None,
            age: 36,
        }
        .validated()
        .unwrap();

        assert_eq!(data.name.as_deref(), Some("Ada"));
        assert_eq!(data.email, "ada@example.com");
        assert_eq!(data.password, "abc1234");
    }

    #[test]
    fn test_new_user_blank_name_becomes_none() {
        let data = NewUser {
            name: Some("   ".to_string()),
            email: "a@x.com".to_string(),
            password: "abc1234".to_string(),
            avatar: None,
            age: 0,
        }
        .validated()
        .unwrap();

        assert!(data.name.is_none());
    }

    #[test]
    fn test_new_user_rejects_bad_email() {
        let result = NewUser {
            name: None,
            email: "not-an-email".to_string(),
            password: "abc1234".to_string(),
            avatar: None,
            age: 0,
        }
        .validated();

        assert!(matches!(
            result,
            Err(UserError::Validation { ref field, .. }) if field == "email"
        ));
    }

    #[test]
    fn test_new_user_password_policy() {
        let build = |password: &str| NewUser {
            name: None,
            email: "a@x.com".to_string(),
            password: password.to_string(),
            avatar: None,
            age: 0,
        };

        // Length 7, no forbidden substring
        assert!(build("abc1234").validated().is_ok());

        // Contains "password"
        assert!(build("password123").validated().is_err());

        // Too short
        assert!(build("short").validated().is_err());
    }

    #[test]
    fn test_new_user_rejects_negative_age() {
        let result = NewUser {
            name: None,
            email: "a@x.com".to_string(),
            password: "abc1234".to_string(),
            avatar: None,
            age: -1,
        }
        .validated();

        assert!(matches!(
            result,
            Err(UserError::Validation { ref field, .. }) if field == "age"
        ));
    }

    #[test]
    fn test_update_user_skips_absent_fields() {
        let data = UpdateUser::default().validated().unwrap();

        assert!(data.name.is_none());
        assert!(data.email.is_none());
        assert!(data.password.is_none());
        assert!(data.age.is_none());
    }

    #[test]
    fn test_update_user_validates_provided_password() {
        let data = UpdateUser {
            password: Some("password123".to_string()),
            ..Default::default()
        };

        assert!(data.validated().is_err());
    }

    #[test]
    fn test_update_user_normalizes_email() {
        let data = UpdateUser {
            email: Some(" New@Example.COM ".to_string()),
            ..Default::default()
        }
        .validated()
        .unwrap();

        assert_eq!(data.email.as_deref(), Some("new@example.com"));
    }

    #[test]
    fn test_auth_token_serialization_shape() {
        let token = AuthToken {
            token: "abc".to_string(),
        };
        let value = serde_json::to_value(&token).unwrap();

        assert_eq!(value, serde_json::json!({ "token": "abc" }));
    }

    // Database-backed operations (uniqueness, login, token issuance, cascade
    // delete) are covered in tests/user_tests.rs
}
