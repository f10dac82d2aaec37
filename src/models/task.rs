/// Task model and database operations
///
/// Tasks are the records a user account owns. The user entity never embeds
/// its tasks; the one-to-many relationship is exposed as the owner-id lookup
/// in [`Task::find_by_owner`], and account deletion removes owned tasks via
/// [`Task::delete_by_owner`].
///
/// # Schema
///
/// ```sql
/// CREATE TABLE tasks (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     owner_id UUID NOT NULL REFERENCES users(id),
///     description VARCHAR(255) NOT NULL,
///     completed BOOLEAN NOT NULL DEFAULT FALSE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use taskhive_core::models::task::{CreateTask, Task};
/// use sqlx::PgPool;
/// use uuid::Uuid;
///
/// # async fn example(pool: PgPool, owner_id: Uuid) -> Result<(), sqlx::Error> {
/// let task = Task::create(&pool, CreateTask {
///     owner_id,
///     description: "Water the plants".to_string(),
/// }).await?;
///
/// let owned = Task::find_by_owner(&pool, owner_id).await?;
/// assert!(owned.iter().any(|t| t.id == task.id));
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Task record owned by a user account
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Unique task ID
    pub id: Uuid,

    /// Account that created the task
    pub owner_id: Uuid,

    /// What needs to be done
    pub description: String,

    /// Whether the task is done
    pub completed: bool,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTask {
    /// Owning account
    pub owner_id: Uuid,

    /// Task description
    pub description: String,
}

impl Task {
    /// Creates a new task for an account
    ///
    /// # Errors
    ///
    /// Returns an error if the owner does not exist (foreign key violation)
    /// or the database is unreachable.
    pub async fn create(pool: &PgPool, data: CreateTask) -> Result<Self, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (owner_id, description)
            VALUES ($1, $2)
            RETURNING id, owner_id, description, completed, created_at, updated_at
            "#,
        )
        .bind(data.owner_id)
        .bind(data.description.trim())
        .fetch_one(pool)
        .await?;

        Ok(task)
    }

    /// Finds all tasks owned by an account, oldest first
    pub async fn find_by_owner(pool: &PgPool, owner_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, owner_id, description, completed, created_at, updated_at
            FROM tasks
            WHERE owner_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(owner_id)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Deletes every task owned by an account, returning the number removed
    ///
    /// Generic over the executor so it can run inside the account-deletion
    /// transaction as well as against a plain pool.
    pub async fn delete_by_owner<'e, E>(executor: E, owner_id: Uuid) -> Result<u64, sqlx::Error>
    where
        E: sqlx::PgExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM tasks WHERE owner_id = $1")
            .bind(owner_id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected())
    }
}
