/// Database migration runner
///
/// Thin wrapper around sqlx's embedded migration system. Migration files live
/// in the `migrations/` directory at the crate root and are compiled into the
/// binary via [`sqlx::migrate!`].
///
/// # Example
///
/// ```no_run
/// use taskhive_core::db::migrations::{ensure_database_exists, run_migrations};
/// use taskhive_core::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let url = std::env::var("DATABASE_URL")?;
/// ensure_database_exists(&url).await?;
///
/// let pool = create_pool(DatabaseConfig { url, ..Default::default() }).await?;
/// run_migrations(&pool).await?;
/// # Ok(())
/// # }
/// ```

use sqlx::{migrate::MigrateDatabase, postgres::PgPool, Postgres};
use tracing::{info, warn};

/// Creates the database if it does not already exist
///
/// Safe to call unconditionally at startup; existing databases are left
/// untouched.
pub async fn ensure_database_exists(url: &str) -> Result<(), sqlx::Error> {
    if !Postgres::database_exists(url).await? {
        info!("Database does not exist, creating it");
        Postgres::create_database(url).await?;
    }
    Ok(())
}

/// Runs all pending database migrations
///
/// Each migration runs in its own transaction; a failing migration is rolled
/// back and returned as an error.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    info!("Running database migrations");

    match sqlx::migrate!("./migrations").run(pool).await {
        Ok(()) => {
            info!("All database migrations applied");
            Ok(())
        }
        Err(e) => {
            warn!("Migration failed: {}", e);
            Err(e)
        }
    }
}
