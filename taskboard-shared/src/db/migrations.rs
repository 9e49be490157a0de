/// Database migration runner
///
/// Wraps sqlx's migration system. Migration files live in the `migrations/`
/// directory at the workspace root; each consists of an "up" file
/// (`{version}_{name}.sql`) and a "down" file (`{version}_{name}.down.sql`).
///
/// # Example
///
/// ```no_run
/// use taskboard_shared::db::migrations::run_migrations;
/// use taskboard_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = DatabaseConfig {
///     url: std::env::var("DATABASE_URL")?,
///     ..Default::default()
/// };
///
/// let pool = create_pool(config).await?;
/// run_migrations(&pool).await?;
/// # Ok(())
/// # }
/// ```

use sqlx::{migrate::MigrateDatabase, postgres::PgPool, Postgres};
use tracing::{debug, info, warn};

/// Runs all pending database migrations
///
/// Migrations that have already been applied are skipped.
///
/// # Errors
///
/// Returns an error if a migration file is malformed, a migration fails to
/// execute, or the database connection is lost mid-run.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    info!("Starting database migrations");

    let migrations = sqlx::migrate!("../migrations");

    match migrations.run(pool).await {
        Ok(()) => {
            info!("All database migrations completed successfully");
            Ok(())
        }
        Err(e) => {
            warn!("Migration failed: {}", e);
            Err(e)
        }
    }
}

/// Creates the database if it doesn't exist
///
/// Useful for development and testing; in production the database should
/// already exist.
///
/// # Errors
///
/// Returns an error if the PostgreSQL server is unreachable or database
/// creation fails.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), sqlx::Error> {
    if !Postgres::database_exists(database_url).await? {
        info!("Database does not exist, creating it");
        Postgres::create_database(database_url).await?;
    } else {
        debug!("Database already exists");
    }

    Ok(())
}
