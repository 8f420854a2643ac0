//! Schema migrations for the PostgreSQL item store.

use sqlx::PgPool;
use sqlx::migrate::Migrator;
use tracing::info;

use itemtree_core::error::{AppError, ErrorKind};

/// Migrations embedded from the workspace `migrations/` directory.
static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

/// Apply every pending migration to `pool`.
pub async fn run_migrations(pool: &PgPool) -> Result<(), AppError> {
    info!(
        known = MIGRATOR.iter().count(),
        "Applying storage item migrations"
    );

    MIGRATOR.run(pool).await.map_err(|e| {
        AppError::with_source(
            ErrorKind::Database,
            format!("Failed to run migrations: {e}"),
            e,
        )
    })?;

    info!("Storage item schema is up to date");
    Ok(())
}
