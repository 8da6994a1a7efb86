//! Embedded schema migrations.
//!
//! The SQL under `backend/migrations` is compiled into the binary and applied
//! at startup when `run_migrations` is enabled. Diesel's migration harness is
//! synchronous, so callers on an async runtime should run it through
//! `spawn_blocking`.

use diesel::{Connection, PgConnection};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::info;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Errors raised while applying migrations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MigrationError {
    /// The database could not be reached.
    #[error("migration connection failed: {message}")]
    Connection { message: String },
    /// A migration failed to apply.
    #[error("migration failed: {message}")]
    Apply { message: String },
}

/// Apply every pending migration to the database at `database_url`.
///
/// Returns the number of migrations applied.
pub fn run_pending_migrations(database_url: &str) -> Result<usize, MigrationError> {
    let mut conn = PgConnection::establish(database_url).map_err(|err| {
        MigrationError::Connection {
            message: err.to_string(),
        }
    })?;
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|err| MigrationError::Apply {
            message: err.to_string(),
        })?;
    for version in &applied {
        info!(%version, "applied migration");
    }
    Ok(applied.len())
}
