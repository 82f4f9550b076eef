//! Embedded schema migrations.
//!
//! Migrations run over a short-lived synchronous connection; the pool is
//! only built once the schema is current.

use diesel::{Connection, PgConnection};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};

use crate::domain::ports::PersistenceError;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Apply every pending migration to the database at `database_url`.
///
/// Blocks the calling thread; async callers should wrap it in
/// `tokio::task::spawn_blocking`.
///
/// # Errors
///
/// [`PersistenceError::Unavailable`] when the database cannot be reached and
/// [`PersistenceError::Query`] when a migration fails.
pub fn run_migrations(database_url: &str) -> Result<usize, PersistenceError> {
    let mut conn = PgConnection::establish(database_url)
        .map_err(|err| PersistenceError::unavailable(format!("connect for migrations: {err}")))?;
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|err| PersistenceError::query(format!("migration: {err}")))?;
    Ok(applied.len())
}
