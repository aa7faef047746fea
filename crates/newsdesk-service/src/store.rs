use std::sync::{Arc, Mutex, MutexGuard};

use diesel::Connection;
use diesel::sqlite::SqliteConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::{debug, info};

use crate::errors::{AppError, Result};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

/// The single store connection shared by every repository in a process.
pub type SharedConnection = Arc<Mutex<SqliteConnection>>;

/// Open the store and make sure both tables exist.
pub fn establish(database_url: &str) -> Result<SqliteConnection> {
    let mut connection = SqliteConnection::establish(database_url)?;
    ensure_schema(&mut connection)?;
    info!(database_url = %database_url, "Connected to store");
    Ok(connection)
}

/// Create the `posts` and `news` tables and their indexes if absent. Idempotent.
pub fn ensure_schema(connection: &mut SqliteConnection) -> Result<()> {
    let applied = connection
        .run_pending_migrations(MIGRATIONS)
        .map_err(|err| AppError::MigrationError(err.to_string()))?;

    debug!(applied = applied.len(), "Schema is up to date");
    Ok(())
}

pub fn shared(connection: SqliteConnection) -> SharedConnection {
    Arc::new(Mutex::new(connection))
}

pub(crate) fn lock(db: &SharedConnection) -> Result<MutexGuard<'_, SqliteConnection>> {
    db.lock().map_err(|_| AppError::LockPoisoned)
}
