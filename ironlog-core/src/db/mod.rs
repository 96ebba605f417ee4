pub mod models;
pub mod operations;
pub mod schema;

use diesel::connection::SimpleConnection;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool, PooledConnection};
use diesel::sqlite::SqliteConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use log::{debug, info};
use std::time::Duration;

use crate::error::StoreError;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

pub const MEMORY_URL: &str = ":memory:";

pub type SqlitePool = Pool<ConnectionManager<SqliteConnection>>;
pub type SqlitePooledConnection = PooledConnection<ConnectionManager<SqliteConnection>>;

#[derive(Debug)]
struct ConnectionOptions {
    busy_timeout: Duration,
    wal: bool,
}

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for ConnectionOptions {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
        let mut pragmas = format!("PRAGMA busy_timeout = {};", self.busy_timeout.as_millis());
        if self.wal {
            pragmas.push_str("PRAGMA journal_mode = WAL; PRAGMA synchronous = NORMAL;");
        }
        conn.batch_execute(&pragmas).map_err(diesel::r2d2::Error::QueryError)
    }
}

/// Handle to the training database.
///
/// Opened once at process start and handed to the repository; nothing reopens
/// it behind the caller's back.
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Opens (creating if missing) the database at `url` and applies pending
    /// migrations.
    pub fn open(url: &str, pool_size: u32) -> Result<Self, StoreError> {
        if url == MEMORY_URL {
            return Self::open_in_memory();
        }
        let options = ConnectionOptions {
            busy_timeout: Duration::from_millis(5000),
            wal: true,
        };
        let pool = Pool::builder()
            .max_size(pool_size.max(1))
            .connection_customizer(Box::new(options))
            .build(ConnectionManager::<SqliteConnection>::new(url))?;
        debug!("Opened database pool for {} ({} connections)", url, pool_size);
        Self::with_pool(pool)
    }

    /// In-memory database. Every SQLite `:memory:` connection is its own
    /// database, so the pool holds exactly one connection that never expires.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let options = ConnectionOptions {
            busy_timeout: Duration::from_millis(5000),
            wal: false,
        };
        let pool = Pool::builder()
            .max_size(1)
            .max_lifetime(None)
            .idle_timeout(None)
            .connection_customizer(Box::new(options))
            .build(ConnectionManager::<SqliteConnection>::new(MEMORY_URL))?;
        debug!("Opened in-memory database");
        Self::with_pool(pool)
    }

    fn with_pool(pool: SqlitePool) -> Result<Self, StoreError> {
        let db = Database { pool };
        db.run_migrations()?;
        Ok(db)
    }

    fn run_migrations(&self) -> Result<(), StoreError> {
        let mut conn = self.pool.get()?;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| StoreError::Migration(e.to_string()))?;
        if applied.is_empty() {
            debug!("No pending migrations");
        }
        for version in applied {
            info!("Migration {} applied successfully", version);
        }
        Ok(())
    }

    pub fn conn(&self) -> Result<SqlitePooledConnection, StoreError> {
        self.pool.get().map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::operations;

    #[test]
    fn migrations_seed_the_settings_row() {
        let db = Database::open_in_memory().unwrap();
        let mut conn = db.conn().unwrap();
        let settings = operations::select_settings(&mut conn).unwrap();
        assert_eq!(settings.id, models::SETTINGS_ID);
        assert!(!settings.deload_enabled);
        assert_eq!(settings.deload_every_sessions, 0);
    }

    #[test]
    fn file_database_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ironlog.db");
        let url = path.to_str().unwrap();

        {
            let db = Database::open(url, 2).unwrap();
            let mut conn = db.conn().unwrap();
            operations::insert_workout_plan(&mut conn, "Upper/Lower").unwrap();
        }

        let db = Database::open(url, 2).unwrap();
        let mut conn = db.conn().unwrap();
        let plans = operations::select_workout_plans(&mut conn).unwrap();
        assert_eq!(plans.len(), 1);
        assert_eq!(plans[0].name, "Upper/Lower");
    }
}
