//! Riff Storage
//!
//! Local [`PlaylistStore`](riff_core::PlaylistStore) implementations.
//!
//! - [`SqlitePlaylistStore`]: `SQLite` database with embedded migrations,
//!   one row per playlist and one row per (playlist, song) membership
//! - [`MemoryPlaylistStore`]: process-local store for tests and offline runs
//!
//! # Example
//!
//! ```rust,no_run
//! use riff_core::{PlaylistStore, UserId};
//! use riff_storage::{create_pool, run_migrations, SqlitePlaylistStore};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = create_pool("sqlite://riff.db").await?;
//! run_migrations(&pool).await?;
//!
//! let store = SqlitePlaylistStore::new(pool);
//! let owner = UserId::new("local");
//! let playlist = store.create(Some(&owner), "Road Trip").await?;
//! let all = store.list(Some(&owner)).await?;
//! assert_eq!(all[0].id, playlist.id);
//! # Ok(())
//! # }
//! ```

mod error;
mod memory;
mod sqlite;

pub use error::{Result, StorageError};
pub use memory::MemoryPlaylistStore;
pub use sqlite::SqlitePlaylistStore;

use sqlx::migrate::Migrator;
use sqlx::sqlite::SqlitePool;
use tracing::debug;

// Embed migrations into binary
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Run database migrations
///
/// Call once at startup, before handing the pool to a store.
///
/// # Errors
///
/// Returns an error if migrations fail to run
pub async fn run_migrations(pool: &SqlitePool) -> std::result::Result<(), sqlx::migrate::MigrateError> {
    MIGRATOR.run(pool).await
}

/// Create a new `SQLite` pool
///
/// # Arguments
///
/// * `database_url` - `SQLite` connection string (e.g., `sqlite://riff.db`)
///
/// # Errors
///
/// Returns an error if the connection fails
pub async fn create_pool(database_url: &str) -> std::result::Result<SqlitePool, sqlx::Error> {
    use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
    use std::str::FromStr;

    debug!(database_url, "Creating SQLite pool");

    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .foreign_keys(true)
        .busy_timeout(std::time::Duration::from_secs(30));

    SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
}
