//! Database module
//!
//! SQLite persistence for storage slots:
//! - Schema and migrations
//! - Repository layer for slot reads and writes

pub mod repository;
pub mod schema;

pub use repository::Repository;
pub use schema::initialize_database;

use crate::error::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

fn connect_options(db_path: &Path) -> Result<SqliteConnectOptions> {
    let opts = SqliteConnectOptions::from_str(&format!("sqlite://{}", db_path.display()))?
        .create_if_missing(true)
        .busy_timeout(Duration::from_secs(5))
        .journal_mode(SqliteJournalMode::Wal);
    Ok(opts)
}

/// Open the slot database at `db_path`, creating parent directories and
/// bringing the `slots` table up to the latest migration.
pub async fn create_pool(db_path: &Path) -> Result<SqlitePool> {
    tracing::info!("Opening slot database at: {:?}", db_path);

    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let pool = SqlitePoolOptions::new()
        .max_connections(2)
        .connect_with(connect_options(db_path)?)
        .await?;

    initialize_database(&pool).await?;

    Ok(pool)
}
