//! Slot table migrations
//!
//! Each migration is applied once, inside a transaction, and recorded in
//! `migrations` by version.

use crate::error::Result;
use sqlx::SqlitePool;

const MIGRATIONS: &[(i64, &str)] = &[(1, include_str!("migrations/001_slots.sql"))];

/// Create the bookkeeping table and apply any migration newer than the
/// recorded version.
pub async fn initialize_database(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS migrations (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )",
    )
    .execute(pool)
    .await?;

    let applied: i64 = sqlx::query_scalar("SELECT COALESCE(MAX(version), 0) FROM migrations")
        .fetch_one(pool)
        .await?;

    let pending = MIGRATIONS.iter().filter(|(version, _)| *version > applied);
    for &(version, sql) in pending {
        let mut tx = pool.begin().await?;
        sqlx::raw_sql(sql).execute(&mut *tx).await?;
        sqlx::query("INSERT INTO migrations (version) VALUES (?)")
            .bind(version)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        tracing::info!("Slot schema migrated to version {}", version);
    }

    tracing::debug!("Slot schema at version {}", applied.max(MIGRATIONS.len() as i64));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn memory_pool() -> SqlitePool {
        SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_initialize_database() {
        let pool = memory_pool().await;

        initialize_database(&pool).await.unwrap();

        let applied: i32 = sqlx::query_scalar("SELECT COUNT(*) FROM migrations")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(applied, 1);

        let slots: i32 = sqlx::query_scalar("SELECT COUNT(*) FROM slots")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(slots, 0);
    }

    #[tokio::test]
    async fn test_initialize_is_idempotent() {
        let pool = memory_pool().await;

        initialize_database(&pool).await.unwrap();
        initialize_database(&pool).await.unwrap();

        let applied: i32 = sqlx::query_scalar("SELECT COUNT(*) FROM migrations")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(applied, 1);
    }
}
