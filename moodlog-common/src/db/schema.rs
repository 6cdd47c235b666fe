//! Schema initialization for the entry store

use crate::Result;
use sqlx::SqlitePool;

/// Create tables and indexes if they don't exist
///
/// Timestamps are stored as RFC 3339 TEXT in UTC so windowed range scans
/// can compare them lexicographically. `sentiment_score` stays NULL until
/// enrichment fills it in; `deleted_at` marks soft-deleted rows.
pub async fn initialize_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS entries (
            guid TEXT PRIMARY KEY,
            user_id INTEGER NOT NULL,
            summary TEXT NOT NULL,
            mood TEXT NOT NULL,
            energy_level INTEGER NOT NULL,
            complexity TEXT NOT NULL,
            satisfaction REAL NOT NULL,
            sentiment_score REAL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            deleted_at TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_entries_user_id ON entries (user_id)")
        .execute(pool)
        .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_entries_created_at ON entries (created_at)")
        .execute(pool)
        .await?;

    tracing::info!("Database schema initialized (entries)");

    Ok(())
}
