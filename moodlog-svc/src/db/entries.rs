//! Entry record store
//!
//! Free functions over the shared pool. Every read excludes soft-deleted
//! rows; windowed queries are half-open `[start, end)` and ordered by
//! `created_at` ascending so rollup output is deterministic.

use chrono::{DateTime, SecondsFormat, Utc};
use moodlog_common::model::{Complexity, Mood, MoodEntry, NewEntry};
use moodlog_common::{Error, Result};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

const ENTRY_COLUMNS: &str = "guid, user_id, summary, mood, energy_level, complexity, \
     satisfaction, sentiment_score, created_at, updated_at, deleted_at";

/// Format a timestamp for storage (fixed-width RFC 3339 UTC)
fn fmt_timestamp(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, false)
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| Error::Internal(format!("invalid timestamp {}: {}", raw, e)))
}

fn map_row(row: &SqliteRow) -> Result<MoodEntry> {
    let guid: String = row.get("guid");
    let mood_raw: String = row.get("mood");
    let complexity_raw: String = row.get("complexity");
    let created_raw: String = row.get("created_at");
    let updated_raw: String = row.get("updated_at");
    let deleted_raw: Option<String> = row.get("deleted_at");

    Ok(MoodEntry {
        id: Uuid::parse_str(&guid)
            .map_err(|e| Error::Internal(format!("invalid entry guid {}: {}", guid, e)))?,
        user_id: row.get("user_id"),
        summary: row.get("summary"),
        mood: Mood::parse(&mood_raw)
            .ok_or_else(|| Error::Internal(format!("invalid mood value: {}", mood_raw)))?,
        energy_level: row.get("energy_level"),
        complexity: Complexity::parse(&complexity_raw).ok_or_else(|| {
            Error::Internal(format!("invalid complexity value: {}", complexity_raw))
        })?,
        satisfaction: row.get("satisfaction"),
        sentiment_score: row.get("sentiment_score"),
        created_at: parse_timestamp(&created_raw)?,
        updated_at: parse_timestamp(&updated_raw)?,
        deleted_at: deleted_raw.as_deref().map(parse_timestamp).transpose()?,
    })
}

/// Insert a new entry; the store assigns its id
///
/// Entries are always created unscored; enrichment fills the score in
/// later (or never).
pub async fn create_entry(pool: &SqlitePool, new: &NewEntry) -> Result<MoodEntry> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    sqlx::query(
        r#"
        INSERT INTO entries (
            guid, user_id, summary, mood, energy_level, complexity,
            satisfaction, sentiment_score, created_at, updated_at, deleted_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, NULL, ?, ?, NULL)
        "#,
    )
    .bind(id.to_string())
    .bind(new.user_id)
    .bind(&new.summary)
    .bind(new.mood.as_str())
    .bind(new.energy_level)
    .bind(new.complexity.as_str())
    .bind(new.satisfaction)
    .bind(fmt_timestamp(now))
    .bind(fmt_timestamp(now))
    .execute(pool)
    .await?;

    Ok(MoodEntry {
        id,
        user_id: new.user_id,
        summary: new.summary.clone(),
        mood: new.mood,
        energy_level: new.energy_level,
        complexity: new.complexity,
        satisfaction: new.satisfaction,
        sentiment_score: None,
        created_at: now,
        updated_at: now,
        deleted_at: None,
    })
}

/// Point lookup by id (soft-deleted rows are invisible)
pub async fn get_entry(pool: &SqlitePool, id: Uuid) -> Result<Option<MoodEntry>> {
    let row = sqlx::query(&format!(
        "SELECT {} FROM entries WHERE guid = ? AND deleted_at IS NULL",
        ENTRY_COLUMNS
    ))
    .bind(id.to_string())
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(map_row).transpose()
}

/// Single-field score write for the enrichment pipeline
///
/// Returns false when no row matched the id.
pub async fn update_sentiment_score(pool: &SqlitePool, id: Uuid, score: f64) -> Result<bool> {
    let result = sqlx::query(
        "UPDATE entries SET sentiment_score = ?, updated_at = ? WHERE guid = ? AND deleted_at IS NULL",
    )
    .bind(score)
    .bind(fmt_timestamp(Utc::now()))
    .bind(id.to_string())
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Soft-delete an entry; returns false when already deleted or unknown
pub async fn soft_delete_entry(pool: &SqlitePool, id: Uuid) -> Result<bool> {
    let now = fmt_timestamp(Utc::now());
    let result = sqlx::query(
        "UPDATE entries SET deleted_at = ?, updated_at = ? WHERE guid = ? AND deleted_at IS NULL",
    )
    .bind(&now)
    .bind(&now)
    .bind(id.to_string())
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// One user's entries inside `[start, end)`, oldest first
pub async fn query_by_user(
    pool: &SqlitePool,
    user_id: i64,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<Vec<MoodEntry>> {
    let rows = sqlx::query(&format!(
        "SELECT {} FROM entries \
         WHERE user_id = ? AND created_at >= ? AND created_at < ? AND deleted_at IS NULL \
         ORDER BY created_at ASC",
        ENTRY_COLUMNS
    ))
    .bind(user_id)
    .bind(fmt_timestamp(start))
    .bind(fmt_timestamp(end))
    .fetch_all(pool)
    .await?;

    rows.iter().map(map_row).collect()
}

/// All users' entries inside `[start, end)`, oldest first
pub async fn query_all(
    pool: &SqlitePool,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<Vec<MoodEntry>> {
    let rows = sqlx::query(&format!(
        "SELECT {} FROM entries \
         WHERE created_at >= ? AND created_at < ? AND deleted_at IS NULL \
         ORDER BY created_at ASC",
        ENTRY_COLUMNS
    ))
    .bind(fmt_timestamp(start))
    .bind(fmt_timestamp(end))
    .fetch_all(pool)
    .await?;

    rows.iter().map(map_row).collect()
}

/// Paged listing of a user's entries, newest first
pub async fn list_by_user(
    pool: &SqlitePool,
    user_id: i64,
    limit: i64,
    offset: i64,
) -> Result<Vec<MoodEntry>> {
    let rows = sqlx::query(&format!(
        "SELECT {} FROM entries \
         WHERE user_id = ? AND deleted_at IS NULL \
         ORDER BY created_at DESC LIMIT ? OFFSET ?",
        ENTRY_COLUMNS
    ))
    .bind(user_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    rows.iter().map(map_row).collect()
}

/// Paged listing across all users, newest first
pub async fn list_all(pool: &SqlitePool, limit: i64, offset: i64) -> Result<Vec<MoodEntry>> {
    let rows = sqlx::query(&format!(
        "SELECT {} FROM entries \
         WHERE deleted_at IS NULL \
         ORDER BY created_at DESC LIMIT ? OFFSET ?",
        ENTRY_COLUMNS
    ))
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    rows.iter().map(map_row).collect()
}
