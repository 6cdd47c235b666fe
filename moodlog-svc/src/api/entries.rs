//! Entry ingestion and listing endpoints
//!
//! Creation persists the entry unscored and hands a field snapshot to the
//! enrichment pipeline on a spawned task; the response never waits for
//! the score.

use crate::services::enrichment::EnrichmentCoordinator;
use crate::{db, ApiError, ApiResult, AppState};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use moodlog_common::model::{EnrichmentRequest, MoodEntry, NewEntry};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

fn default_limit() -> i64 {
    100
}

/// Query parameters for listing one user's entries
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub user_id: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

/// Query parameters for the cross-user listing
#[derive(Debug, Deserialize)]
pub struct ListAllQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

/// Response payload for a delete
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub message: String,
}

/// POST /entries
///
/// Persists the entry with no sentiment score, then dispatches enrichment
/// fire-and-forget. Returns 201 with the stored (still unscored) entry.
pub async fn create_entry(
    State(state): State<AppState>,
    Json(payload): Json<NewEntry>,
) -> ApiResult<(StatusCode, Json<MoodEntry>)> {
    payload.validate().map_err(ApiError::Common)?;

    let entry = db::entries::create_entry(&state.db, &payload).await?;

    // Snapshot the fields now; the spawned task must not re-read the row
    let request = EnrichmentRequest::from_entry(&entry);
    let coordinator = EnrichmentCoordinator::new(state.db.clone(), state.sentiment.clone());
    let entry_id = entry.id;
    tokio::spawn(async move {
        coordinator.enrich(entry_id, request).await;
    });

    Ok((StatusCode::CREATED, Json(entry)))
}

/// GET /entries?user_id=&limit=&offset=
pub async fn list_entries(
    State(state): State<AppState>,
    Query(params): Query<ListQuery>,
) -> ApiResult<Json<Vec<MoodEntry>>> {
    let entries =
        db::entries::list_by_user(&state.db, params.user_id, params.limit, params.offset).await?;
    Ok(Json(entries))
}

/// GET /entries/all?limit=&offset=
pub async fn list_all_entries(
    State(state): State<AppState>,
    Query(params): Query<ListAllQuery>,
) -> ApiResult<Json<Vec<MoodEntry>>> {
    let entries = db::entries::list_all(&state.db, params.limit, params.offset).await?;
    Ok(Json(entries))
}

/// GET /entries/{id}
pub async fn get_entry(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<MoodEntry>> {
    let entry = db::entries::get_entry(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("entry {}", id)))?;
    Ok(Json(entry))
}

/// DELETE /entries/{id}
///
/// Soft delete; the row stays in the store but disappears from every read.
pub async fn delete_entry(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<DeleteResponse>> {
    let deleted = db::entries::soft_delete_entry(&state.db, id).await?;
    if !deleted {
        return Err(ApiError::NotFound(format!("entry {}", id)));
    }

    Ok(Json(DeleteResponse {
        success: true,
        message: "Entry deleted".to_string(),
    }))
}

/// Build entry routes
pub fn entry_routes() -> Router<AppState> {
    Router::new()
        .route("/entries", get(list_entries).post(create_entry))
        .route("/entries/all", get(list_all_entries))
        .route("/entries/:id", get(get_entry).delete(delete_entry))
}
