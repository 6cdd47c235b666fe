//! moodlog-svc library interface
//!
//! Mood entry ingestion, asynchronous sentiment enrichment, and
//! deterministic analytics rollups over the entry store.

pub mod analytics;
pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod services;

pub use crate::error::{ApiError, ApiResult};

use crate::services::sentiment::SentimentClient;
use axum::Router;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Sentiment inference client (may be unconfigured)
    pub sentiment: Arc<SentimentClient>,
    /// Service startup timestamp for uptime reporting
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(db: SqlitePool, sentiment: Arc<SentimentClient>) -> Self {
        Self {
            db,
            sentiment,
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::entry_routes())
        .merge(api::analytics_routes())
        .merge(api::health_routes())
        .with_state(state)
}
