//! Enrichment pipeline
//!
//! Moves an entry from pending to scored: one provider call per dispatch,
//! score range validation, then a single field-level write. Every failure
//! is absorbed here and logged; nothing propagates back to the ingestion
//! path, which has already returned. An entry that fails enrichment stays
//! pending and is not retried automatically.

use crate::db;
use crate::services::sentiment::{SentimentError, SentimentProvider};
use moodlog_common::model::{EnrichmentRequest, SENTIMENT_MAX, SENTIMENT_MIN};
use sqlx::SqlitePool;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

/// Why a dispatch left its entry unscored
#[derive(Debug, Error)]
pub enum EnrichError {
    /// Provider reported unavailable; no inference call was made
    #[error("Sentiment provider unavailable")]
    ProviderUnavailable,

    /// The inference call itself failed
    #[error(transparent)]
    Provider(#[from] SentimentError),

    /// Provider returned a score outside [0, 100]; never clamped
    #[error("Score {0} outside valid range")]
    ScoreOutOfRange(f64),

    /// The entry was gone by the time the score write ran
    #[error("Entry not found for score update")]
    EntryNotFound,

    /// The score write itself failed (inference result is lost)
    #[error("Store error: {0}")]
    Store(#[from] moodlog_common::Error),
}

/// Per-item result of a batch run
///
/// Failed items are reported, not dropped; callers that only need the
/// successful scores can filter on `score()`.
#[derive(Debug)]
pub struct BatchOutcome {
    pub entry_id: Uuid,
    pub result: Result<f64, EnrichError>,
}

impl BatchOutcome {
    /// The stored score, when this item succeeded
    pub fn score(&self) -> Option<f64> {
        self.result.as_ref().ok().copied()
    }
}

/// Drives the pending → scored transition for entries
///
/// Holds its own pool handle and provider; construct one per dispatch
/// site (both are cheap clones).
pub struct EnrichmentCoordinator<P> {
    db: SqlitePool,
    provider: Arc<P>,
}

impl<P: SentimentProvider> EnrichmentCoordinator<P> {
    pub fn new(db: SqlitePool, provider: Arc<P>) -> Self {
        Self { db, provider }
    }

    /// Fire-and-forget dispatch for one entry
    ///
    /// Never returns an error: the ingestion response has already been
    /// sent, so failures are logged and swallowed here.
    pub async fn enrich(&self, entry_id: Uuid, request: EnrichmentRequest) {
        tracing::info!(
            entry_id = %entry_id,
            user_id = request.user_id,
            "Dispatching sentiment enrichment"
        );

        match self.try_enrich(entry_id, &request).await {
            Ok(score) => {
                tracing::info!(entry_id = %entry_id, score = score, "Sentiment score stored");
            }
            Err(EnrichError::ProviderUnavailable) => {
                tracing::warn!(
                    entry_id = %entry_id,
                    "Sentiment provider unavailable; entry left unscored"
                );
            }
            Err(EnrichError::ScoreOutOfRange(score)) => {
                tracing::warn!(
                    entry_id = %entry_id,
                    score = score,
                    "Provider returned out-of-range score; entry left unscored"
                );
            }
            Err(EnrichError::EntryNotFound) => {
                tracing::error!(entry_id = %entry_id, "Entry not found for score update");
            }
            Err(err) => {
                tracing::error!(entry_id = %entry_id, error = %err, "Sentiment enrichment failed");
            }
        }
    }

    /// One dispatch: at most one inference call, at most one score write
    async fn try_enrich(
        &self,
        entry_id: Uuid,
        request: &EnrichmentRequest,
    ) -> Result<f64, EnrichError> {
        // Cheap exit before any provider traffic
        if !self.provider.is_available() {
            return Err(EnrichError::ProviderUnavailable);
        }

        let score = self.provider.score(request).await?;

        // Out-of-range scores are rejected, not clamped
        if !(SENTIMENT_MIN..=SENTIMENT_MAX).contains(&score) {
            return Err(EnrichError::ScoreOutOfRange(score));
        }

        let updated = db::entries::update_sentiment_score(&self.db, entry_id, score).await?;
        if !updated {
            return Err(EnrichError::EntryNotFound);
        }

        Ok(score)
    }

    /// Enrich a batch sequentially with per-item failure isolation
    ///
    /// Items run in input order; a failed item is recorded and the batch
    /// continues. The outcome sequence always has one element per input.
    pub async fn enrich_batch(
        &self,
        items: Vec<(Uuid, EnrichmentRequest)>,
    ) -> Vec<BatchOutcome> {
        let mut outcomes = Vec::with_capacity(items.len());

        for (entry_id, request) in items {
            let result = self.try_enrich(entry_id, &request).await;
            if let Err(err) = &result {
                tracing::warn!(
                    entry_id = %entry_id,
                    error = %err,
                    "Batch item failed; continuing"
                );
            }
            outcomes.push(BatchOutcome { entry_id, result });
        }

        outcomes
    }
}
