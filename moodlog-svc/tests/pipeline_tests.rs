//! Enrichment pipeline integration tests
//!
//! Drives the coordinator against a real (in-memory) store with stub
//! providers, then checks that aggregation sees entries independently of
//! their enrichment state.

use async_trait::async_trait;
use moodlog_common::model::{Complexity, EnrichmentRequest, Mood, NewEntry};
use moodlog_svc::analytics::{charts, summary};
use moodlog_svc::db::entries;
use moodlog_svc::services::enrichment::EnrichmentCoordinator;
use moodlog_svc::services::sentiment::{SentimentError, SentimentProvider};
use sqlx::SqlitePool;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Provider that always answers with the same score
struct FixedProvider {
    score: f64,
}

#[async_trait]
impl SentimentProvider for FixedProvider {
    fn is_available(&self) -> bool {
        true
    }

    async fn score(&self, _request: &EnrichmentRequest) -> Result<f64, SentimentError> {
        Ok(self.score)
    }
}

/// Provider that answers from a canned response queue
struct ScriptedProvider {
    responses: Mutex<VecDeque<Result<f64, SentimentError>>>,
}

impl ScriptedProvider {
    fn new(responses: Vec<Result<f64, SentimentError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
        }
    }
}

#[async_trait]
impl SentimentProvider for ScriptedProvider {
    fn is_available(&self) -> bool {
        true
    }

    async fn score(&self, _request: &EnrichmentRequest) -> Result<f64, SentimentError> {
        self.responses
            .lock()
            .await
            .pop_front()
            .expect("scripted provider exhausted")
    }
}

async fn test_pool() -> SqlitePool {
    let pool = SqlitePool::connect("sqlite::memory:")
        .await
        .expect("Failed to create in-memory database");
    moodlog_common::db::schema::initialize_schema(&pool)
        .await
        .expect("Schema initialization failed");
    pool
}

fn new_entry(user_id: i64, mood: Mood) -> NewEntry {
    NewEntry {
        user_id,
        summary: "Pipeline test entry".to_string(),
        mood,
        energy_level: 3,
        complexity: Complexity::Medium,
        satisfaction: 7.0,
    }
}

#[tokio::test]
async fn test_created_entries_become_scored_after_enrichment() {
    let pool = test_pool().await;
    let provider = Arc::new(FixedProvider { score: 75.0 });
    let coordinator = EnrichmentCoordinator::new(pool.clone(), provider);

    for user_id in 1..=3 {
        let entry = entries::create_entry(&pool, &new_entry(user_id, Mood::Good))
            .await
            .unwrap();
        assert!(entry.sentiment_score.is_none());

        coordinator
            .enrich(entry.id, EnrichmentRequest::from_entry(&entry))
            .await;

        let scored = entries::get_entry(&pool, entry.id).await.unwrap().unwrap();
        assert_eq!(scored.sentiment_score, Some(75.0));
    }
}

#[tokio::test]
async fn test_concurrent_enrichments_for_different_entries() {
    let pool = test_pool().await;
    let provider = Arc::new(FixedProvider { score: 55.0 });
    let coordinator = EnrichmentCoordinator::new(pool.clone(), provider);

    let first = entries::create_entry(&pool, &new_entry(1, Mood::Happy))
        .await
        .unwrap();
    let second = entries::create_entry(&pool, &new_entry(2, Mood::Sad))
        .await
        .unwrap();

    tokio::join!(
        coordinator.enrich(first.id, EnrichmentRequest::from_entry(&first)),
        coordinator.enrich(second.id, EnrichmentRequest::from_entry(&second)),
    );

    for id in [first.id, second.id] {
        let entry = entries::get_entry(&pool, id).await.unwrap().unwrap();
        assert_eq!(entry.sentiment_score, Some(55.0));
    }
}

#[tokio::test]
async fn test_batch_yields_ordered_successes_and_visible_failure() {
    let pool = test_pool().await;

    let mut ids = Vec::new();
    for user_id in 1..=4 {
        let entry = entries::create_entry(&pool, &new_entry(user_id, Mood::Good))
            .await
            .unwrap();
        ids.push((entry.id, EnrichmentRequest::from_entry(&entry)));
    }

    // Third item fails at the provider
    let provider = Arc::new(ScriptedProvider::new(vec![
        Ok(10.0),
        Ok(20.0),
        Err(SentimentError::Network("timeout".to_string())),
        Ok(40.0),
    ]));
    let coordinator = EnrichmentCoordinator::new(pool.clone(), provider);

    let outcomes = coordinator.enrich_batch(ids.clone()).await;

    assert_eq!(outcomes.len(), 4);

    let successes: Vec<f64> = outcomes.iter().filter_map(|o| o.score()).collect();
    assert_eq!(successes, vec![10.0, 20.0, 40.0]);
    assert!(outcomes[2].result.is_err());
    assert_eq!(outcomes[2].entry_id, ids[2].0);

    // The failed entry stays pending in the store
    let failed = entries::get_entry(&pool, ids[2].0).await.unwrap().unwrap();
    assert!(failed.sentiment_score.is_none());
}

#[tokio::test]
async fn test_aggregation_sees_entries_regardless_of_enrichment_state() {
    let pool = test_pool().await;
    let provider = Arc::new(FixedProvider { score: 80.0 });
    let coordinator = EnrichmentCoordinator::new(pool.clone(), provider);

    let scored = entries::create_entry(&pool, &new_entry(1, Mood::Happy))
        .await
        .unwrap();
    let pending = entries::create_entry(&pool, &new_entry(2, Mood::Sad))
        .await
        .unwrap();

    // Only one of the two gets enriched
    coordinator
        .enrich(scored.id, EnrichmentRequest::from_entry(&scored))
        .await;

    let window_start = scored.created_at - chrono::Duration::days(1);
    let window_end = pending.created_at + chrono::Duration::days(1);
    let snapshot = entries::query_all(&pool, window_start, window_end)
        .await
        .unwrap();

    assert_eq!(snapshot.len(), 2);

    let distribution = charts::org_mood_distribution(&snapshot);
    assert_eq!(distribution.total_entries, 2);

    let org = summary::org_summary(&snapshot, 30);
    assert_eq!(org.total_entries, 2);
    assert_eq!(org.active_users, 2);
}
