//! Sentiment inference client
//!
//! Scores a mood entry snapshot via a Gemini-style `generateContent`
//! endpoint. The client is constructed once with an optional API key;
//! without a key it reports itself unavailable and never issues a request.
//! Responses are constrained to a declared JSON shape built from a fixed
//! set of primitive field kinds.

use moodlog_common::model::EnrichmentRequest;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::Mutex;

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_MODEL: &str = "gemini-2.0-flash";
const USER_AGENT: &str = "moodlog/0.1.0";
const RATE_LIMIT_MS: u64 = 1000; // minimum gap between provider requests

const SYSTEM_PROMPT: &str = "You are an expert psychologist and sentiment analyst \
specializing in mood assessment.\n\
\n\
Analyze the submitted mood data and produce a sentiment rating out of 100.\n\
\n\
Rating scale:\n\
- 0-20: very negative (sad/angry mood, low energy, high complexity, low satisfaction)\n\
- 21-40: negative (mixed negative factors)\n\
- 41-60: neutral (balanced or conflicting factors)\n\
- 61-80: positive (generally positive factors)\n\
- 81-100: very positive (happy/excited mood, high energy, manageable complexity, high satisfaction)\n\
\n\
Weight satisfaction and mood most heavily (40% each); energy level contributes 15%; \
complexity contributes 5% with an inverse relationship. Use the summary to fine-tune \
the rating. Be precise and consistent.";

/// Sentiment client errors
#[derive(Debug, Error)]
pub enum SentimentError {
    /// No API key configured; no request was attempted
    #[error("Sentiment provider not configured")]
    NotConfigured,

    /// Transport-level failure
    #[error("Network error: {0}")]
    Network(String),

    /// Provider returned a non-success status
    #[error("API error {0}: {1}")]
    Api(u16, String),

    /// Response was missing or malformed
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Sentiment provider seam
///
/// The enrichment coordinator depends on this trait so tests can
/// substitute a stub for the live client.
#[async_trait::async_trait]
pub trait SentimentProvider: Send + Sync {
    /// Whether the provider can accept scoring requests at all
    fn is_available(&self) -> bool;

    /// Score one entry snapshot; exactly one provider call per invocation
    async fn score(&self, request: &EnrichmentRequest) -> Result<f64, SentimentError>;
}

/// Primitive kinds a response field may declare
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Number,
    Boolean,
    TextArray,
}

impl FieldKind {
    fn schema_value(self) -> Value {
        match self {
            FieldKind::Text => json!({"type": "STRING"}),
            FieldKind::Number => json!({"type": "NUMBER"}),
            FieldKind::Boolean => json!({"type": "BOOLEAN"}),
            FieldKind::TextArray => json!({"type": "ARRAY", "items": {"type": "STRING"}}),
        }
    }
}

/// One declared field of the expected response shape
#[derive(Debug, Clone, Copy)]
pub struct SchemaField {
    pub name: &'static str,
    pub kind: FieldKind,
}

/// Expected shape of a scoring response
const SCORE_RESPONSE_FIELDS: [SchemaField; 2] = [
    SchemaField {
        name: "user_id",
        kind: FieldKind::Number,
    },
    SchemaField {
        name: "sentiment_score",
        kind: FieldKind::Number,
    },
];

/// Build a provider response schema from declared fields
pub fn response_schema(fields: &[SchemaField]) -> Value {
    let mut properties = serde_json::Map::new();
    let mut required = Vec::new();
    for field in fields {
        properties.insert(field.name.to_string(), field.kind.schema_value());
        required.push(Value::String(field.name.to_string()));
    }
    json!({
        "type": "OBJECT",
        "properties": properties,
        "required": required,
    })
}

fn build_user_prompt(request: &EnrichmentRequest) -> String {
    format!(
        "Analyze the following mood entry and rate its sentiment:\n\
         \n\
         User ID: {}\n\
         Summary: \"{}\"\n\
         Mood: {}\n\
         Energy level: {}/5\n\
         Complexity: {}\n\
         Satisfaction: {}/10",
        request.user_id,
        request.summary,
        request.mood.as_str(),
        request.energy_level,
        request.complexity.as_str(),
        request.satisfaction,
    )
}

// Wire format of a generateContent response

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ContentPart>,
}

#[derive(Debug, Deserialize)]
struct ContentPart {
    text: String,
}

#[derive(Debug, Deserialize)]
struct SentimentPayload {
    sentiment_score: f64,
}

/// Parse the JSON text part of a scoring response
fn parse_score_payload(text: &str) -> Result<f64, SentimentError> {
    let payload: SentimentPayload = serde_json::from_str(text)
        .map_err(|e| SentimentError::InvalidResponse(format!("score payload: {}", e)))?;
    Ok(payload.sentiment_score)
}

fn extract_payload_text(response: GenerateContentResponse) -> Result<String, SentimentError> {
    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| SentimentError::InvalidResponse("no candidates".to_string()))?;
    let part = candidate
        .content
        .parts
        .into_iter()
        .next()
        .ok_or_else(|| SentimentError::InvalidResponse("no content parts".to_string()))?;
    Ok(part.text)
}

/// Single-flight rate limiter between provider requests
struct RateLimiter {
    last_request: Mutex<Option<Instant>>,
    min_interval: Duration,
}

impl RateLimiter {
    fn new(min_interval_ms: u64) -> Self {
        Self {
            last_request: Mutex::new(None),
            min_interval: Duration::from_millis(min_interval_ms),
        }
    }

    async fn wait(&self) {
        let mut last = self.last_request.lock().await;

        if let Some(last_time) = *last {
            let elapsed = last_time.elapsed();
            if elapsed < self.min_interval {
                let wait_time = self.min_interval - elapsed;
                tracing::debug!("Sentiment rate limiting: waiting {:?}", wait_time);
                tokio::time::sleep(wait_time).await;
            }
        }

        *last = Some(Instant::now());
    }
}

/// Sentiment inference API client
pub struct SentimentClient {
    http_client: reqwest::Client,
    rate_limiter: Arc<RateLimiter>,
    api_key: Option<String>,
    model: String,
    base_url: String,
}

impl SentimentClient {
    /// Create a client; `api_key = None` yields an unavailable client
    pub fn new(api_key: Option<String>) -> Result<Self, SentimentError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| SentimentError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            rate_limiter: Arc::new(RateLimiter::new(RATE_LIMIT_MS)),
            api_key,
            model: DEFAULT_MODEL.to_string(),
            base_url: GEMINI_BASE_URL.to_string(),
        })
    }

    /// Point the client at a different endpoint (local stubs, proxies)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Use a different provider model
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

#[async_trait::async_trait]
impl SentimentProvider for SentimentClient {
    fn is_available(&self) -> bool {
        self.api_key.is_some()
    }

    async fn score(&self, request: &EnrichmentRequest) -> Result<f64, SentimentError> {
        let api_key = self.api_key.as_ref().ok_or(SentimentError::NotConfigured)?;

        self.rate_limiter.wait().await;

        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.model, api_key
        );

        let body = json!({
            "systemInstruction": {"parts": [{"text": SYSTEM_PROMPT}]},
            "contents": [{"role": "user", "parts": [{"text": build_user_prompt(request)}]}],
            "generationConfig": {
                "temperature": 0.3,
                "responseMimeType": "application/json",
                "responseSchema": response_schema(&SCORE_RESPONSE_FIELDS),
            },
        });

        tracing::debug!(user_id = request.user_id, "Querying sentiment provider");

        let response = self
            .http_client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| SentimentError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(SentimentError::Api(status.as_u16(), error_text));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| SentimentError::InvalidResponse(e.to_string()))?;

        let score = parse_score_payload(&extract_payload_text(parsed)?)?;

        tracing::info!(
            user_id = request.user_id,
            score = score,
            "Sentiment score received"
        );

        Ok(score)
    }
}
