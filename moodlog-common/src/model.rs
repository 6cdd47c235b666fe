//! Mood entry domain model
//!
//! The `MoodEntry` record plus the fixed mood/complexity category
//! enumerations. Category order matters: rollups emit buckets in `ALL`
//! order and modal-category ties resolve to the earlier variant.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Valid sentiment score range (inclusive)
pub const SENTIMENT_MIN: f64 = 0.0;
pub const SENTIMENT_MAX: f64 = 100.0;

/// Valid energy level range (inclusive)
pub const ENERGY_MIN: i64 = 1;
pub const ENERGY_MAX: i64 = 5;

/// Valid satisfaction range (inclusive)
pub const SATISFACTION_MIN: f64 = 1.0;
pub const SATISFACTION_MAX: f64 = 10.0;

/// Maximum summary length in characters
pub const SUMMARY_MAX_CHARS: usize = 100;

/// Mood category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mood {
    Sad,
    Angry,
    Happy,
    Good,
    Excited,
}

impl Mood {
    /// All moods in canonical order
    pub const ALL: [Mood; 5] = [
        Mood::Sad,
        Mood::Angry,
        Mood::Happy,
        Mood::Good,
        Mood::Excited,
    ];

    /// Canonical lowercase name (matches stored value)
    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Sad => "sad",
            Mood::Angry => "angry",
            Mood::Happy => "happy",
            Mood::Good => "good",
            Mood::Excited => "excited",
        }
    }

    /// Parse from the stored lowercase name
    pub fn parse(value: &str) -> Option<Mood> {
        Mood::ALL.into_iter().find(|m| m.as_str() == value)
    }

    /// Position within `ALL` (bucket index for rollups)
    pub fn ordinal(&self) -> usize {
        match self {
            Mood::Sad => 0,
            Mood::Angry => 1,
            Mood::Happy => 2,
            Mood::Good => 3,
            Mood::Excited => 4,
        }
    }

    /// Title-case label for chart series
    pub fn display_label(&self) -> &'static str {
        match self {
            Mood::Sad => "Sad",
            Mood::Angry => "Angry",
            Mood::Happy => "Happy",
            Mood::Good => "Good",
            Mood::Excited => "Excited",
        }
    }

    /// Fixed series color for chart payloads
    pub fn chart_color(&self) -> &'static str {
        match self {
            Mood::Sad => "#FF6B6B",
            Mood::Angry => "#FF4757",
            Mood::Happy => "#2ED573",
            Mood::Good => "#5352ED",
            Mood::Excited => "#FFA502",
        }
    }
}

/// Situation complexity category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Complexity {
    Easy,
    Medium,
    Hard,
    VeryHard,
}

impl Complexity {
    /// All complexities in canonical order
    pub const ALL: [Complexity; 4] = [
        Complexity::Easy,
        Complexity::Medium,
        Complexity::Hard,
        Complexity::VeryHard,
    ];

    /// Canonical lowercase name (matches stored value)
    pub fn as_str(&self) -> &'static str {
        match self {
            Complexity::Easy => "easy",
            Complexity::Medium => "medium",
            Complexity::Hard => "hard",
            Complexity::VeryHard => "very_hard",
        }
    }

    /// Parse from the stored lowercase name
    pub fn parse(value: &str) -> Option<Complexity> {
        Complexity::ALL.into_iter().find(|c| c.as_str() == value)
    }

    /// Position within `ALL` (bucket index for rollups)
    pub fn ordinal(&self) -> usize {
        match self {
            Complexity::Easy => 0,
            Complexity::Medium => 1,
            Complexity::Hard => 2,
            Complexity::VeryHard => 3,
        }
    }
}

/// A stored mood entry
///
/// `sentiment_score` is absent until the enrichment pipeline fills it in;
/// once set it stays in [0, 100] and is never cleared.
#[derive(Debug, Clone, Serialize)]
pub struct MoodEntry {
    pub id: Uuid,
    pub user_id: i64,
    pub summary: String,
    pub mood: Mood,
    pub energy_level: i64,
    pub complexity: Complexity,
    pub satisfaction: f64,
    pub sentiment_score: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Fields required to create an entry
#[derive(Debug, Clone, Deserialize)]
pub struct NewEntry {
    pub user_id: i64,
    pub summary: String,
    pub mood: Mood,
    pub energy_level: i64,
    pub complexity: Complexity,
    pub satisfaction: f64,
}

impl NewEntry {
    /// Validate field ranges before insertion
    pub fn validate(&self) -> crate::Result<()> {
        if self.summary.trim().is_empty() {
            return Err(crate::Error::InvalidInput(
                "summary cannot be empty".to_string(),
            ));
        }
        if self.summary.chars().count() > SUMMARY_MAX_CHARS {
            return Err(crate::Error::InvalidInput(format!(
                "summary exceeds {} characters",
                SUMMARY_MAX_CHARS
            )));
        }
        if !(ENERGY_MIN..=ENERGY_MAX).contains(&self.energy_level) {
            return Err(crate::Error::InvalidInput(format!(
                "energy_level must be between {} and {}",
                ENERGY_MIN, ENERGY_MAX
            )));
        }
        if !(SATISFACTION_MIN..=SATISFACTION_MAX).contains(&self.satisfaction) {
            return Err(crate::Error::InvalidInput(format!(
                "satisfaction must be between {:.1} and {:.1}",
                SATISFACTION_MIN, SATISFACTION_MAX
            )));
        }
        Ok(())
    }
}

/// Snapshot of entry fields handed to the sentiment provider
///
/// Copied at dispatch time so enrichment reflects the entry as submitted,
/// never a later state.
#[derive(Debug, Clone, Serialize)]
pub struct EnrichmentRequest {
    pub user_id: i64,
    pub summary: String,
    pub mood: Mood,
    pub energy_level: i64,
    pub complexity: Complexity,
    pub satisfaction: f64,
}

impl EnrichmentRequest {
    /// Copy the scoring-relevant fields out of a stored entry
    pub fn from_entry(entry: &MoodEntry) -> Self {
        Self {
            user_id: entry.user_id,
            summary: entry.summary.clone(),
            mood: entry.mood,
            energy_level: entry.energy_level,
            complexity: entry.complexity,
            satisfaction: entry.satisfaction,
        }
    }
}
