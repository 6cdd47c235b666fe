//! Dashboard summary builders
//!
//! Descriptive statistics over a filtered entry set. An empty window
//! produces a well-formed zero-valued summary with placeholder category
//! labels rather than an error.

use super::round1;
use moodlog_common::model::{Complexity, Mood, MoodEntry};
use serde::Serialize;
use std::collections::HashSet;

/// Placeholder label when a window holds no entries
pub const NO_DATA_LABEL: &str = "N/A";

/// Per-user dashboard summary
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
    pub total_entries: usize,
    pub avg_energy: f64,
    pub avg_satisfaction: f64,
    pub most_common_mood: String,
    pub most_common_complexity: String,
    pub period: String,
}

/// Organization-wide dashboard summary
#[derive(Debug, Clone, Serialize)]
pub struct OrgSummary {
    pub total_entries: usize,
    pub active_users: usize,
    pub avg_energy: f64,
    pub avg_satisfaction: f64,
    pub period: String,
}

/// Most frequent mood; ties resolve to the earlier category in `ALL`
fn modal_mood(counts: &[u64; 5]) -> Option<Mood> {
    let mut best: Option<(Mood, u64)> = None;
    for mood in Mood::ALL {
        let count = counts[mood.ordinal()];
        if count > 0 && best.map_or(true, |(_, best_count)| count > best_count) {
            best = Some((mood, count));
        }
    }
    best.map(|(mood, _)| mood)
}

/// Most frequent complexity; ties resolve to the earlier category in `ALL`
fn modal_complexity(counts: &[u64; 4]) -> Option<Complexity> {
    let mut best: Option<(Complexity, u64)> = None;
    for complexity in Complexity::ALL {
        let count = counts[complexity.ordinal()];
        if count > 0 && best.map_or(true, |(_, best_count)| count > best_count) {
            best = Some((complexity, count));
        }
    }
    best.map(|(complexity, _)| complexity)
}

/// Summarize one user's trailing window
pub fn dashboard_summary(entries: &[MoodEntry], days: u32) -> DashboardSummary {
    let period = format!("Last {} days", days);

    if entries.is_empty() {
        return DashboardSummary {
            total_entries: 0,
            avg_energy: 0.0,
            avg_satisfaction: 0.0,
            most_common_mood: NO_DATA_LABEL.to_string(),
            most_common_complexity: NO_DATA_LABEL.to_string(),
            period,
        };
    }

    let total = entries.len();
    let mut energy_sum = 0.0;
    let mut satisfaction_sum = 0.0;
    let mut mood_counts = [0u64; 5];
    let mut complexity_counts = [0u64; 4];

    for entry in entries {
        energy_sum += entry.energy_level as f64;
        satisfaction_sum += entry.satisfaction;
        mood_counts[entry.mood.ordinal()] += 1;
        complexity_counts[entry.complexity.ordinal()] += 1;
    }

    DashboardSummary {
        total_entries: total,
        avg_energy: round1(energy_sum / total as f64),
        avg_satisfaction: round1(satisfaction_sum / total as f64),
        most_common_mood: modal_mood(&mood_counts)
            .map(|m| m.as_str().to_string())
            .unwrap_or_else(|| NO_DATA_LABEL.to_string()),
        most_common_complexity: modal_complexity(&complexity_counts)
            .map(|c| c.as_str().to_string())
            .unwrap_or_else(|| NO_DATA_LABEL.to_string()),
        period,
    }
}

/// Summarize the whole organization's trailing window
pub fn org_summary(entries: &[MoodEntry], days: u32) -> OrgSummary {
    let period = format!("Last {} days", days);

    if entries.is_empty() {
        return OrgSummary {
            total_entries: 0,
            active_users: 0,
            avg_energy: 0.0,
            avg_satisfaction: 0.0,
            period,
        };
    }

    let total = entries.len();
    let users: HashSet<i64> = entries.iter().map(|e| e.user_id).collect();
    let energy_sum: f64 = entries.iter().map(|e| e.energy_level as f64).sum();
    let satisfaction_sum: f64 = entries.iter().map(|e| e.satisfaction).sum();

    OrgSummary {
        total_entries: total,
        active_users: users.len(),
        avg_energy: round1(energy_sum / total as f64),
        avg_satisfaction: round1(satisfaction_sum / total as f64),
        period,
    }
}
