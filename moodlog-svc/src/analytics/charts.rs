//! Chart rollups over entry snapshots
//!
//! Every rollup takes the entries it should consider plus an explicit
//! window, so output depends only on its arguments. Buckets with no data
//! are zero-filled so chart axes stay stable across windows; the
//! organization-wide mood distribution is the one exception and omits
//! empty categories.

use super::round1;
use chrono::{Duration, NaiveDate};
use moodlog_common::model::{Complexity, Mood, MoodEntry, ENERGY_MAX, ENERGY_MIN};
use moodlog_common::time::{day_key, month_bounds, week_label, week_start, WEEKDAY_NAMES};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// One mood's weekly count series
#[derive(Debug, Clone, Serialize)]
pub struct MoodSeries {
    pub label: String,
    pub data: Vec<u64>,
    #[serde(rename = "backgroundColor")]
    pub background_color: String,
}

/// Weekly mood histogram: one label per calendar week, one series per mood
#[derive(Debug, Clone, Serialize)]
pub struct WeeklyMoodHistogram {
    pub labels: Vec<String>,
    pub datasets: Vec<MoodSeries>,
}

/// Mood counts per calendar week
///
/// Weeks run Monday..Sunday. Every week intersecting
/// `[window_start, window_end]` appears, and every series carries all five
/// moods, so the chart shape never depends on which buckets have data.
pub fn weekly_mood_histogram(
    entries: &[MoodEntry],
    window_start: NaiveDate,
    window_end: NaiveDate,
) -> WeeklyMoodHistogram {
    let mut labels = Vec::new();
    let mut week_index: HashMap<NaiveDate, usize> = HashMap::new();

    let mut week = week_start(window_start);
    while week <= window_end {
        week_index.insert(week, labels.len());
        labels.push(week_label(week));
        week = week + Duration::days(7);
    }

    // counts[mood][week]
    let mut counts = vec![vec![0u64; labels.len()]; Mood::ALL.len()];
    for entry in entries {
        let bucket = week_start(entry.created_at.date_naive());
        if let Some(&idx) = week_index.get(&bucket) {
            counts[entry.mood.ordinal()][idx] += 1;
        }
    }

    let datasets = Mood::ALL
        .iter()
        .map(|mood| MoodSeries {
            label: mood.display_label().to_string(),
            data: counts[mood.ordinal()].clone(),
            background_color: mood.chart_color().to_string(),
        })
        .collect();

    WeeklyMoodHistogram { labels, datasets }
}

/// One day cell of the monthly energy heatmap
///
/// `energy` 0 with `count` 0 means "no data" (0 sits below the valid 1-5
/// range); it is not the same as a day full of minimum-energy entries.
#[derive(Debug, Clone, Serialize)]
pub struct HeatmapDay {
    pub date: String,
    pub energy: f64,
    pub count: usize,
}

/// Monthly energy heatmap: one cell per calendar day
#[derive(Debug, Clone, Serialize)]
pub struct EnergyHeatmap {
    pub data: Vec<HeatmapDay>,
    pub month: String,
    pub max_energy: i64,
    pub min_energy: i64,
}

/// Mean energy per calendar day of a month
///
/// Returns None for an out-of-range month number.
pub fn monthly_energy_heatmap(
    entries: &[MoodEntry],
    year: i32,
    month: u32,
) -> Option<EnergyHeatmap> {
    let (first, next) = month_bounds(year, month)?;
    let day_count = (next - first).num_days() as usize;

    let mut sums = vec![0.0f64; day_count];
    let mut counts = vec![0usize; day_count];
    for entry in entries {
        let date = entry.created_at.date_naive();
        if date >= first && date < next {
            let idx = (date - first).num_days() as usize;
            sums[idx] += entry.energy_level as f64;
            counts[idx] += 1;
        }
    }

    let data = (0..day_count)
        .map(|idx| {
            let date = first + Duration::days(idx as i64);
            let energy = if counts[idx] > 0 {
                round1(sums[idx] / counts[idx] as f64)
            } else {
                0.0
            };
            HeatmapDay {
                date: day_key(date),
                energy,
                count: counts[idx],
            }
        })
        .collect();

    Some(EnergyHeatmap {
        data,
        month: first.format("%B %Y").to_string(),
        max_energy: ENERGY_MAX,
        min_energy: ENERGY_MIN,
    })
}

/// Mean satisfaction per complexity category
#[derive(Debug, Clone, Serialize)]
pub struct ComplexitySatisfaction {
    pub labels: Vec<String>,
    pub data: Vec<f64>,
}

/// Mean satisfaction per complexity, always all four categories in order
pub fn complexity_satisfaction(entries: &[MoodEntry]) -> ComplexitySatisfaction {
    let mut sums = [0.0f64; 4];
    let mut counts = [0usize; 4];
    for entry in entries {
        let idx = entry.complexity.ordinal();
        sums[idx] += entry.satisfaction;
        counts[idx] += 1;
    }

    let labels = Complexity::ALL
        .iter()
        .map(|c| c.as_str().to_string())
        .collect();
    let data = Complexity::ALL
        .iter()
        .map(|c| {
            let idx = c.ordinal();
            if counts[idx] > 0 {
                round1(sums[idx] / counts[idx] as f64)
            } else {
                0.0
            }
        })
        .collect();

    ComplexitySatisfaction { labels, data }
}

/// One scatter point pairing energy with satisfaction
#[derive(Debug, Clone, Serialize)]
pub struct ScatterPoint {
    pub x: i64,
    pub y: f64,
    pub date: String,
}

/// Energy vs. satisfaction scatter: one point per entry, store order
#[derive(Debug, Clone, Serialize)]
pub struct EnergySatisfactionScatter {
    pub data: Vec<ScatterPoint>,
}

pub fn energy_satisfaction_scatter(entries: &[MoodEntry]) -> EnergySatisfactionScatter {
    let data = entries
        .iter()
        .map(|entry| ScatterPoint {
            x: entry.energy_level,
            y: entry.satisfaction,
            date: day_key(entry.created_at.date_naive()),
        })
        .collect();

    EnergySatisfactionScatter { data }
}

/// Organization-wide mood distribution
///
/// Unlike the per-user histogram, categories with zero occurrences are
/// omitted; present categories keep enumeration order.
#[derive(Debug, Clone, Serialize)]
pub struct MoodDistribution {
    pub labels: Vec<String>,
    pub data: Vec<u64>,
    pub total_entries: u64,
}

pub fn org_mood_distribution(entries: &[MoodEntry]) -> MoodDistribution {
    let mut counts = [0u64; 5];
    for entry in entries {
        counts[entry.mood.ordinal()] += 1;
    }

    let mut labels = Vec::new();
    let mut data = Vec::new();
    for mood in Mood::ALL {
        let count = counts[mood.ordinal()];
        if count > 0 {
            labels.push(mood.as_str().to_string());
            data.push(count);
        }
    }

    MoodDistribution {
        labels,
        data,
        total_entries: counts.iter().sum(),
    }
}

/// Daily mean energy across all users
///
/// Only days that actually have entries appear, in ascending date order;
/// empty days are not synthesized.
#[derive(Debug, Clone, Serialize)]
pub struct DailyEnergyTrend {
    pub labels: Vec<String>,
    pub data: Vec<f64>,
}

pub fn daily_energy_trend(entries: &[MoodEntry]) -> DailyEnergyTrend {
    let mut days: BTreeMap<NaiveDate, (f64, usize)> = BTreeMap::new();
    for entry in entries {
        let bucket = days.entry(entry.created_at.date_naive()).or_insert((0.0, 0));
        bucket.0 += entry.energy_level as f64;
        bucket.1 += 1;
    }

    let mut labels = Vec::with_capacity(days.len());
    let mut data = Vec::with_capacity(days.len());
    for (date, (sum, count)) in days {
        labels.push(day_key(date));
        data.push(round1(sum / count as f64));
    }

    DailyEnergyTrend { labels, data }
}

/// Mean satisfaction per weekday for one Monday-anchored week
#[derive(Debug, Clone, Serialize)]
pub struct WeekdaySatisfaction {
    pub labels: Vec<String>,
    pub data: Vec<f64>,
    pub week_range: String,
}

/// Satisfaction by day of week for the week starting at `start_of_week`
///
/// `start_of_week` must be a Monday; entries outside
/// `[start_of_week, start_of_week + 7d)` are ignored. All seven weekday
/// buckets are always present.
pub fn weekday_satisfaction(entries: &[MoodEntry], start_of_week: NaiveDate) -> WeekdaySatisfaction {
    let end_of_week = start_of_week + Duration::days(7);

    let mut sums = [0.0f64; 7];
    let mut counts = [0usize; 7];
    for entry in entries {
        let date = entry.created_at.date_naive();
        if date >= start_of_week && date < end_of_week {
            let idx = (date - start_of_week).num_days() as usize;
            sums[idx] += entry.satisfaction;
            counts[idx] += 1;
        }
    }

    let data = (0..7)
        .map(|idx| {
            if counts[idx] > 0 {
                round1(sums[idx] / counts[idx] as f64)
            } else {
                0.0
            }
        })
        .collect();

    WeekdaySatisfaction {
        labels: WEEKDAY_NAMES.iter().map(|d| d.to_string()).collect(),
        data,
        week_range: format!(
            "{} - {}",
            start_of_week.format("%b %d"),
            (end_of_week - Duration::days(1)).format("%b %d, %Y")
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn entry_on(
        date: NaiveDate,
        user_id: i64,
        mood: Mood,
        energy: i64,
        complexity: Complexity,
        satisfaction: f64,
    ) -> MoodEntry {
        let at = Utc
            .from_utc_datetime(&date.and_hms_opt(12, 0, 0).unwrap());
        MoodEntry {
            id: Uuid::new_v4(),
            user_id,
            summary: "test entry".to_string(),
            mood,
            energy_level: energy,
            complexity,
            satisfaction,
            sentiment_score: None,
            created_at: at,
            updated_at: at,
            deleted_at: None,
        }
    }

    #[test]
    fn test_weekly_histogram_reports_all_five_moods() {
        // Entries only for two of five moods
        let entries = vec![
            entry_on(d(2026, 1, 6), 1, Mood::Happy, 3, Complexity::Easy, 7.0),
            entry_on(d(2026, 1, 7), 1, Mood::Sad, 2, Complexity::Easy, 3.0),
        ];
        let chart = weekly_mood_histogram(&entries, d(2026, 1, 5), d(2026, 1, 11));

        assert_eq!(chart.datasets.len(), 5);
        let labels: Vec<&str> = chart.datasets.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["Sad", "Angry", "Happy", "Good", "Excited"]);

        // Missing moods zero-filled
        assert_eq!(chart.datasets[1].data, vec![0]); // Angry
        assert_eq!(chart.datasets[2].data, vec![1]); // Happy
        assert_eq!(chart.datasets[0].data, vec![1]); // Sad
    }

    #[test]
    fn test_weekly_histogram_zero_fills_empty_weeks() {
        // Four-week window, data only in the first week
        let entries = vec![entry_on(
            d(2026, 1, 6),
            1,
            Mood::Good,
            3,
            Complexity::Easy,
            7.0,
        )];
        let chart = weekly_mood_histogram(&entries, d(2026, 1, 5), d(2026, 2, 1));

        assert_eq!(chart.labels.len(), 4);
        assert_eq!(chart.labels[0], "Jan 05 - Jan 11");
        assert_eq!(chart.datasets[3].data, vec![1, 0, 0, 0]); // Good
    }

    #[test]
    fn test_weekly_histogram_buckets_by_monday_week() {
        // Sunday and following Monday land in different weeks
        let entries = vec![
            entry_on(d(2026, 1, 11), 1, Mood::Good, 3, Complexity::Easy, 7.0),
            entry_on(d(2026, 1, 12), 1, Mood::Good, 3, Complexity::Easy, 7.0),
        ];
        let chart = weekly_mood_histogram(&entries, d(2026, 1, 5), d(2026, 1, 18));

        assert_eq!(chart.datasets[3].data, vec![1, 1]);
    }

    #[test]
    fn test_weekly_histogram_ignores_entries_outside_window() {
        let entries = vec![entry_on(
            d(2025, 12, 1),
            1,
            Mood::Good,
            3,
            Complexity::Easy,
            7.0,
        )];
        let chart = weekly_mood_histogram(&entries, d(2026, 1, 5), d(2026, 1, 11));

        assert!(chart.datasets.iter().all(|s| s.data.iter().all(|&c| c == 0)));
    }

    #[test]
    fn test_february_heatmap_with_data_on_day_one() {
        let entries = vec![
            entry_on(d(2026, 2, 1), 1, Mood::Good, 2, Complexity::Easy, 7.0),
            entry_on(d(2026, 2, 1), 1, Mood::Good, 4, Complexity::Easy, 7.0),
        ];
        let heatmap = monthly_energy_heatmap(&entries, 2026, 2).unwrap();

        assert_eq!(heatmap.data.len(), 28);
        assert_eq!(heatmap.data[0].date, "2026-02-01");
        assert_eq!(heatmap.data[0].energy, 3.0);
        assert_eq!(heatmap.data[0].count, 2);

        for day in &heatmap.data[1..] {
            assert_eq!(day.energy, 0.0);
            assert_eq!(day.count, 0);
        }

        assert_eq!(heatmap.month, "February 2026");
        assert_eq!(heatmap.max_energy, 5);
        assert_eq!(heatmap.min_energy, 1);
    }

    #[test]
    fn test_heatmap_mean_rounds_at_presentation() {
        // 1 + 2 + 2 = 5 over 3 entries -> 1.666... -> 1.7
        let entries = vec![
            entry_on(d(2026, 3, 10), 1, Mood::Good, 1, Complexity::Easy, 5.0),
            entry_on(d(2026, 3, 10), 1, Mood::Good, 2, Complexity::Easy, 5.0),
            entry_on(d(2026, 3, 10), 1, Mood::Good, 2, Complexity::Easy, 5.0),
        ];
        let heatmap = monthly_energy_heatmap(&entries, 2026, 3).unwrap();
        assert_eq!(heatmap.data[9].energy, 1.7);
    }

    #[test]
    fn test_heatmap_rejects_invalid_month() {
        assert!(monthly_energy_heatmap(&[], 2026, 13).is_none());
    }

    #[test]
    fn test_complexity_rollup_always_has_four_ordered_labels() {
        let chart = complexity_satisfaction(&[]);
        assert_eq!(chart.labels, vec!["easy", "medium", "hard", "very_hard"]);
        assert_eq!(chart.data, vec![0.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_complexity_rollup_means() {
        let entries = vec![
            entry_on(d(2026, 1, 6), 1, Mood::Good, 3, Complexity::Hard, 6.0),
            entry_on(d(2026, 1, 7), 1, Mood::Good, 3, Complexity::Hard, 7.0),
            entry_on(d(2026, 1, 8), 1, Mood::Good, 3, Complexity::Easy, 9.0),
        ];
        let chart = complexity_satisfaction(&entries);
        assert_eq!(chart.data, vec![9.0, 0.0, 6.5, 0.0]);
    }

    #[test]
    fn test_scatter_preserves_store_order() {
        let entries = vec![
            entry_on(d(2026, 1, 8), 1, Mood::Good, 4, Complexity::Easy, 9.0),
            entry_on(d(2026, 1, 6), 1, Mood::Good, 2, Complexity::Easy, 3.5),
        ];
        let chart = energy_satisfaction_scatter(&entries);

        assert_eq!(chart.data.len(), 2);
        assert_eq!(chart.data[0].x, 4);
        assert_eq!(chart.data[0].y, 9.0);
        assert_eq!(chart.data[0].date, "2026-01-08");
        assert_eq!(chart.data[1].x, 2);
    }

    #[test]
    fn test_org_distribution_omits_empty_categories() {
        let entries = vec![
            entry_on(d(2026, 1, 6), 1, Mood::Happy, 3, Complexity::Easy, 7.0),
            entry_on(d(2026, 1, 6), 2, Mood::Happy, 3, Complexity::Easy, 7.0),
            entry_on(d(2026, 1, 7), 3, Mood::Excited, 5, Complexity::Easy, 9.0),
        ];
        let chart = org_mood_distribution(&entries);

        assert_eq!(chart.labels, vec!["happy", "excited"]);
        assert_eq!(chart.data, vec![2, 1]);
        assert_eq!(chart.total_entries, 3);
    }

    #[test]
    fn test_org_distribution_empty_input() {
        let chart = org_mood_distribution(&[]);
        assert!(chart.labels.is_empty());
        assert_eq!(chart.total_entries, 0);
    }

    #[test]
    fn test_daily_trend_skips_empty_days() {
        let entries = vec![
            entry_on(d(2026, 1, 6), 1, Mood::Good, 2, Complexity::Easy, 7.0),
            entry_on(d(2026, 1, 6), 2, Mood::Good, 4, Complexity::Easy, 7.0),
            entry_on(d(2026, 1, 9), 1, Mood::Good, 5, Complexity::Easy, 7.0),
        ];
        let trend = daily_energy_trend(&entries);

        // Jan 7 and 8 are not synthesized
        assert_eq!(trend.labels, vec!["2026-01-06", "2026-01-09"]);
        assert_eq!(trend.data, vec![3.0, 5.0]);
    }

    #[test]
    fn test_weekday_satisfaction_wednesday_only() {
        // 2026-08-03 is a Monday; the 5th is Wednesday
        let entries = vec![
            entry_on(d(2026, 8, 5), 1, Mood::Good, 3, Complexity::Easy, 5.0),
            entry_on(d(2026, 8, 5), 2, Mood::Good, 3, Complexity::Easy, 7.0),
        ];
        let chart = weekday_satisfaction(&entries, d(2026, 8, 3));

        assert_eq!(
            chart.labels,
            vec![
                "Monday",
                "Tuesday",
                "Wednesday",
                "Thursday",
                "Friday",
                "Saturday",
                "Sunday"
            ]
        );
        assert_eq!(chart.data, vec![0.0, 0.0, 6.0, 0.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_weekday_satisfaction_ignores_other_weeks() {
        let entries = vec![
            // Previous Wednesday
            entry_on(d(2026, 7, 29), 1, Mood::Good, 3, Complexity::Easy, 2.0),
            // Following Monday (exclusive bound)
            entry_on(d(2026, 8, 10), 1, Mood::Good, 3, Complexity::Easy, 2.0),
        ];
        let chart = weekday_satisfaction(&entries, d(2026, 8, 3));
        assert!(chart.data.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_weekday_satisfaction_week_range_label() {
        let chart = weekday_satisfaction(&[], d(2026, 8, 3));
        assert_eq!(chart.week_range, "Aug 03 - Aug 09, 2026");
    }
}
