//! Analytics endpoints
//!
//! Handlers derive the requested window from the current time, fetch the
//! matching snapshot from the store, and delegate to the pure rollup
//! functions in `crate::analytics`. Enrichment status never matters here;
//! a reader may observe an entry before or after its score lands.

use crate::analytics::{charts, summary};
use crate::{db, ApiError, ApiResult, AppState};
use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use moodlog_common::time::week_start;
use serde::Deserialize;

/// Trailing summary window in days
const SUMMARY_WINDOW_DAYS: u32 = 30;

fn default_weeks() -> i64 {
    4
}

fn default_days() -> i64 {
    30
}

fn day_start_utc(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
}

#[derive(Debug, Deserialize)]
pub struct MoodWeeklyQuery {
    pub user_id: i64,
    #[serde(default = "default_weeks")]
    pub weeks: i64,
}

#[derive(Debug, Deserialize)]
pub struct HeatmapQuery {
    pub user_id: i64,
    pub year: Option<i32>,
    pub month: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct UserDaysQuery {
    pub user_id: i64,
    #[serde(default = "default_days")]
    pub days: i64,
}

#[derive(Debug, Deserialize)]
pub struct UserQuery {
    pub user_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct DaysQuery {
    #[serde(default = "default_days")]
    pub days: i64,
}

/// GET /analytics/mood-weekly?user_id=&weeks=
pub async fn mood_weekly(
    State(state): State<AppState>,
    Query(params): Query<MoodWeeklyQuery>,
) -> ApiResult<Json<charts::WeeklyMoodHistogram>> {
    if !(1..=12).contains(&params.weeks) {
        return Err(ApiError::BadRequest(
            "weeks must be between 1 and 12".to_string(),
        ));
    }

    let end = Utc::now();
    let start = end - Duration::weeks(params.weeks);
    let entries = db::entries::query_by_user(&state.db, params.user_id, start, end).await?;

    Ok(Json(charts::weekly_mood_histogram(
        &entries,
        start.date_naive(),
        end.date_naive(),
    )))
}

/// GET /analytics/energy-heatmap?user_id=&year=&month=
pub async fn energy_heatmap(
    State(state): State<AppState>,
    Query(params): Query<HeatmapQuery>,
) -> ApiResult<Json<charts::EnergyHeatmap>> {
    let now = Utc::now();
    let year = params.year.unwrap_or_else(|| now.year());
    let month = params.month.unwrap_or_else(|| now.month());

    let (first, next) = moodlog_common::time::month_bounds(year, month)
        .ok_or_else(|| ApiError::BadRequest("month must be between 1 and 12".to_string()))?;

    let entries = db::entries::query_by_user(
        &state.db,
        params.user_id,
        day_start_utc(first),
        day_start_utc(next),
    )
    .await?;

    let heatmap = charts::monthly_energy_heatmap(&entries, year, month)
        .ok_or_else(|| ApiError::BadRequest("month must be between 1 and 12".to_string()))?;

    Ok(Json(heatmap))
}

/// GET /analytics/complexity-satisfaction?user_id=&days=
pub async fn complexity_satisfaction(
    State(state): State<AppState>,
    Query(params): Query<UserDaysQuery>,
) -> ApiResult<Json<charts::ComplexitySatisfaction>> {
    if !(7..=365).contains(&params.days) {
        return Err(ApiError::BadRequest(
            "days must be between 7 and 365".to_string(),
        ));
    }

    let end = Utc::now();
    let start = end - Duration::days(params.days);
    let entries = db::entries::query_by_user(&state.db, params.user_id, start, end).await?;

    Ok(Json(charts::complexity_satisfaction(&entries)))
}

/// GET /analytics/energy-satisfaction?user_id=&days=
pub async fn energy_satisfaction(
    State(state): State<AppState>,
    Query(params): Query<UserDaysQuery>,
) -> ApiResult<Json<charts::EnergySatisfactionScatter>> {
    if !(7..=365).contains(&params.days) {
        return Err(ApiError::BadRequest(
            "days must be between 7 and 365".to_string(),
        ));
    }

    let end = Utc::now();
    let start = end - Duration::days(params.days);
    let entries = db::entries::query_by_user(&state.db, params.user_id, start, end).await?;

    Ok(Json(charts::energy_satisfaction_scatter(&entries)))
}

/// GET /analytics/summary?user_id=
pub async fn dashboard_summary(
    State(state): State<AppState>,
    Query(params): Query<UserQuery>,
) -> ApiResult<Json<summary::DashboardSummary>> {
    let end = Utc::now();
    let start = end - Duration::days(SUMMARY_WINDOW_DAYS as i64);
    let entries = db::entries::query_by_user(&state.db, params.user_id, start, end).await?;

    Ok(Json(summary::dashboard_summary(
        &entries,
        SUMMARY_WINDOW_DAYS,
    )))
}

/// GET /analytics/org/mood-distribution?days=
pub async fn org_mood_distribution(
    State(state): State<AppState>,
    Query(params): Query<DaysQuery>,
) -> ApiResult<Json<charts::MoodDistribution>> {
    if !(1..=365).contains(&params.days) {
        return Err(ApiError::BadRequest(
            "days must be between 1 and 365".to_string(),
        ));
    }

    let end = Utc::now();
    let start = end - Duration::days(params.days);
    let entries = db::entries::query_all(&state.db, start, end).await?;

    Ok(Json(charts::org_mood_distribution(&entries)))
}

/// GET /analytics/org/energy-trend?days=
pub async fn org_energy_trend(
    State(state): State<AppState>,
    Query(params): Query<DaysQuery>,
) -> ApiResult<Json<charts::DailyEnergyTrend>> {
    if !(1..=365).contains(&params.days) {
        return Err(ApiError::BadRequest(
            "days must be between 1 and 365".to_string(),
        ));
    }

    let end = Utc::now();
    let start = end - Duration::days(params.days);
    let entries = db::entries::query_all(&state.db, start, end).await?;

    Ok(Json(charts::daily_energy_trend(&entries)))
}

/// GET /analytics/org/satisfaction-weekly
///
/// Covers the week anchored at the most recent Monday 00:00 UTC.
pub async fn org_satisfaction_weekly(
    State(state): State<AppState>,
) -> ApiResult<Json<charts::WeekdaySatisfaction>> {
    let start_of_week = week_start(Utc::now().date_naive());
    let start = day_start_utc(start_of_week);
    let end = start + Duration::days(7);

    let entries = db::entries::query_all(&state.db, start, end).await?;

    Ok(Json(charts::weekday_satisfaction(&entries, start_of_week)))
}

/// GET /analytics/org/summary
pub async fn org_summary(State(state): State<AppState>) -> ApiResult<Json<summary::OrgSummary>> {
    let end = Utc::now();
    let start = end - Duration::days(SUMMARY_WINDOW_DAYS as i64);
    let entries = db::entries::query_all(&state.db, start, end).await?;

    Ok(Json(summary::org_summary(&entries, SUMMARY_WINDOW_DAYS)))
}

/// Build analytics routes
pub fn analytics_routes() -> Router<AppState> {
    Router::new()
        .route("/analytics/mood-weekly", get(mood_weekly))
        .route("/analytics/energy-heatmap", get(energy_heatmap))
        .route(
            "/analytics/complexity-satisfaction",
            get(complexity_satisfaction),
        )
        .route("/analytics/energy-satisfaction", get(energy_satisfaction))
        .route("/analytics/summary", get(dashboard_summary))
        .route(
            "/analytics/org/mood-distribution",
            get(org_mood_distribution),
        )
        .route("/analytics/org/energy-trend", get(org_energy_trend))
        .route(
            "/analytics/org/satisfaction-weekly",
            get(org_satisfaction_weekly),
        )
        .route("/analytics/org/summary", get(org_summary))
}
