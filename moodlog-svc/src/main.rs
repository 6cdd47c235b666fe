//! moodlog-svc - Mood journal service
//!
//! Stores mood entries, enriches them asynchronously with an inference
//! sentiment score, and serves time-bucketed analytics over HTTP.

use anyhow::Result;
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use moodlog_svc::services::sentiment::SentimentClient;
use moodlog_svc::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting moodlog-svc");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    // Load file config, then resolve the data folder and database path
    let toml_config = match moodlog_common::config::config_file_path() {
        Some(path) => moodlog_common::config::load_toml_config(&path)?,
        None => Default::default(),
    };

    let data_dir = moodlog_common::config::resolve_data_dir(&toml_config);
    let db_path = moodlog_common::config::database_path(&data_dir);
    info!("Database: {}", db_path.display());

    let db_pool = moodlog_common::db::init_database_pool(&db_path).await?;
    info!("Database connection established");

    // Sentiment client; without an API key the service still runs and
    // entries simply stay unscored
    let api_key = moodlog_svc::config::resolve_sentiment_api_key(&toml_config);
    let sentiment = Arc::new(SentimentClient::new(api_key)?);

    let state = AppState::new(db_pool, sentiment);
    let app = moodlog_svc::build_router(state);

    let addr = moodlog_svc::config::resolve_listen_addr(&toml_config);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
