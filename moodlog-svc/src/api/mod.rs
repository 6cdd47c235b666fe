//! HTTP API for moodlog-svc

pub mod analytics;
pub mod entries;
pub mod health;

pub use analytics::analytics_routes;
pub use entries::entry_routes;
pub use health::health_routes;
