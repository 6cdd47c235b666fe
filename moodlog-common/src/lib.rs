//! # moodlog Common Library
//!
//! Shared code for the moodlog service:
//! - Domain model (mood entries, category enums, enrichment requests)
//! - Common error types
//! - Configuration loading and data folder resolution
//! - Calendar utilities used by the aggregation rollups
//! - Database pool initialization and schema

pub mod config;
pub mod db;
pub mod error;
pub mod model;
pub mod time;

pub use error::{Error, Result};
