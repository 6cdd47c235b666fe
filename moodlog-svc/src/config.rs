//! Configuration resolution for moodlog-svc
//!
//! Sentiment API key priority: environment variable, then TOML config.
//! A missing key is not fatal; the service runs with enrichment disabled
//! and every entry stays unscored.

use moodlog_common::config::TomlConfig;
use tracing::{info, warn};

/// Environment variable holding the sentiment API key
pub const API_KEY_ENV: &str = "MOODLOG_GEMINI_API_KEY";

/// Environment variable overriding the listen address
pub const LISTEN_ADDR_ENV: &str = "MOODLOG_LISTEN_ADDR";

/// Default HTTP listen address
pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:5870";

/// Validate an API key (non-empty, non-whitespace)
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}

/// Resolve the sentiment API key from ENV, then TOML
pub fn resolve_sentiment_api_key(toml_config: &TomlConfig) -> Option<String> {
    let env_key = std::env::var(API_KEY_ENV)
        .ok()
        .filter(|k| is_valid_key(k));
    let toml_key = toml_config
        .gemini_api_key
        .clone()
        .filter(|k| is_valid_key(k));

    if env_key.is_some() && toml_key.is_some() {
        warn!(
            "Sentiment API key found in both environment and TOML config. \
             Using environment (highest priority)."
        );
    }

    if let Some(key) = env_key {
        info!("Sentiment API key loaded from environment variable");
        return Some(key);
    }

    if let Some(key) = toml_key {
        info!("Sentiment API key loaded from TOML config");
        return Some(key);
    }

    warn!(
        "Sentiment API key not configured; entries will be stored unscored. \
         Set {} or gemini_api_key in the TOML config.",
        API_KEY_ENV
    );
    None
}

/// Resolve the listen address from ENV, then TOML, then the default
pub fn resolve_listen_addr(toml_config: &TomlConfig) -> String {
    if let Ok(addr) = std::env::var(LISTEN_ADDR_ENV) {
        if !addr.trim().is_empty() {
            return addr;
        }
    }

    toml_config
        .listen_addr
        .clone()
        .unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_key() {
        assert!(is_valid_key("abc123"));
        assert!(!is_valid_key(""));
        assert!(!is_valid_key("   "));
    }

    #[test]
    fn test_resolve_key_from_toml() {
        if std::env::var(API_KEY_ENV).is_ok() {
            return;
        }
        let config = TomlConfig {
            gemini_api_key: Some("toml-key".to_string()),
            ..Default::default()
        };
        assert_eq!(resolve_sentiment_api_key(&config).as_deref(), Some("toml-key"));
    }

    #[test]
    fn test_whitespace_toml_key_is_ignored() {
        if std::env::var(API_KEY_ENV).is_ok() {
            return;
        }
        let config = TomlConfig {
            gemini_api_key: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(resolve_sentiment_api_key(&config).is_none());
    }

    #[test]
    fn test_listen_addr_default() {
        if std::env::var(LISTEN_ADDR_ENV).is_ok() {
            return;
        }
        assert_eq!(
            resolve_listen_addr(&TomlConfig::default()),
            DEFAULT_LISTEN_ADDR
        );

        let config = TomlConfig {
            listen_addr: Some("0.0.0.0:8080".to_string()),
            ..Default::default()
        };
        assert_eq!(resolve_listen_addr(&config), "0.0.0.0:8080");
    }
}
