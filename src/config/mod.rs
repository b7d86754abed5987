//! Configuration module for the CMS backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::errors::{AppError, AppResult};

/// Which key-value backend holds the posts and tags collections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    /// SQLite file, one namespace per collection
    Sqlite(PathBuf),
    /// Process memory; contents are lost on restart
    Memory,
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Storage backend for both collections
    pub store: StoreBackend,
    /// Base URL of the blog renderer; `/blog` is only proxied when set
    pub blog_upstream: Option<String>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_addr = lookup("CMS_BIND_ADDR")
            .unwrap_or_else(|| "127.0.0.1:8787".to_string())
            .parse()
            .map_err(|e| AppError::Config(format!("Invalid CMS_BIND_ADDR: {}", e)))?;

        let log_level = lookup("CMS_LOG_LEVEL").unwrap_or_else(|| "info".to_string());

        let store = match lookup("CMS_STORE").as_deref() {
            None | Some("sqlite") => {
                let db_path = lookup("CMS_DB_PATH")
                    .unwrap_or_else(|| "./data/cms.sqlite".to_string())
                    .into();
                StoreBackend::Sqlite(db_path)
            }
            Some("memory") => StoreBackend::Memory,
            Some(other) => {
                return Err(AppError::Config(format!(
                    "CMS_STORE must be `sqlite` or `memory`, got `{}`",
                    other
                )))
            }
        };

        let blog_upstream = lookup("CMS_BLOG_UPSTREAM").filter(|url| !url.trim().is_empty());

        Ok(Self {
            bind_addr,
            log_level,
            store,
            blog_upstream,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> AppResult<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_default_config() {
        let config = config_from(&[]).unwrap();

        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:8787");
        assert_eq!(config.log_level, "info");
        assert_eq!(
            config.store,
            StoreBackend::Sqlite(PathBuf::from("./data/cms.sqlite"))
        );
        assert!(config.blog_upstream.is_none());
    }

    #[test]
    fn test_memory_store_and_upstream() {
        let config = config_from(&[
            ("CMS_STORE", "memory"),
            ("CMS_BLOG_UPSTREAM", "http://127.0.0.1:3000"),
            ("CMS_BIND_ADDR", "0.0.0.0:9000"),
        ])
        .unwrap();

        assert_eq!(config.store, StoreBackend::Memory);
        assert_eq!(
            config.blog_upstream.as_deref(),
            Some("http://127.0.0.1:3000")
        );
        assert_eq!(config.bind_addr.port(), 9000);
    }

    #[test]
    fn test_blank_upstream_is_disabled() {
        let config = config_from(&[("CMS_BLOG_UPSTREAM", "  ")]).unwrap();
        assert!(config.blog_upstream.is_none());
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            config_from(&[("CMS_BIND_ADDR", "not-an-address")]),
            Err(AppError::Config(_))
        ));
        assert!(matches!(
            config_from(&[("CMS_STORE", "redis")]),
            Err(AppError::Config(_))
        ));
    }
}
