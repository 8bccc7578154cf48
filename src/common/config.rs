//! Runtime configuration loaded from the process environment.

use std::env;
use std::path::PathBuf;

use crate::features::domain::Strictness;

/// Output format of the log subscriber.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum LogFormat {
    /// One JSON object per line.
    Json,
    /// Human readable lines.
    Text,
}

/// Snapshot of configuration values consumed by the core.
#[derive(Clone, Debug)]
pub struct AppCfg {
    pub model_path: PathBuf,
    pub bind_addr: String,
    pub log_filter: String,
    pub log_format: LogFormat,
    pub strictness: Strictness,
}

impl AppCfg {
    /// Create a configuration snapshot from the process environment.
    pub fn load() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a snapshot from an arbitrary key lookup. Unset or unparseable
    /// values fall back to their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let env_or = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let log_format = match env_or("DIAB_LOG_FORMAT", "json").to_ascii_lowercase().as_str() {
            "text" | "plain" => LogFormat::Text,
            _ => LogFormat::Json,
        };

        let strictness = if parse_flag(&env_or("DIAB_STRICT_FEATURES", "false")) {
            Strictness::Strict
        } else {
            Strictness::Permissive
        };

        Self {
            model_path: PathBuf::from(env_or("DIAB_MODEL_PATH", "./models/diabetes_gbdt.json")),
            bind_addr: env_or("DIAB_BIND_ADDR", "127.0.0.1:5000"),
            log_filter: env_or("DIAB_LOG", "info"),
            log_format,
            strictness,
        }
    }
}

fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
