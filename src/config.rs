//! Engine configuration parsed from environment variables.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use crate::consts::{DEFAULT_SHAPE_DURATION_SECS, HISTORY_LIMIT, HIT_MARGIN_PX};

pub const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: String, value: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Capacity of each undo/redo stack.
    pub history_limit: usize,
    /// Hit-test slop in pixels.
    pub hit_margin_px: f64,
    /// Duration stamped onto shapes drawn over playable media.
    pub shape_duration_secs: f64,
    /// Log filter used when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            history_limit: HISTORY_LIMIT,
            hit_margin_px: HIT_MARGIN_PX,
            shape_duration_secs: DEFAULT_SHAPE_DURATION_SECS,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl Config {
    /// Build config from environment variables.
    ///
    /// Optional:
    /// - `PROOFMARK_HISTORY_LIMIT`: default 30
    /// - `PROOFMARK_HIT_MARGIN_PX`: default 8
    /// - `PROOFMARK_SHAPE_DURATION_SECS`: default 3
    /// - `PROOFMARK_LOG`: default `info`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when a variable is set but does not
    /// parse, or a margin/duration is negative or not finite.
    pub fn from_env() -> Result<Self, ConfigError> {
        let history_limit = env_parse("PROOFMARK_HISTORY_LIMIT", HISTORY_LIMIT)?;
        let hit_margin_px = env_parse_non_negative("PROOFMARK_HIT_MARGIN_PX", HIT_MARGIN_PX)?;
        let shape_duration_secs = env_parse_non_negative("PROOFMARK_SHAPE_DURATION_SECS", DEFAULT_SHAPE_DURATION_SECS)?;
        let log_filter = std::env::var("PROOFMARK_LOG")
            .map(|v| v.trim().to_string())
            .unwrap_or_else(|_| DEFAULT_LOG_FILTER.to_string());

        Ok(Self { history_limit, hit_margin_px, shape_duration_secs, log_filter })
    }
}

fn env_parse<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::Invalid { key: key.to_string(), value: raw }),
        Err(_) => Ok(default),
    }
}

fn env_parse_non_negative(key: &str, default: f64) -> Result<f64, ConfigError> {
    let value = env_parse(key, default)?;
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::Invalid { key: key.to_string(), value: value.to_string() })
    }
}
