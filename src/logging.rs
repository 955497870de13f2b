//! Tracing subscriber setup for hosts embedding the engine.

#[cfg(test)]
#[path = "logging_test.rs"]
mod logging_test;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::Config;

/// Install a fmt subscriber filtered by `RUST_LOG`, or by
/// `config.log_filter` when `RUST_LOG` is unset or invalid.
///
/// Returns `false` if a global subscriber was already installed.
pub fn init(config: &Config) -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .is_ok();
    if installed {
        tracing::debug!(fallback = %config.log_filter, "logging: subscriber installed");
    }
    installed
}
