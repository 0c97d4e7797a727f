//! Tracing setup with a log filter that can be swapped after startup.
//!
//! The binary installs the subscriber before the configuration is read, then
//! narrows it to `logging.level`. A `RUST_LOG` variable overrides both for the
//! lifetime of the process.

use std::sync::OnceLock;

use tracing_subscriber::{EnvFilter, Registry, fmt, prelude::*, reload};

type FilterHandle = reload::Handle<EnvFilter, Registry>;

static FILTER: OnceLock<FilterHandle> = OnceLock::new();

/// Connection-level crates that stay at `warn` unless the level is `off`.
const QUIET_TARGETS: &[&str] = &["hyper", "h2"];

/// Filter directives for a configured level.
pub fn directives(level: &str) -> String {
    let level = level.to_ascii_lowercase();
    if level == "off" {
        return level;
    }
    QUIET_TARGETS
        .iter()
        .fold(level, |acc, target| format!("{acc},{target}=warn"))
}

fn env_override() -> Option<EnvFilter> {
    std::env::var_os("RUST_LOG")?;
    EnvFilter::try_from_default_env().ok()
}

/// Installs the global subscriber. Later calls are no-ops.
pub fn init_tracing(level: &str) {
    let filter = env_override()
        .or_else(|| EnvFilter::try_new(directives(level)).ok())
        .unwrap_or_else(|| EnvFilter::new("info"));

    let (filter, handle) = reload::Layer::new(filter);
    if FILTER.set(handle).is_err() {
        return;
    }

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .try_init();
}

/// Replaces the active filter with the configured level.
///
/// Does nothing when `RUST_LOG` is set or no subscriber was installed here.
pub fn set_log_level(level: &str) -> Result<(), String> {
    if std::env::var_os("RUST_LOG").is_some() {
        tracing::debug!("RUST_LOG is set; ignoring logging.level");
        return Ok(());
    }
    let Some(handle) = FILTER.get() else {
        return Ok(());
    };
    let filter = EnvFilter::try_new(directives(level))
        .map_err(|e| format!("invalid logging.level '{level}': {e}"))?;
    handle
        .reload(filter)
        .map_err(|e| format!("failed to apply logging.level: {e}"))
}
