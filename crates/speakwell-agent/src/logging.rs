//! Tracing subscriber setup.

use anyhow::anyhow;
use speakwell_settings::{LogLevel, LoggingSettings, RejectedOverride};
use tracing_subscriber::EnvFilter;

/// Filter directives for `level`; noisy HTTP internals are capped at `warn`.
pub fn default_directives(level: LogLevel) -> String {
    format!(
        "{},hyper=warn,hyper_util=warn,reqwest=warn,h2=warn",
        level.as_filter_str()
    )
}

/// Install the global subscriber. `RUST_LOG`, when set, replaces the
/// configured level.
pub fn init(settings: &LoggingSettings) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(settings.level)));

    let installed = if settings.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .with_current_span(true)
            .try_init()
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).try_init()
    };
    installed.map_err(|e| anyhow!("failed to install tracing subscriber: {e}"))
}

/// Warn about env overrides dropped while loading settings. Runs after
/// [`init`], since settings load before a subscriber exists.
pub fn report_rejected_overrides(rejected: &[RejectedOverride]) {
    for r in rejected {
        tracing::warn!(key = r.key, value = %r.value, "invalid env override, ignoring");
    }
}
