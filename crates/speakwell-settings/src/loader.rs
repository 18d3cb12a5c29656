//! Settings loading with deep merge and environment variable overrides.
//!
//! Loading flow:
//! 1. Start with compiled [`SpeakwellSettings::default()`]
//! 2. If the settings file exists, deep-merge its values over defaults
//! 3. Apply `SPEAKWELL_*` environment overrides (highest priority)
//!
//! Deep merge rules:
//! - Objects are merged recursively (source overrides target per-key)
//! - Arrays and primitives are replaced entirely by source
//! - Null values in source are skipped (preserving target)

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, warn};

use crate::errors::{Result, SettingsError};
use crate::types::{LogLevel, SpeakwellSettings};

/// Resolve the default settings file path (`~/.speakwell/settings.json`).
pub fn settings_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(home).join(".speakwell").join("settings.json")
}

/// Load settings from the default path with env var overrides.
pub fn load_settings() -> Result<SpeakwellSettings> {
    load_settings_from_path(&settings_path())
}

/// Load settings from a specific path with env var overrides.
///
/// A missing file yields defaults; invalid JSON or out-of-range values are
/// errors. Rejected env overrides are logged here; callers that load
/// settings before installing a subscriber should use
/// [`load_settings_with_rejections`] and log them later.
pub fn load_settings_from_path(path: &Path) -> Result<SpeakwellSettings> {
    let (settings, rejected) = load_settings_with_rejections(path)?;
    for r in &rejected {
        warn!(key = r.key, value = %r.value, "invalid env override, ignoring");
    }
    Ok(settings)
}

/// Like [`load_settings_from_path`], but returns rejected env overrides
/// instead of logging them.
pub fn load_settings_with_rejections(
    path: &Path,
) -> Result<(SpeakwellSettings, Vec<RejectedOverride>)> {
    let mut settings = read_settings_file(path)?;
    let rejected = apply_overrides(&mut settings, |name| std::env::var(name).ok());
    validate(&settings)?;
    Ok((settings, rejected))
}

/// An env override whose value could not be parsed or was out of range.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RejectedOverride {
    /// Environment variable name.
    pub key: &'static str,
    /// Raw value that was ignored.
    pub value: String,
}

impl std::fmt::Display for RejectedOverride {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}={:?}", self.key, self.value)
    }
}

/// Defaults deep-merged with the file at `path`, without env overrides.
pub fn read_settings_file(path: &Path) -> Result<SpeakwellSettings> {
    let defaults = serde_json::to_value(SpeakwellSettings::default())?;

    let merged = if path.exists() {
        debug!(?path, "loading settings from file");
        let content = std::fs::read_to_string(path)?;
        let user: Value = serde_json::from_str(&content)?;
        deep_merge(defaults, user)
    } else {
        debug!(?path, "settings file not found, using defaults");
        defaults
    };

    Ok(serde_json::from_value(merged)?)
}

/// Recursive deep merge of two JSON values.
pub fn deep_merge(target: Value, source: Value) -> Value {
    match (target, source) {
        (Value::Object(mut target_map), Value::Object(source_map)) => {
            for (key, source_val) in source_map {
                if source_val.is_null() {
                    continue;
                }
                let merged = if let Some(target_val) = target_map.remove(&key) {
                    deep_merge(target_val, source_val)
                } else {
                    source_val
                };
                let _ = target_map.insert(key, merged);
            }
            Value::Object(target_map)
        }
        (_, source) => source,
    }
}

/// Apply `SPEAKWELL_*` overrides read through `lookup`.
///
/// Invalid values keep the file/default value and are returned so the caller
/// can report them.
pub fn apply_overrides(
    settings: &mut SpeakwellSettings,
    lookup: impl Fn(&str) -> Option<String>,
) -> Vec<RejectedOverride> {
    let read = |name: &str| lookup(name).filter(|v| !v.is_empty());
    let mut rejected = Vec::new();
    let mut reject = |key: &'static str, value: String| {
        rejected.push(RejectedOverride { key, value });
    };

    if let Some(v) = read("SPEAKWELL_HOST") {
        settings.server.host = v;
    }
    if let Some(v) = read("SPEAKWELL_PORT") {
        match parse_u16_range(&v, 1, 65535) {
            Some(port) => settings.server.port = port,
            None => reject("SPEAKWELL_PORT", v),
        }
    }
    if let Some(v) = read("SPEAKWELL_BASE_URL") {
        settings.transcription.base_url = v.trim_end_matches('/').to_string();
    }
    if let Some(v) = read("SPEAKWELL_POLL_INTERVAL_MS") {
        match parse_u64_range(&v, 100, 60_000) {
            Some(ms) => settings.transcription.poll_interval_ms = ms,
            None => reject("SPEAKWELL_POLL_INTERVAL_MS", v),
        }
    }
    if let Some(v) = read("SPEAKWELL_MAX_DURATION_SECS") {
        match parse_positive_f64(&v) {
            Some(secs) => settings.analysis.max_duration_secs = secs,
            None => reject("SPEAKWELL_MAX_DURATION_SECS", v),
        }
    }
    if let Some(v) = read("SPEAKWELL_LOG_LEVEL") {
        match LogLevel::parse(&v) {
            Some(level) => settings.logging.level = level,
            None => reject("SPEAKWELL_LOG_LEVEL", v),
        }
    }
    if let Some(v) = read("SPEAKWELL_LOG_JSON") {
        match parse_bool(&v) {
            Some(json) => settings.logging.json = json,
            None => reject("SPEAKWELL_LOG_JSON", v),
        }
    }

    rejected
}

/// Reject values that would make the service misbehave at runtime.
pub fn validate(settings: &SpeakwellSettings) -> Result<()> {
    if settings.transcription.chunk_size_bytes == 0 {
        return Err(SettingsError::InvalidValue(
            "transcription.chunkSizeBytes must be positive".into(),
        ));
    }
    if settings.transcription.poll_interval_ms == 0 {
        return Err(SettingsError::InvalidValue(
            "transcription.pollIntervalMs must be positive".into(),
        ));
    }
    let max_duration = settings.analysis.max_duration_secs;
    if max_duration.is_nan() || max_duration <= 0.0 {
        return Err(SettingsError::InvalidValue(
            "analysis.maxDurationSecs must be positive".into(),
        ));
    }
    if !(0.0..=1.0).contains(&settings.analysis.pronunciation_threshold) {
        return Err(SettingsError::InvalidValue(
            "analysis.pronunciationThreshold must be within [0, 1]".into(),
        ));
    }
    let pause_threshold = settings.analysis.pause_threshold_sec;
    if !pause_threshold.is_finite() || pause_threshold <= 0.0 {
        return Err(SettingsError::InvalidValue(
            "analysis.pauseThresholdSec must be positive".into(),
        ));
    }
    if settings.analysis.allowed_content_types.is_empty() {
        return Err(SettingsError::InvalidValue(
            "analysis.allowedContentTypes must not be empty".into(),
        ));
    }
    Ok(())
}

// ── Pure parsing functions ──────────────────────────────────────────────────

/// Parse a string as a boolean.
///
/// Accepts (case-insensitive): `true`/`1`/`yes`/`on` or `false`/`0`/`no`/`off`.
pub fn parse_bool(val: &str) -> Option<bool> {
    match val.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Parse a string as a `u16` within a range.
pub fn parse_u16_range(val: &str, min: u16, max: u16) -> Option<u16> {
    let n: u16 = val.parse().ok()?;
    (n >= min && n <= max).then_some(n)
}

/// Parse a string as a `u64` within a range.
pub fn parse_u64_range(val: &str, min: u64, max: u64) -> Option<u64> {
    let n: u64 = val.parse().ok()?;
    (n >= min && n <= max).then_some(n)
}

/// Parse a string as a finite, strictly positive `f64`.
pub fn parse_positive_f64(val: &str) -> Option<f64> {
    let n: f64 = val.parse().ok()?;
    (n.is_finite() && n > 0.0).then_some(n)
}
