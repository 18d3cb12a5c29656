//! # speakwell-settings
//!
//! Configuration for the speakwell service.
//!
//! Settings are loaded from three layers (in priority order):
//! 1. **Compiled defaults**: [`SpeakwellSettings::default()`]
//! 2. **Settings file**: `~/.speakwell/settings.json` (deep-merged over defaults)
//! 3. **Environment variables**: `SPEAKWELL_*` overrides (highest priority)
//!
//! The transcription API key is not part of the settings file. It is read
//! from `ASSEMBLY_KEY` by [`ApiKey::from_env`] and a missing key is a hard
//! startup failure.

#![deny(unsafe_code)]

pub mod errors;
pub mod loader;
pub mod secret;
pub mod types;

pub use errors::{Result, SettingsError};
pub use loader::{
    RejectedOverride, deep_merge, load_settings, load_settings_from_path,
    load_settings_with_rejections, settings_path,
};
pub use secret::{API_KEY_ENV, ApiKey};
pub use types::*;
