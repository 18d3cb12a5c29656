//! Transcription service API key.

use secrecy::{ExposeSecret, SecretString};

use crate::errors::{Result, SettingsError};

/// Environment variable holding the transcription service key.
pub const API_KEY_ENV: &str = "ASSEMBLY_KEY";

/// Transcription service API key. `Debug` output is redacted.
#[derive(Clone, Debug)]
pub struct ApiKey(SecretString);

impl ApiKey {
    /// Wrap a raw key.
    pub fn new(key: impl Into<String>) -> Self {
        Self(SecretString::from(key.into()))
    }

    /// Read the key from [`API_KEY_ENV`].
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read the key through `lookup`; blank values count as missing.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        lookup(API_KEY_ENV)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(Self::new)
            .ok_or(SettingsError::MissingSecret { name: API_KEY_ENV })
    }

    /// The raw key, for building request headers.
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn present_key_is_loaded() {
        let key = ApiKey::from_lookup(|name| {
            assert_eq!(name, "ASSEMBLY_KEY");
            Some("sk_live_abc".into())
        })
        .unwrap();
        assert_eq!(key.expose(), "sk_live_abc");
    }

    #[test]
    fn missing_key_fails() {
        let err = ApiKey::from_lookup(|_| None).unwrap_err();
        assert_matches!(err, SettingsError::MissingSecret { name: "ASSEMBLY_KEY" });
    }

    #[test]
    fn blank_key_fails() {
        let err = ApiKey::from_lookup(|_| Some("   ".into())).unwrap_err();
        assert_matches!(err, SettingsError::MissingSecret { .. });
    }

    #[test]
    fn debug_is_redacted() {
        let key = ApiKey::new("sk_live_secret");
        let rendered = format!("{key:?}");
        assert!(!rendered.contains("sk_live_secret"));
    }
}
