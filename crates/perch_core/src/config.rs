//! Per-group timing configuration.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::PerchError;

/// Default delay before a cold hover opens a tooltip.
pub const DEFAULT_OPEN_DELAY_MS: u64 = 700;

/// Default delay before a tooltip closes after the pointer leaves.
pub const DEFAULT_CLOSE_DELAY_MS: u64 = 300;

/// Timing policy and identity for one tooltip group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupConfig {
    /// Wait before opening when no tooltip was shown recently.
    pub open_delay_ms: u64,
    /// Wait before closing; also the window in which a reopen skips the open delay.
    pub close_delay_ms: u64,
    /// Explicit group id. A random one is generated when absent.
    pub id: Option<String>,
}

impl Default for GroupConfig {
    fn default() -> Self {
        Self {
            open_delay_ms: DEFAULT_OPEN_DELAY_MS,
            close_delay_ms: DEFAULT_CLOSE_DELAY_MS,
            id: None,
        }
    }
}

impl GroupConfig {
    /// Override the open delay.
    pub fn with_open_delay(mut self, delay: Duration) -> Self {
        self.open_delay_ms = delay.as_millis() as u64;
        self
    }

    /// Override the close delay.
    pub fn with_close_delay(mut self, delay: Duration) -> Self {
        self.close_delay_ms = delay.as_millis() as u64;
        self
    }

    /// Set an explicit group id.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Open delay as a `Duration`.
    pub fn open_delay(&self) -> Duration {
        Duration::from_millis(self.open_delay_ms)
    }

    /// Close delay as a `Duration`.
    pub fn close_delay(&self) -> Duration {
        Duration::from_millis(self.close_delay_ms)
    }

    /// Parse a config from JSON. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, PerchError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config from a JSON file.
    pub fn load(path: &Path) -> Result<Self, PerchError> {
        let contents = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&contents)?;
        tracing::debug!(
            path = %path.display(),
            open_delay_ms = config.open_delay_ms,
            close_delay_ms = config.close_delay_ms,
            "Loaded group config"
        );
        Ok(config)
    }

    fn validate(&self) -> Result<(), PerchError> {
        if let Some(id) = &self.id {
            if id.trim().is_empty() {
                return Err(PerchError::config("Group id must not be blank"));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = GroupConfig::default();
        assert_eq!(config.open_delay(), Duration::from_millis(700));
        assert_eq!(config.close_delay(), Duration::from_millis(300));
        assert!(config.id.is_none());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = GroupConfig::from_json_str(r#"{ "open_delay_ms": 250 }"#).unwrap();
        assert_eq!(config.open_delay_ms, 250);
        assert_eq!(config.close_delay_ms, DEFAULT_CLOSE_DELAY_MS);
    }

    #[test]
    fn test_blank_id_rejected() {
        let err = GroupConfig::from_json_str(r#"{ "id": "  " }"#).unwrap_err();
        assert!(matches!(err, PerchError::Config { .. }));
    }

    #[test]
    fn test_malformed_json_is_config_error() {
        let err = GroupConfig::from_json_str("{ open_delay_ms: }").unwrap_err();
        assert_eq!(err.category(), "Config");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "close_delay_ms": 120, "id": "toolbar" }}"#).unwrap();

        let config = GroupConfig::load(file.path()).unwrap();
        assert_eq!(config.close_delay_ms, 120);
        assert_eq!(config.id.as_deref(), Some("toolbar"));
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = GroupConfig::load(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, PerchError::Io { .. }));
    }

    #[test]
    fn test_builders() {
        let config = GroupConfig::default()
            .with_open_delay(Duration::from_millis(50))
            .with_close_delay(Duration::from_millis(10))
            .with_id("nav");
        assert_eq!(config.open_delay_ms, 50);
        assert_eq!(config.close_delay_ms, 10);
        assert_eq!(config.id.as_deref(), Some("nav"));
    }
}
