use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::activation::{DEFAULT_INTERVAL_MS, DEFAULT_LIMIT};

/// Tool settings (config.toml). Every key is optional.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(default)]
    pub namespace: Option<String>,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_true")]
    pub color: bool,
}

fn default_interval_ms() -> u64 {
    DEFAULT_INTERVAL_MS
}

fn default_limit() -> u32 {
    DEFAULT_LIMIT
}

fn default_request_timeout() -> u64 {
    60
}

fn default_true() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            interval_ms: DEFAULT_INTERVAL_MS,
            limit: DEFAULT_LIMIT,
            namespace: None,
            request_timeout_secs: 60,
            color: true,
        }
    }
}

impl Settings {
    pub fn parse(content: &str) -> Result<Self> {
        let settings: Settings = toml::from_str(content).context("Failed to parse settings")?;
        Ok(settings)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Invalid settings in {}", path.display()))
    }

    /// Load `path` if it exists, otherwise the built-in defaults
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::parse("").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.interval_ms, 1000);
        assert_eq!(settings.limit, 100);
        assert_eq!(settings.request_timeout_secs, 60);
        assert!(settings.color);
    }

    #[test]
    fn test_parse_partial() {
        let settings = Settings::parse("interval_ms = 250\nnamespace = \"guest\"\ncolor = false\n").unwrap();
        assert_eq!(settings.interval_ms, 250);
        assert_eq!(settings.limit, 100);
        assert_eq!(settings.namespace.as_deref(), Some("guest"));
        assert!(!settings.color);
    }

    #[test]
    fn test_rejects_unknown_keys() {
        assert!(Settings::parse("intervall = 5").is_err());
    }

    #[test]
    fn test_load_or_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        assert_eq!(Settings::load_or_default(&path).unwrap(), Settings::default());

        std::fs::write(&path, "limit = 50\n").unwrap();
        assert_eq!(Settings::load_or_default(&path).unwrap().limit, 50);
    }
}
