use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::error::LogsError;
use crate::openwhisk::ClientConfig;

/// OpenWhisk credentials from a `.wskprops` file and `__OW_*` variables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WskProps {
    pub api_host: Option<String>,
    pub auth: Option<String>,
    pub ignore_certs: bool,
}

impl WskProps {
    /// Parse `KEY=VALUE` lines; blank lines and `#` comments are skipped.
    pub fn parse(content: &str) -> Self {
        let mut props = WskProps::default();
        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let value = value.trim();
            if value.is_empty() {
                continue;
            }
            match key.trim() {
                "APIHOST" => props.api_host = Some(value.to_string()),
                "AUTH" => props.auth = Some(value.to_string()),
                _ => {}
            }
        }
        props
    }

    /// Load a properties file. A missing file yields empty properties.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Ok(Self::parse(&content))
    }

    /// Environment overrides: `__OW_API_HOST`, `__OW_API_KEY`,
    /// `__OW_IGNORE_CERTS`.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());
        if let Some(host) = get("__OW_API_HOST") {
            self.api_host = Some(host);
        }
        if let Some(auth) = get("__OW_API_KEY") {
            self.auth = Some(auth);
        }
        if let Some(ignore) = get("__OW_IGNORE_CERTS") {
            self.ignore_certs = matches!(ignore.as_str(), "true" | "1");
        }
    }

    /// Properties file merged with the process environment
    pub fn resolve() -> Result<Self> {
        let path = super::wskprops_path()?;
        let mut props = Self::load(&path)?;
        props.apply_env(|key| std::env::var(key).ok());
        tracing::debug!(
            path = %path.display(),
            api_host = props.api_host.as_deref().unwrap_or("<unset>"),
            "Resolved OpenWhisk properties"
        );
        Ok(props)
    }

    pub fn client_config(&self, timeout: Duration) -> Result<ClientConfig, LogsError> {
        let mut missing = Vec::new();
        if self.api_host.is_none() {
            missing.push("APIHOST");
        }
        if self.auth.is_none() {
            missing.push("AUTH");
        }
        match (&self.api_host, &self.auth) {
            (Some(api_host), Some(auth)) => Ok(ClientConfig {
                api_host: api_host.clone(),
                auth: auth.clone(),
                ignore_certs: self.ignore_certs,
                timeout,
            }),
            _ => Err(LogsError::configuration(format!(
                "Missing mandatory OpenWhisk configuration parameters: {}. \
                 Set them in ~/.wskprops or with __OW_API_HOST / __OW_API_KEY.",
                missing.join(", ")
            ))),
        }
    }
}
