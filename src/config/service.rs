use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::error::LogsError;

const DEFAULT_STAGE: &str = "dev";
const DEFAULT_REGION: &str = "us-east-1";

/// The parts of a `serverless.yml` service descriptor needed to find a
/// function's deployed action. Unrelated keys are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceDescriptor {
    service: ServiceName,
    #[serde(default)]
    provider: StageConfig,
    /// Legacy location of the stage/region defaults
    #[serde(default)]
    defaults: StageConfig,
    #[serde(default)]
    functions: BTreeMap<String, Option<FunctionConfig>>,
}

/// `service: name` or `service: { name: ... }`
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum ServiceName {
    Short(String),
    Full { name: String },
}

#[derive(Debug, Clone, Default, Deserialize)]
struct StageConfig {
    stage: Option<String>,
    region: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct FunctionConfig {
    /// Explicit deployed action name
    name: Option<String>,
}

impl ServiceDescriptor {
    pub fn parse_yaml(content: &str) -> Result<Self> {
        serde_yaml_ng::from_str(content).context("Failed to parse service descriptor")
    }

    pub fn parse_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).context("Failed to parse service descriptor")
    }

    /// Load a descriptor file, picking the format from its extension
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let descriptor = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::parse_json(&content),
            _ => Self::parse_yaml(&content),
        };
        descriptor.with_context(|| format!("Invalid service descriptor {}", path.display()))
    }

    /// Load the descriptor of the service rooted at `dir`.
    pub fn discover(dir: &Path) -> Result<Self, LogsError> {
        let path = super::find_service_file(dir).ok_or_else(|| {
            LogsError::configuration("This command can only be run inside a service.")
        })?;
        Self::load(&path).map_err(|e| LogsError::configuration(format!("{:#}", e)))
    }

    pub fn service_name(&self) -> &str {
        match &self.service {
            ServiceName::Short(name) => name,
            ServiceName::Full { name } => name,
        }
    }

    /// Deployed action name of `function`: its explicit `name`, otherwise
    /// `<service>_<function>`.
    pub fn resolve_function(&self, function: &str) -> Result<String, LogsError> {
        let config = self
            .functions
            .get(function)
            .ok_or_else(|| LogsError::FunctionNotFound(function.to_string()))?;
        let explicit = config.as_ref().and_then(|c| c.name.clone());
        Ok(explicit.unwrap_or_else(|| format!("{}_{}", self.service_name(), function)))
    }

    /// Stage: explicit > provider > legacy defaults > "dev"
    pub fn stage(&self, explicit: Option<&str>) -> String {
        explicit
            .or(self.provider.stage.as_deref())
            .or(self.defaults.stage.as_deref())
            .unwrap_or(DEFAULT_STAGE)
            .to_string()
    }

    /// Region: explicit > provider > legacy defaults > "us-east-1"
    pub fn region(&self, explicit: Option<&str>) -> String {
        explicit
            .or(self.provider.region.as_deref())
            .or(self.defaults.region.as_deref())
            .unwrap_or(DEFAULT_REGION)
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DESCRIPTOR: &str = r#"
service: shop

provider:
  name: openwhisk
  runtime: nodejs:10

functions:
  hello:
    handler: handler.hello
  checkout:
    handler: handler.checkout
    name: payments/checkout

plugins:
  - serverless-openwhisk
"#;

    #[test]
    fn test_resolve_default_action_name() {
        let descriptor = ServiceDescriptor::parse_yaml(DESCRIPTOR).unwrap();
        assert_eq!(descriptor.service_name(), "shop");
        assert_eq!(descriptor.resolve_function("hello").unwrap(), "shop_hello");
    }

    #[test]
    fn test_resolve_explicit_action_name() {
        let descriptor = ServiceDescriptor::parse_yaml(DESCRIPTOR).unwrap();
        assert_eq!(
            descriptor.resolve_function("checkout").unwrap(),
            "payments/checkout"
        );
    }

    #[test]
    fn test_unknown_function() {
        let descriptor = ServiceDescriptor::parse_yaml(DESCRIPTOR).unwrap();
        let err = descriptor.resolve_function("missing").unwrap_err();
        assert!(matches!(err, LogsError::FunctionNotFound(ref name) if name == "missing"));
    }

    #[test]
    fn test_stage_and_region_defaults() {
        let descriptor = ServiceDescriptor::parse_yaml(DESCRIPTOR).unwrap();
        assert_eq!(descriptor.stage(None), "dev");
        assert_eq!(descriptor.region(None), "us-east-1");
        assert_eq!(descriptor.stage(Some("prod")), "prod");
    }

    #[test]
    fn test_stage_from_provider_then_legacy_defaults() {
        let descriptor = ServiceDescriptor::parse_yaml(
            r#"
service:
  name: shop
provider:
  stage: staging
defaults:
  stage: ignored
  region: eu-de
functions:
  hello:
"#,
        )
        .unwrap();
        assert_eq!(descriptor.service_name(), "shop");
        assert_eq!(descriptor.stage(None), "staging");
        assert_eq!(descriptor.region(None), "eu-de");
        assert_eq!(descriptor.resolve_function("hello").unwrap(), "shop_hello");
    }

    #[test]
    fn test_discover_outside_service() {
        let dir = tempfile::tempdir().unwrap();
        let err = ServiceDescriptor::discover(dir.path()).unwrap_err();
        assert_eq!(err.to_string(), "This command can only be run inside a service.");
    }

    #[test]
    fn test_discover_json_descriptor() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("serverless.json"),
            r#"{"service": "shop", "functions": {"hello": {"handler": "h.hello"}}}"#,
        )
        .unwrap();
        let descriptor = ServiceDescriptor::discover(dir.path()).unwrap();
        assert_eq!(descriptor.resolve_function("hello").unwrap(), "shop_hello");
    }

    #[test]
    fn test_discover_invalid_descriptor() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("serverless.yml"), "functions: [").unwrap();
        let err = ServiceDescriptor::discover(dir.path()).unwrap_err();
        assert!(matches!(err, LogsError::Configuration(_)));
    }
}
