use std::future::Future;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Deserialize;
use ureq::tls::{RootCerts, TlsConfig, TlsProvider};

use super::{ActivationSource, ListOptions};
use crate::activation::ActivationRecord;
use crate::error::TransportError;

/// Cap on a single activation listing (64MB)
const MAX_RESPONSE_BYTES: u64 = 64 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Host or base URL; `https://` is assumed when no scheme is given
    pub api_host: String,
    /// `uuid:key` credentials
    pub auth: String,
    pub ignore_certs: bool,
    pub timeout: Duration,
}

/// Blocking HTTP client for the OpenWhisk REST API, driven from tokio's
/// blocking pool.
#[derive(Clone)]
pub struct OpenWhiskClient {
    agent: ureq::Agent,
    base_url: String,
    authorization: String,
}

impl OpenWhiskClient {
    pub fn new(config: &ClientConfig) -> Self {
        let tls_config = TlsConfig::builder()
            .provider(TlsProvider::NativeTls)
            .root_certs(RootCerts::PlatformVerifier)
            .disable_verification(config.ignore_certs)
            .build();

        // Error statuses are read here so the API's error body can be reported
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .tls_config(tls_config)
            .timeout_global(Some(config.timeout))
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            agent,
            base_url: api_base_url(&config.api_host),
            authorization: basic_auth(&config.auth),
        }
    }

    fn activations_url(&self, namespace: &str) -> String {
        format!(
            "{}/api/v1/namespaces/{}/activations",
            self.base_url, namespace
        )
    }
}

impl ActivationSource for OpenWhiskClient {
    fn list_activations(
        &self,
        options: ListOptions,
    ) -> impl Future<Output = Result<Vec<ActivationRecord>, TransportError>> + Send {
        let agent = self.agent.clone();
        let url = self.activations_url(&options.namespace);
        let authorization = self.authorization.clone();

        async move {
            tracing::debug!(url = %url, limit = options.limit, "Listing activations");
            let task = tokio::task::spawn_blocking(move || {
                fetch_activations(&agent, &url, &authorization, &options)
            });
            match task.await {
                Ok(result) => result,
                Err(e) => Err(TransportError::Task(e)),
            }
        }
    }
}

fn fetch_activations(
    agent: &ureq::Agent,
    url: &str,
    authorization: &str,
    options: &ListOptions,
) -> Result<Vec<ActivationRecord>, TransportError> {
    let mut response = agent
        .get(url)
        .query("docs", options.docs.to_string())
        .query("limit", options.limit.to_string())
        .header("Authorization", authorization)
        .header("Accept", "application/json")
        .call()
        .map_err(|e| TransportError::Request(e.to_string()))?;

    let status = response.status();
    let body = response
        .body_mut()
        .with_config()
        .limit(MAX_RESPONSE_BYTES)
        .read_to_string()
        .map_err(|e| TransportError::Request(e.to_string()))?;

    if !status.is_success() {
        return Err(TransportError::Status {
            status: status.as_u16(),
            message: error_message(&body),
        });
    }

    Ok(serde_json::from_str(&body)?)
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// Prefer the `error` field of an OpenWhisk error document.
fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) => parsed.error,
        Err(_) if body.trim().is_empty() => "request failed".to_string(),
        Err(_) => body.trim().to_string(),
    }
}

fn api_base_url(api_host: &str) -> String {
    let host = api_host.trim().trim_end_matches('/');
    if host.starts_with("https://") || host.starts_with("http://") {
        host.to_string()
    } else {
        format!("https://{}", host)
    }
}

fn basic_auth(auth: &str) -> String {
    format!("Basic {}", STANDARD.encode(auth))
}
