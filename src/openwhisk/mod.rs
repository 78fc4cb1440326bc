mod client;

use std::future::Future;

pub use client::{ClientConfig, OpenWhiskClient};

use crate::activation::ActivationRecord;
use crate::error::TransportError;

/// Query for the activation list API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListOptions {
    /// Include full activation documents (logs) in the listing
    pub docs: bool,
    pub limit: u32,
    /// `_` is the namespace the credentials belong to
    pub namespace: String,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            docs: true,
            limit: crate::activation::DEFAULT_LIMIT,
            namespace: "_".to_string(),
        }
    }
}

/// Source of recent activations, newest first.
pub trait ActivationSource {
    fn list_activations(
        &self,
        options: ListOptions,
    ) -> impl Future<Output = Result<Vec<ActivationRecord>, TransportError>> + Send;
}
