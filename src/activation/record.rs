use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// One execution record of a deployed action, as returned by the
/// activation list API with `docs=true`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivationRecord {
    pub activation_id: String,
    /// Action name without namespace or package.
    pub name: String,
    /// Raw log lines: `<timestamp> <stream>: <message>`
    #[serde(default)]
    pub logs: Vec<String>,
}

impl ActivationRecord {
    pub fn has_logs(&self) -> bool {
        !self.logs.is_empty()
    }
}

/// Activation ids already shown during this run. Only ever grows.
#[derive(Debug, Default, Clone)]
pub struct SeenSet {
    ids: HashSet<String>,
}

impl SeenSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, activation_id: &str) -> bool {
        self.ids.contains(activation_id)
    }

    /// Record an id as shown. Returns false if it was already present.
    pub fn insert(&mut self, activation_id: &str) -> bool {
        if self.ids.contains(activation_id) {
            return false;
        }
        self.ids.insert(activation_id.to_string())
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }
}
