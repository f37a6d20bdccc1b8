//! Per-member observations of shared state.

use serde::{Deserialize, Serialize};

/// Raw probe output captured from one member during a cycle.
///
/// Written once per cycle to shared storage under a deterministic key;
/// the previous cycle's object is removed by explicit cleanup, not
/// overwritten implicitly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    pub member_id: String,
    pub raw_text: String,
}

impl Observation {
    pub fn new(member_id: impl Into<String>, raw_text: impl Into<String>) -> Self {
        Self {
            member_id: member_id.into(),
            raw_text: raw_text.into(),
        }
    }

    /// Deterministic storage key for this member's observation.
    pub fn storage_key(prefix: &str, member_id: &str) -> String {
        format!("{}/{}", prefix.trim_end_matches('/'), member_id)
    }

    pub fn key(&self, prefix: &str) -> String {
        Self::storage_key(prefix, &self.member_id)
    }
}
