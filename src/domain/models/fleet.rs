//! Fleet domain model.
//!
//! Fleet members are compute instances owned by the fleet controller.
//! The verifier never creates or destroys them; it only observes
//! membership through repeated queries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle state of a fleet member, as reported by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberState {
    /// Launched but not yet serving
    Pending,
    /// In service
    Running,
    /// Terminated by the controller
    Terminated,
}

impl MemberState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Terminated => "terminated",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "running" => Some(Self::Running),
            "terminated" => Some(Self::Terminated),
            _ => None,
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running)
    }
}

/// A single member of the fleet, observed from the controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FleetMember {
    /// Controller-assigned instance identifier.
    pub id: String,
    pub state: MemberState,
}

impl FleetMember {
    /// Convenience constructor for a member in the `Running` state.
    pub fn running(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            state: MemberState::Running,
        }
    }
}

/// Read-only snapshot of one entry in the fleet controller's scaling
/// history. Pulled for reporting only; never created by the verifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityRecord {
    pub id: String,
    pub description: String,
    pub cause: String,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub status_code: String,
}
