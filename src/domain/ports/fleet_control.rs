//! Fleet control port - interface to the scaling controller.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::errors::VerifyResult;
use crate::domain::models::{ActivityRecord, FleetMember};

/// Trait for the compute-fleet controller.
///
/// The controller owns member lifecycles; the verifier only observes
/// membership and nudges the desired capacity.
#[async_trait]
pub trait FleetControl: Send + Sync {
    /// Members currently in the `Running` state under the given tag.
    async fn list_running_members(&self, fleet_tag: &str) -> VerifyResult<Vec<FleetMember>>;

    /// Request that the controller converge the fleet to `count` members.
    async fn set_desired_capacity(&self, fleet_tag: &str, count: usize) -> VerifyResult<()>;

    /// Scaling activity entries started at or after `since`, newest first.
    async fn list_recent_activity(
        &self,
        fleet_tag: &str,
        since: DateTime<Utc>,
    ) -> VerifyResult<Vec<ActivityRecord>>;
}
