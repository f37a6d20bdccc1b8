//! Fleet convergence polling.
//!
//! Drives the fleet toward a target member count and detects
//! convergence or timeout. Elapsed time is tracked against the wall
//! clock, not poll counts, so variable per-poll latency cannot distort
//! the timeout budget.

use std::sync::Arc;

use tracing::info;

use crate::domain::errors::VerifyResult;
use crate::domain::models::{ConvergenceOutcome, ConvergenceTarget};
use crate::domain::ports::FleetControl;
use crate::services::workload::WorkloadSupervisor;

/// Polls fleet membership until a convergence target is met or times out.
pub struct ConvergencePoller {
    fleet: Arc<dyn FleetControl>,
    workload: Option<Arc<WorkloadSupervisor>>,
    fleet_tag: String,
}

impl ConvergencePoller {
    pub fn new(fleet: Arc<dyn FleetControl>, fleet_tag: impl Into<String>) -> Self {
        Self {
            fleet,
            workload: None,
            fleet_tag: fleet_tag.into(),
        }
    }

    /// Enforce the synthetic workload on known members between polls.
    pub fn with_workload(mut self, workload: Arc<WorkloadSupervisor>) -> Self {
        self.workload = Some(workload);
        self
    }

    /// Poll until the target is satisfied or the timeout elapses.
    ///
    /// Never returns an error for a mere timeout: the outcome carries
    /// `converged = false` and the last observed membership, and the
    /// caller decides whether that is fatal. Progress is logged at
    /// minute granularity so slow convergence stays visible without
    /// flooding the log.
    pub async fn poll_until_converged(
        &self,
        target: &ConvergenceTarget,
    ) -> VerifyResult<ConvergenceOutcome> {
        target.validate()?;

        let started = tokio::time::Instant::now();
        let mut last_logged_minute: Option<u64> = None;

        loop {
            let members = self.fleet.list_running_members(&self.fleet_tag).await?;
            let count = members.len();
            let elapsed = started.elapsed();

            if target.direction.satisfied(count, target.target_count) {
                info!(
                    direction = target.direction.as_str(),
                    count,
                    target = target.target_count,
                    elapsed_secs = elapsed.as_secs(),
                    "fleet converged"
                );
                return Ok(ConvergenceOutcome {
                    members,
                    converged: true,
                    waited: elapsed,
                });
            }

            if elapsed >= target.timeout {
                return Ok(ConvergenceOutcome {
                    members,
                    converged: false,
                    waited: elapsed,
                });
            }

            let minute = elapsed.as_secs() / 60;
            if last_logged_minute != Some(minute) {
                info!(
                    direction = target.direction.as_str(),
                    count,
                    target = target.target_count,
                    elapsed_secs = elapsed.as_secs(),
                    "fleet not yet converged"
                );
                last_logged_minute = Some(minute);
            }

            if let Some(ref workload) = self.workload {
                workload.enforce(target.direction, &members).await;
            }

            tokio::time::sleep(target.poll_interval).await;
        }
    }
}

// Tests live in tests/convergence_poller_test.rs against the simulator
// adapters; a quick sanity check of the direction hook stays here.
#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::adapters::sim::SimFleetControl;
    use crate::domain::models::ScaleDirection;

    #[tokio::test(start_paused = true)]
    async fn converges_immediately_when_already_at_target() {
        let fleet = Arc::new(SimFleetControl::new(4, 1));
        let poller = ConvergencePoller::new(fleet, "sim");
        let target = ConvergenceTarget::new(
            ScaleDirection::ScaleOut,
            4,
            Duration::from_secs(60),
            Duration::from_secs(10),
        );

        let outcome = poller.poll_until_converged(&target).await.unwrap();
        assert!(outcome.converged);
        assert_eq!(outcome.members.len(), 4);
    }
}
