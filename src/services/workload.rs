//! Synthetic workload supervision.
//!
//! The scaling policy only reacts while members are under load, so the
//! verifier keeps a synthetic workload alive on every member during
//! scale-out and tears it down during scale-in. Starting is guarded by
//! a check (a second start on a loaded member would double the load),
//! and per-member failures never abort a phase: an unreachable member
//! surfaces later through the aggregate criteria.

use std::sync::Arc;

use futures::future::join_all;
use tokio::sync::Semaphore;
use tracing::{debug, warn};

use crate::domain::errors::VerifyResult;
use crate::domain::models::{FleetMember, ScaleDirection, WorkloadConfig};
use crate::domain::ports::RemoteExec;

/// Keeps the probe workload in the state the current direction needs.
pub struct WorkloadSupervisor {
    remote: Arc<dyn RemoteExec>,
    config: WorkloadConfig,
    /// Wait between dispatching the check command and reading its output.
    output_delay: std::time::Duration,
    max_concurrency: usize,
}

impl WorkloadSupervisor {
    pub fn new(
        remote: Arc<dyn RemoteExec>,
        config: WorkloadConfig,
        output_delay: std::time::Duration,
        max_concurrency: usize,
    ) -> Self {
        Self {
            remote,
            config,
            output_delay,
            max_concurrency: max_concurrency.max(1),
        }
    }

    /// Whether the workload process is currently running on a member.
    pub async fn is_running(&self, member_id: &str) -> VerifyResult<bool> {
        let handle = self
            .remote
            .run_command(member_id, &self.config.check_command)
            .await?;
        tokio::time::sleep(self.output_delay).await;
        let output = self.remote.command_output(&handle, member_id).await?;
        Ok(!output.trim().is_empty())
    }

    /// Start the workload iff it is not already running.
    ///
    /// Returns whether a start command was issued, so callers (and
    /// tests) can assert idempotence.
    pub async fn ensure_running(&self, member_id: &str) -> VerifyResult<bool> {
        if self.is_running(member_id).await? {
            debug!(member_id, "workload already running");
            return Ok(false);
        }
        self.remote
            .run_command(member_id, &self.config.start_command)
            .await?;
        debug!(member_id, "workload started");
        Ok(true)
    }

    /// Stop the workload. Fire-and-forget; output is never fetched.
    pub async fn stop(&self, member_id: &str) -> VerifyResult<()> {
        self.remote
            .run_command(member_id, &self.config.stop_command)
            .await?;
        debug!(member_id, "workload stop issued");
        Ok(())
    }

    /// Enforce the workload state the direction requires on every
    /// member, with bounded concurrency. Per-member errors are logged
    /// and swallowed.
    pub async fn enforce(self: &Arc<Self>, direction: ScaleDirection, members: &[FleetMember]) {
        let semaphore = Arc::new(Semaphore::new(self.max_concurrency));
        let mut handles = vec![];

        for member in members {
            let permit = match semaphore.clone().acquire_owned().await {
                Ok(p) => p,
                Err(_) => return, // semaphore never closed in practice
            };
            let supervisor = self.clone();
            let member_id = member.id.clone();

            handles.push(tokio::spawn(async move {
                let _permit = permit;
                let result = match direction {
                    ScaleDirection::ScaleOut => {
                        supervisor.ensure_running(&member_id).await.map(|_| ())
                    }
                    ScaleDirection::ScaleIn => supervisor.stop(&member_id).await,
                };
                if let Err(e) = result {
                    warn!(member_id = %member_id, error = %e, "workload enforcement failed");
                }
            }));
        }

        join_all(handles).await;
    }
}
