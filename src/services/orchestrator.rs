//! End-to-end verification run.
//!
//! A deterministic state machine driving the fleet through
//! `Init → ScaleOut → Probe → Verify → ScaleIn → Report → Done`.
//! Phases are strictly sequential because each depends on the previous
//! phase's postcondition: consistency cannot be verified before the
//! fleet has the expected membership, and scale-in must not start
//! while probes are still being asserted. Work inside a phase fans out
//! per member and is joined before the phase verdict.
//!
//! There is no in-flight cancellation: a phase timeout aborts the run,
//! and late remote commands are expected to be harmless.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use futures::future::join_all;
use tokio::sync::Semaphore;
use tracing::{error, info, warn};

use crate::domain::errors::{VerifyError, VerifyResult};
use crate::domain::models::{
    ActivityRecord, ConvergenceTarget, FleetMember, Phase, ScaleDirection, VerifierConfig,
};
use crate::domain::ports::{BlobStore, FleetControl, RemoteExec};
use crate::services::consistency::ConsistencyChecker;
use crate::services::normalize::{MarkerNormalizer, ObservationNormalizer};
use crate::services::poller::ConvergencePoller;
use crate::services::workload::WorkloadSupervisor;

/// What a completed run observed, for reporting.
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Member ids present when the scale-out target was reached.
    pub peak_members: Vec<String>,
    /// Running members after scale-in converged.
    pub final_member_count: usize,
    pub scale_out_waited: Duration,
    pub scale_in_waited: Duration,
    /// Controller activity within the trailing report window.
    pub activities: Vec<ActivityRecord>,
}

/// One full scale-out → verify → scale-in verification cycle.
pub struct VerificationRun {
    fleet: Arc<dyn FleetControl>,
    remote: Arc<dyn RemoteExec>,
    config: VerifierConfig,
    checker: ConsistencyChecker,
    workload: Arc<WorkloadSupervisor>,
}

impl VerificationRun {
    pub fn new(
        fleet: Arc<dyn FleetControl>,
        remote: Arc<dyn RemoteExec>,
        store: Arc<dyn BlobStore>,
        config: VerifierConfig,
    ) -> Self {
        let normalizer: Arc<dyn ObservationNormalizer> =
            Arc::new(MarkerNormalizer::from_probe_config(&config.probe));
        Self::with_normalizer(fleet, remote, store, config, normalizer)
    }

    /// Construct with a custom normalization heuristic.
    pub fn with_normalizer(
        fleet: Arc<dyn FleetControl>,
        remote: Arc<dyn RemoteExec>,
        store: Arc<dyn BlobStore>,
        config: VerifierConfig,
        normalizer: Arc<dyn ObservationNormalizer>,
    ) -> Self {
        let checker =
            ConsistencyChecker::new(remote.clone(), store, normalizer, config.clone());
        let workload = Arc::new(WorkloadSupervisor::new(
            remote.clone(),
            config.workload.clone(),
            config.command_output_delay(),
            config.max_concurrency,
        ));
        Self {
            fleet,
            remote,
            config,
            checker,
            workload,
        }
    }

    /// Execute the whole cycle. Any phase error aborts the run and is
    /// returned wrapped with the phase it failed in; the report phase
    /// only runs when no earlier phase aborted.
    pub async fn run(&self) -> VerifyResult<RunReport> {
        self.enter(Phase::Init);
        self.checker
            .clear_observations()
            .await
            .map_err(|e| self.abort(Phase::Init, e))?;

        self.enter(Phase::ScaleOut);
        let (members, scale_out_waited) = self
            .converge(ScaleDirection::ScaleOut)
            .await
            .map_err(|e| self.abort(Phase::ScaleOut, e))?;

        self.enter(Phase::Probe);
        self.write_markers(&members).await;

        self.enter(Phase::Verify);
        self.checker
            .collect_and_compare(&members)
            .await
            .map_err(|e| self.abort(Phase::Verify, e))?;

        self.enter(Phase::ScaleIn);
        let (final_members, scale_in_waited) = self
            .converge(ScaleDirection::ScaleIn)
            .await
            .map_err(|e| self.abort(Phase::ScaleIn, e))?;

        self.enter(Phase::Report);
        let since = Utc::now() - chrono::Duration::minutes(self.config.report_window_minutes);
        let activities = self
            .fleet
            .list_recent_activity(&self.config.fleet_tag, since)
            .await
            .map_err(|e| self.abort(Phase::Report, e))?;

        self.enter(Phase::Done);
        info!(
            peak = members.len(),
            final_count = final_members.len(),
            activities = activities.len(),
            "verification cycle succeeded"
        );

        Ok(RunReport {
            peak_members: members.into_iter().map(|m| m.id).collect(),
            final_member_count: final_members.len(),
            scale_out_waited,
            scale_in_waited,
            activities,
        })
    }

    /// Set the desired capacity for a direction and poll to convergence.
    ///
    /// The poller enforces the workload between polls: started during
    /// scale-out to keep scaling pressure on, stopped during scale-in
    /// to let the fleet drain.
    async fn converge(
        &self,
        direction: ScaleDirection,
    ) -> VerifyResult<(Vec<FleetMember>, Duration)> {
        let phase_config = match direction {
            ScaleDirection::ScaleOut => &self.config.scale_out,
            ScaleDirection::ScaleIn => &self.config.scale_in,
        };
        let target = ConvergenceTarget::new(
            direction,
            phase_config.target_count,
            phase_config.timeout(),
            phase_config.poll_interval(),
        );

        self.fleet
            .set_desired_capacity(&self.config.fleet_tag, target.target_count)
            .await?;

        let poller = ConvergencePoller::new(self.fleet.clone(), self.config.fleet_tag.clone())
            .with_workload(self.workload.clone());

        let outcome = poller.poll_until_converged(&target).await?;
        if !outcome.converged {
            return Err(VerifyError::ConvergenceTimeout {
                direction: direction.as_str(),
                target: target.target_count,
                observed: outcome.members.len(),
                waited_secs: outcome.waited.as_secs(),
            });
        }
        Ok((outcome.members, outcome.waited))
    }

    /// Have every member write its marker file into the shared mount.
    ///
    /// Fire-and-forget with bounded fan-out; visibility is asserted
    /// only after the settle delay in the verify phase, so slow
    /// remote-command delivery is tolerated here.
    async fn write_markers(&self, members: &[FleetMember]) {
        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrency.max(1)));
        let mut handles = vec![];

        for member in members {
            let permit = match semaphore.clone().acquire_owned().await {
                Ok(p) => p,
                Err(_) => break,
            };
            let remote = self.remote.clone();
            let member_id = member.id.clone();
            let script = self.config.probe.marker_write_script(&member.id);

            handles.push(tokio::spawn(async move {
                let _permit = permit;
                if let Err(e) = remote.run_command(&member_id, &script).await {
                    warn!(member_id = %member_id, error = %e, "marker write failed");
                }
            }));
        }

        join_all(handles).await;
    }

    fn enter(&self, phase: Phase) {
        info!(phase = phase.as_str(), fleet_tag = %self.config.fleet_tag, "entering phase");
    }

    fn abort(&self, phase: Phase, source: VerifyError) -> VerifyError {
        error!(phase = phase.as_str(), error = %source, "phase failed, aborting run");
        VerifyError::in_phase(phase, source)
    }
}
