//! End-to-end verification cycles against the full simulator stack.

use std::sync::Arc;
use std::time::Duration;

use fleetcheck::adapters::sim::{MemoryBlobStore, SimFleetControl, SimRemoteExec, SimSharedFs};
use fleetcheck::domain::models::{Phase, VerifierConfig};
use fleetcheck::domain::ports::BlobStore;
use fleetcheck::services::VerificationRun;
use fleetcheck::VerifyError;

struct Fixture {
    fleet: Arc<SimFleetControl>,
    remote: Arc<SimRemoteExec>,
    store: Arc<MemoryBlobStore>,
    fs: Arc<SimSharedFs>,
    config: VerifierConfig,
}

impl Fixture {
    /// Two running members, controller moves one step per poll,
    /// default targets (scale out to 4, back in to 2).
    fn new() -> Self {
        Self::with_fleet(SimFleetControl::new(2, 1))
    }

    fn with_fleet(fleet: SimFleetControl) -> Self {
        let config = VerifierConfig::default();
        let fs = SimSharedFs::new();
        Self {
            fleet: Arc::new(fleet),
            remote: Arc::new(SimRemoteExec::new(
                config.workload.clone(),
                config.probe.clone(),
                fs.clone(),
            )),
            store: Arc::new(MemoryBlobStore::new()),
            fs,
            config,
        }
    }

    fn run(&self) -> VerificationRun {
        VerificationRun::new(
            self.fleet.clone(),
            self.remote.clone(),
            self.store.clone(),
            self.config.clone(),
        )
    }
}

#[tokio::test(start_paused = true)]
async fn full_cycle_succeeds_with_consistent_fleet() {
    let fixture = Fixture::new();

    // A stale observation from a previous cycle must not interfere.
    fixture
        .store
        .put(&fixture.config.bucket, "fleet-check/sim-stale", b"old".to_vec())
        .await
        .unwrap();

    let report = fixture.run().run().await.unwrap();

    assert_eq!(report.peak_members.len(), 4);
    assert_eq!(report.final_member_count, 2);
    // One member joins per poll: 2 -> 4 within four poll intervals.
    assert!(report.scale_out_waited <= Duration::from_secs(40));
    assert!(!report.activities.is_empty());
    assert!(report
        .activities
        .iter()
        .any(|a| a.description.contains("desired capacity")));

    // Exactly one observation per peak member; the stale key is gone.
    assert_eq!(
        fixture
            .store
            .object_count(&fixture.config.bucket, &fixture.config.key_prefix)
            .await,
        4
    );
    assert!(fixture
        .store
        .get(&fixture.config.bucket, "fleet-check/sim-stale")
        .await
        .is_err());
}

#[tokio::test(start_paused = true)]
async fn divergent_member_fails_verify_and_is_named() {
    let fixture = Fixture::new();
    // Only sim-0002 sees this file: a replication fault.
    fixture.fs.plant_extra("sim-0002", "probefile_ghost").await;

    let err = fixture.run().run().await.unwrap_err();
    let VerifyError::PhaseFailed { phase, source } = err else {
        panic!("expected a phase failure, got: {err}");
    };
    assert_eq!(phase, Phase::Verify);

    match *source {
        VerifyError::ObservationMismatch {
            ref member_id,
            ref baseline,
            ref observed,
        } => {
            assert_eq!(member_id, "sim-0002");
            assert!(observed.contains(&"probefile_ghost".to_string()));
            assert!(!baseline.contains(&"probefile_ghost".to_string()));
        }
        other => panic!("expected an observation mismatch, got: {other}"),
    }
}

#[tokio::test(start_paused = true)]
async fn frozen_fleet_aborts_in_scale_out() {
    let fixture = Fixture::with_fleet(SimFleetControl::frozen(2));

    let err = fixture.run().run().await.unwrap_err();
    assert_eq!(err.failed_phase(), Some(Phase::ScaleOut));
    assert!(err.to_string().contains("scale_out phase failed"));
}

#[tokio::test(start_paused = true)]
async fn unreachable_member_surfaces_as_observation_shortfall() {
    let fixture = Fixture::new();
    fixture.remote.mark_unreachable("sim-0001").await;

    let err = fixture.run().run().await.unwrap_err();
    let VerifyError::PhaseFailed { phase, source } = err else {
        panic!("expected a phase failure, got: {err}");
    };
    assert_eq!(phase, Phase::Verify);

    match *source {
        VerifyError::ObservationShortfall { expected, found, .. } => {
            assert_eq!(expected, 4);
            assert_eq!(found, 3);
        }
        other => panic!("expected an observation shortfall, got: {other}"),
    }
}

#[tokio::test(start_paused = true)]
async fn scale_in_timeout_aborts_after_verify() {
    // Grows normally but the scale-in budget is far too small for the
    // per-poll step to drain the fleet.
    let mut fixture = Fixture::new();
    fixture.config.scale_in.target_count = 0;
    fixture.config.scale_in.timeout_seconds = 10;
    fixture.config.scale_in.poll_interval_seconds = 10;

    let err = fixture.run().run().await.unwrap_err();
    assert_eq!(err.failed_phase(), Some(Phase::ScaleIn));
}
