//! Workload supervisor idempotence and direction handling.

use std::sync::Arc;
use std::time::Duration;

use fleetcheck::adapters::sim::{SimRemoteExec, SimSharedFs};
use fleetcheck::domain::models::{FleetMember, ProbeConfig, ScaleDirection, WorkloadConfig};
use fleetcheck::services::WorkloadSupervisor;

fn fixture() -> (Arc<SimRemoteExec>, Arc<WorkloadSupervisor>) {
    let remote = Arc::new(SimRemoteExec::new(
        WorkloadConfig::default(),
        ProbeConfig::default(),
        SimSharedFs::new(),
    ));
    let supervisor = Arc::new(WorkloadSupervisor::new(
        remote.clone(),
        WorkloadConfig::default(),
        Duration::from_millis(100),
        4,
    ));
    (remote, supervisor)
}

#[tokio::test(start_paused = true)]
async fn ensure_running_is_idempotent() {
    let (remote, supervisor) = fixture();

    assert!(supervisor.ensure_running("sim-0001").await.unwrap());
    // Second call observes the running workload and must not start again.
    assert!(!supervisor.ensure_running("sim-0001").await.unwrap());
    assert_eq!(remote.start_count("sim-0001").await, 1);
}

#[tokio::test(start_paused = true)]
async fn stop_clears_the_workload() {
    let (remote, supervisor) = fixture();

    supervisor.ensure_running("sim-0001").await.unwrap();
    assert!(remote.workload_running("sim-0001").await);

    supervisor.stop("sim-0001").await.unwrap();
    assert!(!remote.workload_running("sim-0001").await);
    assert!(!supervisor.is_running("sim-0001").await.unwrap());
}

#[tokio::test(start_paused = true)]
async fn enforce_swallows_unreachable_members() {
    let (remote, supervisor) = fixture();
    remote.mark_unreachable("sim-0002").await;

    let members = vec![FleetMember::running("sim-0001"), FleetMember::running("sim-0002")];
    supervisor.enforce(ScaleDirection::ScaleOut, &members).await;

    // The reachable member still got its workload.
    assert!(remote.workload_running("sim-0001").await);
    assert!(!remote.workload_running("sim-0002").await);
}

#[tokio::test(start_paused = true)]
async fn enforce_scale_in_stops_everyone() {
    let (remote, supervisor) = fixture();
    let members = vec![FleetMember::running("sim-0001"), FleetMember::running("sim-0002")];

    supervisor.enforce(ScaleDirection::ScaleOut, &members).await;
    supervisor.enforce(ScaleDirection::ScaleIn, &members).await;

    assert!(!remote.workload_running("sim-0001").await);
    assert!(!remote.workload_running("sim-0002").await);
}
