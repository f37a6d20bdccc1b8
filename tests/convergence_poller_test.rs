//! Convergence poller behavior against the fleet simulator.
//!
//! All tests run on a paused tokio clock: poll sleeps auto-advance, so
//! even multi-minute timeout budgets complete instantly and the
//! elapsed-time assertions are exact.

use std::sync::Arc;
use std::time::Duration;

use fleetcheck::adapters::sim::{SimFleetControl, SimRemoteExec, SimSharedFs};
use fleetcheck::domain::models::{ConvergenceTarget, ProbeConfig, ScaleDirection, WorkloadConfig};
use fleetcheck::domain::ports::FleetControl;
use fleetcheck::services::{ConvergencePoller, WorkloadSupervisor};

fn scale_out_target(count: usize) -> ConvergenceTarget {
    ConvergenceTarget::new(
        ScaleDirection::ScaleOut,
        count,
        Duration::from_secs(300),
        Duration::from_secs(10),
    )
}

#[tokio::test(start_paused = true)]
async fn scale_out_converges_when_fleet_grows_one_per_poll() {
    let fleet = Arc::new(SimFleetControl::new(2, 1));
    fleet.set_desired_capacity("sim", 4).await.unwrap();

    let poller = ConvergencePoller::new(fleet, "sim");
    let outcome = poller.poll_until_converged(&scale_out_target(4)).await.unwrap();

    assert!(outcome.converged);
    assert_eq!(outcome.members.len(), 4);
    // 2 -> 3 -> 4 takes one inter-poll sleep; well inside four intervals.
    assert!(outcome.waited <= Duration::from_secs(40));
}

#[tokio::test(start_paused = true)]
async fn scale_in_converges_at_or_below_target() {
    let fleet = Arc::new(SimFleetControl::new(4, 1));
    fleet.set_desired_capacity("sim", 2).await.unwrap();

    let poller = ConvergencePoller::new(fleet, "sim");
    let target = ConvergenceTarget::new(
        ScaleDirection::ScaleIn,
        2,
        Duration::from_secs(300),
        Duration::from_secs(10),
    );
    let outcome = poller.poll_until_converged(&target).await.unwrap();

    assert!(outcome.converged);
    assert!(outcome.members.len() <= 2);
}

#[tokio::test(start_paused = true)]
async fn timeout_returns_last_observed_membership_without_hanging() {
    let fleet = Arc::new(SimFleetControl::frozen(2));
    fleet.set_desired_capacity("sim", 4).await.unwrap();

    let poller = ConvergencePoller::new(fleet, "sim");
    let target = ConvergenceTarget::new(
        ScaleDirection::ScaleOut,
        4,
        Duration::from_secs(60),
        Duration::from_secs(10),
    );
    let outcome = poller.poll_until_converged(&target).await.unwrap();

    assert!(!outcome.converged);
    assert_eq!(outcome.members.len(), 2);
    assert!(outcome.waited >= Duration::from_secs(60));
    // Must give up no later than timeout + one poll interval.
    assert!(outcome.waited <= Duration::from_secs(70));
}

#[tokio::test(start_paused = true)]
async fn invalid_target_is_rejected_before_polling() {
    let fleet = Arc::new(SimFleetControl::new(2, 1));
    let poller = ConvergencePoller::new(fleet, "sim");
    let target = ConvergenceTarget::new(
        ScaleDirection::ScaleOut,
        4,
        Duration::ZERO,
        Duration::from_secs(10),
    );
    assert!(poller.poll_until_converged(&target).await.is_err());
}

#[tokio::test(start_paused = true)]
async fn workload_is_started_once_per_member_across_polls() {
    // Frozen fleet: the poller keeps polling (and enforcing) the same
    // two members until the timeout, so any non-idempotent start logic
    // would issue several starts per member.
    let fleet = Arc::new(SimFleetControl::frozen(2));
    let remote = Arc::new(SimRemoteExec::new(
        WorkloadConfig::default(),
        ProbeConfig::default(),
        SimSharedFs::new(),
    ));
    let workload = Arc::new(WorkloadSupervisor::new(
        remote.clone(),
        WorkloadConfig::default(),
        Duration::from_millis(100),
        4,
    ));

    let poller = ConvergencePoller::new(fleet, "sim").with_workload(workload);
    let target = ConvergenceTarget::new(
        ScaleDirection::ScaleOut,
        4,
        Duration::from_secs(45),
        Duration::from_secs(10),
    );
    let outcome = poller.poll_until_converged(&target).await.unwrap();
    assert!(!outcome.converged);

    for member in ["sim-0001", "sim-0002"] {
        assert!(remote.workload_running(member).await);
        assert_eq!(remote.start_count(member).await, 1);
    }
}
