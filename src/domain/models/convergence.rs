//! Convergence targets and outcomes.
//!
//! A target describes one polling cycle: which direction the fleet is
//! expected to move, the member count that ends the cycle, and the
//! timing bounds. Targets are immutable once a cycle starts.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::errors::{VerifyError, VerifyResult};
use crate::domain::models::FleetMember;

/// Which way the fleet is expected to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScaleDirection {
    ScaleOut,
    ScaleIn,
}

impl ScaleDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ScaleOut => "scale_out",
            Self::ScaleIn => "scale_in",
        }
    }

    /// Whether an observed member count satisfies the target.
    ///
    /// Scale-out converges at `count >= target`; scale-in at
    /// `count <= target`, with no grace for transient overshoot.
    pub fn satisfied(&self, count: usize, target: usize) -> bool {
        match self {
            Self::ScaleOut => count >= target,
            Self::ScaleIn => count <= target,
        }
    }
}

impl std::fmt::Display for ScaleDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Phases of the end-to-end verification cycle.
///
/// Strictly sequential: each phase depends on the previous phase's
/// postcondition. `Aborted` is reachable from any phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Init,
    ScaleOut,
    Probe,
    Verify,
    ScaleIn,
    Report,
    Done,
    Aborted,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::ScaleOut => "scale_out",
            Self::Probe => "probe",
            Self::Verify => "verify",
            Self::ScaleIn => "scale_in",
            Self::Report => "report",
            Self::Done => "done",
            Self::Aborted => "aborted",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One polling cycle's parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConvergenceTarget {
    pub direction: ScaleDirection,
    pub target_count: usize,
    pub timeout: Duration,
    pub poll_interval: Duration,
}

impl ConvergenceTarget {
    pub fn new(
        direction: ScaleDirection,
        target_count: usize,
        timeout: Duration,
        poll_interval: Duration,
    ) -> Self {
        Self {
            direction,
            target_count,
            timeout,
            poll_interval,
        }
    }

    /// Reject targets that could never terminate or never poll.
    pub fn validate(&self) -> VerifyResult<()> {
        if self.timeout.is_zero() {
            return Err(VerifyError::InvalidTarget("timeout must be positive".into()));
        }
        if self.poll_interval.is_zero() {
            return Err(VerifyError::InvalidTarget(
                "poll interval must be positive".into(),
            ));
        }
        if self.poll_interval > self.timeout {
            return Err(VerifyError::InvalidTarget(format!(
                "poll interval ({}s) exceeds timeout ({}s)",
                self.poll_interval.as_secs(),
                self.timeout.as_secs()
            )));
        }
        Ok(())
    }
}

/// What a polling cycle ended with: the last observed membership and
/// whether the target was reached before the timeout.
#[derive(Debug, Clone)]
pub struct ConvergenceOutcome {
    pub members: Vec<FleetMember>,
    pub converged: bool,
    /// Wall-clock time spent polling.
    pub waited: Duration,
}
