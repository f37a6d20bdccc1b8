//! Error taxonomy for the verifier.
//!
//! Collaborator failures surface as [`PortError`]; everything the
//! verification cycle itself can decide to fail on is a [`VerifyError`].
//! No variant is retried automatically: re-running the whole cycle is
//! the prescribed recovery.

use thiserror::Error;

use crate::domain::models::convergence::Phase;

pub type VerifyResult<T> = Result<T, VerifyError>;

/// Errors returned by the external collaborators behind the ports.
#[derive(Error, Debug)]
pub enum PortError {
    #[error("fleet control error: {0}")]
    FleetControl(String),

    #[error("remote command failed on {member}: {message}")]
    RemoteCommand { member: String, message: String },

    #[error("storage error: {0}")]
    Storage(String),
}

/// Errors produced by the verification cycle.
#[derive(Error, Debug)]
pub enum VerifyError {
    #[error(transparent)]
    Port(#[from] PortError),

    #[error(
        "fleet did not converge: {direction} toward {target} stuck at {observed} after {waited_secs}s"
    )]
    ConvergenceTimeout {
        direction: &'static str,
        target: usize,
        observed: usize,
        waited_secs: u64,
    },

    #[error("observation shortfall under {prefix}: expected {expected}, found {found}")]
    ObservationShortfall {
        expected: usize,
        found: usize,
        prefix: String,
    },

    #[error("observation mismatch on {member_id}: {observed:?} differs from baseline {baseline:?}")]
    ObservationMismatch {
        member_id: String,
        baseline: Vec<String>,
        observed: Vec<String>,
    },

    #[error("invalid convergence target: {0}")]
    InvalidTarget(String),

    #[error("{phase} phase failed: {source}")]
    PhaseFailed {
        phase: Phase,
        #[source]
        source: Box<VerifyError>,
    },
}

impl VerifyError {
    /// Wrap an error with the phase it aborted.
    pub fn in_phase(phase: Phase, source: VerifyError) -> Self {
        Self::PhaseFailed {
            phase,
            source: Box::new(source),
        }
    }

    /// The phase this error aborted, if it carries one.
    pub fn failed_phase(&self) -> Option<Phase> {
        match self {
            Self::PhaseFailed { phase, .. } => Some(*phase),
            _ => None,
        }
    }
}
