//! Domain models: pure data types with no I/O.

pub mod config;
pub mod convergence;
pub mod fleet;
pub mod observation;

pub use config::{ProbeConfig, ScalePhaseConfig, VerifierConfig, WorkloadConfig};
pub use convergence::{ConvergenceOutcome, ConvergenceTarget, Phase, ScaleDirection};
pub use fleet::{ActivityRecord, FleetMember, MemberState};
pub use observation::Observation;
