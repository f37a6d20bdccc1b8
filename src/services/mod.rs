//! Service layer: the verification engine.

pub mod consistency;
pub mod normalize;
pub mod orchestrator;
pub mod poller;
pub mod workload;

pub use consistency::ConsistencyChecker;
pub use normalize::{MarkerNormalizer, ObservationNormalizer};
pub use orchestrator::{RunReport, VerificationRun};
pub use poller::ConvergencePoller;
pub use workload::WorkloadSupervisor;
