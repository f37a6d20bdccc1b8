//! Simulator adapters.
//!
//! Deterministic in-process implementations of all three ports, used
//! by the `simulate` CLI command and by the integration tests. They
//! model just enough provider behavior to exercise every phase of the
//! verification cycle, including fault injection (frozen fleets,
//! unreachable members, divergent shared-fs views).

pub mod fleet;
pub mod remote;
pub mod storage;

pub use fleet::SimFleetControl;
pub use remote::{SimRemoteExec, SimSharedFs};
pub use storage::MemoryBlobStore;
