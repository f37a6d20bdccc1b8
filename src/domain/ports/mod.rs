//! Port trait definitions (Hexagonal Architecture)
//!
//! Async trait interfaces the verifier consumes, so every external
//! collaborator can be replaced by a test double or simulator:
//! - `FleetControl`: scaling controller (membership, capacity, history)
//! - `RemoteExec`: per-member shell command channel
//! - `BlobStore`: shared observation storage

pub mod blob_store;
pub mod fleet_control;
pub mod remote_exec;

pub use blob_store::BlobStore;
pub use fleet_control::FleetControl;
pub use remote_exec::{CommandHandle, RemoteExec};
