//! Fleetcheck - Convergence Verifier for Auto-Scaling Fleets
//!
//! Fleetcheck drives a remote compute fleet through a
//! scale-out → consistency-check → scale-in cycle and asserts
//! invariants at each phase: the fleet reaches its target size within
//! a timeout, every member observes the same shared-storage state, and
//! the fleet returns to its floor.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture / Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): Models, port traits, and the error taxonomy
//! - **Service Layer** (`services`): Poller, consistency checker, orchestrator
//! - **Adapters** (`adapters`): Port implementations (in-process simulator)
//! - **Infrastructure Layer** (`infrastructure`): Configuration loading
//! - **CLI Layer** (`cli`): Command-line interface
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use fleetcheck::domain::models::VerifierConfig;
//! use fleetcheck::services::VerificationRun;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = VerifierConfig::default();
//!     // fleet, remote, store: your implementations of the port traits
//!     let run = VerificationRun::new(fleet, remote, store, config);
//!     let report = run.run().await?;
//!     println!("peak fleet size: {}", report.peak_members.len());
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::errors::{PortError, VerifyError, VerifyResult};
pub use domain::models::{
    ActivityRecord, ConvergenceOutcome, ConvergenceTarget, FleetMember, MemberState, Phase,
    ScaleDirection, VerifierConfig,
};
pub use domain::ports::{BlobStore, CommandHandle, FleetControl, RemoteExec};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{ConvergencePoller, MarkerNormalizer, RunReport, VerificationRun};
