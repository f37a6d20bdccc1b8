//! Run a full verification cycle against the in-process simulator.
//!
//! Real deployments embed the library and supply their own port
//! implementations; the simulator mode rehearses the whole cycle
//! deterministically and doubles as a smoke test of the wiring.

use std::sync::Arc;

use anyhow::Result;
use clap::Args;
use serde_json::json;

use crate::adapters::sim::{MemoryBlobStore, SimFleetControl, SimRemoteExec, SimSharedFs};
use crate::cli::display;
use crate::domain::models::VerifierConfig;
use crate::services::VerificationRun;

#[derive(Args, Debug)]
pub struct SimulateArgs {
    /// Members running before the cycle starts (default: scale-in target)
    #[arg(long)]
    pub initial: Option<usize>,

    /// Members the simulated controller launches or terminates per poll
    #[arg(long, default_value = "1")]
    pub step: usize,

    /// Freeze the simulated fleet so convergence times out
    #[arg(long)]
    pub freeze: bool,
}

pub async fn execute(args: SimulateArgs, config: VerifierConfig, json_mode: bool) -> Result<()> {
    let initial = args.initial.unwrap_or(config.scale_in.target_count);

    let fleet = if args.freeze {
        Arc::new(SimFleetControl::frozen(initial))
    } else {
        Arc::new(SimFleetControl::new(initial, args.step))
    };
    let remote = Arc::new(SimRemoteExec::new(
        config.workload.clone(),
        config.probe.clone(),
        SimSharedFs::new(),
    ));
    let store = Arc::new(MemoryBlobStore::new());

    let run = VerificationRun::new(fleet, remote, store, config);
    let report = run.run().await?;

    if json_mode {
        let payload = json!({
            "verdict": "pass",
            "peak_members": report.peak_members,
            "final_member_count": report.final_member_count,
            "scale_out_waited_secs": report.scale_out_waited.as_secs(),
            "scale_in_waited_secs": report.scale_in_waited.as_secs(),
            "activities": report.activities,
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        display::print_report(&report);
    }

    Ok(())
}
