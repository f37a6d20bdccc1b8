//! Command-line interface.

pub mod commands;
pub mod display;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use console::style;

use crate::cli::commands::simulate::SimulateArgs;

#[derive(Parser, Debug)]
#[command(name = "fleetcheck", version, about = "Convergence verifier for auto-scaling fleets")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to a configuration file (default: fleetcheck.yaml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Emit machine-readable JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the verification cycle against the in-process simulator
    Simulate(SimulateArgs),
    /// Print the effective configuration
    Config,
}

/// Print a failure and exit with the abort code.
pub fn handle_error(err: anyhow::Error, json_mode: bool) -> ! {
    if json_mode {
        let payload = serde_json::json!({
            "verdict": "fail",
            "error": format!("{err:#}"),
        });
        eprintln!("{}", serde_json::to_string_pretty(&payload).unwrap_or_default());
    } else {
        eprintln!("{} {err:#}", style("FAIL").red().bold());
    }
    std::process::exit(1);
}
