//! Verifier configuration.
//!
//! The whole run is parameterized by one explicit struct handed to the
//! orchestrator at construction; there is no global client or bucket
//! state. Script templates live here so the verifier and the simulator
//! render identical command text.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Main configuration structure for a verification run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct VerifierConfig {
    /// Tag identifying the fleet under one scaling policy.
    #[serde(default = "default_fleet_tag")]
    pub fleet_tag: String,

    /// Blob storage bucket holding per-member observations.
    #[serde(default = "default_bucket")]
    pub bucket: String,

    /// Key prefix under which observations are written.
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,

    /// Scale-out phase parameters.
    #[serde(default = "ScalePhaseConfig::default_scale_out")]
    pub scale_out: ScalePhaseConfig,

    /// Scale-in phase parameters.
    #[serde(default = "ScalePhaseConfig::default_scale_in")]
    pub scale_in: ScalePhaseConfig,

    /// Wait after issuing observation writes before trusting reads,
    /// to accommodate eventually consistent storage.
    #[serde(default = "default_settle_delay_seconds")]
    pub settle_delay_seconds: u64,

    /// Wait between sending a remote command and fetching its output.
    #[serde(default = "default_command_output_delay_ms")]
    pub command_output_delay_ms: u64,

    /// Upper bound on concurrent per-member remote calls within a phase.
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,

    /// Trailing window of controller activity included in the report.
    #[serde(default = "default_report_window_minutes")]
    pub report_window_minutes: i64,

    /// Synthetic workload commands.
    #[serde(default)]
    pub workload: WorkloadConfig,

    /// Shared-storage probe commands and normalization patterns.
    #[serde(default)]
    pub probe: ProbeConfig,
}

fn default_fleet_tag() -> String {
    "fleetcheck".to_string()
}

fn default_bucket() -> String {
    "fleetcheck-observations".to_string()
}

fn default_key_prefix() -> String {
    "fleet-check".to_string()
}

const fn default_settle_delay_seconds() -> u64 {
    10
}

const fn default_command_output_delay_ms() -> u64 {
    2000
}

const fn default_max_concurrency() -> usize {
    8
}

const fn default_report_window_minutes() -> i64 {
    5
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            fleet_tag: default_fleet_tag(),
            bucket: default_bucket(),
            key_prefix: default_key_prefix(),
            scale_out: ScalePhaseConfig::default_scale_out(),
            scale_in: ScalePhaseConfig::default_scale_in(),
            settle_delay_seconds: default_settle_delay_seconds(),
            command_output_delay_ms: default_command_output_delay_ms(),
            max_concurrency: default_max_concurrency(),
            report_window_minutes: default_report_window_minutes(),
            workload: WorkloadConfig::default(),
            probe: ProbeConfig::default(),
        }
    }
}

impl VerifierConfig {
    pub fn settle_delay(&self) -> Duration {
        Duration::from_secs(self.settle_delay_seconds)
    }

    pub fn command_output_delay(&self) -> Duration {
        Duration::from_millis(self.command_output_delay_ms)
    }
}

/// Parameters for one convergence phase (scale-out or scale-in).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ScalePhaseConfig {
    /// Member count that ends the phase.
    pub target_count: usize,

    /// Wall-clock budget for convergence.
    pub timeout_seconds: u64,

    /// Sleep between membership polls.
    pub poll_interval_seconds: u64,
}

impl ScalePhaseConfig {
    pub fn default_scale_out() -> Self {
        Self {
            target_count: 4,
            timeout_seconds: 600,
            poll_interval_seconds: 10,
        }
    }

    pub fn default_scale_in() -> Self {
        Self {
            target_count: 2,
            timeout_seconds: 600,
            poll_interval_seconds: 10,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_seconds)
    }
}

/// Commands for the synthetic workload that keeps scaling pressure on.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct WorkloadConfig {
    /// Prints a non-empty line iff the workload is running.
    #[serde(default = "default_check_command")]
    pub check_command: String,

    /// Starts the workload in the background.
    #[serde(default = "default_start_command")]
    pub start_command: String,

    /// Stops the workload.
    #[serde(default = "default_stop_command")]
    pub stop_command: String,
}

fn default_check_command() -> String {
    "pgrep stress".to_string()
}

fn default_start_command() -> String {
    "stress --cpu 2 --timeout 600 &".to_string()
}

fn default_stop_command() -> String {
    "pkill stress".to_string()
}

impl Default for WorkloadConfig {
    fn default() -> Self {
        Self {
            check_command: default_check_command(),
            start_command: default_start_command(),
            stop_command: default_stop_command(),
        }
    }
}

/// Probe scripts touching the shared file system, plus the patterns the
/// normalizer uses to pick marker tokens out of their output.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ProbeConfig {
    /// Where the shared file system is mounted on each member.
    #[serde(default = "default_mount_point")]
    pub mount_point: String,

    /// Substring selecting the shared mount in `mount` output.
    #[serde(default = "default_mount_filter")]
    pub mount_filter: String,

    /// File-name prefix identifying marker files in listings.
    #[serde(default = "default_marker_prefix")]
    pub marker_prefix: String,

    /// Substrings marking listing lines with no bearing on consistency
    /// (mount-protocol noise and the like).
    #[serde(default = "default_ignore_substrings")]
    pub ignore_substrings: Vec<String>,
}

fn default_mount_point() -> String {
    "/mnt/shared".to_string()
}

fn default_mount_filter() -> String {
    "nfs".to_string()
}

fn default_marker_prefix() -> String {
    "probefile_".to_string()
}

fn default_ignore_substrings() -> Vec<String> {
    vec!["nfs4".to_string()]
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            mount_point: default_mount_point(),
            mount_filter: default_mount_filter(),
            marker_prefix: default_marker_prefix(),
            ignore_substrings: default_ignore_substrings(),
        }
    }
}

impl ProbeConfig {
    /// Marker file name a given member writes.
    pub fn marker_file(&self, member_id: &str) -> String {
        format!("{}{}", self.marker_prefix, member_id)
    }

    /// Script writing this member's marker file into the shared mount.
    pub fn marker_write_script(&self, member_id: &str) -> String {
        format!(
            "echo \"probe from $HOSTNAME\" > {}/{}",
            self.mount_point,
            self.marker_file(member_id)
        )
    }

    /// Script collecting the member's view of the shared mount:
    /// matching mount lines, a blank separator, then a full listing.
    pub fn collect_script(&self) -> String {
        format!(
            "(mount | grep {} && echo && ls -la {})",
            self.mount_filter, self.mount_point
        )
    }
}
