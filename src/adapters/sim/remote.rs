//! Remote execution simulator.
//!
//! Recognizes exactly the scripts the verifier renders from its config
//! (the same templates are shared through [`ProbeConfig`] and
//! [`WorkloadConfig`]), and models the observable side effects: a
//! per-member workload process and a shared file system every member
//! sees, with an optional per-member divergence overlay for fault
//! injection.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::errors::{PortError, VerifyResult};
use crate::domain::models::{ProbeConfig, WorkloadConfig};
use crate::domain::ports::{CommandHandle, RemoteExec};

/// The shared file system as the simulated members see it.
///
/// `base` is replicated to everyone; `extras` holds files only one
/// member sees, which is how tests inject a cross-member mismatch.
#[derive(Default)]
pub struct SimSharedFs {
    base: RwLock<BTreeSet<String>>,
    extras: RwLock<HashMap<String, BTreeSet<String>>>,
}

impl SimSharedFs {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Write a file visible to every member.
    pub async fn write(&self, name: impl Into<String>) {
        self.base.write().await.insert(name.into());
    }

    /// Plant a file only `member_id` sees.
    pub async fn plant_extra(&self, member_id: impl Into<String>, name: impl Into<String>) {
        self.extras
            .write()
            .await
            .entry(member_id.into())
            .or_default()
            .insert(name.into());
    }

    async fn view_for(&self, member_id: &str) -> BTreeSet<String> {
        let mut view = self.base.read().await.clone();
        if let Some(extra) = self.extras.read().await.get(member_id) {
            view.extend(extra.iter().cloned());
        }
        view
    }
}

/// Deterministic in-process [`RemoteExec`].
pub struct SimRemoteExec {
    workload: WorkloadConfig,
    probe: ProbeConfig,
    fs: Arc<SimSharedFs>,
    running: RwLock<HashSet<String>>,
    start_counts: RwLock<HashMap<String, u32>>,
    outputs: RwLock<HashMap<Uuid, String>>,
    unreachable: RwLock<HashSet<String>>,
}

impl SimRemoteExec {
    pub fn new(workload: WorkloadConfig, probe: ProbeConfig, fs: Arc<SimSharedFs>) -> Self {
        Self {
            workload,
            probe,
            fs,
            running: RwLock::new(HashSet::new()),
            start_counts: RwLock::new(HashMap::new()),
            outputs: RwLock::new(HashMap::new()),
            unreachable: RwLock::new(HashSet::new()),
        }
    }

    /// Make every command to this member fail, like a dead instance.
    pub async fn mark_unreachable(&self, member_id: impl Into<String>) {
        self.unreachable.write().await.insert(member_id.into());
    }

    /// How many workload start commands this member has received.
    pub async fn start_count(&self, member_id: &str) -> u32 {
        self.start_counts
            .read()
            .await
            .get(member_id)
            .copied()
            .unwrap_or(0)
    }

    pub async fn workload_running(&self, member_id: &str) -> bool {
        self.running.read().await.contains(member_id)
    }

    /// Render the member's `mount` + `ls -la` view of the shared mount.
    async fn render_listing(&self, member_id: &str) -> String {
        let mut out = format!(
            "fs-sim.shared:/ on {} type nfs4 (rw,relatime,vers=4.1)\n\n",
            self.probe.mount_point
        );
        out.push_str("total 8\n");
        out.push_str("drwxr-xr-x 2 root root 6144 Jan  1 00:00 .\n");
        out.push_str("drwxr-xr-x 3 root root 4096 Jan  1 00:00 ..\n");
        for name in self.fs.view_for(member_id).await {
            out.push_str(&format!("-rw-r--r-- 1 root root   42 Jan  1 00:00 {name}\n"));
        }
        out
    }

    async fn interpret(&self, member_id: &str, script: &str) -> VerifyResult<String> {
        if script == self.workload.check_command {
            let running = self.running.read().await.contains(member_id);
            return Ok(if running { "4242\n".to_string() } else { String::new() });
        }
        if script == self.workload.start_command {
            self.running.write().await.insert(member_id.to_string());
            *self
                .start_counts
                .write()
                .await
                .entry(member_id.to_string())
                .or_insert(0) += 1;
            return Ok(String::new());
        }
        if script == self.workload.stop_command {
            self.running.write().await.remove(member_id);
            return Ok(String::new());
        }
        if script == self.probe.marker_write_script(member_id) {
            self.fs.write(self.probe.marker_file(member_id)).await;
            return Ok(String::new());
        }
        if script == self.probe.collect_script() {
            return Ok(self.render_listing(member_id).await);
        }
        Err(PortError::RemoteCommand {
            member: member_id.to_string(),
            message: format!("unrecognized script: {script}"),
        }
        .into())
    }
}

#[async_trait]
impl RemoteExec for SimRemoteExec {
    async fn run_command(&self, member_id: &str, script: &str) -> VerifyResult<CommandHandle> {
        if self.unreachable.read().await.contains(member_id) {
            return Err(PortError::RemoteCommand {
                member: member_id.to_string(),
                message: "member unreachable".to_string(),
            }
            .into());
        }

        let output = self.interpret(member_id, script).await?;
        let handle = CommandHandle { id: Uuid::new_v4() };
        self.outputs.write().await.insert(handle.id, output);
        Ok(handle)
    }

    async fn command_output(
        &self,
        handle: &CommandHandle,
        member_id: &str,
    ) -> VerifyResult<String> {
        self.outputs
            .read()
            .await
            .get(&handle.id)
            .cloned()
            .ok_or_else(|| {
                PortError::RemoteCommand {
                    member: member_id.to_string(),
                    message: format!("no output recorded for command {}", handle.id),
                }
                .into()
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn remote() -> SimRemoteExec {
        SimRemoteExec::new(WorkloadConfig::default(), ProbeConfig::default(), SimSharedFs::new())
    }

    #[tokio::test]
    async fn check_reflects_workload_state() {
        let remote = remote();
        let check = WorkloadConfig::default().check_command;
        let start = WorkloadConfig::default().start_command;

        let handle = remote.run_command("sim-0001", &check).await.unwrap();
        assert!(remote.command_output(&handle, "sim-0001").await.unwrap().is_empty());

        remote.run_command("sim-0001", &start).await.unwrap();
        let handle = remote.run_command("sim-0001", &check).await.unwrap();
        assert!(!remote.command_output(&handle, "sim-0001").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn marker_writes_are_visible_in_listings() {
        let remote = remote();
        let probe = ProbeConfig::default();

        remote
            .run_command("sim-0001", &probe.marker_write_script("sim-0001"))
            .await
            .unwrap();
        let handle = remote.run_command("sim-0002", &probe.collect_script()).await.unwrap();
        let listing = remote.command_output(&handle, "sim-0002").await.unwrap();

        assert!(listing.contains("probefile_sim-0001"));
        assert!(listing.contains("nfs4"));
    }

    #[tokio::test]
    async fn unreachable_members_fail_every_command() {
        let remote = remote();
        remote.mark_unreachable("sim-0001").await;
        let err = remote
            .run_command("sim-0001", &WorkloadConfig::default().check_command)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("unreachable"));
    }

    #[tokio::test]
    async fn unknown_scripts_are_rejected() {
        let remote = remote();
        assert!(remote.run_command("sim-0001", "rm -rf /").await.is_err());
    }
}
