//! Cross-member consistency checking.
//!
//! Every member runs the same collect probe; its raw output is
//! persisted to shared storage under `prefix/member_id`, read back
//! after a settle delay, normalized, and compared against the first
//! member's view. This is a diagnostic assertion, not a repair
//! mechanism: the first mismatch fails the whole check.

use std::sync::Arc;

use futures::future::join_all;
use tokio::sync::Semaphore;
use tracing::{info, warn};

use crate::domain::errors::{VerifyError, VerifyResult};
use crate::domain::models::{FleetMember, Observation, VerifierConfig};
use crate::domain::ports::{BlobStore, RemoteExec};
use crate::services::normalize::ObservationNormalizer;

/// Collects per-member observations and verifies they agree.
pub struct ConsistencyChecker {
    remote: Arc<dyn RemoteExec>,
    store: Arc<dyn BlobStore>,
    normalizer: Arc<dyn ObservationNormalizer>,
    config: VerifierConfig,
}

impl ConsistencyChecker {
    pub fn new(
        remote: Arc<dyn RemoteExec>,
        store: Arc<dyn BlobStore>,
        normalizer: Arc<dyn ObservationNormalizer>,
        config: VerifierConfig,
    ) -> Self {
        Self {
            remote,
            store,
            normalizer,
            config,
        }
    }

    /// Remove every observation left under the prefix by prior cycles.
    /// Idempotent: absent keys are not an error.
    pub async fn clear_observations(&self) -> VerifyResult<usize> {
        let keys = self
            .store
            .list(&self.config.bucket, &self.config.key_prefix)
            .await?;
        for key in &keys {
            self.store.delete(&self.config.bucket, key).await?;
        }
        info!(cleared = keys.len(), prefix = %self.config.key_prefix, "prior observations cleared");
        Ok(keys.len())
    }

    /// Run the collect probe on each member and persist the raw output.
    ///
    /// Per-member failures are logged and skipped: a missing write
    /// surfaces as an observation shortfall when reads begin, which is
    /// the aggregate signal this phase is judged on. Returns how many
    /// observations were stored.
    pub async fn collect(&self, members: &[FleetMember]) -> VerifyResult<usize> {
        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrency.max(1)));
        let script = self.config.probe.collect_script();
        let mut handles = vec![];

        for member in members {
            let permit = match semaphore.clone().acquire_owned().await {
                Ok(p) => p,
                Err(_) => break,
            };
            let remote = self.remote.clone();
            let store = self.store.clone();
            let script = script.clone();
            let member_id = member.id.clone();
            let bucket = self.config.bucket.clone();
            let key = Observation::storage_key(&self.config.key_prefix, &member.id);
            let output_delay = self.config.command_output_delay();

            handles.push(tokio::spawn(async move {
                let _permit = permit;
                let capture = async {
                    let handle = remote.run_command(&member_id, &script).await?;
                    tokio::time::sleep(output_delay).await;
                    let stdout = remote.command_output(&handle, &member_id).await?;
                    store.put(&bucket, &key, stdout.into_bytes()).await
                };
                match capture.await {
                    Ok(()) => true,
                    Err(e) => {
                        warn!(member_id = %member_id, error = %e, "observation collection failed");
                        false
                    }
                }
            }));
        }

        let stored = join_all(handles)
            .await
            .into_iter()
            .filter(|r| matches!(r, Ok(true)))
            .count();
        info!(stored, expected = members.len(), "observations collected");
        Ok(stored)
    }

    /// Read back all observations and compare them pairwise-equal
    /// against the first member's normalized view.
    pub async fn compare(&self, members: &[FleetMember]) -> VerifyResult<()> {
        let keys = self
            .store
            .list(&self.config.bucket, &self.config.key_prefix)
            .await?;
        if keys.len() < members.len() {
            return Err(VerifyError::ObservationShortfall {
                expected: members.len(),
                found: keys.len(),
                prefix: self.config.key_prefix.clone(),
            });
        }

        let Some(first) = members.first() else {
            return Ok(()); // empty fleet is vacuously consistent
        };

        let baseline = self.fetch_normalized(&first.id).await?;
        for member in &members[1..] {
            let observed = self.fetch_normalized(&member.id).await?;
            if observed != baseline {
                return Err(VerifyError::ObservationMismatch {
                    member_id: member.id.clone(),
                    baseline,
                    observed,
                });
            }
        }

        info!(members = members.len(), "all members observe identical shared state");
        Ok(())
    }

    /// Full check: collect, wait out storage settle, then compare.
    pub async fn collect_and_compare(&self, members: &[FleetMember]) -> VerifyResult<()> {
        self.collect(members).await?;
        tokio::time::sleep(self.config.settle_delay()).await;
        self.compare(members).await
    }

    async fn fetch_normalized(&self, member_id: &str) -> VerifyResult<Vec<String>> {
        let key = Observation::storage_key(&self.config.key_prefix, member_id);
        let bytes = self.store.get(&self.config.bucket, &key).await?;
        let raw = String::from_utf8_lossy(&bytes);
        Ok(self.normalizer.normalize(&raw))
    }
}
