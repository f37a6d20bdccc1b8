//! Remote execution port - interface for running scripts on members.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::errors::VerifyResult;

/// Handle to a dispatched remote command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandHandle {
    pub id: Uuid,
}

/// Trait for the remote command channel.
///
/// Commands are fire-and-forget from the caller's perspective unless
/// output is explicitly fetched. Fetching too early may observe an
/// empty buffer, so callers wait a configured delay first.
#[async_trait]
pub trait RemoteExec: Send + Sync {
    /// Dispatch a shell script to one member.
    async fn run_command(&self, member_id: &str, script: &str) -> VerifyResult<CommandHandle>;

    /// Fetch the stdout captured for a previously dispatched command.
    async fn command_output(
        &self,
        handle: &CommandHandle,
        member_id: &str,
    ) -> VerifyResult<String>;
}
