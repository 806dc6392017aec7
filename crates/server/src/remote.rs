use async_trait::async_trait;

use cadence_core::error::CoreError;
use cadence_core::types::{
    AgentId, AgentIdentifier, AgentInstance, AgentInstruction, AgentRuntimeInfo, JobIdentifier,
    JobResult, JobState,
};

/// The authoritative build repository the control plane reconciles against.
/// Calls may block on external I/O and may fail with `CoreError::Remote`.
#[async_trait]
pub trait BuildRepositoryRemote: Send + Sync {
    /// Process one heartbeat and decide whether the agent's current job must
    /// be cancelled.
    async fn ping(&self, info: &AgentRuntimeInfo) -> Result<AgentInstruction, CoreError>;

    /// Issue a fresh identity cookie for an agent that presented none.
    async fn get_cookie(
        &self,
        identifier: &AgentIdentifier,
        location: &str,
    ) -> Result<String, CoreError>;

    async fn report_current_status(
        &self,
        info: &AgentRuntimeInfo,
        job: &JobIdentifier,
        state: JobState,
    ) -> Result<(), CoreError>;

    async fn report_completing(
        &self,
        info: &AgentRuntimeInfo,
        job: &JobIdentifier,
        result: JobResult,
    ) -> Result<(), CoreError>;

    async fn report_completed(
        &self,
        info: &AgentRuntimeInfo,
        job: &JobIdentifier,
        result: JobResult,
    ) -> Result<(), CoreError>;
}

/// Resolves a stable agent id to its last known instance record. Used only on
/// disconnect, to mark the instance as out of contact.
#[async_trait]
pub trait AgentLookupService: Send + Sync {
    async fn find_agent(&self, uuid: AgentId) -> Result<Option<AgentInstance>, CoreError>;

    async fn mark_lost_contact(&self, instance: &AgentInstance) -> Result<(), CoreError>;
}
