use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info, warn};

use cadence_core::error::CoreError;
use cadence_core::protocol::{Message, Report};
use cadence_core::types::{AgentId, AgentRuntimeInfo};

use crate::channel::AgentChannel;
use crate::registry::AgentRegistry;
use crate::remote::{AgentLookupService, BuildRepositoryRemote};

/// Server-side control point for the agent fleet: reconciles each inbound
/// message against the build repository and keeps the connected-agents
/// registry current. One `process` call handles one message to completion;
/// ordering is only guaranteed within a single agent's heartbeat cycle.
pub struct AgentHandler {
    remote: Arc<dyn BuildRepositoryRemote>,
    lookup: Arc<dyn AgentLookupService>,
    registry: AgentRegistry,
}

impl AgentHandler {
    pub fn new(remote: Arc<dyn BuildRepositoryRemote>, lookup: Arc<dyn AgentLookupService>) -> Self {
        Self {
            remote,
            lookup,
            registry: AgentRegistry::new(),
        }
    }

    /// Handle one inbound message from an agent's channel. Failures propagate
    /// to the transport layer; they are never swallowed here, and a failed
    /// step aborts the remaining outbound sequence for that cycle.
    pub async fn process(&self, channel: &AgentChannel, message: Message) -> Result<(), CoreError> {
        match message {
            Message::Ping(info) => self.handle_ping(channel, info).await,
            Message::ReportCurrentStatus(report) => {
                let state = require_state(&report, "reportCurrentStatus")?;
                self.remote
                    .report_current_status(&report.info, &report.job, state)
                    .await
            }
            Message::ReportCompleting(report) => {
                let result = require_result(&report, "reportCompleting")?;
                self.remote
                    .report_completing(&report.info, &report.job, result)
                    .await
            }
            Message::ReportCompleted(report) => {
                let result = require_result(&report, "reportCompleted")?;
                self.remote
                    .report_completed(&report.info, &report.job, result)
                    .await
            }
            Message::SetCookie(_) | Message::CancelJob => Err(CoreError::MalformedPayload(format!(
                "server-to-agent action '{}' received from an agent",
                message.action()
            ))),
        }
    }

    /// Heartbeat reconciliation. The agent is registered first and stays
    /// registered whatever happens afterwards: connectivity is real even when
    /// cookie issuance or the repository call fails. Within one cycle the
    /// agent must see setCookie before cancelJob.
    async fn handle_ping(
        &self,
        channel: &AgentChannel,
        info: AgentRuntimeInfo,
    ) -> Result<(), CoreError> {
        let uuid = info.identifier.uuid;
        self.registry.register(uuid, channel.clone());
        debug!("Heartbeat from agent {} on channel {}", uuid, channel.id());

        let instruction = self.remote.ping(&info).await?;

        if !info.has_cookie() {
            let cookie = self.remote.get_cookie(&info.identifier, &info.location).await?;
            info!("Issued identity cookie to agent {}", uuid);
            channel.send(Message::SetCookie(cookie)).await?;
        }

        if instruction.should_cancel {
            info!("Cancelling current job on agent {}", uuid);
            channel.send(Message::CancelJob).await?;
        }

        Ok(())
    }

    /// Handle a channel-close notification. A channel that never pinged is
    /// not in the registry and this is a complete no-op. Otherwise the last
    /// known instance record, if any, transitions to LostContact.
    pub async fn remove(&self, channel: &AgentChannel) -> Result<(), CoreError> {
        let Some(uuid) = self.registry.unregister(channel) else {
            return Ok(());
        };
        info!("Channel {} closed, agent {} disconnected", channel.id(), uuid);

        match self.lookup.find_agent(uuid).await? {
            Some(instance) => {
                self.lookup.mark_lost_contact(&instance).await?;
                warn!("Agent {} marked LostContact", uuid);
            }
            None => {
                debug!("No instance record for agent {}, nothing to mark", uuid);
            }
        }
        Ok(())
    }

    /// Snapshot of the currently connected agents.
    pub fn connected_agents(&self) -> HashMap<AgentId, AgentChannel> {
        self.registry.connected_agents()
    }

    pub fn registry(&self) -> &AgentRegistry {
        &self.registry
    }
}

fn require_state(report: &Report, action: &str) -> Result<cadence_core::types::JobState, CoreError> {
    report
        .state
        .ok_or_else(|| CoreError::MalformedPayload(format!("{} without a job state", action)))
}

fn require_result(
    report: &Report,
    action: &str,
) -> Result<cadence_core::types::JobResult, CoreError> {
    report
        .result
        .ok_or_else(|| CoreError::MalformedPayload(format!("{} without a job result", action)))
}
