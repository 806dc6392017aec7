use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tracing::debug;

use cadence_core::types::AgentId;

use crate::channel::AgentChannel;

/// Registry of currently connected agents: the single source of truth for
/// "is this agent attached right now", keyed by the agent's stable uuid.
///
/// One coarse lock guards the whole map. Mutations never overlap an await
/// point, and the cardinality is a fleet of agents, not a per-request path.
#[derive(Clone, Default)]
pub struct AgentRegistry {
    agents: Arc<RwLock<HashMap<AgentId, AgentChannel>>>,
}

impl AgentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the channel for an agent. A reconnect supersedes the
    /// previous channel; it never duplicates the entry.
    pub fn register(&self, uuid: AgentId, channel: AgentChannel) {
        let mut agents = self.agents.write().unwrap();
        if let Some(previous) = agents.insert(uuid, channel) {
            debug!(
                "Agent {} re-registered, superseding channel {}",
                uuid,
                previous.id()
            );
        }
    }

    pub fn lookup(&self, uuid: AgentId) -> Option<AgentChannel> {
        self.agents.read().unwrap().get(&uuid).cloned()
    }

    /// Remove the entry held by this channel, if any. The disconnect path
    /// knows only the channel, not which uuid it was last registered under,
    /// so removal scans by channel identity. Returns the uuid the channel was
    /// registered under, or `None` if it was not present.
    pub fn unregister(&self, channel: &AgentChannel) -> Option<AgentId> {
        let mut agents = self.agents.write().unwrap();
        let uuid = agents
            .iter()
            .find_map(|(uuid, ch)| (ch == channel).then_some(*uuid))?;
        agents.remove(&uuid);
        Some(uuid)
    }

    pub fn len(&self) -> usize {
        self.agents.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.read().unwrap().is_empty()
    }

    /// Snapshot of the current uuid → channel mapping, for monitoring and
    /// tests.
    pub fn connected_agents(&self) -> HashMap<AgentId, AgentChannel> {
        self.agents.read().unwrap().clone()
    }
}
