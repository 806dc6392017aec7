use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use cadence_core::protocol::Message;

use crate::channel::AgentChannel;
use crate::handler::AgentHandler;

/// Drive one agent's connection: feed each inbound message through the
/// handler, then deliver the disconnect notification exactly once when the
/// stream ends. The transport layer owns the stream; a failed message is
/// logged here and does not end the session — the agent retries on its next
/// heartbeat.
pub async fn run_session(
    handler: Arc<AgentHandler>,
    channel: AgentChannel,
    mut inbound: mpsc::Receiver<Message>,
) {
    debug!("Session started on channel {}", channel.id());

    while let Some(message) = inbound.recv().await {
        let action = message.action();
        if let Err(e) = handler.process(&channel, message).await {
            warn!("Failed to handle {} on channel {}: {}", action, channel.id(), e);
        }
    }

    if let Err(e) = handler.remove(&channel).await {
        error!("Disconnect cleanup failed for channel {}: {}", channel.id(), e);
    } else {
        info!("Session ended on channel {}", channel.id());
    }
}
