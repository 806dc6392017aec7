use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::mpsc;

use cadence_core::error::CoreError;
use cadence_core::protocol::Message;

static NEXT_CHANNEL_ID: AtomicU64 = AtomicU64::new(1);

/// Handle for the outbound half of one agent's connection. Sends are ordered
/// per channel; the transport layer owns the receiving end and the underlying
/// socket.
///
/// Equality is the process-unique channel id, not the sender — the registry
/// removes entries by channel identity, and a reconnected agent gets a fresh
/// id even when it reuses the same uuid.
#[derive(Debug, Clone)]
pub struct AgentChannel {
    id: u64,
    tx: mpsc::Sender<Message>,
}

impl AgentChannel {
    /// Create a channel handle plus the receiver the transport layer (or a
    /// test) drains.
    pub fn new(buffer: usize) -> (Self, mpsc::Receiver<Message>) {
        let (tx, rx) = mpsc::channel(buffer);
        let channel = Self {
            id: NEXT_CHANNEL_ID.fetch_add(1, Ordering::Relaxed),
            tx,
        };
        (channel, rx)
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub async fn send(&self, message: Message) -> Result<(), CoreError> {
        self.tx
            .send(message)
            .await
            .map_err(|_| CoreError::ChannelClosed { channel_id: self.id })
    }
}

impl PartialEq for AgentChannel {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for AgentChannel {}
