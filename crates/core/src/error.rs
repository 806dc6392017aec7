use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    /// A call to the build repository or the agent lookup service failed.
    #[error("remote call '{operation}' failed: {reason}")]
    Remote {
        operation: &'static str,
        reason: String,
    },

    #[error("malformed payload: {0}")]
    MalformedPayload(String),

    /// The outbound side of an agent channel is gone; the disconnect
    /// notification for it is either in flight or already handled.
    #[error("outbound channel {channel_id} closed")]
    ChannelClosed { channel_id: u64 },
}

impl CoreError {
    pub fn remote(operation: &'static str, reason: impl Into<String>) -> Self {
        CoreError::Remote {
            operation,
            reason: reason.into(),
        }
    }
}
