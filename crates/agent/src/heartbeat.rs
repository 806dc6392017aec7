use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use cadence_core::protocol::Message;
use cadence_core::types::AgentRuntimeInfo;

/// Agent-side runtime state shared between the heartbeat loop and the job
/// executor. The cookie the server issues lands here so the next ping
/// carries it.
pub struct AgentRuntime {
    info: AgentRuntimeInfo,
    cancel_requested: bool,
}

impl AgentRuntime {
    pub fn new(info: AgentRuntimeInfo) -> Self {
        Self {
            info,
            cancel_requested: false,
        }
    }

    /// Snapshot to attach to the next outbound ping.
    pub fn info(&self) -> AgentRuntimeInfo {
        self.info.clone()
    }

    pub fn set_cookie(&mut self, cookie: String) {
        self.info.cookie = Some(cookie);
    }

    pub fn cookie(&self) -> Option<&str> {
        self.info.cookie.as_deref()
    }

    pub fn request_cancel(&mut self) {
        self.cancel_requested = true;
    }

    /// Consume a pending cancellation request, if any. The job executor polls
    /// this between build steps.
    pub fn take_cancel_request(&mut self) -> bool {
        std::mem::take(&mut self.cancel_requested)
    }
}

/// Send a ping snapshot every `interval_ms` and fold the server's replies
/// back into the shared runtime state. Ends when either side of the
/// connection goes away.
pub async fn heartbeat_loop(
    state: Arc<Mutex<AgentRuntime>>,
    tx: mpsc::Sender<Message>,
    mut inbound: mpsc::Receiver<Message>,
    interval_ms: u64,
) {
    let mut interval = tokio::time::interval(Duration::from_millis(interval_ms));
    loop {
        tokio::select! {
            _ = interval.tick() => {
                let info = {
                    let state = state.lock().unwrap();
                    state.info()
                };
                debug!("Sending heartbeat for agent {}", info.identifier.uuid);
                if tx.send(Message::Ping(info)).await.is_err() {
                    error!("Heartbeat channel closed");
                    break;
                }
            }
            message = inbound.recv() => {
                match message {
                    Some(Message::SetCookie(cookie)) => {
                        info!("Adopted server-issued identity cookie");
                        state.lock().unwrap().set_cookie(cookie);
                    }
                    Some(Message::CancelJob) => {
                        warn!("Server requested cancellation of the current job");
                        state.lock().unwrap().request_cancel();
                    }
                    Some(other) => {
                        debug!("Ignoring unexpected {} from server", other.action());
                    }
                    None => {
                        info!("Server connection closed");
                        break;
                    }
                }
            }
        }
    }
}
