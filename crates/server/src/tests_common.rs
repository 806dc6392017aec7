use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::mpsc;
use uuid::Uuid;

use cadence_core::error::CoreError;
use cadence_core::protocol::{Message, Report};
use cadence_core::types::{
    AgentId, AgentIdentifier, AgentInstance, AgentInstruction, AgentRuntimeInfo,
    AgentRuntimeStatus, JobIdentifier, JobResult, JobState,
};

use crate::channel::AgentChannel;
use crate::handler::AgentHandler;
use crate::remote::{AgentLookupService, BuildRepositoryRemote};

#[derive(Debug, Clone, PartialEq)]
pub enum RemoteCall {
    Ping(AgentRuntimeInfo),
    GetCookie(AgentIdentifier, String),
    ReportCurrentStatus(AgentRuntimeInfo, JobIdentifier, JobState),
    ReportCompleting(AgentRuntimeInfo, JobIdentifier, JobResult),
    ReportCompleted(AgentRuntimeInfo, JobIdentifier, JobResult),
}

/// Deterministic build repository double that records every call.
pub struct MockRemote {
    calls: Mutex<Vec<RemoteCall>>,
    instruction: AgentInstruction,
    cookie: String,
    fail_ping: bool,
    fail_cookie: bool,
}

impl MockRemote {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            instruction: AgentInstruction::new(false),
            cookie: "cookie-1".into(),
            fail_ping: false,
            fail_cookie: false,
        }
    }

    /// Every ping answers "cancel the current job".
    pub fn cancelling(mut self) -> Self {
        self.instruction = AgentInstruction::new(true);
        self
    }

    pub fn with_cookie(mut self, cookie: &str) -> Self {
        self.cookie = cookie.into();
        self
    }

    pub fn failing_ping(mut self) -> Self {
        self.fail_ping = true;
        self
    }

    pub fn failing_cookie(mut self) -> Self {
        self.fail_cookie = true;
        self
    }

    pub fn calls(&self) -> Vec<RemoteCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: RemoteCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl BuildRepositoryRemote for MockRemote {
    async fn ping(&self, info: &AgentRuntimeInfo) -> Result<AgentInstruction, CoreError> {
        if self.fail_ping {
            return Err(CoreError::remote("ping", "repository unreachable"));
        }
        self.record(RemoteCall::Ping(info.clone()));
        Ok(self.instruction)
    }

    async fn get_cookie(
        &self,
        identifier: &AgentIdentifier,
        location: &str,
    ) -> Result<String, CoreError> {
        if self.fail_cookie {
            return Err(CoreError::remote("getCookie", "repository unreachable"));
        }
        self.record(RemoteCall::GetCookie(identifier.clone(), location.into()));
        Ok(self.cookie.clone())
    }

    async fn report_current_status(
        &self,
        info: &AgentRuntimeInfo,
        job: &JobIdentifier,
        state: JobState,
    ) -> Result<(), CoreError> {
        self.record(RemoteCall::ReportCurrentStatus(
            info.clone(),
            job.clone(),
            state,
        ));
        Ok(())
    }

    async fn report_completing(
        &self,
        info: &AgentRuntimeInfo,
        job: &JobIdentifier,
        result: JobResult,
    ) -> Result<(), CoreError> {
        self.record(RemoteCall::ReportCompleting(info.clone(), job.clone(), result));
        Ok(())
    }

    async fn report_completed(
        &self,
        info: &AgentRuntimeInfo,
        job: &JobIdentifier,
        result: JobResult,
    ) -> Result<(), CoreError> {
        self.record(RemoteCall::ReportCompleted(info.clone(), job.clone(), result));
        Ok(())
    }
}

/// Lookup-service double holding at most one instance record.
pub struct MockLookup {
    instance: Mutex<Option<AgentInstance>>,
    find_calls: Mutex<Vec<AgentId>>,
    lost_contact: Mutex<Vec<AgentId>>,
}

impl MockLookup {
    pub fn new() -> Self {
        Self {
            instance: Mutex::new(None),
            find_calls: Mutex::new(Vec::new()),
            lost_contact: Mutex::new(Vec::new()),
        }
    }

    pub fn with_instance(self, instance: AgentInstance) -> Self {
        *self.instance.lock().unwrap() = Some(instance);
        self
    }

    pub fn instance(&self) -> Option<AgentInstance> {
        self.instance.lock().unwrap().clone()
    }

    pub fn find_calls(&self) -> Vec<AgentId> {
        self.find_calls.lock().unwrap().clone()
    }

    pub fn lost_contact(&self) -> Vec<AgentId> {
        self.lost_contact.lock().unwrap().clone()
    }
}

#[async_trait]
impl AgentLookupService for MockLookup {
    async fn find_agent(&self, uuid: AgentId) -> Result<Option<AgentInstance>, CoreError> {
        self.find_calls.lock().unwrap().push(uuid);
        let instance = self.instance.lock().unwrap();
        Ok(instance
            .as_ref()
            .filter(|i| i.identifier.uuid == uuid)
            .cloned())
    }

    async fn mark_lost_contact(&self, instance: &AgentInstance) -> Result<(), CoreError> {
        self.lost_contact
            .lock()
            .unwrap()
            .push(instance.identifier.uuid);
        let mut stored = self.instance.lock().unwrap();
        if let Some(stored) = stored.as_mut() {
            if stored.identifier.uuid == instance.identifier.uuid {
                stored.status = AgentRuntimeStatus::LostContact;
            }
        }
        Ok(())
    }
}

pub fn make_handler(
    remote: MockRemote,
    lookup: MockLookup,
) -> (AgentHandler, Arc<MockRemote>, Arc<MockLookup>) {
    let remote = Arc::new(remote);
    let lookup = Arc::new(lookup);
    let handler = AgentHandler::new(remote.clone(), lookup.clone());
    (handler, remote, lookup)
}

pub fn test_identifier() -> AgentIdentifier {
    AgentIdentifier::new("build-host-1", "192.168.1.20", Uuid::new_v4())
}

pub fn test_runtime_info(cookie: Option<&str>) -> AgentRuntimeInfo {
    let mut info = AgentRuntimeInfo::new(test_identifier(), "/var/lib/cadence-agent");
    info.launcher_version = Some("1.4.2".into());
    info.cookie = cookie.map(Into::into);
    info
}

/// Report with neither state nor result filled in; tests set whichever field
/// the action under test expects.
pub fn test_report(info: AgentRuntimeInfo) -> Report {
    Report {
        info,
        job: JobIdentifier {
            pipeline: "main".into(),
            stage: "build".into(),
            job: "compile".into(),
            build_id: 42,
        },
        state: None,
        result: None,
    }
}

pub fn idle_instance(identifier: AgentIdentifier) -> AgentInstance {
    AgentInstance {
        identifier,
        status: AgentRuntimeStatus::Idle,
    }
}

pub fn test_channel() -> (AgentChannel, mpsc::Receiver<Message>) {
    AgentChannel::new(8)
}

/// Drain whatever the handler has written to the channel so far.
pub fn drain(rx: &mut mpsc::Receiver<Message>) -> Vec<Message> {
    let mut messages = Vec::new();
    while let Ok(message) = rx.try_recv() {
        messages.push(message);
    }
    messages
}
