use serde::{Deserialize, Serialize};

use crate::types::{AgentRuntimeInfo, JobIdentifier, JobResult, JobState};

/// Job-scoped status snapshot an agent attaches to its reporting actions.
/// Forwarded verbatim to the build repository. State-reporting actions carry
/// `state`; completion actions carry `result`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Report {
    pub info: AgentRuntimeInfo,
    pub job: JobIdentifier,
    pub state: Option<JobState>,
    pub result: Option<JobResult>,
}

impl Report {
    pub fn with_state(info: AgentRuntimeInfo, job: JobIdentifier, state: JobState) -> Self {
        Self {
            info,
            job,
            state: Some(state),
            result: None,
        }
    }

    pub fn with_result(info: AgentRuntimeInfo, job: JobIdentifier, result: JobResult) -> Self {
        Self {
            info,
            job,
            state: None,
            result: Some(result),
        }
    }
}

/// One unit of the agent control protocol. Ping and the three report actions
/// flow agent-to-server; SetCookie and CancelJob flow server-to-agent and are
/// the only things the server ever writes to a channel.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "action", content = "data", rename_all = "camelCase")]
pub enum Message {
    Ping(AgentRuntimeInfo),
    SetCookie(String),
    CancelJob,
    ReportCurrentStatus(Report),
    ReportCompleting(Report),
    ReportCompleted(Report),
}

impl Message {
    /// Action tag, for logging and diagnostics.
    pub fn action(&self) -> &'static str {
        match self {
            Message::Ping(_) => "ping",
            Message::SetCookie(_) => "setCookie",
            Message::CancelJob => "cancelJob",
            Message::ReportCurrentStatus(_) => "reportCurrentStatus",
            Message::ReportCompleting(_) => "reportCompleting",
            Message::ReportCompleted(_) => "reportCompleted",
        }
    }
}
