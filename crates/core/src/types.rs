use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type AgentId = Uuid;

/// Stable identity an agent presents on every contact. The uuid is the
/// registry key; hostname and IP are informational.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AgentIdentifier {
    pub hostname: String,
    pub ip_address: String,
    pub uuid: AgentId,
}

impl AgentIdentifier {
    pub fn new(hostname: impl Into<String>, ip_address: impl Into<String>, uuid: AgentId) -> Self {
        Self {
            hostname: hostname.into(),
            ip_address: ip_address.into(),
            uuid,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum AgentRuntimeStatus {
    Idle,
    Building,
    Cancelled,
    Missing,
    LostContact,
    Unknown,
}

/// Snapshot an agent sends with every heartbeat. Owned by the sending agent
/// and passed by value per call; the server keeps nothing from it beyond the
/// registry entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgentRuntimeInfo {
    pub identifier: AgentIdentifier,
    pub status: AgentRuntimeStatus,
    pub location: String,
    pub launcher_version: Option<String>,
    /// Server-issued token proving continuity of identity across reconnects.
    /// Absent on first contact or after an agent reset.
    pub cookie: Option<String>,
}

impl AgentRuntimeInfo {
    pub fn new(identifier: AgentIdentifier, location: impl Into<String>) -> Self {
        Self {
            identifier,
            status: AgentRuntimeStatus::Idle,
            location: location.into(),
            launcher_version: None,
            cookie: None,
        }
    }

    pub fn with_cookie(mut self, cookie: impl Into<String>) -> Self {
        self.cookie = Some(cookie.into());
        self
    }

    /// An empty cookie string counts as no cookie at all.
    pub fn has_cookie(&self) -> bool {
        self.cookie.as_deref().is_some_and(|c| !c.is_empty())
    }
}

/// The server's decision returned from a heartbeat. Single-use.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct AgentInstruction {
    pub should_cancel: bool,
}

impl AgentInstruction {
    pub fn new(should_cancel: bool) -> Self {
        Self { should_cancel }
    }
}

/// Record the broader inventory keeps for an agent, resolved through the
/// lookup service only when a channel closes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgentInstance {
    pub identifier: AgentIdentifier,
    pub status: AgentRuntimeStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JobIdentifier {
    pub pipeline: String,
    pub stage: String,
    pub job: String,
    pub build_id: u64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum JobState {
    Scheduled,
    Assigned,
    Preparing,
    Building,
    Completing,
    Completed,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum JobResult {
    Passed,
    Failed,
    Cancelled,
    Unknown,
}

// --- Display implementations ---

impl std::fmt::Display for AgentRuntimeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AgentRuntimeStatus::Idle => write!(f, "Idle"),
            AgentRuntimeStatus::Building => write!(f, "Building"),
            AgentRuntimeStatus::Cancelled => write!(f, "Cancelled"),
            AgentRuntimeStatus::Missing => write!(f, "Missing"),
            AgentRuntimeStatus::LostContact => write!(f, "LostContact"),
            AgentRuntimeStatus::Unknown => write!(f, "Unknown"),
        }
    }
}

impl std::fmt::Display for JobState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobState::Scheduled => write!(f, "Scheduled"),
            JobState::Assigned => write!(f, "Assigned"),
            JobState::Preparing => write!(f, "Preparing"),
            JobState::Building => write!(f, "Building"),
            JobState::Completing => write!(f, "Completing"),
            JobState::Completed => write!(f, "Completed"),
        }
    }
}

impl std::fmt::Display for JobResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobResult::Passed => write!(f, "Passed"),
            JobResult::Failed => write!(f, "Failed"),
            JobResult::Cancelled => write!(f, "Cancelled"),
            JobResult::Unknown => write!(f, "Unknown"),
        }
    }
}

impl std::fmt::Display for JobIdentifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}/{}/{}#{}",
            self.pipeline, self.stage, self.job, self.build_id
        )
    }
}
