//! Data model for multi-agent tasks

use super::phase::Phase;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};

/// Receiver id used for broadcast messages
pub const BROADCAST_RECEIVER: &str = "all";

/// Status of an agent within a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AssignmentStatus {
    /// Ready for work
    #[default]
    Idle,
    /// Working on a delegated subtask
    Busy,
    /// Finished its subtask
    Completed,
    /// Could not initialize or execute
    Failed,
}

/// An agent taking part in a task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentAssignment {
    /// Agent identifier
    pub agent_id: String,
    /// Role within the task
    pub role: String,
    /// Capabilities the agent brings
    #[serde(default)]
    pub capabilities: Vec<String>,
    /// Number of subtasks assigned
    #[serde(default)]
    pub workload: u32,
    /// Current status
    #[serde(default)]
    pub status: AssignmentStatus,
    /// Result reported on completion
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
}

/// Kind of coordinator message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    /// Work handed to an agent
    #[default]
    Request,
    /// An agent's reply
    Response,
    /// Sent to every agent
    Broadcast,
    /// Coordinator bookkeeping
    Coordination,
}

/// Message priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MessagePriority {
    /// Low
    Low,
    /// Normal
    #[default]
    Normal,
    /// High
    High,
    /// Urgent
    Urgent,
}

/// A message in the task history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentMessage {
    /// Sender id
    pub sender_id: String,
    /// Receiver id, or [`BROADCAST_RECEIVER`]
    pub receiver_id: String,
    /// Message body
    pub content: String,
    /// When the message was created
    pub timestamp: DateTime<Utc>,
    /// Kind of message
    pub message_type: MessageType,
    /// Priority
    pub priority: MessagePriority,
}

impl AgentMessage {
    /// Set the message type
    pub fn with_type(mut self, message_type: MessageType) -> Self {
        self.message_type = message_type;
        self
    }

    /// Set the priority
    pub fn with_priority(mut self, priority: MessagePriority) -> Self {
        self.priority = priority;
        self
    }
}

/// A unit of work derived for one agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subtask {
    /// Subtask identifier
    pub id: String,
    /// Agent the subtask belongs to
    pub agent_id: String,
    /// What to do
    pub description: String,
    /// Capabilities the subtask relies on
    #[serde(default)]
    pub capabilities: Vec<String>,
}

/// Merged outcome of a multi-agent task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalResult {
    /// "success" when every agent completed, "partial" otherwise
    pub status: String,
    /// Result per completed agent
    pub agents: BTreeMap<String, Value>,
    /// One-line summary
    pub summary: String,
    /// When the result was synthesized
    pub timestamp: DateTime<Utc>,
}

/// A multi-agent task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiAgentEntry {
    /// Task identifier
    pub task_id: String,
    /// Participating agents
    pub agents: Vec<AgentAssignment>,
    /// Append-only message history
    #[serde(default)]
    pub message_history: Vec<AgentMessage>,
    /// Current phase
    pub current_phase: Phase,
    /// Subtasks produced by decomposition
    #[serde(default)]
    pub subtasks: Vec<Subtask>,
    /// Merged result, set during synthesis
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_result: Option<FinalResult>,
    /// Free-form metadata
    #[serde(default)]
    pub metadata: HashMap<String, Value>,
}

impl MultiAgentEntry {
    /// Look up an assignment by agent id
    pub fn agent(&self, agent_id: &str) -> Option<&AgentAssignment> {
        self.agents.iter().find(|a| a.agent_id == agent_id)
    }

    /// The subtask delegated to an agent
    pub fn subtask_for(&self, agent_id: &str) -> Option<&Subtask> {
        self.subtasks.iter().find(|s| s.agent_id == agent_id)
    }

    /// Number of agents with a given status
    pub fn count_status(&self, status: AssignmentStatus) -> usize {
        self.agents.iter().filter(|a| a.status == status).count()
    }
}

/// Counts describing a multi-agent task
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoordinatorStats {
    /// All agents
    pub total_agents: usize,
    /// Idle agents
    pub idle_agents: usize,
    /// Busy agents
    pub busy_agents: usize,
    /// Completed agents
    pub completed_agents: usize,
    /// Failed agents
    pub failed_agents: usize,
    /// Messages in the history
    pub total_messages: usize,
}
