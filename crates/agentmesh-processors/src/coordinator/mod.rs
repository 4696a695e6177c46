//! Multi-agent task coordination
//!
//! A task moves through a fixed sequence of phases, one phase per
//! [`MultiAgentCoordinator::process`] call:
//!
//! ```text
//! initialization -> decomposition -> delegation -> execution
//!     -> coordination -> synthesis -> verification -> completed | failed
//! ```
//!
//! Every handler only appends to the message history. Per-agent failures
//! during initialization and execution mark that agent failed and never abort
//! the task.

pub mod models;
pub mod phase;

pub use models::{
    AgentAssignment, AgentMessage, AssignmentStatus, CoordinatorStats, FinalResult, MessagePriority,
    MessageType, MultiAgentEntry, Subtask, BROADCAST_RECEIVER,
};
pub use phase::Phase;

use crate::error::{ProcessorError, Result};
use crate::strategies::{PlaceholderExecutor, TaskExecutor};
use crate::validation::{ensure_valid, validate_multi_agent_entry};
use agentmesh_agents::{AgentError, CapabilityRegistry, FanOutConfig, FanOutExecutor};
use agentmesh_config::CoordinatorSettings;
use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Drives multi-agent entries through their phases
pub struct MultiAgentCoordinator {
    registry: Option<Arc<CapabilityRegistry>>,
    executor: Arc<dyn TaskExecutor>,
    fan_out: FanOutExecutor,
    settings: CoordinatorSettings,
}

impl Default for MultiAgentCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl MultiAgentCoordinator {
    /// Create a coordinator with the placeholder executor and no registry
    pub fn new() -> Self {
        Self::with_settings(CoordinatorSettings::default())
    }

    /// Create a coordinator with custom settings
    pub fn with_settings(settings: CoordinatorSettings) -> Self {
        Self {
            registry: None,
            executor: Arc::new(PlaceholderExecutor),
            fan_out: FanOutExecutor::with_config(FanOutConfig::from(&settings)),
            settings,
        }
    }

    /// Initialize agents found in `registry` during the initialization phase
    pub fn with_registry(mut self, registry: Arc<CapabilityRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Replace the subtask executor
    pub fn with_executor(mut self, executor: Arc<dyn TaskExecutor>) -> Self {
        self.executor = executor;
        self
    }

    /// Current settings
    pub fn settings(&self) -> &CoordinatorSettings {
        &self.settings
    }

    /// Build a task in the initialization phase
    pub fn create(task_id: impl Into<String>, agents: Vec<AgentAssignment>) -> MultiAgentEntry {
        let mut metadata = HashMap::new();
        metadata.insert("createdAt".to_string(), json!(Utc::now().to_rfc3339()));

        MultiAgentEntry {
            task_id: task_id.into(),
            agents,
            message_history: Vec::new(),
            current_phase: Phase::Initialization,
            subtasks: Vec::new(),
            final_result: None,
            metadata,
        }
    }

    /// Add an agent to a task
    pub fn add_agent(entry: &mut MultiAgentEntry, assignment: AgentAssignment) {
        entry.agents.push(assignment);
    }

    /// Build a normal-priority request message
    ///
    /// Chain [`AgentMessage::with_type`] or [`AgentMessage::with_priority`]
    /// for any other type or priority.
    pub fn create_message(
        sender_id: impl Into<String>,
        receiver_id: impl Into<String>,
        content: impl Into<String>,
    ) -> AgentMessage {
        AgentMessage {
            sender_id: sender_id.into(),
            receiver_id: receiver_id.into(),
            content: content.into(),
            timestamp: Utc::now(),
            message_type: MessageType::Request,
            priority: MessagePriority::Normal,
        }
    }

    /// Build an idle assignment with no workload
    pub fn create_assignment(
        agent_id: impl Into<String>,
        role: impl Into<String>,
        capabilities: Vec<String>,
    ) -> AgentAssignment {
        AgentAssignment {
            agent_id: agent_id.into(),
            role: role.into(),
            capabilities,
            workload: 0,
            status: AssignmentStatus::Idle,
            result: None,
        }
    }

    /// Agent counts by status plus message and agent totals
    pub fn get_stats(entry: &MultiAgentEntry) -> CoordinatorStats {
        CoordinatorStats {
            total_agents: entry.agents.len(),
            idle_agents: entry.count_status(AssignmentStatus::Idle),
            busy_agents: entry.count_status(AssignmentStatus::Busy),
            completed_agents: entry.count_status(AssignmentStatus::Completed),
            failed_agents: entry.count_status(AssignmentStatus::Failed),
            total_messages: entry.message_history.len(),
        }
    }

    /// Advance along the happy path without running any phase handler
    pub fn next_phase(mut entry: MultiAgentEntry) -> MultiAgentEntry {
        if let Some(next) = entry.current_phase.happy_next() {
            entry.current_phase = next;
        }
        entry
    }

    /// Run the handler for the current phase and move to the next one
    pub async fn process(&self, mut entry: MultiAgentEntry) -> Result<MultiAgentEntry> {
        ensure_valid(&validate_multi_agent_entry(&entry))?;

        let from = entry.current_phase;
        let to = match from {
            Phase::Initialization => self.initialize_agents(&mut entry).await,
            Phase::Decomposition => self.decompose(&mut entry),
            Phase::Delegation => self.delegate(&mut entry),
            Phase::Execution => self.execute(&mut entry).await,
            Phase::Coordination => self.coordinate(&mut entry),
            Phase::Synthesis => self.synthesize(&mut entry),
            Phase::Verification => self.verify(&mut entry),
            Phase::Completed => self.complete(&mut entry),
            Phase::Failed => self.fail(&mut entry),
        };

        if !from.can_transition_to(to) {
            return Err(ProcessorError::invalid_transition(from, to));
        }
        entry.current_phase = to;

        if from != to {
            info!(task_id = %entry.task_id, from = %from, to = %to, "Phase advanced");
        }
        Ok(entry)
    }

    fn message(&self, receiver_id: &str, content: String, message_type: MessageType) -> AgentMessage {
        Self::create_message(self.settings.coordinator_id.as_str(), receiver_id, content)
            .with_type(message_type)
    }

    async fn initialize_agents(&self, entry: &mut MultiAgentEntry) -> Phase {
        let jobs: Vec<_> = entry
            .agents
            .iter()
            .map(|assignment| {
                let agent = self
                    .registry
                    .as_ref()
                    .and_then(|registry| registry.get_agent(&assignment.agent_id));
                let job = async move {
                    match agent {
                        Some(agent) => agent.initialize().await,
                        None => Ok(()),
                    }
                };
                (assignment.agent_id.clone(), job)
            })
            .collect();

        let outcomes = self.fan_out.run(jobs).await;
        let mut failures = Vec::new();
        for (assignment, outcome) in entry.agents.iter_mut().zip(outcomes) {
            match outcome.result {
                Ok(()) => assignment.status = AssignmentStatus::Idle,
                Err(e) => {
                    warn!(task_id = %entry.task_id, agent_id = %assignment.agent_id, error = %e, "Agent failed to initialize");
                    assignment.status = AssignmentStatus::Failed;
                    failures.push((assignment.agent_id.clone(), e));
                }
            }
        }

        for (agent_id, error) in failures {
            let message = self
                .message(
                    &agent_id,
                    format!("Agent {} failed to initialize: {}", agent_id, error),
                    MessageType::Coordination,
                )
                .with_priority(MessagePriority::High);
            entry.message_history.push(message);
        }

        entry
            .metadata
            .insert("startedAt".to_string(), json!(Utc::now().to_rfc3339()));
        Phase::Decomposition
    }

    fn decompose(&self, entry: &mut MultiAgentEntry) -> Phase {
        let mut subtasks = Vec::new();
        for assignment in entry
            .agents
            .iter_mut()
            .filter(|a| a.status != AssignmentStatus::Failed)
        {
            let mut description = format!("{} work for task {}", assignment.role, entry.task_id);
            if !assignment.capabilities.is_empty() {
                description.push_str(&format!(" using {}", assignment.capabilities.join(", ")));
            }

            subtasks.push(Subtask {
                id: format!("{}-subtask-{}", entry.task_id, subtasks.len() + 1),
                agent_id: assignment.agent_id.clone(),
                description,
                capabilities: assignment.capabilities.clone(),
            });
            assignment.workload = 1;
        }

        debug!(task_id = %entry.task_id, subtask_count = subtasks.len(), "Task decomposed");
        let content = format!(
            "Task {} decomposed into {} subtask(s)",
            entry.task_id,
            subtasks.len()
        );
        entry.subtasks = subtasks;
        entry
            .message_history
            .push(self.message(BROADCAST_RECEIVER, content, MessageType::Broadcast));
        Phase::Delegation
    }

    fn delegate(&self, entry: &mut MultiAgentEntry) -> Phase {
        let mut messages = Vec::new();
        for assignment in entry
            .agents
            .iter_mut()
            .filter(|a| a.status == AssignmentStatus::Idle)
        {
            let content = match entry.subtasks.iter().find(|s| s.agent_id == assignment.agent_id) {
                Some(subtask) => format!("Execute subtask {}: {}", subtask.id, subtask.description),
                None => format!("Execute {} work for task {}", assignment.role, entry.task_id),
            };
            messages.push(self.message(&assignment.agent_id, content, MessageType::Request));
            assignment.status = AssignmentStatus::Busy;
        }

        debug!(task_id = %entry.task_id, delegated = messages.len(), "Subtasks delegated");
        entry.message_history.extend(messages);
        Phase::Execution
    }

    async fn execute(&self, entry: &mut MultiAgentEntry) -> Phase {
        let busy: Vec<usize> = entry
            .agents
            .iter()
            .enumerate()
            .filter(|(_, a)| a.status == AssignmentStatus::Busy)
            .map(|(i, _)| i)
            .collect();

        let jobs: Vec<_> = busy
            .iter()
            .map(|&i| {
                let assignment = entry.agents[i].clone();
                let subtask = entry.subtask_for(&assignment.agent_id).cloned();
                let executor = self.executor.clone();
                let job = async move {
                    executor
                        .execute(&assignment, subtask.as_ref())
                        .await
                        .map_err(|e| AgentError::execution_failed(e.to_string()))
                };
                (entry.agents[i].agent_id.clone(), job)
            })
            .collect();

        let outcomes = self.fan_out.run(jobs).await;
        let coordinator_id = self.settings.coordinator_id.as_str();

        for (i, outcome) in busy.into_iter().zip(outcomes) {
            let assignment = &mut entry.agents[i];
            let message = match outcome.result {
                Ok(result) => {
                    assignment.status = AssignmentStatus::Completed;
                    assignment.result = Some(result);
                    Self::create_message(
                        assignment.agent_id.as_str(),
                        coordinator_id,
                        format!("Completed {} work for task {}", assignment.role, entry.task_id),
                    )
                    .with_type(MessageType::Response)
                }
                Err(e) => {
                    warn!(task_id = %entry.task_id, agent_id = %assignment.agent_id, error = %e, "Agent subtask failed");
                    assignment.status = AssignmentStatus::Failed;
                    Self::create_message(
                        assignment.agent_id.as_str(),
                        coordinator_id,
                        format!("Subtask failed: {}", e),
                    )
                    .with_type(MessageType::Response)
                    .with_priority(MessagePriority::High)
                }
            };
            entry.message_history.push(message);
        }

        Phase::Coordination
    }

    fn coordinate(&self, entry: &mut MultiAgentEntry) -> Phase {
        let content = format!(
            "Coordinating results from {} of {} agent(s)",
            entry.count_status(AssignmentStatus::Completed),
            entry.agents.len()
        );
        entry
            .message_history
            .push(self.message(BROADCAST_RECEIVER, content, MessageType::Broadcast));
        Phase::Synthesis
    }

    fn synthesize(&self, entry: &mut MultiAgentEntry) -> Phase {
        let agents: BTreeMap<String, Value> = entry
            .agents
            .iter()
            .filter(|a| a.status == AssignmentStatus::Completed)
            .map(|a| {
                (
                    a.agent_id.clone(),
                    json!({
                        "role": a.role,
                        "result": a.result.clone().unwrap_or(Value::Null),
                    }),
                )
            })
            .collect();

        let failed = entry.count_status(AssignmentStatus::Failed);
        let status = if failed == 0 { "success" } else { "partial" };
        let summary = format!(
            "{} of {} agent(s) completed task {}",
            agents.len(),
            entry.agents.len(),
            entry.task_id
        );
        let content = format!("Synthesized results from {} agent(s)", agents.len());

        entry.final_result = Some(FinalResult {
            status: status.to_string(),
            agents,
            summary,
            timestamp: Utc::now(),
        });
        entry
            .message_history
            .push(self.message(BROADCAST_RECEIVER, content, MessageType::Broadcast));
        Phase::Verification
    }

    fn verify(&self, entry: &mut MultiAgentEntry) -> Phase {
        let failure = match &entry.final_result {
            None => Some("no final result was synthesized"),
            Some(result) if result.agents.is_empty() => Some("no agent produced a result"),
            Some(_) => None,
        };

        match failure {
            None => {
                entry.message_history.push(self.message(
                    BROADCAST_RECEIVER,
                    "Verification passed".to_string(),
                    MessageType::Coordination,
                ));
                Phase::Completed
            }
            Some(reason) => {
                entry
                    .metadata
                    .insert("verificationError".to_string(), json!(reason));
                entry.message_history.push(self.message(
                    BROADCAST_RECEIVER,
                    format!("Verification failed: {}", reason),
                    MessageType::Coordination,
                ));
                Phase::Failed
            }
        }
    }

    fn complete(&self, entry: &mut MultiAgentEntry) -> Phase {
        if !entry.metadata.contains_key("completedAt") {
            let now = Utc::now();
            let elapsed = elapsed_since_creation(&entry.metadata, now);
            entry
                .metadata
                .insert("completedAt".to_string(), json!(now.to_rfc3339()));
            entry
                .metadata
                .insert("totalExecutionTime".to_string(), json!(elapsed));
        }
        Phase::Completed
    }

    fn fail(&self, entry: &mut MultiAgentEntry) -> Phase {
        if !entry.metadata.contains_key("failedAt") {
            let reason = entry
                .metadata
                .get("verificationError")
                .and_then(Value::as_str)
                .unwrap_or("unknown failure")
                .to_string();

            entry
                .metadata
                .insert("failedAt".to_string(), json!(Utc::now().to_rfc3339()));
            entry
                .metadata
                .insert("failureReason".to_string(), json!(reason));

            let message = self
                .message(
                    BROADCAST_RECEIVER,
                    format!("Task {} failed: {}", entry.task_id, reason),
                    MessageType::Coordination,
                )
                .with_priority(MessagePriority::Urgent);
            entry.message_history.push(message);
        }
        Phase::Failed
    }
}

fn elapsed_since_creation(metadata: &HashMap<String, Value>, now: DateTime<Utc>) -> i64 {
    metadata
        .get("createdAt")
        .and_then(Value::as_str)
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|created| (now - created.with_timezone(&Utc)).num_milliseconds().max(0))
        .unwrap_or(0)
}
