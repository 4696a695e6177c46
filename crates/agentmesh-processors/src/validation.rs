//! Structural validation for task entries
//!
//! Processors treat an invalid entry as fatal, so [`ensure_valid`] turns any
//! error into [`ProcessorError::InvalidEntry`].

use crate::chain_of_thought::CotEntry;
use crate::coordinator::MultiAgentEntry;
use crate::error::{ProcessorError, Result};
use crate::rag::RagEntry;
use agentmesh_agents::validation::{
    require_non_empty, ValidationResult, CODE_DUPLICATE, CODE_INVALID, CODE_OUT_OF_RANGE,
    CODE_REQUIRED,
};
use std::collections::HashSet;
use tracing::debug;

fn in_unit_interval(value: f64) -> bool {
    (0.0..=1.0).contains(&value)
}

/// Fail with [`ProcessorError::InvalidEntry`] when the result has errors
pub fn ensure_valid(result: &ValidationResult) -> Result<()> {
    for warning in &result.warnings {
        debug!(field = %warning.field, "{}", warning.message);
    }
    if result.is_valid {
        Ok(())
    } else {
        Err(ProcessorError::invalid_entry(result.error_message()))
    }
}

/// Validate a chain-of-thought entry
pub fn validate_cot_entry(entry: &CotEntry) -> ValidationResult {
    let mut result = ValidationResult::new();
    require_non_empty(&mut result, "task_id", &entry.task_id);
    require_non_empty(&mut result, "task", &entry.task);

    if entry.steps.is_empty() {
        result.add_error("steps", "at least one step is required", CODE_REQUIRED);
    }

    for (idx, step) in entry.steps.iter().enumerate() {
        let field = format!("steps[{}]", idx);
        if step.step_number != idx + 1 {
            result.add_error(
                format!("{}.step_number", field),
                format!("step {} must be numbered {}", step.step_number, idx + 1),
                CODE_INVALID,
            );
        }
        if step.action.trim().is_empty() {
            result.add_error(
                format!("{}.action", field),
                format!("step {} has no action", idx + 1),
                CODE_REQUIRED,
            );
        }
        if !in_unit_interval(step.confidence) {
            result.add_error(
                format!("{}.confidence", field),
                format!("step {} confidence must be between 0 and 1", idx + 1),
                CODE_OUT_OF_RANGE,
            );
        }
    }

    if !in_unit_interval(entry.confidence) {
        result.add_error(
            "confidence",
            "confidence must be between 0 and 1",
            CODE_OUT_OF_RANGE,
        );
    }

    result
}

/// Validate a retrieval-augmented entry
pub fn validate_rag_entry(entry: &RagEntry) -> ValidationResult {
    let mut result = ValidationResult::new();
    require_non_empty(&mut result, "query_id", &entry.query_id);
    require_non_empty(&mut result, "query", &entry.query);

    if !in_unit_interval(entry.confidence) {
        result.add_error(
            "confidence",
            "confidence must be between 0 and 1",
            CODE_OUT_OF_RANGE,
        );
    }
    for (idx, doc) in entry.retrieved_context.iter().enumerate() {
        if !in_unit_interval(doc.similarity_score) {
            result.add_error(
                format!("retrieved_context[{}].similarity_score", idx),
                format!("document {} similarity must be between 0 and 1", doc.id),
                CODE_OUT_OF_RANGE,
            );
        }
    }

    result
}

/// Validate a multi-agent entry
pub fn validate_multi_agent_entry(entry: &MultiAgentEntry) -> ValidationResult {
    let mut result = ValidationResult::new();
    require_non_empty(&mut result, "task_id", &entry.task_id);

    if entry.agents.is_empty() {
        result.add_warning(
            "agents",
            "No agents assigned; verification will fail",
            Some("add at least one agent assignment"),
        );
    }

    let mut seen = HashSet::new();
    for (idx, agent) in entry.agents.iter().enumerate() {
        if agent.agent_id.trim().is_empty() {
            result.add_error(
                format!("agents[{}].agent_id", idx),
                format!("agent {} has no id", idx),
                CODE_REQUIRED,
            );
        } else if !seen.insert(agent.agent_id.as_str()) {
            result.add_error(
                format!("agents[{}].agent_id", idx),
                format!("agent '{}' is assigned more than once", agent.agent_id),
                CODE_DUPLICATE,
            );
        }
        if agent.role.trim().is_empty() {
            result.add_warning(
                format!("agents[{}].role", idx),
                format!("agent '{}' has no role", agent.agent_id),
                None,
            );
        }
    }

    result
}
