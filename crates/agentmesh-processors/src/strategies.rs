//! Pluggable strategies behind the processors
//!
//! Each processor delegates its "intelligent" step to one of these traits.
//! The defaults here are keyword heuristics and placeholders that keep the
//! pipelines deterministic; hosts swap in model-backed implementations.

use crate::coordinator::{AgentAssignment, Subtask};
use crate::error::{ProcessorError, Result};
use crate::rag::Document;
use agentmesh_config::RetrievalSettings;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashMap;

/// Clamp to [0, 1] and round to three decimals
pub fn round_confidence(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    (value.clamp(0.0, 1.0) * 1000.0).round() / 1000.0
}

/// Runs a reasoning step's action against the accumulated context
#[async_trait]
pub trait ActionExecutor: Send + Sync {
    /// Perform `action` and describe its result
    async fn perform(&self, action: &str, context: &str) -> Result<String>;
}

/// Scores the result text of a single reasoning step
pub trait ConfidenceScorer: Send + Sync {
    /// Confidence in [0, 1] for a step result
    fn score(&self, result: &str) -> f64;
}

/// Produces candidate documents for a query
#[async_trait]
pub trait Retriever: Send + Sync {
    /// Ranked candidate documents, best first
    async fn retrieve(&self, query: &str) -> Result<Vec<Document>>;
}

/// Writes a response grounded in retrieved documents
#[async_trait]
pub trait Generator: Send + Sync {
    /// Generate a response; `documents` is never empty
    async fn generate(&self, query: &str, documents: &[Document]) -> Result<String>;
}

/// Carries out an agent's delegated subtask
#[async_trait]
pub trait TaskExecutor: Send + Sync {
    /// Execute the subtask and return the agent's result
    async fn execute(&self, assignment: &AgentAssignment, subtask: Option<&Subtask>) -> Result<Value>;
}

/// Keyword-driven stand-in for a model call
#[derive(Debug, Clone, Default)]
pub struct KeywordActionExecutor;

#[async_trait]
impl ActionExecutor for KeywordActionExecutor {
    async fn perform(&self, action: &str, context: &str) -> Result<String> {
        let action = action.trim();
        if action.is_empty() {
            return Err(ProcessorError::action_failed("action is empty"));
        }

        let prior = context.lines().filter(|l| l.starts_with("Step ")).count();
        let lowered = action.to_lowercase();

        let result = if lowered.contains("generate") {
            format!("Generated output for '{}' using {} prior result(s)", action, prior)
        } else if lowered.contains("analyze") {
            format!("Analyzed '{}' against {} prior result(s)", action, prior)
        } else if lowered.contains("process") {
            format!("Processed '{}' and executed the required operations", action)
        } else {
            format!("Completed '{}' successfully", action)
        };

        Ok(result)
    }
}

/// Keyword heuristic for step confidence
#[derive(Debug, Clone)]
pub struct KeywordConfidenceScorer {
    base: f64,
}

impl Default for KeywordConfidenceScorer {
    fn default() -> Self {
        Self { base: 0.5 }
    }
}

impl KeywordConfidenceScorer {
    /// Create a scorer starting from the default base of 0.5
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a scorer starting from `base`
    pub fn with_base(base: f64) -> Self {
        Self { base }
    }
}

impl ConfidenceScorer for KeywordConfidenceScorer {
    fn score(&self, result: &str) -> f64 {
        let text = result.to_lowercase();
        let has = |words: &[&str]| words.iter().any(|w| text.contains(w));

        let mut confidence = self.base;
        if has(&["completed", "success"]) {
            confidence += 0.2;
        }
        if has(&["generated", "analyzed"]) {
            confidence += 0.15;
        }
        if has(&["processed", "executed"]) {
            confidence += 0.15;
        }
        if has(&["error", "failed"]) {
            confidence -= 0.3;
        }
        if has(&["unknown", "uncertain"]) {
            confidence -= 0.2;
        }

        round_confidence(confidence)
    }
}

/// Synthesizes evenly stepped placeholder documents
///
/// Stands in for a vector or keyword index. Similarity starts at
/// `similarity_start` and drops by `similarity_step` per document.
#[derive(Debug, Clone)]
pub struct PlaceholderRetriever {
    top_k: usize,
    start: f64,
    step: f64,
}

impl Default for PlaceholderRetriever {
    fn default() -> Self {
        Self::from_settings(&RetrievalSettings::default())
    }
}

impl PlaceholderRetriever {
    /// Create a retriever with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a retriever from retrieval settings
    pub fn from_settings(settings: &RetrievalSettings) -> Self {
        Self {
            top_k: settings.top_k,
            start: settings.similarity_start,
            step: settings.similarity_step,
        }
    }
}

#[async_trait]
impl Retriever for PlaceholderRetriever {
    async fn retrieve(&self, query: &str) -> Result<Vec<Document>> {
        let documents = (0..self.top_k)
            .map(|i| {
                let similarity = ((self.start - self.step * i as f64) * 100.0).round() / 100.0;
                let mut metadata = HashMap::new();
                metadata.insert("source".to_string(), json!("placeholder"));
                metadata.insert("query".to_string(), json!(query));

                Document {
                    id: format!("doc-{}", i + 1),
                    content: format!(
                        "Reference material {} for \"{}\". It summarizes what is known about the topic. \
                         Further detail would come from a real index.",
                        i + 1,
                        query
                    ),
                    metadata,
                    similarity_score: similarity.clamp(0.0, 1.0),
                    chunk_index: i,
                }
            })
            .collect();

        Ok(documents)
    }
}

/// Template response built from the retrieved context
#[derive(Debug, Clone, Default)]
pub struct TemplateGenerator;

#[async_trait]
impl Generator for TemplateGenerator {
    async fn generate(&self, query: &str, documents: &[Document]) -> Result<String> {
        if documents.is_empty() {
            return Err(ProcessorError::generation_failed("no context documents"));
        }

        let context = documents
            .iter()
            .enumerate()
            .map(|(i, doc)| format!("[{}] {}", i + 1, doc.content))
            .collect::<Vec<_>>()
            .join("\n\n");
        let average =
            documents.iter().map(|d| d.similarity_score).sum::<f64>() / documents.len() as f64;

        Ok(format!(
            "Based on {} relevant document(s) (average similarity {:.2}), here is what is known about \"{}\":\n\n{}",
            documents.len(),
            average,
            query,
            context
        ))
    }
}

/// Marks every delegated subtask done without doing any work
///
/// Hosts replace this with an executor that actually dispatches to agents
/// and awaits their completion.
#[derive(Debug, Clone, Default)]
pub struct PlaceholderExecutor;

#[async_trait]
impl TaskExecutor for PlaceholderExecutor {
    async fn execute(&self, assignment: &AgentAssignment, subtask: Option<&Subtask>) -> Result<Value> {
        Ok(json!({
            "agentId": assignment.agent_id,
            "role": assignment.role,
            "subtask": subtask.map(|s| s.description.clone()),
            "status": "completed",
        }))
    }
}
