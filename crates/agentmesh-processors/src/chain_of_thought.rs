//! Sequential step-wise reasoning
//!
//! Steps run in declaration order against a context built from every earlier
//! result. A failing step is recorded with zero confidence and the run
//! continues.

use crate::error::Result;
use crate::strategies::{
    round_confidence, ActionExecutor, ConfidenceScorer, KeywordActionExecutor,
    KeywordConfidenceScorer,
};
use crate::validation::{ensure_valid, validate_cot_entry};
use agentmesh_config::ReasoningSettings;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Confidence carried by a step before it has run
pub const PENDING_STEP_CONFIDENCE: f64 = 0.5;

/// One reasoning step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CotStep {
    /// 1-based position, dense across the entry
    pub step_number: usize,
    /// What the step is thinking about
    pub thought: String,
    /// Action performed by the step
    pub action: String,
    /// Result of the action
    pub result: String,
    /// Why the step reached its result
    pub reasoning: String,
    /// Confidence in [0, 1]
    pub confidence: f64,
    /// Milliseconds since processing started
    pub timestamp: u64,
}

impl CotStep {
    fn pending(step_number: usize, description: &str, confidence: f64) -> Self {
        Self {
            step_number,
            thought: description.to_string(),
            action: description.to_string(),
            result: String::new(),
            reasoning: String::new(),
            confidence,
            timestamp: 0,
        }
    }
}

/// A chain-of-thought task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CotEntry {
    /// Task identifier
    pub task_id: String,
    /// Task description
    pub task: String,
    /// Ordered steps
    pub steps: Vec<CotStep>,
    /// Synthesized answer
    #[serde(default)]
    pub final_answer: String,
    /// Overall confidence in [0, 1]
    #[serde(default)]
    pub confidence: f64,
    /// Human-readable transcript
    #[serde(default)]
    pub reasoning: String,
    /// Free-form metadata
    #[serde(default)]
    pub metadata: HashMap<String, Value>,
}

/// Runs chain-of-thought entries
pub struct ChainOfThoughtProcessor {
    executor: Arc<dyn ActionExecutor>,
    scorer: Arc<dyn ConfidenceScorer>,
    settings: ReasoningSettings,
}

impl Default for ChainOfThoughtProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl ChainOfThoughtProcessor {
    /// Create a processor with keyword heuristics
    pub fn new() -> Self {
        Self::with_settings(ReasoningSettings::default())
    }

    /// Create a processor with custom settings
    pub fn with_settings(settings: ReasoningSettings) -> Self {
        Self {
            executor: Arc::new(KeywordActionExecutor),
            scorer: Arc::new(KeywordConfidenceScorer::with_base(
                settings.default_step_confidence,
            )),
            settings,
        }
    }

    /// Replace the action executor
    pub fn with_executor(mut self, executor: Arc<dyn ActionExecutor>) -> Self {
        self.executor = executor;
        self
    }

    /// Replace the confidence scorer
    pub fn with_scorer(mut self, scorer: Arc<dyn ConfidenceScorer>) -> Self {
        self.scorer = scorer;
        self
    }

    /// Build an entry with one pending step per description
    ///
    /// Pending steps start at [`PENDING_STEP_CONFIDENCE`]; the configured
    /// `default_step_confidence` only seeds the keyword scorer in `process`.
    pub fn create<S: AsRef<str>>(
        task_id: impl Into<String>,
        task: impl Into<String>,
        descriptions: &[S],
    ) -> CotEntry {
        CotEntry {
            task_id: task_id.into(),
            task: task.into(),
            steps: descriptions
                .iter()
                .enumerate()
                .map(|(i, d)| CotStep::pending(i + 1, d.as_ref(), PENDING_STEP_CONFIDENCE))
                .collect(),
            final_answer: String::new(),
            confidence: 0.0,
            reasoning: String::new(),
            metadata: HashMap::new(),
        }
    }

    /// Append a pending step without re-running the entry
    pub fn add_step(entry: &mut CotEntry, description: impl AsRef<str>) {
        let step_number = entry.steps.len() + 1;
        entry
            .steps
            .push(CotStep::pending(
                step_number,
                description.as_ref(),
                PENDING_STEP_CONFIDENCE,
            ));
    }

    /// Execute every step and synthesize the answer
    pub async fn process(&self, entry: CotEntry) -> Result<CotEntry> {
        ensure_valid(&validate_cot_entry(&entry))?;
        debug!(task_id = %entry.task_id, step_count = entry.steps.len(), "Processing reasoning task");

        let started = Instant::now();
        let mut context = String::new();
        let mut steps = Vec::with_capacity(entry.steps.len());

        for step in &entry.steps {
            let executed = self.execute_step(step, &context, started).await;
            if !context.is_empty() {
                context.push('\n');
            }
            context.push_str(&format!("Step {}: {}", executed.step_number, executed.result));
            steps.push(executed);
        }

        let confidence = self.calculate_confidence(&steps);
        let final_answer = synthesize_answer(&entry.task, &steps);
        let reasoning = transcript(&steps, confidence);
        let average = steps.iter().map(|s| s.confidence).sum::<f64>() / steps.len() as f64;

        let mut metadata = entry.metadata;
        metadata.insert("processedAt".to_string(), json!(Utc::now().to_rfc3339()));
        metadata.insert("totalSteps".to_string(), json!(steps.len()));
        metadata.insert("averageConfidence".to_string(), json!(round_confidence(average)));

        info!(
            task_id = %entry.task_id,
            confidence = confidence,
            duration_ms = started.elapsed().as_millis() as u64,
            "Reasoning task processed"
        );

        Ok(CotEntry {
            task_id: entry.task_id,
            task: entry.task,
            steps,
            final_answer,
            confidence,
            reasoning,
            metadata,
        })
    }

    async fn execute_step(&self, step: &CotStep, context: &str, started: Instant) -> CotStep {
        let prior = step.step_number.saturating_sub(1);
        let thought = if step.thought.trim().is_empty() {
            format!("Considering step {}: {}", step.step_number, step.action)
        } else {
            step.thought.clone()
        };

        let (result, confidence) = match self.executor.perform(&step.action, context).await {
            Ok(result) => {
                let confidence = round_confidence(self.scorer.score(&result));
                (result, confidence)
            }
            Err(e) => {
                warn!(step = step.step_number, error = %e, "Reasoning step failed");
                (format!("Error: {}", e), 0.0)
            }
        };

        let reasoning = if step.reasoning.trim().is_empty() {
            format!("Applied '{}' building on {} prior step(s)", step.action, prior)
        } else {
            step.reasoning.clone()
        };

        CotStep {
            step_number: step.step_number,
            thought,
            action: step.action.clone(),
            result,
            reasoning,
            confidence,
            timestamp: started.elapsed().as_millis() as u64,
        }
    }

    /// Overall confidence for a set of executed steps
    ///
    /// Average step confidence, plus a completeness bonus for longer chains,
    /// minus a penalty per step below 0.5.
    pub fn calculate_confidence(&self, steps: &[CotStep]) -> f64 {
        if steps.is_empty() {
            return 0.0;
        }

        let average = steps.iter().map(|s| s.confidence).sum::<f64>() / steps.len() as f64;
        let bonus = (steps.len() as f64 / 10.0).min(self.settings.max_completeness_bonus);
        let weak = steps.iter().filter(|s| s.confidence < 0.5).count() as f64;

        round_confidence(average + bonus - self.settings.error_penalty * weak)
    }
}

fn synthesize_answer(task: &str, steps: &[CotStep]) -> String {
    let results = steps
        .iter()
        .map(|s| format!("Step {}: {}", s.step_number, s.result))
        .collect::<Vec<_>>()
        .join("\n");
    format!("Task: {}\n\nResults:\n{}", task, results)
}

fn transcript(steps: &[CotStep], confidence: f64) -> String {
    let mut lines: Vec<String> = steps
        .iter()
        .map(|s| {
            format!(
                "Step {} ({:.1}% confidence): {}",
                s.step_number,
                s.confidence * 100.0,
                s.reasoning
            )
        })
        .collect();
    lines.push(String::new());
    lines.push(format!("Overall confidence: {:.1}%", confidence * 100.0));
    lines.join("\n")
}
