//! Task processors for AgentMesh
//!
//! Three reusable task patterns layered on top of the capability registry:
//!
//! - **Chain of thought**: [`ChainOfThoughtProcessor`] runs ordered reasoning
//!   steps against an accumulating context and scores confidence
//! - **Retrieval-augmented generation**: [`RagProcessor`] retrieves, filters,
//!   generates and attributes sources
//! - **Multi-agent coordination**: [`MultiAgentCoordinator`] advances a task
//!   through an explicit phase table, one phase per call
//!
//! The heuristic parts sit behind the traits in [`strategies`].
//!
//! # Example
//!
//! ```ignore
//! use agentmesh_processors::ChainOfThoughtProcessor;
//!
//! let processor = ChainOfThoughtProcessor::new();
//! let entry = ChainOfThoughtProcessor::create("t1", "sum", &["load", "compute"]);
//! let entry = processor.process(entry).await?;
//! println!("{}", entry.final_answer);
//! ```

#![warn(missing_docs)]

pub mod chain_of_thought;
pub mod coordinator;
pub mod error;
pub mod rag;
pub mod strategies;
pub mod validation;

#[cfg(test)]
mod coordinator_properties;

#[cfg(test)]
mod rag_properties;

#[cfg(test)]
mod reasoning_properties;

pub use chain_of_thought::{
    ChainOfThoughtProcessor, CotEntry, CotStep, PENDING_STEP_CONFIDENCE,
};
pub use coordinator::{
    AgentAssignment, AgentMessage, AssignmentStatus, CoordinatorStats, FinalResult,
    MessagePriority, MessageType, MultiAgentCoordinator, MultiAgentEntry, Phase, Subtask,
};
pub use error::{ProcessorError, Result};
pub use rag::{
    extract_excerpt, filter_by_relevance, search, Document, KeywordRetriever, RagEntry,
    RagProcessor, Source, NO_RELEVANT_INFORMATION,
};
pub use strategies::{
    ActionExecutor, ConfidenceScorer, Generator, KeywordActionExecutor, KeywordConfidenceScorer,
    PlaceholderExecutor, PlaceholderRetriever, Retriever, TaskExecutor, TemplateGenerator,
};
pub use validation::{validate_cot_entry, validate_multi_agent_entry, validate_rag_entry};
