//! Retrieval-augmented response generation
//!
//! A query is answered in four stages: retrieve candidate documents, keep the
//! relevant ones, generate a response from them, and attribute sources.
//! Retrieval and generation failures degrade the entry instead of failing it.

use crate::error::Result;
use crate::strategies::{
    round_confidence, Generator, PlaceholderRetriever, Retriever, TemplateGenerator,
};
use crate::validation::{ensure_valid, validate_rag_entry};
use agentmesh_config::RetrievalSettings;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Response used when nothing relevant was retrieved
pub const NO_RELEVANT_INFORMATION: &str =
    "I couldn't find any relevant information to answer your query.";

/// A retrieved document chunk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Document identifier
    pub id: String,
    /// Chunk text
    pub content: String,
    /// Free-form metadata
    #[serde(default)]
    pub metadata: HashMap<String, Value>,
    /// Similarity to the query in [0, 1]
    pub similarity_score: f64,
    /// Position of the chunk within its document
    #[serde(default)]
    pub chunk_index: usize,
}

impl Document {
    /// Create a document with the given similarity
    pub fn new(id: impl Into<String>, content: impl Into<String>, similarity_score: f64) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            metadata: HashMap::new(),
            similarity_score,
            chunk_index: 0,
        }
    }
}

/// Attribution for part of a generated response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
    /// Source document
    pub document_id: String,
    /// Similarity carried over from retrieval
    pub relevance_score: f64,
    /// Bounded excerpt of the document
    pub excerpt: String,
    /// 1-based chunk number
    pub page_number: Option<usize>,
    /// When the source was attributed
    pub timestamp: DateTime<Utc>,
}

/// A retrieval-augmented query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RagEntry {
    /// Query identifier
    pub query_id: String,
    /// Query text
    pub query: String,
    /// Documents kept after relevance filtering
    #[serde(default)]
    pub retrieved_context: Vec<Document>,
    /// Response text
    #[serde(default)]
    pub generated_response: String,
    /// Sources, most relevant first
    #[serde(default)]
    pub sources: Vec<Source>,
    /// Confidence in [0, 1]
    #[serde(default)]
    pub confidence: f64,
    /// Free-form metadata
    #[serde(default)]
    pub metadata: HashMap<String, Value>,
}

/// Runs retrieval-augmented entries
pub struct RagProcessor {
    retriever: Arc<dyn Retriever>,
    generator: Arc<dyn Generator>,
    settings: RetrievalSettings,
}

impl Default for RagProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl RagProcessor {
    /// Create a processor with the placeholder retriever and template generator
    pub fn new() -> Self {
        Self::with_settings(RetrievalSettings::default())
    }

    /// Create a processor with custom settings
    pub fn with_settings(settings: RetrievalSettings) -> Self {
        Self {
            retriever: Arc::new(PlaceholderRetriever::from_settings(&settings)),
            generator: Arc::new(TemplateGenerator),
            settings,
        }
    }

    /// Replace the retriever
    pub fn with_retriever(mut self, retriever: Arc<dyn Retriever>) -> Self {
        self.retriever = retriever;
        self
    }

    /// Replace the generator
    pub fn with_generator(mut self, generator: Arc<dyn Generator>) -> Self {
        self.generator = generator;
        self
    }

    /// Build an empty entry for a query
    pub fn create(query_id: impl Into<String>, query: impl Into<String>) -> RagEntry {
        RagEntry {
            query_id: query_id.into(),
            query: query.into(),
            retrieved_context: Vec::new(),
            generated_response: String::new(),
            sources: Vec::new(),
            confidence: 0.0,
            metadata: HashMap::new(),
        }
    }

    /// Retrieve, generate, attribute and score
    pub async fn process(&self, entry: RagEntry) -> Result<RagEntry> {
        ensure_valid(&validate_rag_entry(&entry))?;
        debug!(query_id = %entry.query_id, "Processing retrieval query");

        let candidates = match self.retriever.retrieve(&entry.query).await {
            Ok(documents) => documents,
            Err(e) => {
                warn!(query_id = %entry.query_id, error = %e, "Retrieval failed, continuing without context");
                Vec::new()
            }
        };
        let documents = filter_by_relevance(&candidates, self.settings.relevance_threshold);

        let generated_response = if documents.is_empty() {
            NO_RELEVANT_INFORMATION.to_string()
        } else {
            match self.generator.generate(&entry.query, &documents).await {
                Ok(response) => response,
                Err(e) => {
                    warn!(query_id = %entry.query_id, error = %e, "Generation failed");
                    format!("Error generating response: {}", e)
                }
            }
        };

        let sources = self.attribute_sources(&documents);
        let confidence = self.calculate_confidence(&documents, sources.len());
        let average = average_similarity(&documents);

        let mut metadata = entry.metadata;
        metadata.insert("processedAt".to_string(), json!(Utc::now().to_rfc3339()));
        metadata.insert("retrievedDocuments".to_string(), json!(documents.len()));
        metadata.insert("sourcesCount".to_string(), json!(sources.len()));
        metadata.insert("averageSimilarity".to_string(), json!(round_confidence(average)));

        info!(
            query_id = %entry.query_id,
            documents = documents.len(),
            confidence = confidence,
            "Retrieval query processed"
        );

        Ok(RagEntry {
            query_id: entry.query_id,
            query: entry.query,
            retrieved_context: documents,
            generated_response,
            sources,
            confidence,
            metadata,
        })
    }

    /// Map documents to sources sorted by relevance, highest first
    pub fn attribute_sources(&self, documents: &[Document]) -> Vec<Source> {
        let now = Utc::now();
        let mut sources: Vec<Source> = documents
            .iter()
            .map(|doc| Source {
                document_id: doc.id.clone(),
                relevance_score: doc.similarity_score,
                excerpt: extract_excerpt(&doc.content, self.settings.excerpt_max_length),
                page_number: Some(doc.chunk_index + 1),
                timestamp: now,
            })
            .collect();

        sources.sort_by(|a, b| b.relevance_score.total_cmp(&a.relevance_score));
        sources
    }

    /// Confidence for a set of retrieved documents
    ///
    /// Average similarity plus a bonus per source, minus a penalty when the
    /// average falls below the relevance threshold. Zero without documents.
    pub fn calculate_confidence(&self, documents: &[Document], source_count: usize) -> f64 {
        if documents.is_empty() {
            return 0.0;
        }

        let average = average_similarity(documents);
        let bonus = (source_count as f64 / 10.0).min(0.2);
        let penalty = ((self.settings.relevance_threshold - average) * 0.5).max(0.0);

        round_confidence(average + bonus - penalty)
    }
}

fn average_similarity(documents: &[Document]) -> f64 {
    if documents.is_empty() {
        return 0.0;
    }
    documents.iter().map(|d| d.similarity_score).sum::<f64>() / documents.len() as f64
}

/// Documents with similarity at or above `threshold`, in their original order
pub fn filter_by_relevance(documents: &[Document], threshold: f64) -> Vec<Document> {
    documents
        .iter()
        .filter(|d| d.similarity_score >= threshold)
        .cloned()
        .collect()
}

/// Keyword-overlap reranking
///
/// Each document scores the fraction of lowercase query tokens found in its
/// content. Documents scoring zero are dropped; the rest come back best first
/// with `similarity_score` set to their overlap score.
pub fn search(query: &str, documents: &[Document]) -> Vec<Document> {
    let tokens: Vec<String> = query
        .split_whitespace()
        .map(|t| t.to_lowercase())
        .collect();
    if tokens.is_empty() {
        return Vec::new();
    }

    let mut scored: Vec<Document> = documents
        .iter()
        .filter_map(|doc| {
            let content = doc.content.to_lowercase();
            let hits = tokens.iter().filter(|t| content.contains(t.as_str())).count();
            let score = hits as f64 / tokens.len() as f64;
            (score > 0.0).then(|| Document {
                similarity_score: score,
                ..doc.clone()
            })
        })
        .collect();

    scored.sort_by(|a, b| b.similarity_score.total_cmp(&a.similarity_score));
    scored
}

/// Bounded excerpt that prefers ending on a sentence
///
/// Content longer than `max_length` characters is cut at the last `.`, `!`
/// or `?` past the halfway mark, or hard-cut with an ellipsis.
pub fn extract_excerpt(content: &str, max_length: usize) -> String {
    if content.chars().count() <= max_length {
        return content.to_string();
    }

    let truncated: Vec<char> = content.chars().take(max_length).collect();
    let terminator = truncated
        .iter()
        .rposition(|c| matches!(c, '.' | '!' | '?'));

    match terminator {
        Some(pos) if pos as f64 > max_length as f64 * 0.5 => truncated[..=pos].iter().collect(),
        _ => {
            let mut excerpt: String = truncated.into_iter().collect();
            excerpt.push_str("...");
            excerpt
        }
    }
}

/// Retriever over an in-memory corpus using keyword overlap
#[derive(Debug, Clone, Default)]
pub struct KeywordRetriever {
    corpus: Vec<Document>,
}

impl KeywordRetriever {
    /// Create a retriever over `corpus`
    pub fn new(corpus: Vec<Document>) -> Self {
        Self { corpus }
    }

    /// Add a document to the corpus
    pub fn add_document(&mut self, document: Document) {
        self.corpus.push(document);
    }
}

#[async_trait]
impl Retriever for KeywordRetriever {
    async fn retrieve(&self, query: &str) -> Result<Vec<Document>> {
        Ok(search(query, &self.corpus))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProcessorError;

    struct BrokenRetriever;

    #[async_trait]
    impl Retriever for BrokenRetriever {
        async fn retrieve(&self, _query: &str) -> Result<Vec<Document>> {
            Err(ProcessorError::retrieval_failed("index offline"))
        }
    }

    struct BrokenGenerator;

    #[async_trait]
    impl Generator for BrokenGenerator {
        async fn generate(&self, _query: &str, _documents: &[Document]) -> Result<String> {
            Err(ProcessorError::generation_failed("model offline"))
        }
    }

    fn docs(scores: &[f64]) -> Vec<Document> {
        scores
            .iter()
            .enumerate()
            .map(|(i, s)| Document::new(format!("d{}", i), format!("content {}", i), *s))
            .collect()
    }

    #[tokio::test]
    async fn test_process_with_placeholder_retriever() {
        let processor = RagProcessor::new();
        let entry = processor
            .process(RagProcessor::create("q1", "what is X"))
            .await
            .unwrap();

        assert_eq!(entry.retrieved_context.len(), 3);
        assert_eq!(entry.sources.len(), 3);
        assert_eq!(entry.sources[0].document_id, "doc-1");
        assert_eq!(entry.sources[0].page_number, Some(1));
        assert!(entry.generated_response.contains("what is X"));
        assert_eq!(entry.metadata["retrievedDocuments"], json!(3));
        assert_eq!(entry.confidence, 1.0);
    }

    #[tokio::test]
    async fn test_no_documents_yields_fixed_response() {
        let processor = RagProcessor::new().with_retriever(Arc::new(KeywordRetriever::default()));
        let entry = processor
            .process(RagProcessor::create("q1", "anything"))
            .await
            .unwrap();

        assert_eq!(entry.generated_response, NO_RELEVANT_INFORMATION);
        assert_eq!(entry.confidence, 0.0);
        assert!(entry.sources.is_empty());
    }

    #[tokio::test]
    async fn test_retrieval_failure_degrades() {
        let processor = RagProcessor::new().with_retriever(Arc::new(BrokenRetriever));
        let entry = processor
            .process(RagProcessor::create("q1", "anything"))
            .await
            .unwrap();
        assert_eq!(entry.generated_response, NO_RELEVANT_INFORMATION);
        assert_eq!(entry.confidence, 0.0);
    }

    #[tokio::test]
    async fn test_generation_failure_degrades() {
        let processor = RagProcessor::new().with_generator(Arc::new(BrokenGenerator));
        let entry = processor
            .process(RagProcessor::create("q1", "anything"))
            .await
            .unwrap();
        assert!(entry.generated_response.starts_with("Error generating response"));
        assert_eq!(entry.sources.len(), 3);
    }

    #[tokio::test]
    async fn test_invalid_entry_fails_fast() {
        let processor = RagProcessor::new();
        let result = processor.process(RagProcessor::create("q1", "  ")).await;
        assert!(matches!(result, Err(ProcessorError::InvalidEntry(_))));
    }

    #[test]
    fn test_filter_by_relevance_inclusive() {
        let kept = filter_by_relevance(&docs(&[0.9, 0.7, 0.69, 0.8]), 0.7);
        let ids: Vec<&str> = kept.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["d0", "d1", "d3"]);
    }

    #[test]
    fn test_calculate_confidence_low_relevance_penalty() {
        let processor = RagProcessor::new();
        // average 0.5, bonus 0.1, penalty (0.7 - 0.5) * 0.5
        assert_eq!(processor.calculate_confidence(&docs(&[0.4, 0.6]), 1), 0.5);
        assert_eq!(processor.calculate_confidence(&[], 3), 0.0);
    }

    #[test]
    fn test_sources_sorted_descending() {
        let processor = RagProcessor::new();
        let sources = processor.attribute_sources(&docs(&[0.72, 0.91, 0.8]));
        let scores: Vec<f64> = sources.iter().map(|s| s.relevance_score).collect();
        assert_eq!(scores, vec![0.91, 0.8, 0.72]);
    }

    #[test]
    fn test_search_ranks_by_overlap() {
        let corpus = vec![
            Document::new("a", "Rust ownership and borrowing", 0.0),
            Document::new("b", "Python typing", 0.0),
            Document::new("c", "Ownership rules", 0.0),
        ];

        let ranked = search("rust ownership", &corpus);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].id, "a");
        assert_eq!(ranked[0].similarity_score, 1.0);
        assert_eq!(ranked[1].id, "c");
        assert_eq!(ranked[1].similarity_score, 0.5);
        assert!(search("   ", &corpus).is_empty());
    }

    #[test]
    fn test_excerpt_short_content_untouched() {
        assert_eq!(extract_excerpt("Short.", 200), "Short.");
    }

    #[test]
    fn test_excerpt_cuts_at_sentence() {
        let content = "First sentence here. Second one follows! Third goes on and on";
        let excerpt = extract_excerpt(content, 45);
        assert_eq!(excerpt, "First sentence here. Second one follows!");
    }

    #[test]
    fn test_excerpt_hard_cut_with_ellipsis() {
        let content = "Hi. this text has no late terminator at all";
        let excerpt = extract_excerpt(content, 20);
        assert_eq!(excerpt, "Hi. this text has no...");
    }

    #[tokio::test]
    async fn test_keyword_retriever_feeds_pipeline() {
        let retriever = KeywordRetriever::new(vec![
            Document::new("guide", "Borrowing rules in Rust explained.", 0.0),
            Document::new("other", "Gardening tips.", 0.0),
        ]);
        let processor = RagProcessor::new().with_retriever(Arc::new(retriever));

        let entry = processor
            .process(RagProcessor::create("q2", "rust borrowing"))
            .await
            .unwrap();
        assert_eq!(entry.retrieved_context.len(), 1);
        assert_eq!(entry.sources[0].document_id, "guide");
    }
}
