//! Property-based tests for retrieval filtering and excerpts

#[cfg(test)]
mod tests {
    use crate::rag::{extract_excerpt, filter_by_relevance, search, Document, RagProcessor};
    use proptest::prelude::*;

    fn documents() -> impl Strategy<Value = Vec<Document>> {
        prop::collection::vec((0.0f64..=1.0, "[a-z ]{0,40}"), 0..20).prop_map(|items| {
            items
                .into_iter()
                .enumerate()
                .map(|(i, (score, content))| Document::new(format!("d{}", i), content, score))
                .collect()
        })
    }

    proptest! {
        /// Filtering keeps exactly the documents at or above the threshold, in order
        #[test]
        fn property_filter_by_relevance_subset(docs in documents(), threshold in 0.0f64..=1.0) {
            let kept = filter_by_relevance(&docs, threshold);
            let expected: Vec<&str> = docs
                .iter()
                .filter(|d| d.similarity_score >= threshold)
                .map(|d| d.id.as_str())
                .collect();
            let actual: Vec<&str> = kept.iter().map(|d| d.id.as_str()).collect();
            prop_assert_eq!(actual, expected);
        }

        /// Excerpts never exceed the limit plus an ellipsis
        #[test]
        fn property_excerpt_bounded(content in ".{0,400}", max_length in 1usize..250) {
            let excerpt = extract_excerpt(&content, max_length);
            prop_assert!(excerpt.chars().count() <= max_length + 3);
            if content.chars().count() <= max_length {
                prop_assert_eq!(excerpt, content);
            }
        }

        /// Search scores are in (0, 1] and sorted descending
        #[test]
        fn property_search_sorted(docs in documents(), query in "[a-z]{1,5}( [a-z]{1,5}){0,3}") {
            let ranked = search(&query, &docs);
            prop_assert!(ranked.len() <= docs.len());
            for doc in &ranked {
                prop_assert!(doc.similarity_score > 0.0 && doc.similarity_score <= 1.0);
            }
            for pair in ranked.windows(2) {
                prop_assert!(pair[0].similarity_score >= pair[1].similarity_score);
            }
        }

        /// Confidence is bounded and zero without documents
        #[test]
        fn property_confidence_bounded(docs in documents(), sources in 0usize..20) {
            let processor = RagProcessor::new();
            let confidence = processor.calculate_confidence(&docs, sources);
            prop_assert!((0.0..=1.0).contains(&confidence));
            if docs.is_empty() {
                prop_assert_eq!(confidence, 0.0);
            }
        }

        /// Attributed sources come back sorted by relevance
        #[test]
        fn property_sources_sorted(docs in documents()) {
            let sources = RagProcessor::new().attribute_sources(&docs);
            prop_assert_eq!(sources.len(), docs.len());
            for pair in sources.windows(2) {
                prop_assert!(pair[0].relevance_score >= pair[1].relevance_score);
            }
        }
    }
}
