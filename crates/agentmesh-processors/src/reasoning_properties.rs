//! Property-based tests for chain-of-thought confidence

#[cfg(test)]
mod tests {
    use crate::chain_of_thought::ChainOfThoughtProcessor;
    use crate::strategies::{ConfidenceScorer, KeywordConfidenceScorer};
    use proptest::prelude::*;

    proptest! {
        /// Step scores stay in [0, 1] for any result text
        #[test]
        fn property_step_confidence_bounded(text in ".{0,120}") {
            let score = KeywordConfidenceScorer::new().score(&text);
            prop_assert!((0.0..=1.0).contains(&score));
        }

        /// Overall confidence stays in [0, 1] for any mix of step scores
        #[test]
        fn property_overall_confidence_bounded(
            scores in prop::collection::vec(0.0f64..=1.0, 1..15),
        ) {
            let processor = ChainOfThoughtProcessor::new();
            let descriptions: Vec<String> = (0..scores.len()).map(|i| format!("step {}", i)).collect();
            let mut steps = ChainOfThoughtProcessor::create("t", "task", &descriptions).steps;
            for (step, score) in steps.iter_mut().zip(&scores) {
                step.confidence = *score;
            }

            let confidence = processor.calculate_confidence(&steps);
            prop_assert!((0.0..=1.0).contains(&confidence));
        }

        /// Appending and reprocessing keeps existing step identity
        #[test]
        fn property_add_step_extends_prefix(
            actions in prop::collection::vec("[a-z]{1,12}", 1..6),
            extra in "[a-z]{1,12}",
        ) {
            let processor = ChainOfThoughtProcessor::new();

            let first = tokio_test::block_on(processor.process(ChainOfThoughtProcessor::create("t", "task", &actions)))
                .unwrap();
            let mut extended = first.clone();
            ChainOfThoughtProcessor::add_step(&mut extended, &extra);
            let second = tokio_test::block_on(processor.process(extended)).unwrap();

            prop_assert_eq!(second.steps.len(), actions.len() + 1);
            for (before, after) in first.steps.iter().zip(&second.steps) {
                prop_assert_eq!(before.step_number, after.step_number);
                prop_assert_eq!(&before.action, &after.action);
                prop_assert_eq!(&before.thought, &after.thought);
            }
            prop_assert!((0.0..=1.0).contains(&second.confidence));
        }
    }
}
