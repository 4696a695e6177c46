//! Property-based tests for the coordinator state machine
//!
//! For any set of distinct agents the phase sequence follows the table order
//! and the message history is append-only.

#[cfg(test)]
mod tests {
    use crate::coordinator::{AssignmentStatus, MultiAgentCoordinator, Phase};
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn property_phase_order_and_append_only_history(
            ids in prop::collection::btree_set("[a-z]{1,8}", 1..8),
        ) {
            let coordinator = MultiAgentCoordinator::new();
            let agents = ids
                .iter()
                .map(|id| MultiAgentCoordinator::create_assignment(id.as_str(), "worker", vec!["work".to_string()]))
                .collect();

            let mut entry = MultiAgentCoordinator::create("task", agents);
            let mut phases = vec![entry.current_phase];

            while !entry.current_phase.is_terminal() {
                let before = entry.message_history.clone();
                entry = tokio_test::block_on(coordinator.process(entry)).unwrap();
                prop_assert!(entry.message_history.len() >= before.len());
                prop_assert_eq!(&entry.message_history[..before.len()], &before[..]);
                phases.push(entry.current_phase);
            }

            prop_assert_eq!(phases, Phase::ALL[..8].to_vec());
            let stats = MultiAgentCoordinator::get_stats(&entry);
            prop_assert_eq!(stats.completed_agents, ids.len());
            prop_assert_eq!(entry.count_status(AssignmentStatus::Failed), 0);
            prop_assert_eq!(entry.final_result.map(|r| r.agents.len()), Some(ids.len()));
        }

        /// `next_phase` never leaves the happy path and stops at completion
        #[test]
        fn property_next_phase_walks_table(steps in 0usize..12) {
            let mut entry = MultiAgentCoordinator::create("task", Vec::new());
            for _ in 0..steps {
                entry = MultiAgentCoordinator::next_phase(entry);
            }
            let expected = Phase::ALL[..8][steps.min(7)];
            prop_assert_eq!(entry.current_phase, expected);
        }
    }
}
