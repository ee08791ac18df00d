//! Property-based coverage of severity aggregation.

use proptest::prelude::*;

use cardlink_core::orchestration::{ExecutionSummary, OrchestratedExecutionResult};

fn result_strategy() -> impl Strategy<Value = OrchestratedExecutionResult> {
    prop_oneof![
        Just(OrchestratedExecutionResult::Success),
        Just(OrchestratedExecutionResult::NonTerminalError),
        Just(OrchestratedExecutionResult::TerminalError),
    ]
}

proptest! {
    /// Property: aggregation equals the maximum under the severity ordering.
    #[test]
    fn aggregate_is_the_maximum_severity(results in prop::collection::vec(result_strategy(), 0..32)) {
        let expected = results
            .iter()
            .copied()
            .max()
            .unwrap_or(OrchestratedExecutionResult::Success);
        prop_assert_eq!(OrchestratedExecutionResult::aggregate(results), expected);
    }

    /// Property: aggregation is independent of grouping.
    #[test]
    fn aggregate_is_associative(
        left in prop::collection::vec(result_strategy(), 0..16),
        right in prop::collection::vec(result_strategy(), 0..16),
    ) {
        let combined: Vec<_> = left.iter().chain(right.iter()).copied().collect();
        let grouped = OrchestratedExecutionResult::aggregate(left)
            .combine(OrchestratedExecutionResult::aggregate(right));
        prop_assert_eq!(OrchestratedExecutionResult::aggregate(combined), grouped);
    }

    /// Property: aggregation is independent of order.
    #[test]
    fn aggregate_is_order_independent(results in prop::collection::vec(result_strategy(), 0..32)) {
        let forward = OrchestratedExecutionResult::aggregate(results.clone());
        let reversed = OrchestratedExecutionResult::aggregate(results.into_iter().rev());
        prop_assert_eq!(forward, reversed);
    }

    /// Property: a terminal error is never discarded by any combination.
    #[test]
    fn terminal_errors_always_dominate(results in prop::collection::vec(result_strategy(), 1..32)) {
        let had_terminal = results
            .iter()
            .any(|r| *r == OrchestratedExecutionResult::TerminalError);
        let aggregated = OrchestratedExecutionResult::aggregate(results);
        if had_terminal {
            prop_assert_eq!(aggregated, OrchestratedExecutionResult::TerminalError);
        } else {
            prop_assert_ne!(aggregated, OrchestratedExecutionResult::TerminalError);
        }
    }

    /// Property: folding summaries adds task counts and maxes severities.
    #[test]
    fn summary_fold_adds_counts_and_maxes_severity(
        pairs in prop::collection::vec((result_strategy(), 0usize..100), 0..16)
    ) {
        let total: usize = pairs.iter().map(|(_, count)| count).sum();
        let severity = OrchestratedExecutionResult::aggregate(pairs.iter().map(|(r, _)| *r));

        let folded = pairs
            .into_iter()
            .map(|(result, count)| ExecutionSummary::new(result, count))
            .fold(
                ExecutionSummary::new(OrchestratedExecutionResult::Success, 0),
                ExecutionSummary::fold,
            );

        prop_assert_eq!(folded.tasks_executed, total);
        prop_assert_eq!(folded.result, severity);
    }
}
