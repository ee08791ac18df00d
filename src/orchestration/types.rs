//! # Orchestration Types
//!
//! Core types shared across the orchestration engine: execution results,
//! phase ordering, scheduled job details, and execution summaries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Outcome severity of an orchestrated task, job phase, or whole job tree.
///
/// Totally ordered by severity: `Success < NonTerminalError < TerminalError`.
/// Aggregating any number of results always yields the maximum severity seen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrchestratedExecutionResult {
    /// Work completed cleanly
    Success,
    /// Recorded degradation; sibling execution continues
    NonTerminalError,
    /// Fatal failure; halts further synchronous sibling progression
    TerminalError,
}

impl OrchestratedExecutionResult {
    /// Combine two results, keeping the more severe one.
    pub fn combine(self, other: Self) -> Self {
        self.max(other)
    }

    /// Fold any number of results into their maximum severity.
    /// An empty input aggregates to `Success`.
    pub fn aggregate<I: IntoIterator<Item = Self>>(results: I) -> Self {
        results
            .into_iter()
            .fold(Self::Success, OrchestratedExecutionResult::combine)
    }

    /// Check if this result halts further synchronous sibling work
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::TerminalError)
    }

    /// Check if this result represents any failure at all
    pub fn is_error(&self) -> bool {
        !matches!(self, Self::Success)
    }
}

impl fmt::Display for OrchestratedExecutionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::NonTerminalError => write!(f, "non_terminal_error"),
            Self::TerminalError => write!(f, "terminal_error"),
        }
    }
}

impl std::str::FromStr for OrchestratedExecutionResult {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "success" => Ok(Self::Success),
            "non_terminal_error" => Ok(Self::NonTerminalError),
            "terminal_error" => Ok(Self::TerminalError),
            _ => Err(format!("Invalid execution result: {s}")),
        }
    }
}

/// Phase ordering for synchronous jobs: run owned tasks before child jobs,
/// or the other way around. Ignored by asynchronous jobs, which launch both
/// phases concurrently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionOrder {
    TasksFirst,
    ChildrenFirst,
}

/// Persisted job details handed to the factory by the external scheduler.
///
/// The payload is opaque to the orchestration engine; concrete job builders
/// interpret it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduledJobDetails {
    pub job_id: Uuid,
    /// Discriminator the factory dispatches on. An unregistered value is a
    /// hard configuration error, never a retryable task failure.
    pub job_type: String,
    pub payload: serde_json::Value,
    pub scheduled_at: DateTime<Utc>,
}

impl ScheduledJobDetails {
    pub fn new(job_type: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            job_id: Uuid::new_v4(),
            job_type: job_type.into(),
            payload,
            scheduled_at: Utc::now(),
        }
    }
}

/// Aggregated outcome of one job-tree node: overall severity plus the total
/// number of tasks executed in the subtree (direct tasks and all recursively
/// executed child-job tasks).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionSummary {
    pub result: OrchestratedExecutionResult,
    pub tasks_executed: usize,
}

impl ExecutionSummary {
    pub fn new(result: OrchestratedExecutionResult, tasks_executed: usize) -> Self {
        Self {
            result,
            tasks_executed,
        }
    }

    /// Fold another node's summary into this one: severities combine by
    /// maximum, task counts add.
    pub fn fold(self, other: Self) -> Self {
        Self {
            result: self.result.combine(other.result),
            tasks_executed: self.tasks_executed + other.tasks_executed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn severity_ordering() {
        use OrchestratedExecutionResult::*;
        assert!(Success < NonTerminalError);
        assert!(NonTerminalError < TerminalError);
    }

    #[test]
    fn combine_keeps_most_severe() {
        use OrchestratedExecutionResult::*;
        assert_eq!(Success.combine(NonTerminalError), NonTerminalError);
        assert_eq!(TerminalError.combine(NonTerminalError), TerminalError);
        assert_eq!(Success.combine(Success), Success);
    }

    #[test]
    fn empty_aggregate_is_success() {
        assert_eq!(
            OrchestratedExecutionResult::aggregate(std::iter::empty()),
            OrchestratedExecutionResult::Success
        );
    }

    #[test]
    fn display_round_trips() {
        use OrchestratedExecutionResult::*;
        for result in [Success, NonTerminalError, TerminalError] {
            let parsed = OrchestratedExecutionResult::from_str(&result.to_string()).unwrap();
            assert_eq!(parsed, result);
        }
    }

    #[test]
    fn summary_fold_adds_counts() {
        use OrchestratedExecutionResult::*;
        let a = ExecutionSummary::new(Success, 3);
        let b = ExecutionSummary::new(NonTerminalError, 4);
        let folded = a.fold(b);
        assert_eq!(folded.result, NonTerminalError);
        assert_eq!(folded.tasks_executed, 7);
    }
}
