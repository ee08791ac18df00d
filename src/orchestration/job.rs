//! # Orchestrated Jobs
//!
//! A job composes tasks and nested child jobs into a tree, constructed
//! top-down by the factory for each scheduled run. Child nodes are owned —
//! the tree cannot contain cycles.

use std::sync::Arc;

use async_trait::async_trait;

use super::task::OrchestratedTask;
use super::types::{ExecutionOrder, OrchestratedExecutionResult};

/// A configurable unit of scheduled batch work.
///
/// Lifecycle per run: `start_up` once before any task or child executes,
/// then the body (tasks and child jobs, per `asynchronous` /
/// `execution_order`), then `tear_down` exactly once with the body's
/// aggregated result, regardless of outcome. No further use after teardown.
#[async_trait]
pub trait OrchestratedJob: Send + Sync {
    /// When true, tasks and child jobs all launch concurrently and the job
    /// waits for everything; when false, tasks and children run in two
    /// strictly ordered sequential phases.
    fn asynchronous(&self) -> bool;

    /// Phase ordering for synchronous execution. Ignored when asynchronous.
    fn execution_order(&self) -> ExecutionOrder {
        ExecutionOrder::TasksFirst
    }

    /// Tasks owned by this job, in execution order. May be empty.
    fn tasks(&self) -> Vec<Arc<dyn OrchestratedTask>>;

    /// Child jobs under this node, in execution order. May be empty.
    fn child_jobs(&self) -> Vec<Arc<dyn OrchestratedJob>>;

    /// One-time setup. Any result other than `Success` stops the run before
    /// any task or child job executes.
    async fn start_up(&self) -> OrchestratedExecutionResult {
        OrchestratedExecutionResult::Success
    }

    /// One-time teardown, invoked with the body's aggregated result. The
    /// returned severity folds into the final reported result.
    async fn tear_down(
        &self,
        execution_result: OrchestratedExecutionResult,
    ) -> OrchestratedExecutionResult {
        let _ = execution_result;
        OrchestratedExecutionResult::Success
    }
}
