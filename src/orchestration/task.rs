//! # Orchestrated Tasks
//!
//! The leaf unit of scheduled batch work.

use async_trait::async_trait;

use super::types::OrchestratedExecutionResult;

/// A unit of work executed under orchestration.
///
/// Implementations translate collaborator failures (network, storage,
/// partner invokers) into the tri-state result; errors must not escape
/// `execute`. A task is owned by exactly one job and is never shared across
/// jobs. The engine applies no retry and no timeout — a task that hangs
/// blocks its owning job tree.
#[async_trait]
pub trait OrchestratedTask: Send + Sync {
    /// Task name used in structured log output.
    fn name(&self) -> &str;

    /// Run the work to completion and report its severity.
    async fn execute(&self) -> OrchestratedExecutionResult;
}
