//! # Job Orchestrator Factory
//!
//! Maps a persisted job-type discriminator to a concrete job implementation
//! and wraps it in a [`JobOrchestrator`]. Job implementations themselves are
//! business logic supplied by the embedding application; this module only
//! owns the dispatch contract.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, info};

use crate::error::{CardlinkError, Result};

use super::job::OrchestratedJob;
use super::orchestrator::JobOrchestrator;
use super::throttler::ParallelTaskThrottler;
use super::types::ScheduledJobDetails;

/// Builds a concrete job from persisted details. Registered against one
/// job-type discriminator; compile-time polymorphism replaces any late-bound
/// lookup of implementations.
pub trait JobBuilder: Send + Sync {
    fn build(&self, details: &ScheduledJobDetails) -> Result<Arc<dyn OrchestratedJob>>;
}

/// String-keyed registry of job builders plus the shared task throttler
/// injected into every orchestrator it creates.
pub struct JobOrchestratorFactory {
    builders: RwLock<HashMap<String, Arc<dyn JobBuilder>>>,
    throttler: Arc<ParallelTaskThrottler>,
}

impl JobOrchestratorFactory {
    pub fn new(throttler: Arc<ParallelTaskThrottler>) -> Self {
        Self {
            builders: RwLock::new(HashMap::new()),
            throttler,
        }
    }

    /// Register a builder for a job-type discriminator. Re-registering a
    /// type replaces the previous builder.
    pub fn register(&self, job_type: impl Into<String>, builder: Arc<dyn JobBuilder>) {
        let job_type = job_type.into();
        info!(job_type = %job_type, "Registering job builder");
        self.builders.write().insert(job_type, builder);
    }

    pub fn registered_job_types(&self) -> Vec<String> {
        let mut types: Vec<String> = self.builders.read().keys().cloned().collect();
        types.sort();
        types
    }

    /// Build the job for the given details and wrap it in a fresh
    /// orchestrator sharing the factory's throttler.
    ///
    /// An unregistered job type is a hard configuration error — never a
    /// retryable task failure.
    pub fn create(&self, details: ScheduledJobDetails) -> Result<JobOrchestrator> {
        let builder = self
            .builders
            .read()
            .get(&details.job_type)
            .cloned()
            .ok_or_else(|| CardlinkError::UnknownJobType(details.job_type.clone()))?;

        debug!(
            job_id = %details.job_id,
            job_type = %details.job_type,
            "Building orchestrated job"
        );

        let job = builder.build(&details)?;
        Ok(JobOrchestrator::new(
            job,
            details,
            Arc::clone(&self.throttler),
        ))
    }
}
