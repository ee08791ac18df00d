use crate::error::{CardlinkError, Result};

/// Default bound on concurrently executing orchestrated tasks.
pub const DEFAULT_MAX_CONCURRENT_TASKS: usize = 10;

#[derive(Debug, Clone)]
pub struct CardlinkConfig {
    /// Process-wide cap on concurrently executing orchestrated tasks.
    pub max_concurrent_tasks: usize,
    /// Source label attached to record-layer log entries when the caller
    /// does not supply a file name.
    pub default_feed_source: String,
}

impl Default for CardlinkConfig {
    fn default() -> Self {
        Self {
            max_concurrent_tasks: DEFAULT_MAX_CONCURRENT_TASKS,
            default_feed_source: "unknown".to_string(),
        }
    }
}

impl CardlinkConfig {
    /// Build configuration from environment variables, falling back to
    /// defaults for anything unset. Set but unparsable values are
    /// configuration errors.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(max_tasks) = std::env::var("CARDLINK_MAX_CONCURRENT_TASKS") {
            config.max_concurrent_tasks = max_tasks.parse().map_err(|e| {
                CardlinkError::ConfigurationError(format!("Invalid max_concurrent_tasks: {e}"))
            })?;
        }

        if let Ok(source) = std::env::var("CARDLINK_DEFAULT_FEED_SOURCE") {
            config.default_feed_source = source;
        }

        Ok(config)
    }

    /// Lenient variant used by the throttler: an unset or unparsable
    /// environment value falls back to [`DEFAULT_MAX_CONCURRENT_TASKS`]
    /// instead of failing, so a bad deployment setting degrades to the
    /// stock bound rather than refusing to run jobs.
    pub fn max_concurrent_tasks_or_default() -> usize {
        std::env::var("CARDLINK_MAX_CONCURRENT_TASKS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_MAX_CONCURRENT_TASKS)
    }
}
