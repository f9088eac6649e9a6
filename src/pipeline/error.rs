use thiserror::Error;

use crate::config::ConfigError;
use crate::publish::PublishError;

/// Failures that abort a scoring run.
///
/// Dimension failures, cache misses and archive-write failures are not
/// errors; they are reported inside the response.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("processed content unavailable at {key}: {reason}")]
    ContentUnavailable { key: String, reason: String },

    #[error("working storage write failed: {0}")]
    WorkingStorageWrite(#[from] PublishError),
}
