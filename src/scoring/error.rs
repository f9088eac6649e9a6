use std::time::Duration;

use thiserror::Error;

use crate::model::ModelError;

/// Why a single dimension could not be scored.
///
/// These never escape the scorer; they become the `failureReason` of a
/// failed dimension.
#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("model error: {0}")]
    Model(#[from] ModelError),

    #[error("model call timed out after {after:?}")]
    Timeout { after: Duration },

    #[error("no JSON object found in model response")]
    NoJsonObject,

    #[error("model response has no numeric score")]
    MissingScore,

    #[error("invalid model response: {reason}")]
    InvalidResponse { reason: String },
}
