//! Session-level orchestration.
//!
//! A cache hit short-circuits the run: the archived bytes are copied into the
//! session and no model call is made.

pub mod error;
pub mod runner;
pub mod types;

#[cfg(test)]
mod tests;

pub use error::PipelineError;
pub use runner::QualityPipeline;
pub use types::{QualitySummary, ScoringResponse};
