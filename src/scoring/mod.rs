//! Five-dimension quality grading and content-type weighting.
//!
//! [`DimensionScorer`] fans out one model call per [`Dimension`] and waits for
//! all of them; a failed call yields a `failed` [`DimensionResult`] instead of
//! an error. [`apply_weights`] then annotates complete dimensions with the
//! weight their content type assigns them.

pub mod error;
pub mod parse;
pub mod prompt;
pub mod scorer;
pub mod types;
pub mod weights;


pub use error::ScoringError;
pub use parse::{ModelAssessment, extract_json_object, parse_assessment};
pub use prompt::build_prompt;
pub use scorer::DimensionScorer;
pub use types::{
    AnalysisResults, Dimension, DimensionResult, DimensionStatus, Priority, Recommendation,
};
pub use weights::{ContentType, WeightProfile, apply_weights, weight_disclosure, weights_for};
