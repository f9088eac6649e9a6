//! Docscore library crate (used by the CLI and integration tests).
//!
//! Scores a processed documentation page on five quality dimensions with a
//! hosted language model, weights the results by content type, and archives
//! them so the same (normalized URL, contextual setting) pair is never scored
//! twice.
//!
//! # Public API Surface
//!
//! ## Addressing
//! - [`normalize_url`], [`NormalizedUrl`] - Canonical URL form used as cache key
//! - [`SessionIdentity`], [`ContextualSetting`] - Deterministic storage sessions
//!
//! ## Scoring
//! - [`DimensionScorer`] - Concurrent five-dimension grading with failure isolation
//! - [`apply_weights`], [`ContentType`], [`WeightProfile`] - Content-type weighting
//! - [`AnalysisResults`], [`DimensionResult`] - Result records
//!
//! ## Storage & Caching
//! - [`BlobStore`], [`IndexStore`] - Storage seams ([`LocalBlobStore`], [`GcsBlobStore`], [`BlobIndexStore`])
//! - [`CacheGateway`] - Read-only archive lookup
//! - [`ResultPublisher`] - Session copy plus best-effort archive
//!
//! ## Orchestration
//! - [`QualityPipeline`], [`ScoringResponse`] - One scoring run per session
//! - [`Config`], [`ConfigError`] - Environment configuration
//!
//! ## Test/Mock Support
//! Mock implementations are available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod cache;
pub mod config;
pub mod constants;
pub mod content;
pub mod identity;
pub mod model;
pub mod pipeline;
pub mod publish;
pub mod scoring;
pub mod storage;

pub use cache::{CacheGateway, CacheLookup, CachedResults, MissReason};
pub use config::{Config, ConfigError};
pub use content::{ContentStats, ContextPage, ProcessedContent};
pub use identity::{
    ContextualSetting, NormalizedUrl, SessionIdentity, derive_session_identity, normalize_url,
};
pub use model::{GenerationParams, HttpModelInvoker, ModelError, ModelFamily, ModelInvoker};
#[cfg(any(test, feature = "mock"))]
pub use model::MockModelInvoker;
pub use pipeline::{PipelineError, QualityPipeline, QualitySummary, ScoringResponse};
pub use publish::{PublishError, PublishOutcome, ResultPublisher};
pub use scoring::{
    AnalysisResults, ContentType, Dimension, DimensionResult, DimensionScorer, DimensionStatus,
    Priority, Recommendation, ScoringError, WeightProfile, apply_weights,
};
pub use storage::{
    ARCHIVE_LAYOUT_VERSION, ArchiveLayout, BlobIndexStore, BlobStore, CacheIndexEntry,
    GcsBlobStore, IndexStore, LocalBlobStore, StorageError, StorageProviderType,
};
#[cfg(any(test, feature = "mock"))]
pub use storage::MemoryBlobStore;
