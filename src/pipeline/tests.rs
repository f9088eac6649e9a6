use super::*;

use std::sync::Arc;
use std::time::Duration;

use crate::config::{Config, ConfigError};
use crate::content::ProcessedContent;
use crate::identity::SessionIdentity;
use crate::model::MockModelInvoker;
use crate::scoring::{AnalysisResults, Dimension, DimensionResult, apply_weights};
use crate::storage::{ArchiveLayout, MemoryBlobStore};

const BUCKET: &str = "work";

fn pipeline(blobs: &MemoryBlobStore, model: Arc<MockModelInvoker>) -> QualityPipeline {
    QualityPipeline::new(&Config::with_bucket(BUCKET), Arc::new(blobs.clone()), None, model).unwrap()
}

fn store_content(blobs: &MemoryBlobStore, session: &SessionIdentity, content: &ProcessedContent) {
    blobs.insert(
        BUCKET,
        &ArchiveLayout::V1.content_key(session),
        serde_json::to_vec(content).unwrap(),
    );
}

#[test]
fn test_new_rejects_missing_bucket() {
    let err = QualityPipeline::new(
        &Config::default(),
        Arc::new(MemoryBlobStore::new()),
        None,
        Arc::new(MockModelInvoker::new()),
    )
    .unwrap_err();

    assert!(matches!(
        err,
        PipelineError::Config(ConfigError::MissingEnvVar { .. })
    ));
}

#[tokio::test]
async fn test_run_missing_content() {
    let blobs = MemoryBlobStore::new();
    let p = pipeline(&blobs, Arc::new(MockModelInvoker::new()));

    let err = p.run(&SessionIdentity::new("nope")).await.unwrap_err();
    match err {
        PipelineError::ContentUnavailable { key, .. } => {
            assert_eq!(key, "sessions/nope/processed-content.json");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_run_malformed_content() {
    let blobs = MemoryBlobStore::new();
    blobs.insert(BUCKET, "sessions/bad/processed-content.json", b"[1, 2]".to_vec());
    let p = pipeline(&blobs, Arc::new(MockModelInvoker::new()));

    let err = p.run(&SessionIdentity::new("bad")).await.unwrap_err();
    assert!(matches!(err, PipelineError::ContentUnavailable { .. }));
}

#[tokio::test]
async fn test_run_without_cache_scores_and_publishes() {
    let blobs = MemoryBlobStore::new();
    let model = Arc::new(MockModelInvoker::new().with_default_response(r#"{"score": 70}"#));
    let p = pipeline(&blobs, model.clone());
    let session = SessionIdentity::new("run-1");
    let content = ProcessedContent::new("https://example.com/page", "changelog");
    store_content(&blobs, &session, &content);

    let response = p.run(&session).await.unwrap();

    assert!(response.success);
    assert!(!response.cache_hit);
    assert_eq!(model.call_count(), 5);
    assert!(blobs.contains(BUCKET, "sessions/run-1/dimension-results.json"));
    assert!(blobs.contains(
        BUCKET,
        &ArchiveLayout::V1.results_key(&content.canonical_session())
    ));

    let summary = response.summary.unwrap();
    assert_eq!(summary.overall_score, Some(70));
    assert_eq!(summary.complete_dimensions, 5);
    assert_eq!(summary.content_type, "changelog");

    let freshness = response.results.unwrap();
    let freshness = freshness.get(Dimension::Freshness).unwrap();
    assert_eq!(freshness.content_type_weight, Some(0.40));
}

#[tokio::test]
async fn test_run_working_write_failure_is_fatal() {
    let blobs = MemoryBlobStore::new();
    let p = pipeline(&blobs, Arc::new(MockModelInvoker::new()));
    let session = SessionIdentity::new("run-2");
    store_content(&blobs, &session, &ProcessedContent::new("https://example.com", "mixed"));
    blobs.fail_puts_with_prefix("sessions/run-2/");

    let err = p.run(&session).await.unwrap_err();
    assert!(matches!(err, PipelineError::WorkingStorageWrite(_)));
}

#[test]
fn test_summary_weighted_mean() {
    let results: AnalysisResults = Dimension::ALL
        .into_iter()
        .zip([80, 70, 90, 60, 80])
        .map(|(d, s)| (d, DimensionResult::complete(s, vec![], vec![], Duration::ZERO)))
        .collect();
    let weighted = apply_weights(results, "tutorial");

    let summary = QualitySummary::from_results(&weighted, "tutorial");

    // 0.2*80 + 0.2*70 + 0.3*90 + 0.2*60 + 0.1*80 = 77
    assert_eq!(summary.overall_score, Some(77));
    assert_eq!(summary.failed_dimensions, 0);
}

#[test]
fn test_summary_renormalizes_over_complete_dimensions() {
    let mut results: AnalysisResults = [
        (
            Dimension::Clarity,
            DimensionResult::complete(90, vec![], vec![], Duration::ZERO),
        ),
        (
            Dimension::Completeness,
            DimensionResult::complete(70, vec![], vec![], Duration::ZERO),
        ),
    ]
    .into_iter()
    .collect();
    results.insert(
        Dimension::Accuracy,
        DimensionResult::failed("boom", Duration::ZERO),
    );

    let summary = QualitySummary::from_results(&apply_weights(results, "tutorial"), "tutorial");

    // (0.3*90 + 0.1*70) / 0.4 = 85
    assert_eq!(summary.overall_score, Some(85));
    assert_eq!(summary.complete_dimensions, 2);
    assert_eq!(summary.failed_dimensions, 1);
}

#[test]
fn test_summary_all_failed() {
    let results: AnalysisResults = Dimension::ALL
        .into_iter()
        .map(|d| (d, DimensionResult::failed("down", Duration::ZERO)))
        .collect();

    let summary = QualitySummary::from_results(&results, "unknown-type");
    assert_eq!(summary.overall_score, None);
    assert_eq!(summary.failed_dimensions, 5);
    assert_eq!(summary.content_type, "mixed");
}

#[test]
fn test_response_json_shape() {
    let response = ScoringResponse::failure(SessionIdentity::new("s"), "boom");
    let json = serde_json::to_value(&response).unwrap();

    assert_eq!(json["success"], false);
    assert_eq!(json["sessionId"], "s");
    assert_eq!(json["cacheHit"], false);
    assert_eq!(json["message"], "boom");
    assert!(json.get("results").is_none());
}
