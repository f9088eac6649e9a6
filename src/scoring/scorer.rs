use std::sync::Arc;
use std::time::{Duration, Instant};

use futures_util::future::join_all;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::constants::{DEFAULT_MAX_CONTENT_CHARS, DEFAULT_MODEL_TIMEOUT_SECS};
use crate::content::ProcessedContent;
use crate::model::ModelInvoker;

use super::error::ScoringError;
use super::parse::{ModelAssessment, parse_assessment};
use super::prompt::build_prompt;
use super::types::{AnalysisResults, Dimension, DimensionResult};
use super::weights::ContentType;

/// Grades a document on all five dimensions concurrently.
///
/// Each dimension gets its own prompt and model call; a failure in one is
/// recorded as a `failed` result and never affects the others.
pub struct DimensionScorer {
    model: Arc<dyn ModelInvoker>,
    timeout: Duration,
    max_content_chars: usize,
}

impl std::fmt::Debug for DimensionScorer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DimensionScorer")
            .field("model", &self.model.model_id())
            .field("timeout", &self.timeout)
            .field("max_content_chars", &self.max_content_chars)
            .finish()
    }
}

impl DimensionScorer {
    pub fn new(model: Arc<dyn ModelInvoker>) -> Self {
        Self {
            model,
            timeout: Duration::from_secs(DEFAULT_MODEL_TIMEOUT_SECS),
            max_content_chars: DEFAULT_MAX_CONTENT_CHARS,
        }
    }

    pub fn from_config(config: &Config, model: Arc<dyn ModelInvoker>) -> Self {
        Self {
            model,
            timeout: config.model_timeout,
            max_content_chars: config.max_content_chars,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_content_chars(mut self, max_content_chars: usize) -> Self {
        self.max_content_chars = max_content_chars;
        self
    }

    /// Scores every dimension and waits for all five to settle.
    pub async fn score_all(&self, content: &ProcessedContent) -> AnalysisResults {
        let content_type = ContentType::from_label(&content.content_type);

        debug!(
            url = %content.url,
            content_type = %content_type,
            model = self.model.model_id(),
            "Starting dimension analysis"
        );

        let results: AnalysisResults = join_all(
            Dimension::ALL
                .into_iter()
                .map(|dimension| self.score_dimension(dimension, content, content_type)),
        )
        .await
        .into_iter()
        .collect();

        info!(
            complete = results.complete_count(),
            failed = results.failed_count(),
            "Dimension analysis finished"
        );

        results
    }

    /// Scores one dimension; never fails, errors become a `failed` result.
    pub async fn score_dimension(
        &self,
        dimension: Dimension,
        content: &ProcessedContent,
        content_type: ContentType,
    ) -> (Dimension, DimensionResult) {
        let started = Instant::now();
        let prompt = build_prompt(dimension, content, content_type, self.max_content_chars);

        let result = match self.assess(&prompt).await {
            Ok(ModelAssessment {
                score,
                findings,
                recommendations,
            }) => {
                debug!(dimension = %dimension, score, "Dimension scored");
                DimensionResult::complete(score, findings, recommendations, started.elapsed())
            }
            Err(e) => {
                warn!(dimension = %dimension, error = %e, "Dimension analysis failed");
                DimensionResult::failed(e.to_string(), started.elapsed())
            }
        };

        (dimension, result)
    }

    async fn assess(&self, prompt: &str) -> Result<ModelAssessment, ScoringError> {
        let text = tokio::time::timeout(self.timeout, self.model.invoke(prompt))
            .await
            .map_err(|_| ScoringError::Timeout {
                after: self.timeout,
            })??;
        parse_assessment(&text)
    }
}
