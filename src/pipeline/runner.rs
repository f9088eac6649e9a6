use std::sync::Arc;

use tracing::{debug, error, info, instrument};

use crate::cache::CacheGateway;
use crate::config::Config;
use crate::content::ProcessedContent;
use crate::identity::SessionIdentity;
use crate::model::{HttpModelInvoker, ModelInvoker};
use crate::publish::ResultPublisher;
use crate::scoring::{DimensionScorer, apply_weights};
use crate::storage::{ArchiveLayout, BlobStore, IndexStore, build_blob_store, build_index_store};

use super::error::PipelineError;
use super::types::ScoringResponse;

/// End-to-end scoring of one session: cache lookup, then score, weight and publish.
pub struct QualityPipeline {
    blobs: Arc<dyn BlobStore>,
    bucket: String,
    layout: ArchiveLayout,
    gateway: CacheGateway,
    scorer: DimensionScorer,
    publisher: ResultPublisher,
}

impl std::fmt::Debug for QualityPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QualityPipeline")
            .field("bucket", &self.bucket)
            .field("gateway", &self.gateway)
            .field("scorer", &self.scorer)
            .finish()
    }
}

impl QualityPipeline {
    /// Wires the pipeline from explicit collaborators.
    pub fn new(
        config: &Config,
        blobs: Arc<dyn BlobStore>,
        index: Option<Arc<dyn IndexStore>>,
        model: Arc<dyn ModelInvoker>,
    ) -> Result<Self, PipelineError> {
        config.validate()?;

        Ok(Self {
            gateway: CacheGateway::from_config(config, blobs.clone(), index),
            scorer: DimensionScorer::from_config(config, model),
            publisher: ResultPublisher::from_config(config, blobs.clone()),
            blobs,
            bucket: config.bucket.clone(),
            layout: ArchiveLayout::default(),
        })
    }

    /// Wires the pipeline from configuration alone.
    pub fn from_config(config: &Config) -> Result<Self, PipelineError> {
        config.validate()?;

        let blobs = build_blob_store(config);
        let index = build_index_store(config, blobs.clone());
        let model: Arc<dyn ModelInvoker> = Arc::new(HttpModelInvoker::from_config(config));

        info!(
            bucket = %config.bucket,
            caching = config.caching_enabled(),
            model = %config.model_id,
            provider = ?config.storage_provider,
            "Scoring pipeline configured"
        );

        Self::new(config, blobs, index, model)
    }

    pub fn gateway(&self) -> &CacheGateway {
        &self.gateway
    }

    /// Reads the processed-content record of `session` from working storage.
    pub async fn load_content(
        &self,
        session: &SessionIdentity,
    ) -> Result<ProcessedContent, PipelineError> {
        let key = self.layout.content_key(session);

        let data = self.blobs.get(&self.bucket, &key).await.map_err(|e| {
            PipelineError::ContentUnavailable {
                key: key.clone(),
                reason: e.to_string(),
            }
        })?;

        serde_json::from_slice(&data).map_err(|e| PipelineError::ContentUnavailable {
            key,
            reason: format!("malformed record: {e}"),
        })
    }

    /// Scores the content stored for `session`.
    #[instrument(skip_all, fields(session = %session))]
    pub async fn run(&self, session: &SessionIdentity) -> Result<ScoringResponse, PipelineError> {
        let content = self.load_content(session).await.inspect_err(|e| {
            error!(error = %e, "Cannot load processed content");
        })?;
        self.score_content(session, &content).await
    }

    /// Scores `content` on behalf of `session`.
    pub async fn score_content(
        &self,
        session: &SessionIdentity,
        content: &ProcessedContent,
    ) -> Result<ScoringResponse, PipelineError> {
        let setting = content.contextual_setting();
        debug!(
            url = %content.url,
            content_type = %content.content_type,
            setting = %setting,
            "Loaded processed content"
        );

        if let Some(cached) = self.gateway.lookup(content, setting).await {
            self.publisher
                .publish_cached(session, &cached.raw)
                .await
                .inspect_err(|e| error!(error = %e, "Cannot write cached results"))?;

            return Ok(ScoringResponse::completed(
                session.clone(),
                true,
                cached.results,
                &content.content_type,
            ));
        }

        let raw = self.scorer.score_all(content).await;
        let weighted = apply_weights(raw, &content.content_type);

        let outcome = self
            .publisher
            .publish(session, &weighted, content)
            .await
            .inspect_err(|e| error!(error = %e, "Cannot write results"))?;

        info!(
            complete = weighted.complete_count(),
            failed = weighted.failed_count(),
            archived = outcome.archived,
            "Scoring finished"
        );

        Ok(ScoringResponse::completed(
            session.clone(),
            false,
            weighted,
            &content.content_type,
        ))
    }
}
