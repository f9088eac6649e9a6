use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::Config;
use crate::content::ProcessedContent;
use crate::identity::SessionIdentity;
use crate::scoring::AnalysisResults;
use crate::storage::{ArchiveLayout, BlobStore};

use super::error::PublishError;

/// Where a publish landed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishOutcome {
    /// Working copy for the caller's session.
    pub session_key: String,
    /// Archive copy under the canonical session, if one was attempted.
    pub archive_key: Option<String>,
    /// `true` if the archive copy is in place.
    pub archived: bool,
}

/// Writes results to the caller's session and archives them for reuse.
///
/// The working copy must land; the archive copy is best effort.
pub struct ResultPublisher {
    blobs: Arc<dyn BlobStore>,
    bucket: String,
    layout: ArchiveLayout,
}

impl std::fmt::Debug for ResultPublisher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResultPublisher")
            .field("bucket", &self.bucket)
            .field("layout", &self.layout)
            .finish()
    }
}

impl ResultPublisher {
    pub fn new(blobs: Arc<dyn BlobStore>, bucket: impl Into<String>) -> Self {
        Self {
            blobs,
            bucket: bucket.into(),
            layout: ArchiveLayout::default(),
        }
    }

    pub fn from_config(config: &Config, blobs: Arc<dyn BlobStore>) -> Self {
        Self::new(blobs, config.bucket.clone())
    }

    pub fn with_layout(mut self, layout: ArchiveLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Publishes freshly computed results.
    ///
    /// The archive goes to the canonical session of `content`, which may
    /// differ from `session` when the caller chose its own session id.
    pub async fn publish(
        &self,
        session: &SessionIdentity,
        results: &AnalysisResults,
        content: &ProcessedContent,
    ) -> Result<PublishOutcome, PublishError> {
        let data = serde_json::to_vec_pretty(results)?;
        let session_key = self.write_session_copy(session, &data).await?;

        let canonical = content.canonical_session();
        let archive_key = self.layout.results_key(&canonical);

        if archive_key == session_key {
            debug!(key = %archive_key, "Session is canonical; working copy doubles as archive");
            return Ok(PublishOutcome {
                session_key,
                archive_key: Some(archive_key),
                archived: true,
            });
        }

        let archived = match self.blobs.put(&self.bucket, &archive_key, &data).await {
            Ok(()) => {
                debug!(key = %archive_key, "Archived results");
                true
            }
            Err(e) => {
                warn!(
                    key = %archive_key,
                    error = %e,
                    "Archive write failed; results stay available in the session copy"
                );
                false
            }
        };

        Ok(PublishOutcome {
            session_key,
            archive_key: Some(archive_key),
            archived,
        })
    }

    /// Copies previously archived bytes into the caller's session unchanged.
    pub async fn publish_cached(
        &self,
        session: &SessionIdentity,
        raw: &[u8],
    ) -> Result<PublishOutcome, PublishError> {
        let session_key = self.write_session_copy(session, raw).await?;
        Ok(PublishOutcome {
            session_key,
            archive_key: None,
            archived: false,
        })
    }

    async fn write_session_copy(
        &self,
        session: &SessionIdentity,
        data: &[u8],
    ) -> Result<String, PublishError> {
        let key = self.layout.results_key(session);
        self.blobs
            .put(&self.bucket, &key, data)
            .await
            .map_err(|source| PublishError::WorkingStorageWrite {
                bucket: self.bucket.clone(),
                key: key.clone(),
                source,
            })?;
        info!(session = %session, key = %key, bytes = data.len(), "Wrote session results");
        Ok(key)
    }
}
