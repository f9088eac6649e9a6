use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::config::Config;
use crate::content::ProcessedContent;
use crate::identity::ContextualSetting;
use crate::scoring::AnalysisResults;
use crate::storage::{ArchiveLayout, BlobStore, IndexStore};

use super::types::{CacheLookup, CachedResults, MissReason};

/// Read-only front of the results archive.
///
/// Looks up the index entry for a document, locates the archived results next
/// to the artifact it points at, and returns them. Every failure is a miss.
pub struct CacheGateway {
    index: Option<(String, Arc<dyn IndexStore>)>,
    blobs: Arc<dyn BlobStore>,
    bucket: String,
    layout: ArchiveLayout,
}

impl std::fmt::Debug for CacheGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheGateway")
            .field("table", &self.index.as_ref().map(|(table, _)| table))
            .field("bucket", &self.bucket)
            .field("layout", &self.layout)
            .finish()
    }
}

impl CacheGateway {
    /// Creates a gateway with caching disabled until [`CacheGateway::with_index`] is called.
    pub fn new(blobs: Arc<dyn BlobStore>, bucket: impl Into<String>) -> Self {
        Self {
            index: None,
            blobs,
            bucket: bucket.into(),
            layout: ArchiveLayout::default(),
        }
    }

    pub fn from_config(
        config: &Config,
        blobs: Arc<dyn BlobStore>,
        index: Option<Arc<dyn IndexStore>>,
    ) -> Self {
        let gateway = Self::new(blobs, config.bucket.clone());
        match (config.index_table.clone(), index) {
            (Some(table), Some(index)) => gateway.with_index(table, index),
            _ => gateway,
        }
    }

    pub fn with_index(mut self, table: impl Into<String>, index: Arc<dyn IndexStore>) -> Self {
        self.index = Some((table.into(), index));
        self
    }

    pub fn with_layout(mut self, layout: ArchiveLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.index.is_some()
    }

    /// Returns archived results for `content` under `setting`, or `None` on any miss.
    pub async fn lookup(
        &self,
        content: &ProcessedContent,
        setting: ContextualSetting,
    ) -> Option<CachedResults> {
        self.lookup_detailed(content, setting).await.into_hit()
    }

    /// Like [`CacheGateway::lookup`], but reports why a lookup missed.
    #[instrument(skip_all, fields(url = %content.url, setting = %setting))]
    pub async fn lookup_detailed(
        &self,
        content: &ProcessedContent,
        setting: ContextualSetting,
    ) -> CacheLookup {
        let outcome = self.try_lookup(content, setting).await;
        match &outcome {
            CacheLookup::Hit(cached) => {
                info!(archive_key = %cached.archive_key, "Cache hit");
            }
            CacheLookup::Miss(reason) => {
                info!(reason = %reason, "Cache miss");
            }
        }
        outcome
    }

    async fn try_lookup(&self, content: &ProcessedContent, setting: ContextualSetting) -> CacheLookup {
        let Some((table, index)) = &self.index else {
            return CacheLookup::Miss(MissReason::Disabled);
        };

        let url = content.normalized_url();
        let entry = match index.get(table, &url, setting).await {
            Ok(Some(entry)) => entry,
            Ok(None) => return CacheLookup::Miss(MissReason::NoIndexEntry),
            Err(e) => {
                warn!(table = %table, error = %e, "Index lookup failed");
                return CacheLookup::Miss(MissReason::IndexUnavailable);
            }
        };

        if !self.layout.accepts(entry.layout_version) {
            debug!(
                entry_version = ?entry.layout_version,
                layout_version = self.layout.version,
                "Index entry written with another archive layout"
            );
            return CacheLookup::Miss(MissReason::LayoutMismatch);
        }

        let Some(archive_key) = self.layout.results_key_for_pointer(&entry.content_location) else {
            warn!(pointer = %entry.content_location, "Index entry pointer is unusable");
            return CacheLookup::Miss(MissReason::BadPointer);
        };

        let raw = match self.blobs.get(&self.bucket, &archive_key).await {
            Ok(raw) => raw,
            Err(e) if e.is_not_found() => {
                debug!(archive_key = %archive_key, "No archived results yet");
                return CacheLookup::Miss(MissReason::ArchiveUnavailable);
            }
            Err(e) => {
                warn!(archive_key = %archive_key, error = %e, "Archive read failed");
                return CacheLookup::Miss(MissReason::ArchiveUnavailable);
            }
        };

        let results: AnalysisResults = match serde_json::from_slice(&raw) {
            Ok(results) => results,
            Err(e) => {
                warn!(archive_key = %archive_key, error = %e, "Archived results are malformed");
                return CacheLookup::Miss(MissReason::MalformedArchive);
            }
        };

        CacheLookup::Hit(CachedResults {
            raw,
            results,
            archive_key,
        })
    }
}
