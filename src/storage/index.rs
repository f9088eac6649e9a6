//! Key-value index from (normalized URL, contextual setting) to archived content.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::identity::{ContextualSetting, NormalizedUrl, SessionIdentity};

use super::blob::BlobStore;
use super::error::{StorageError, StorageResult};

/// Index record written by the upstream stage the first time a URL is processed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheIndexEntry {
    pub url: NormalizedUrl,
    pub contextual_setting: ContextualSetting,
    /// Pointer to the upstream artifact, as a bare key or a `scheme://bucket/key` URI.
    pub content_location: String,
    /// [`ArchiveLayout`](super::ArchiveLayout) version the pointer was written with.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout_version: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<SessionIdentity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processed_at: Option<DateTime<Utc>>,
}

impl CacheIndexEntry {
    pub fn new(
        url: NormalizedUrl,
        contextual_setting: ContextualSetting,
        content_location: impl Into<String>,
    ) -> Self {
        Self {
            url,
            contextual_setting,
            content_location: content_location.into(),
            layout_version: None,
            session_id: None,
            processed_at: None,
        }
    }

    pub fn with_layout_version(mut self, version: u32) -> Self {
        self.layout_version = Some(version);
        self
    }

    pub fn with_session(mut self, session: SessionIdentity) -> Self {
        self.session_id = Some(session);
        self
    }

    pub fn with_processed_at(mut self, at: DateTime<Utc>) -> Self {
        self.processed_at = Some(at);
        self
    }
}

#[async_trait]
pub trait IndexStore: Send + Sync {
    /// Looks up the entry for (`url`, `setting`) in `table`.
    async fn get(
        &self,
        table: &str,
        url: &NormalizedUrl,
        setting: ContextualSetting,
    ) -> StorageResult<Option<CacheIndexEntry>>;

    /// Inserts or replaces the entry keyed by its (url, setting).
    async fn put(&self, table: &str, entry: &CacheIndexEntry) -> StorageResult<()>;
}

/// [`IndexStore`] that keeps one JSON document per key in a [`BlobStore`].
///
/// The table name is used as the bucket; the object key is derived from the
/// canonical session identity of the (url, setting) pair.
#[derive(Clone)]
pub struct BlobIndexStore {
    blobs: Arc<dyn BlobStore>,
}

impl BlobIndexStore {
    pub fn new(blobs: Arc<dyn BlobStore>) -> Self {
        Self { blobs }
    }

    fn entry_key(url: &NormalizedUrl, setting: ContextualSetting) -> String {
        format!(
            "index/{}.json",
            SessionIdentity::from_normalized(url, setting).as_str()
        )
    }
}

#[async_trait]
impl IndexStore for BlobIndexStore {
    async fn get(
        &self,
        table: &str,
        url: &NormalizedUrl,
        setting: ContextualSetting,
    ) -> StorageResult<Option<CacheIndexEntry>> {
        let key = Self::entry_key(url, setting);
        let data = match self.blobs.get(table, &key).await {
            Ok(data) => data,
            Err(StorageError::NotFound { .. }) => return Ok(None),
            Err(e) => return Err(e),
        };

        let entry: CacheIndexEntry = serde_json::from_slice(&data)?;

        // Truncated-hash keys can collide; only an exact match counts.
        if entry.url != *url || entry.contextual_setting != setting {
            return Ok(None);
        }

        Ok(Some(entry))
    }

    async fn put(&self, table: &str, entry: &CacheIndexEntry) -> StorageResult<()> {
        let key = Self::entry_key(&entry.url, entry.contextual_setting);
        let data = serde_json::to_vec(entry)?;
        self.blobs.put(table, &key, &data).await
    }
}
