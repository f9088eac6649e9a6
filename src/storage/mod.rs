//! Blob and index storage consumed as abstract get/put operations.

pub mod blob;
pub mod config;
pub mod error;
pub mod index;
pub mod layout;
#[cfg(any(test, feature = "mock"))]
pub mod mock;


use std::sync::Arc;

pub use blob::{BlobStore, GcsBlobStore, LocalBlobStore};
pub use config::StorageProviderType;
pub use error::{StorageError, StorageResult};
pub use index::{BlobIndexStore, CacheIndexEntry, IndexStore};
pub use layout::{ARCHIVE_LAYOUT_VERSION, ArchiveLayout};
#[cfg(any(test, feature = "mock"))]
pub use mock::MemoryBlobStore;

use crate::config::Config;

/// Builds the blob store for the configured provider.
pub fn build_blob_store(config: &Config) -> Arc<dyn BlobStore> {
    match config.storage_provider {
        StorageProviderType::Gcs => Arc::new(GcsBlobStore::new()),
        StorageProviderType::Local => Arc::new(LocalBlobStore::new(config.storage_root.clone())),
    }
}

/// Builds the index store, or `None` when no index table is configured.
pub fn build_index_store(
    config: &Config,
    blobs: Arc<dyn BlobStore>,
) -> Option<Arc<dyn IndexStore>> {
    config
        .index_table
        .as_ref()
        .map(|_| Arc::new(BlobIndexStore::new(blobs)) as Arc<dyn IndexStore>)
}
