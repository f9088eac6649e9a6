//! In-memory blob store for tests.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::RwLock;

use super::blob::BlobStore;
use super::error::{StorageError, StorageResult};

/// [`BlobStore`] backed by a shared map, with per-prefix failure injection.
///
/// Clones share the same objects, so a test can keep a handle while the
/// pipeline owns another.
#[derive(Default, Clone)]
pub struct MemoryBlobStore {
    objects: Arc<RwLock<HashMap<(String, String), Vec<u8>>>>,
    failing_get_prefixes: Arc<RwLock<Vec<String>>>,
    failing_put_prefixes: Arc<RwLock<Vec<String>>>,
    gets: Arc<AtomicUsize>,
    puts: Arc<AtomicUsize>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, bucket: &str, key: &str, data: impl Into<Vec<u8>>) {
        self.objects
            .write()
            .insert((bucket.to_string(), key.to_string()), data.into());
    }

    pub fn object(&self, bucket: &str, key: &str) -> Option<Vec<u8>> {
        self.objects
            .read()
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
    }

    pub fn contains(&self, bucket: &str, key: &str) -> bool {
        self.objects
            .read()
            .contains_key(&(bucket.to_string(), key.to_string()))
    }

    pub fn len(&self) -> usize {
        self.objects.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.read().is_empty()
    }

    /// Makes every `get` whose key starts with `prefix` fail with an I/O error.
    pub fn fail_gets_with_prefix(&self, prefix: &str) {
        self.failing_get_prefixes.write().push(prefix.to_string());
    }

    /// Makes every `put` whose key starts with `prefix` fail.
    pub fn fail_puts_with_prefix(&self, prefix: &str) {
        self.failing_put_prefixes.write().push(prefix.to_string());
    }

    pub fn get_count(&self) -> usize {
        self.gets.load(Ordering::Relaxed)
    }

    pub fn put_count(&self) -> usize {
        self.puts.load(Ordering::Relaxed)
    }

    fn matches_any(prefixes: &RwLock<Vec<String>>, key: &str) -> bool {
        prefixes.read().iter().any(|p| key.starts_with(p.as_str()))
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn get(&self, bucket: &str, key: &str) -> StorageResult<Vec<u8>> {
        self.gets.fetch_add(1, Ordering::Relaxed);

        if Self::matches_any(&self.failing_get_prefixes, key) {
            return Err(StorageError::Io(std::io::Error::other(format!(
                "injected read failure for {bucket}/{key}"
            ))));
        }

        self.object(bucket, key).ok_or_else(|| StorageError::NotFound {
            bucket: bucket.to_string(),
            key: key.to_string(),
        })
    }

    async fn put(&self, bucket: &str, key: &str, data: &[u8]) -> StorageResult<()> {
        self.puts.fetch_add(1, Ordering::Relaxed);

        if Self::matches_any(&self.failing_put_prefixes, key) {
            return Err(StorageError::WriteFailed(format!(
                "injected write failure for {bucket}/{key}"
            )));
        }

        self.insert(bucket, key, data.to_vec());
        Ok(())
    }
}
