//! Blob storage used for session artifacts and result archives.
//!
//! `GcsBlobStore` shells out to `gsutil`. `LocalBlobStore` keeps objects on the
//! local filesystem and is the default for development.

use std::path::{Component, Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use super::error::{StorageError, StorageResult};

const CMD_TIMEOUT: Duration = Duration::from_secs(120);
pub(crate) const CMD_RETRIES: usize = 3;
const CMD_RETRY_BACKOFF: Duration = Duration::from_millis(750);

#[async_trait]
/// Object storage addressed by (bucket, key).
pub trait BlobStore: Send + Sync {
    /// Reads the object at `bucket/key`. Missing objects yield [`StorageError::NotFound`].
    async fn get(&self, bucket: &str, key: &str) -> StorageResult<Vec<u8>>;
    /// Writes `data` to `bucket/key`, replacing any existing object.
    async fn put(&self, bucket: &str, key: &str, data: &[u8]) -> StorageResult<()>;
}

/// Filesystem implementation of [`BlobStore`]: objects live at `{root}/{bucket}/{key}`.
#[derive(Debug, Clone)]
pub struct LocalBlobStore {
    root: PathBuf,
}

impl LocalBlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn object_path(&self, bucket: &str, key: &str) -> StorageResult<PathBuf> {
        let bucket = sanitize_storage_key(bucket).ok_or_else(|| StorageError::InvalidKey {
            key: bucket.to_string(),
        })?;
        let key = sanitize_storage_key(key).ok_or_else(|| StorageError::InvalidKey {
            key: key.to_string(),
        })?;
        Ok(self.root.join(bucket).join(key))
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn get(&self, bucket: &str, key: &str) -> StorageResult<Vec<u8>> {
        let path = self.object_path(bucket, key)?;
        match tokio::fs::read(&path).await {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(StorageError::NotFound {
                bucket: bucket.to_string(),
                key: key.to_string(),
            }),
            Err(e) => Err(e.into()),
        }
    }

    async fn put(&self, bucket: &str, key: &str, data: &[u8]) -> StorageResult<()> {
        let path = self.object_path(bucket, key)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        // Write-then-rename so readers never observe a partial object.
        let tmp = path.with_extension(format!("tmp-{}", uuid::Uuid::new_v4().simple()));
        tokio::fs::write(&tmp, data).await?;
        if let Err(e) = tokio::fs::rename(&tmp, &path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(StorageError::WriteFailed(format!(
                "rename into {}: {e}",
                path.display()
            )));
        }
        Ok(())
    }
}

/// Google Cloud Storage implementation of [`BlobStore`] backed by `gsutil`.
pub struct GcsBlobStore {
    gsutil_path: PathBuf,
}

impl GcsBlobStore {
    /// Creates a new GCS implementation using `gsutil` from `PATH`.
    pub fn new() -> Self {
        Self {
            gsutil_path: PathBuf::from("gsutil"),
        }
    }

    pub fn with_gsutil_path(path: impl Into<PathBuf>) -> Self {
        Self {
            gsutil_path: path.into(),
        }
    }

    async fn run_command_with_retries(
        &self,
        args: Vec<String>,
        stdin: Option<&[u8]>,
        label: &str,
    ) -> StorageResult<Vec<u8>> {
        let mut attempt = 0usize;
        loop {
            attempt += 1;

            let mut cmd = Command::new(&self.gsutil_path);
            cmd.args(&args)
                .kill_on_drop(true)
                .stdin(if stdin.is_some() {
                    Stdio::piped()
                } else {
                    Stdio::null()
                })
                .stdout(Stdio::piped())
                .stderr(Stdio::piped());

            let mut child = cmd
                .spawn()
                .map_err(|e| StorageError::CloudError(format!("Failed to spawn {label}: {e}")))?;

            if let (Some(data), Some(mut pipe)) = (stdin, child.stdin.take()) {
                pipe.write_all(data).await.map_err(|e| {
                    StorageError::CloudError(format!("Failed writing to {label}: {e}"))
                })?;
                drop(pipe);
            }

            let output = match tokio::time::timeout(CMD_TIMEOUT, child.wait_with_output()).await {
                Ok(res) => res.map_err(|e| {
                    StorageError::CloudError(format!("Failed waiting for {label}: {e}"))
                })?,
                Err(_) => {
                    return Err(StorageError::CloudError(format!(
                        "{label} timed out after {:?}",
                        CMD_TIMEOUT
                    )));
                }
            };

            if output.status.success() {
                return Ok(output.stdout);
            }

            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            if stderr.contains("No URLs matched") || stderr.contains("NotFound") {
                return Err(StorageError::CloudError(format!("not found: {stderr}")));
            }

            let err = StorageError::CloudError(format!("{label} failed: {stderr}"));
            if attempt >= CMD_RETRIES {
                return Err(err);
            }

            tokio::time::sleep(CMD_RETRY_BACKOFF).await;
        }
    }
}

impl Default for GcsBlobStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BlobStore for GcsBlobStore {
    async fn get(&self, bucket: &str, key: &str) -> StorageResult<Vec<u8>> {
        let uri = format!("gs://{}/{}", bucket, key);
        self.run_command_with_retries(vec!["cat".to_string(), uri], None, "gsutil cat")
            .await
            .map_err(|e| match e {
                StorageError::CloudError(msg) if msg.starts_with("not found") => {
                    StorageError::NotFound {
                        bucket: bucket.to_string(),
                        key: key.to_string(),
                    }
                }
                other => other,
            })
    }

    async fn put(&self, bucket: &str, key: &str, data: &[u8]) -> StorageResult<()> {
        let uri = format!("gs://{}/{}", bucket, key);
        self.run_command_with_retries(
            vec!["cp".to_string(), "-".to_string(), uri],
            Some(data),
            "gsutil cp (upload)",
        )
        .await
        .map(|_| ())
    }
}

/// Turns a storage key into a relative path, rejecting traversal and absolute keys.
pub(crate) fn sanitize_storage_key(storage_key: &str) -> Option<PathBuf> {
    if storage_key.is_empty() {
        return None;
    }

    let p = Path::new(storage_key);
    let mut out = PathBuf::new();

    for c in p.components() {
        match c {
            Component::Normal(seg) => out.push(seg),
            Component::CurDir => continue,
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }

    if out.as_os_str().is_empty() {
        None
    } else {
        Some(out)
    }
}
