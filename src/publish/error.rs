use thiserror::Error;

use crate::storage::StorageError;

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("failed to serialize results: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("failed to write working copy to {bucket}/{key}: {source}")]
    WorkingStorageWrite {
        bucket: String,
        key: String,
        #[source]
        source: StorageError,
    },
}
