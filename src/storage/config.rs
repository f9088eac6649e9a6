#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Backend used for blob and index storage.
pub enum StorageProviderType {
    /// Local filesystem under the configured storage root.
    #[default]
    Local,
    /// Google Cloud Storage via `gsutil`.
    Gcs,
}

impl std::str::FromStr for StorageProviderType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "gcs" | "gcp" | "google" => Ok(Self::Gcs),
            "local" | "fs" => Ok(Self::Local),
            _ => Err(format!("Unknown storage provider: {}", s)),
        }
    }
}
