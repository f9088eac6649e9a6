//! Environment-backed configuration.
//!
//! Most settings have defaults. Override with `DOCSCORE_*` environment variables.
//! The working-storage bucket is the only required value.

pub mod error;

#[cfg(test)]
mod tests;

pub use error::ConfigError;

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::constants::{DEFAULT_MAX_CONTENT_CHARS, DEFAULT_MODEL_TIMEOUT_SECS};
use crate::model::ModelFamily;
use crate::storage::StorageProviderType;

/// Scorer configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `DOCSCORE_*` overrides on top of defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Working-storage bucket. Required; an empty value fails validation.
    pub bucket: String,

    /// Key-value index table. `None` disables result caching.
    pub index_table: Option<String>,

    /// Inference region. Default: `us-east-1`.
    pub model_region: String,

    /// Model identifier sent to the inference endpoint.
    pub model_id: String,

    /// Explicit endpoint base URL. Derived from the region when unset.
    pub model_endpoint: Option<String>,

    /// Bearer token for the inference endpoint.
    pub model_api_key: Option<String>,

    /// Per-dimension model call timeout. Default: 60s.
    pub model_timeout: Duration,

    /// Character budget for the document body embedded in prompts. Default: `8000`.
    pub max_content_chars: usize,

    /// Blob/index storage backend. Default: local filesystem.
    pub storage_provider: StorageProviderType,

    /// Root directory for the local storage backend. Default: `./.data`.
    pub storage_root: PathBuf,
}

/// Default inference region used when `DOCSCORE_MODEL_REGION` is not set.
pub const DEFAULT_MODEL_REGION: &str = "us-east-1";

impl Default for Config {
    fn default() -> Self {
        Self {
            bucket: String::new(),
            index_table: None,
            model_region: DEFAULT_MODEL_REGION.to_string(),
            model_id: ModelFamily::default().default_model_id().to_string(),
            model_endpoint: None,
            model_api_key: None,
            model_timeout: Duration::from_secs(DEFAULT_MODEL_TIMEOUT_SECS),
            max_content_chars: DEFAULT_MAX_CONTENT_CHARS,
            storage_provider: StorageProviderType::default(),
            storage_root: PathBuf::from("./.data"),
        }
    }
}

impl Config {
    pub(crate) const ENV_BUCKET: &'static str = "DOCSCORE_BUCKET";
    const ENV_INDEX_TABLE: &'static str = "DOCSCORE_INDEX_TABLE";
    const ENV_MODEL_REGION: &'static str = "DOCSCORE_MODEL_REGION";
    const ENV_MODEL: &'static str = "DOCSCORE_MODEL";
    const ENV_MODEL_ID: &'static str = "DOCSCORE_MODEL_ID";
    const ENV_MODEL_ENDPOINT: &'static str = "DOCSCORE_MODEL_ENDPOINT";
    const ENV_MODEL_API_KEY: &'static str = "DOCSCORE_MODEL_API_KEY";
    const ENV_MODEL_TIMEOUT_SECS: &'static str = "DOCSCORE_MODEL_TIMEOUT_SECS";
    const ENV_MAX_CONTENT_CHARS: &'static str = "DOCSCORE_MAX_CONTENT_CHARS";
    const ENV_STORAGE_PROVIDER: &'static str = "DOCSCORE_STORAGE_PROVIDER";
    const ENV_STORAGE_ROOT: &'static str = "DOCSCORE_STORAGE_ROOT";

    /// Creates a config with defaults and the given working-storage bucket.
    pub fn with_bucket(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            ..Self::default()
        }
    }

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let bucket = Self::parse_optional_string_from_env(Self::ENV_BUCKET).ok_or(
            ConfigError::MissingEnvVar {
                name: Self::ENV_BUCKET,
            },
        )?;
        let index_table = Self::parse_optional_string_from_env(Self::ENV_INDEX_TABLE);
        let model_region =
            Self::parse_string_from_env(Self::ENV_MODEL_REGION, defaults.model_region);
        let model_id = Self::parse_model_id_from_env();
        let model_endpoint = Self::parse_optional_string_from_env(Self::ENV_MODEL_ENDPOINT);
        let model_api_key = Self::parse_optional_string_from_env(Self::ENV_MODEL_API_KEY);
        let model_timeout = Duration::from_secs(Self::parse_u64_from_env(
            Self::ENV_MODEL_TIMEOUT_SECS,
            defaults.model_timeout.as_secs(),
        )?);
        let max_content_chars = Self::parse_u64_from_env(
            Self::ENV_MAX_CONTENT_CHARS,
            defaults.max_content_chars as u64,
        )? as usize;
        let storage_provider = Self::parse_storage_provider_from_env(defaults.storage_provider)?;
        let storage_root =
            Self::parse_path_from_env(Self::ENV_STORAGE_ROOT, defaults.storage_root);

        Ok(Self {
            bucket,
            index_table,
            model_region,
            model_id,
            model_endpoint,
            model_api_key,
            model_timeout,
            max_content_chars,
            storage_provider,
            storage_root,
        })
    }

    /// Validates basic invariants (does not create directories).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bucket.trim().is_empty() {
            return Err(ConfigError::MissingEnvVar {
                name: Self::ENV_BUCKET,
            });
        }

        if self.model_timeout.is_zero() {
            return Err(ConfigError::InvalidValue {
                name: Self::ENV_MODEL_TIMEOUT_SECS,
                reason: "timeout must be greater than zero".to_string(),
            });
        }

        if self.max_content_chars == 0 {
            return Err(ConfigError::InvalidValue {
                name: Self::ENV_MAX_CONTENT_CHARS,
                reason: "content budget must be greater than zero".to_string(),
            });
        }

        if self.storage_root.exists() && !self.storage_root.is_dir() {
            return Err(ConfigError::NotADirectory {
                path: self.storage_root.clone(),
            });
        }

        Ok(())
    }

    /// Returns `true` if an index table is configured (caching enabled).
    pub fn caching_enabled(&self) -> bool {
        self.index_table.is_some()
    }

    /// Returns the inference endpoint base URL.
    pub fn resolved_model_endpoint(&self) -> String {
        match &self.model_endpoint {
            Some(endpoint) => endpoint.trim_end_matches('/').to_string(),
            None => format!("https://bedrock-runtime.{}.amazonaws.com", self.model_region),
        }
    }

    /// Returns the model family implied by [`Config::model_id`].
    pub fn model_family(&self) -> ModelFamily {
        ModelFamily::from_model_id(&self.model_id)
    }

    fn parse_model_id_from_env() -> String {
        if let Some(model_id) = Self::parse_optional_string_from_env(Self::ENV_MODEL_ID) {
            return model_id;
        }
        let token = env::var(Self::ENV_MODEL).unwrap_or_default();
        ModelFamily::from_token(&token)
            .default_model_id()
            .to_string()
    }

    fn parse_storage_provider_from_env(
        default: StorageProviderType,
    ) -> Result<StorageProviderType, ConfigError> {
        match Self::parse_optional_string_from_env(Self::ENV_STORAGE_PROVIDER) {
            Some(value) => value
                .parse()
                .map_err(|_| ConfigError::InvalidStorageProvider { value }),
            None => Ok(default),
        }
    }

    fn parse_path_from_env(var_name: &str, default: PathBuf) -> PathBuf {
        env::var(var_name).map(PathBuf::from).unwrap_or(default)
    }

    fn parse_optional_string_from_env(var_name: &str) -> Option<String> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn parse_string_from_env(var_name: &str, default: String) -> String {
        Self::parse_optional_string_from_env(var_name).unwrap_or(default)
    }

    fn parse_u64_from_env(var_name: &'static str, default: u64) -> Result<u64, ConfigError> {
        match Self::parse_optional_string_from_env(var_name) {
            Some(value) => value.parse().map_err(|e| ConfigError::NumberParseError {
                name: var_name,
                value: value.clone(),
                source: e,
            }),
            None => Ok(default),
        }
    }
}
