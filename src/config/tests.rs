use super::*;
use serial_test::serial;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::model::ModelFamily;
use crate::storage::StorageProviderType;

fn with_env_vars<F, R>(vars: &[(&str, &str)], f: F) -> R
where
    F: FnOnce() -> R,
{
    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    for (key, value) in vars {
        unsafe { env::set_var(key, value) };
    }

    let result = f();

    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    for (key, _) in vars {
        unsafe { env::remove_var(key) };
    }

    result
}

fn clear_docscore_env() {
    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    unsafe {
        env::remove_var("DOCSCORE_BUCKET");
        env::remove_var("DOCSCORE_INDEX_TABLE");
        env::remove_var("DOCSCORE_MODEL_REGION");
        env::remove_var("DOCSCORE_MODEL");
        env::remove_var("DOCSCORE_MODEL_ID");
        env::remove_var("DOCSCORE_MODEL_ENDPOINT");
        env::remove_var("DOCSCORE_MODEL_API_KEY");
        env::remove_var("DOCSCORE_MODEL_TIMEOUT_SECS");
        env::remove_var("DOCSCORE_MAX_CONTENT_CHARS");
        env::remove_var("DOCSCORE_STORAGE_PROVIDER");
        env::remove_var("DOCSCORE_STORAGE_ROOT");
    }
}

#[test]
fn test_default_config() {
    let config = Config::default();

    assert!(config.bucket.is_empty());
    assert!(config.index_table.is_none());
    assert_eq!(config.model_region, "us-east-1");
    assert_eq!(config.model_family(), ModelFamily::Claude);
    assert_eq!(config.model_timeout, Duration::from_secs(60));
    assert_eq!(config.max_content_chars, 8000);
    assert_eq!(config.storage_provider, StorageProviderType::Local);
    assert_eq!(config.storage_root, PathBuf::from("./.data"));
}

#[test]
#[serial]
fn test_from_env_missing_bucket_is_fatal() {
    clear_docscore_env();

    let err = Config::from_env().unwrap_err();
    assert!(matches!(
        err,
        ConfigError::MissingEnvVar {
            name: "DOCSCORE_BUCKET"
        }
    ));
}

#[test]
#[serial]
fn test_from_env_blank_bucket_is_fatal() {
    clear_docscore_env();

    with_env_vars(&[("DOCSCORE_BUCKET", "   ")], || {
        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar { .. }));
    });
}

#[test]
#[serial]
fn test_from_env_minimal() {
    clear_docscore_env();

    with_env_vars(&[("DOCSCORE_BUCKET", "docs-bucket")], || {
        let config = Config::from_env().expect("should parse");
        assert_eq!(config.bucket, "docs-bucket");
        assert!(!config.caching_enabled());
        assert_eq!(config.model_family(), ModelFamily::Claude);
    });
}

#[test]
#[serial]
fn test_from_env_index_table_enables_caching() {
    clear_docscore_env();

    with_env_vars(
        &[
            ("DOCSCORE_BUCKET", "docs-bucket"),
            ("DOCSCORE_INDEX_TABLE", "processed-urls"),
        ],
        || {
            let config = Config::from_env().expect("should parse");
            assert!(config.caching_enabled());
            assert_eq!(config.index_table.as_deref(), Some("processed-urls"));
        },
    );
}

#[test]
#[serial]
fn test_from_env_blank_index_table_disables_caching() {
    clear_docscore_env();

    with_env_vars(
        &[
            ("DOCSCORE_BUCKET", "docs-bucket"),
            ("DOCSCORE_INDEX_TABLE", ""),
        ],
        || {
            let config = Config::from_env().expect("should parse");
            assert!(!config.caching_enabled());
        },
    );
}

#[test]
#[serial]
fn test_from_env_model_tokens() {
    clear_docscore_env();

    let cases = [
        ("claude", ModelFamily::Claude),
        ("titan", ModelFamily::Titan),
        ("llama", ModelFamily::Llama),
        ("auto", ModelFamily::Claude),
        ("gpt-9000", ModelFamily::Claude),
        ("TITAN", ModelFamily::Titan),
    ];

    for (token, expected) in cases {
        with_env_vars(
            &[("DOCSCORE_BUCKET", "b"), ("DOCSCORE_MODEL", token)],
            || {
                let config = Config::from_env().expect("should parse");
                assert_eq!(config.model_family(), expected, "token {token}");
                assert_eq!(config.model_id, expected.default_model_id());
            },
        );
    }
}

#[test]
#[serial]
fn test_from_env_explicit_model_id_wins() {
    clear_docscore_env();

    with_env_vars(
        &[
            ("DOCSCORE_BUCKET", "b"),
            ("DOCSCORE_MODEL", "claude"),
            ("DOCSCORE_MODEL_ID", "meta.llama3-70b-instruct-v1:0"),
        ],
        || {
            let config = Config::from_env().expect("should parse");
            assert_eq!(config.model_id, "meta.llama3-70b-instruct-v1:0");
            assert_eq!(config.model_family(), ModelFamily::Llama);
        },
    );
}

#[test]
#[serial]
fn test_from_env_timeout_and_budget() {
    clear_docscore_env();

    with_env_vars(
        &[
            ("DOCSCORE_BUCKET", "b"),
            ("DOCSCORE_MODEL_TIMEOUT_SECS", "15"),
            ("DOCSCORE_MAX_CONTENT_CHARS", "2048"),
        ],
        || {
            let config = Config::from_env().expect("should parse");
            assert_eq!(config.model_timeout, Duration::from_secs(15));
            assert_eq!(config.max_content_chars, 2048);
        },
    );
}

#[test]
#[serial]
fn test_from_env_invalid_timeout() {
    clear_docscore_env();

    with_env_vars(
        &[
            ("DOCSCORE_BUCKET", "b"),
            ("DOCSCORE_MODEL_TIMEOUT_SECS", "soon"),
        ],
        || {
            let err = Config::from_env().unwrap_err();
            assert!(matches!(err, ConfigError::NumberParseError { .. }));
            assert!(err.to_string().contains("DOCSCORE_MODEL_TIMEOUT_SECS"));
        },
    );
}

#[test]
#[serial]
fn test_from_env_storage_provider() {
    clear_docscore_env();

    with_env_vars(
        &[
            ("DOCSCORE_BUCKET", "b"),
            ("DOCSCORE_STORAGE_PROVIDER", "gcs"),
            ("DOCSCORE_STORAGE_ROOT", "/tmp/docscore"),
        ],
        || {
            let config = Config::from_env().expect("should parse");
            assert_eq!(config.storage_provider, StorageProviderType::Gcs);
            assert_eq!(config.storage_root, PathBuf::from("/tmp/docscore"));
        },
    );
}

#[test]
#[serial]
fn test_from_env_unknown_storage_provider() {
    clear_docscore_env();

    with_env_vars(
        &[
            ("DOCSCORE_BUCKET", "b"),
            ("DOCSCORE_STORAGE_PROVIDER", "floppy"),
        ],
        || {
            let err = Config::from_env().unwrap_err();
            assert!(matches!(err, ConfigError::InvalidStorageProvider { .. }));
        },
    );
}

#[test]
fn test_resolved_model_endpoint() {
    let config = Config {
        model_region: "eu-west-1".to_string(),
        ..Config::with_bucket("b")
    };
    assert_eq!(
        config.resolved_model_endpoint(),
        "https://bedrock-runtime.eu-west-1.amazonaws.com"
    );

    let config = Config {
        model_endpoint: Some("http://localhost:9000/".to_string()),
        ..Config::with_bucket("b")
    };
    assert_eq!(config.resolved_model_endpoint(), "http://localhost:9000");
}

#[test]
fn test_validate_success_with_bucket() {
    let config = Config::with_bucket("b");
    assert!(config.validate().is_ok());
}

#[test]
fn test_validate_rejects_empty_bucket() {
    let err = Config::default().validate().unwrap_err();
    assert!(matches!(err, ConfigError::MissingEnvVar { .. }));
}

#[test]
fn test_validate_rejects_zero_timeout() {
    let config = Config {
        model_timeout: Duration::ZERO,
        ..Config::with_bucket("b")
    };
    let err = config.validate().unwrap_err();
    assert!(matches!(err, ConfigError::InvalidValue { .. }));
}

#[test]
fn test_validate_rejects_zero_content_budget() {
    let config = Config {
        max_content_chars: 0,
        ..Config::with_bucket("b")
    };
    let err = config.validate().unwrap_err();
    assert!(matches!(err, ConfigError::InvalidValue { .. }));
}

#[test]
fn test_validate_storage_root_is_file() {
    let config = Config {
        storage_root: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("Cargo.toml"),
        ..Config::with_bucket("b")
    };
    let err = config.validate().unwrap_err();
    assert!(matches!(err, ConfigError::NotADirectory { .. }));
}

#[test]
fn test_error_messages_are_descriptive() {
    let err = ConfigError::MissingEnvVar {
        name: "DOCSCORE_BUCKET",
    };
    assert_eq!(
        err.to_string(),
        "missing required environment variable: DOCSCORE_BUCKET"
    );

    let err = ConfigError::InvalidStorageProvider {
        value: "floppy".to_string(),
    };
    assert!(err.to_string().contains("floppy"));
}
