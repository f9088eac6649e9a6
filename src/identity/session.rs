use std::fmt;
use std::str::FromStr;

use blake3::Hasher;
use serde::{Deserialize, Serialize};

use crate::constants::{SESSION_HASH_HEX_LEN, SESSION_HASH_SEPARATOR, SESSION_PREFIX};

use super::normalize::{NormalizedUrl, normalize_url};

/// Whether the scored document was analyzed together with related pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContextualSetting {
    /// One or more related pages were discovered and included.
    WithContext,
    /// The document was analyzed in isolation.
    WithoutContext,
}

impl ContextualSetting {
    /// Derives the setting from the number of related pages the upstream stage found.
    pub fn from_related_page_count(count: usize) -> Self {
        if count > 0 {
            Self::WithContext
        } else {
            Self::WithoutContext
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WithContext => "with-context",
            Self::WithoutContext => "without-context",
        }
    }
}

impl fmt::Display for ContextualSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContextualSetting {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "with-context" => Ok(Self::WithContext),
            "without-context" => Ok(Self::WithoutContext),
            _ => Err(format!("Unknown contextual setting: {}", s)),
        }
    }
}

/// Identifier of a storage session.
///
/// Canonical identities come from [`SessionIdentity::derive`] and are a pure
/// function of (normalized URL, contextual setting). Callers may also supply
/// arbitrary session ids for their working copies; see
/// [`SessionIdentity::is_canonical_for`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionIdentity(String);

impl SessionIdentity {
    /// Wraps a caller-supplied session id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Derives the canonical identity for `url` (normalized first) and `setting`.
    pub fn derive(url: &str, setting: ContextualSetting) -> Self {
        Self::from_normalized(&normalize_url(url), setting)
    }

    /// Derives the canonical identity for an already-normalized URL.
    pub fn from_normalized(url: &NormalizedUrl, setting: ContextualSetting) -> Self {
        let digest = hash_session_key(url.as_str(), setting.as_str());
        Self(format!(
            "{SESSION_PREFIX}{}",
            &digest.to_hex()[..SESSION_HASH_HEX_LEN]
        ))
    }

    /// Returns `true` if this is the canonical identity for (`url`, `setting`).
    pub fn is_canonical_for(&self, url: &str, setting: ContextualSetting) -> bool {
        *self == Self::derive(url, setting)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for SessionIdentity {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for SessionIdentity {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Shorthand for [`SessionIdentity::derive`].
#[inline]
pub fn derive_session_identity(url: &str, setting: ContextualSetting) -> SessionIdentity {
    SessionIdentity::derive(url, setting)
}

#[inline]
fn hash_session_key(normalized_url: &str, setting: &str) -> blake3::Hash {
    let mut hasher = Hasher::new();
    hasher.update(normalized_url.as_bytes());
    hasher.update(SESSION_HASH_SEPARATOR.as_bytes());
    hasher.update(setting.as_bytes());
    hasher.finalize()
}
