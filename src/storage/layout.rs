//! Versioned path convention shared with the upstream content-processing stage.
//!
//! Both stages store per-session artifacts side by side under
//! `sessions/{session}/`. An index entry points at the upstream artifact; the
//! archived results live in the same directory under [`ArchiveLayout::results_file`].

use crate::constants::SESSIONS_DIR;
use crate::identity::SessionIdentity;

/// Current layout version written into index entries by the upstream stage.
pub const ARCHIVE_LAYOUT_VERSION: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArchiveLayout {
    pub version: u32,
    /// Upstream processed-content artifact.
    pub content_file: &'static str,
    /// Weighted dimension results written by this crate.
    pub results_file: &'static str,
}

impl ArchiveLayout {
    pub const V1: Self = Self {
        version: ARCHIVE_LAYOUT_VERSION,
        content_file: "processed-content.json",
        results_file: "dimension-results.json",
    };

    pub fn session_dir(&self, session: &SessionIdentity) -> String {
        format!("{SESSIONS_DIR}/{}", session.as_str())
    }

    pub fn content_key(&self, session: &SessionIdentity) -> String {
        format!("{}/{}", self.session_dir(session), self.content_file)
    }

    pub fn results_key(&self, session: &SessionIdentity) -> String {
        format!("{}/{}", self.session_dir(session), self.results_file)
    }

    /// Returns `true` if an index entry written with `version` can be read with this layout.
    ///
    /// Entries without a version predate versioning and are read as v1.
    pub fn accepts(&self, version: Option<u32>) -> bool {
        version.unwrap_or(ARCHIVE_LAYOUT_VERSION) == self.version
    }

    /// Derives the results key that sits next to the artifact `pointer` refers to.
    ///
    /// `pointer` may be a bare key (`sessions/x/processed-content.json`) or a
    /// URI (`gs://bucket/sessions/x/processed-content.json`). Only the
    /// directory component is used. Returns `None` when the pointer has no
    /// directory or contains unsafe segments.
    pub fn results_key_for_pointer(&self, pointer: &str) -> Option<String> {
        let key = strip_uri_prefix(pointer.trim());
        let (dir, file) = key.rsplit_once('/')?;

        if dir.is_empty() || file.is_empty() {
            return None;
        }
        if dir
            .split('/')
            .any(|seg| seg.is_empty() || seg == "." || seg == "..")
        {
            return None;
        }

        Some(format!("{dir}/{}", self.results_file))
    }
}

impl Default for ArchiveLayout {
    fn default() -> Self {
        Self::V1
    }
}

/// Drops a `scheme://bucket/` prefix, leaving the object key.
fn strip_uri_prefix(pointer: &str) -> &str {
    match pointer.split_once("://") {
        Some((_, rest)) => rest.split_once('/').map(|(_, key)| key).unwrap_or(""),
        None => pointer.trim_start_matches('/'),
    }
}
