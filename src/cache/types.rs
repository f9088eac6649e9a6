use std::fmt;

use crate::scoring::AnalysisResults;

/// Previously archived results for a (normalized URL, contextual setting) pair.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedResults {
    /// Archive bytes exactly as stored.
    pub raw: Vec<u8>,
    /// Parsed form of `raw`.
    pub results: AnalysisResults,
    /// Blob key the archive was read from.
    pub archive_key: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MissReason {
    /// No index table configured.
    Disabled,
    NoIndexEntry,
    IndexUnavailable,
    /// Entry written with a different archive layout version.
    LayoutMismatch,
    /// Entry pointer has no usable directory component.
    BadPointer,
    ArchiveUnavailable,
    MalformedArchive,
}

impl MissReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            MissReason::Disabled => "DISABLED",
            MissReason::NoIndexEntry => "NO_INDEX_ENTRY",
            MissReason::IndexUnavailable => "INDEX_UNAVAILABLE",
            MissReason::LayoutMismatch => "LAYOUT_MISMATCH",
            MissReason::BadPointer => "BAD_POINTER",
            MissReason::ArchiveUnavailable => "ARCHIVE_UNAVAILABLE",
            MissReason::MalformedArchive => "MALFORMED_ARCHIVE",
        }
    }
}

impl fmt::Display for MissReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug)]
pub enum CacheLookup {
    Hit(CachedResults),
    Miss(MissReason),
}

impl CacheLookup {
    pub fn is_hit(&self) -> bool {
        matches!(self, CacheLookup::Hit(_))
    }

    pub fn miss_reason(&self) -> Option<MissReason> {
        match self {
            CacheLookup::Hit(_) => None,
            CacheLookup::Miss(reason) => Some(*reason),
        }
    }

    pub fn into_hit(self) -> Option<CachedResults> {
        match self {
            CacheLookup::Hit(cached) => Some(cached),
            CacheLookup::Miss(_) => None,
        }
    }
}
