//! Cross-cutting, shared constants.
//!
//! The session prefix, hash prefix length and separator together define the
//! cache-addressing contract shared with the upstream content-processing
//! stage. Changing any of them orphans every archive written so far.

/// Literal prefix of every [`SessionIdentity`](crate::identity::SessionIdentity).
pub const SESSION_PREFIX: &str = "session-";

/// Number of hex characters of the digest kept in a session identity.
pub const SESSION_HASH_HEX_LEN: usize = 12;

/// Separator between the normalized URL and the contextual setting in the hash input.
pub const SESSION_HASH_SEPARATOR: &str = "#";

/// Top-level directory under which session artifacts are stored.
pub const SESSIONS_DIR: &str = "sessions";

/// Default per-dimension model call timeout.
pub const DEFAULT_MODEL_TIMEOUT_SECS: u64 = 60;

/// Default character budget for the document body embedded in prompts.
pub const DEFAULT_MAX_CONTENT_CHARS: usize = 8000;

/// Default maximum tokens requested from the model per dimension.
pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 2000;

/// Sampling temperature used for every dimension call.
pub const DEFAULT_TEMPERATURE: f32 = 0.1;

/// Lower bound of a dimension score.
pub const MIN_SCORE: u32 = 0;

/// Upper bound of a dimension score.
pub const MAX_SCORE: u32 = 100;
