//! Cache addressing: URL normalization and session identity derivation.
//!
//! A [`SessionIdentity`] is `session-` followed by the first 12 hex characters
//! of `BLAKE3(normalized_url + "#" + setting)`. The upstream content-processing
//! stage computes the same value independently, so both stages agree on a
//! storage location without any shared runtime state.

pub mod normalize;
pub mod session;

pub use normalize::{NormalizedUrl, normalize_url};
pub use session::{ContextualSetting, SessionIdentity, derive_session_identity};
