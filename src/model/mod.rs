//! Hosted language model access.
//!
//! Three model families are supported; each has its own request body and
//! response shape (see [`family`]). Callers only see [`ModelInvoker`], which
//! turns a prompt into the model's raw text.

pub mod client;
pub mod error;
pub mod family;
#[cfg(any(test, feature = "mock"))]
pub mod mock;


pub use client::{HttpModelInvoker, ModelInvoker};
pub use error::{ModelError, ModelResult};
pub use family::{ANTHROPIC_VERSION, GenerationParams, ModelFamily};
#[cfg(any(test, feature = "mock"))]
pub use mock::MockModelInvoker;
