//! Result publishing to working storage and the results archive.

pub mod error;
pub mod publisher;


pub use error::PublishError;
pub use publisher::{PublishOutcome, ResultPublisher};
