//! Cache gateway: reuse of previously archived dimension results.
//!
//! Caching is optional. With no index table configured every lookup misses
//! without touching storage.

pub mod gateway;
pub mod types;


pub use gateway::CacheGateway;
pub use types::{CacheLookup, CachedResults, MissReason};
