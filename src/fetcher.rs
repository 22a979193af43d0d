//! Fetch Contract
//!
//! Components that load content from a project directory and hand out slot
//! content. Each fetcher owns its caches; caches fill lazily on first fetch and
//! are dropped by [`Fetcher::clear_cache`] so one instance can serve a fresh
//! batch without being rebuilt.

use crate::error::FillError;

mod flock;
mod project_info;
mod roster;

pub use flock::{FairnessCounter, FlockRequest, FlockSampler, MutexKey, PhrasePool, PoolSummary};
pub use project_info::{InfoKey, InfoMode, InfoPaths, ProjectInfoCache};
pub use roster::RosterFetcher;

/// A cached content source.
pub trait Fetcher {
    type Request;
    type Output;

    fn fetch(&mut self, request: Self::Request) -> Result<Self::Output, FillError>;

    /// Drop cached state. The default fetcher keeps none.
    fn clear_cache(&mut self) {}
}
