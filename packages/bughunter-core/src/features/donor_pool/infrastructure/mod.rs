//! Donor pool infrastructure: tree traversal and persistence

mod builder;
mod pool_cache;

pub use builder::{DonorPoolBuilder, PoolBuildOutcome};
pub use pool_cache::PoolCache;
