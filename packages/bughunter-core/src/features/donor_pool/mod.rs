//! Donor Pools
//!
//! Partitions the nodes of a diff's before-tree into named, content-addressed
//! pools of mutation ingredients. Each diff has two pool sets: `abstract`
//! (identifiers normalised away) and `concrete`.
//!
//! # Hexagonal Architecture
//!
//! ```text
//! application/ (DonorPoolService - cache-aware entry point)
//!           ↓
//! domain/ (PoolName, DonorPool, DonorPoolSet)
//!           ↓
//! infrastructure/ (single-pass builder, pool cache)
//! ```

pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::{DonorPoolOutcome, DonorPoolService};
pub use domain::{DonorPool, DonorPoolSet, PoolName, PoolVariant};

#[doc(hidden)]
pub use infrastructure::{DonorPoolBuilder, PoolBuildOutcome, PoolCache};
