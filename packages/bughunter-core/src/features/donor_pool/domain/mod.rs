//! Donor pool domain types

mod donor_pool;
mod pool_name;

pub use donor_pool::{DonorPool, DonorPoolSet, PoolVariant};
pub use pool_name::PoolName;
