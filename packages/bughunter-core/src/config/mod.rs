//! Configuration system
//!
//! A single YAML file (schema v1) selects the cache root, the enabled
//! detector categories, the donor pools, and which fixes are skipped.

mod error;
mod miner_config;

pub use error::{ConfigError, ConfigResult};
pub use miner_config::{FixFilter, MinerConfig, SUPPORTED_VERSIONS};
