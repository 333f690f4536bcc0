//! On-disk caches
//!
//! Shared plumbing for the action cache and the donor-pool cache: the
//! directory layout keyed by diff identity, and JSON read / atomic write.
//! One writer per cache file is assumed; callers serialise per diff.

mod error;
mod json_store;
mod layout;

pub use error::{CacheError, CacheResult};
pub use json_store::{read_json, write_json_atomic};
pub use layout::CacheLayout;
