//! Repair action application layer
//!
//! Entry point for callers: build a [`RepairActionRegistry`] (validated
//! detector subset) and mine diffs through a [`RepairActionMiner`].

mod miner;
mod registry;

pub use miner::{MineOutcome, MineStats, RepairActionMiner};
pub use registry::RepairActionRegistry;
