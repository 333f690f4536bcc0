//! Repair Action Mining
//!
//! Turns the low-level edit script of a diff into semantically classified
//! repair actions ("replaced loop guard", "inserted else branch", ...).
//!
//! # Hexagonal Architecture
//!
//! ```text
//! application/ (registry + cache-aware miner, entry point)
//!           ↓
//! domain/ (ActionKind, RepairAction, ActionSet)
//!           ↓
//! infrastructure/ (one detector per category, action cache)
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use bughunter_core::features::repair_actions::{RepairActionMiner, MineOutcome};
//!
//! let miner = RepairActionMiner::standard()?;
//! if let MineOutcome::Analyzed { actions, .. } = miner.mine(&diff)? {
//!     for guard in actions.replace_loop_guards() { /* ... */ }
//! }
//! ```

pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::{MineOutcome, MineStats, RepairActionMiner, RepairActionRegistry};
pub use domain::{ActionKind, ActionSet, ActionVariant, RepairAction, Side};

#[doc(hidden)]
pub use infrastructure::{ActionCache, DetectionContext, RepairActionDetector, TreeFingerprint};
