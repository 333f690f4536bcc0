/*
 * BugHunter Core - Repair Action Mining Engine
 *
 * Feature-First Hexagonal Architecture:
 * - shared/      : Tree model (Ast, Correspondence, EditScript, Diff)
 * - features/    : Vertical slices (repair_actions, donor_pool, cache)
 * - pipeline/    : Detector dependency DAG
 * - config/      : Miner configuration (YAML)
 * - usecases/    : Per-fix analysis entry point
 *
 * Inputs are materialised by an external tree differ; everything here is a
 * single-threaded, synchronous computation over read-only trees.
 */

#![allow(clippy::module_inception)] // Module naming intentional
#![allow(clippy::new_without_default)] // Default impl not always needed

// ═══════════════════════════════════════════════════════════════════════════
// Module Exports - Feature-First Architecture
// ═══════════════════════════════════════════════════════════════════════════

/// Shared models and utilities
pub mod shared;

/// Feature modules (repair actions, donor pools, caches)
pub mod features;

/// Detector pipeline ordering
pub mod pipeline;

/// Configuration system
pub mod config;

/// Error types
pub mod errors;

/// Usecase layer (FixAnalysisService)
pub mod usecases;

// ═══════════════════════════════════════════════════════════════════════════
// Re-exports for Public API
// ═══════════════════════════════════════════════════════════════════════════

pub use errors::{BughunterError, Result};
pub use features::donor_pool::{DonorPool, DonorPoolSet, PoolName, PoolVariant};
pub use features::repair_actions::{
    ActionKind, ActionSet, MineOutcome, RepairAction, RepairActionMiner, RepairActionRegistry,
};
pub use shared::models::{
    Ast, Correspondence, Diff, DiffId, EditOp, HashMode, NodeId, NodeKind, Role, StructuralHash,
    TreeNode,
};
