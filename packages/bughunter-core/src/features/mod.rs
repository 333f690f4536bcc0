//! Feature modules
//!
//! - repair_actions: edit script → classified repair actions
//! - donor_pool: AST → content-addressed fragment pools
//! - cache: on-disk layout and atomic JSON persistence shared by both

pub mod cache;
pub mod donor_pool;
pub mod repair_actions;
