//! Repair action domain types

mod action_kind;
mod action_set;
pub mod repair_action;

pub use action_kind::ActionKind;
pub use action_set::ActionSet;
pub use repair_action::{ActionVariant, RepairAction, Side};
