//! Sync module - the job-tree state machine and the per-account
//! recomputation orchestrator.

mod account_sync_service;
mod sync_node_model;
mod sync_traits;
mod sync_tree;

pub use account_sync_service::*;
pub use sync_node_model::*;
pub use sync_traits::*;
pub use sync_tree::*;
