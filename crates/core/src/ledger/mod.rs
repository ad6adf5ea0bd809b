//! Ledger module - dated entry models, ordering rules, and the entry feed.

mod ledger_model;
mod ledger_traits;

pub use ledger_model::*;
pub use ledger_traits::*;
