//! Balance reconstruction - daily cash and total balance series.

pub mod balance_calculator;
mod balances_model;
mod balances_traits;

pub use balance_calculator::*;
pub use balances_model::*;
pub use balances_traits::*;
