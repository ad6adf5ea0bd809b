//! Holdings reconstruction - daily per-security quantity, price, and value.

pub mod holdings_calculator;
mod holdings_model;
mod holdings_traits;

pub use holdings_calculator::*;
pub use holdings_model::*;
pub use holdings_traits::*;
