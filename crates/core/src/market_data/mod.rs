//! Market data module - security price models and lookup traits.

mod market_data_model;
mod market_data_traits;

pub use market_data_model::*;
pub use market_data_traits::*;
