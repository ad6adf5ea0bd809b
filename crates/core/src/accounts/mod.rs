//! Accounts module - domain models and repository traits.

mod accounts_model;
mod accounts_traits;

pub use accounts_model::*;
pub use accounts_traits::*;

#[cfg(test)]
mod accounts_model_tests;
