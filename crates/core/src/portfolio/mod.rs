//! Portfolio module - balance and holdings reconstruction.

pub mod balances;
pub mod gap_filler;
pub mod holdings;

pub use balances::*;
pub use gap_filler::{fill, Carryable};
pub use holdings::*;

use serde::{Deserialize, Serialize};

use crate::accounts::Account;

/// Iteration direction of a reconstruction pass, selected by data-source
/// trust.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    /// Chronological accumulation from an assumed-correct starting point.
    /// Used for manually tracked accounts.
    Forward,
    /// Reverse-chronological derivation from an assumed-correct current
    /// value. Used for provider-linked accounts.
    Reverse,
}

impl Direction {
    pub fn for_account(account: &Account) -> Self {
        if account.is_linked() {
            Direction::Reverse
        } else {
            Direction::Forward
        }
    }
}

/// A non-fatal issue raised during reconstruction. Calculation continued,
/// but the affected dates carry reduced data quality.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconstructionWarning {
    pub account_id: String,
    pub security_id: Option<String>,
    pub date: Option<chrono::NaiveDate>,
    pub message: String,
}

impl std::fmt::Display for ReconstructionWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Account {}", self.account_id)?;
        if let Some(security_id) = &self.security_id {
            write!(f, ", security {}", security_id)?;
        }
        if let Some(date) = &self.date {
            write!(f, ", date {}", date)?;
        }
        write!(f, ": {}", self.message)
    }
}
