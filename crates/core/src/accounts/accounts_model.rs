//! Account domain models.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{errors::ValidationError, Error, Result};

/// Classification of an account - determines the transaction sign convention.
///
/// For a liability account an inflow transaction increases the balance
/// rather than decreasing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountClassification {
    #[default]
    Asset,
    Liability,
}

/// Sync status of an account, surfaced to read models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountStatus {
    #[default]
    Ok,
    Syncing,
    Error,
}

/// Domain model representing an account in the system.
///
/// The cached `balance`/`cash_balance`/`holdings_value` fields hold the last
/// reconstructed values in the account's native currency and are refreshed
/// only by the sync pipeline, never hand-edited.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: String,
    pub name: String,
    pub classification: AccountClassification,
    pub currency: String,
    /// Provider name when the account is linked to a live data feed
    /// (e.g. 'SNAPTRADE', 'PLAID'). `None` for manually tracked accounts.
    pub provider: Option<String>,
    /// Account ID in the provider's system
    pub provider_account_id: Option<String>,
    /// Cached total balance, including holdings value
    pub balance: Decimal,
    /// Cached balance excluding holdings value
    pub cash_balance: Decimal,
    /// Cached total value of security holdings
    pub holdings_value: Decimal,
    pub last_synced_date: Option<NaiveDate>,
    pub status: AccountStatus,
    /// Message from the last failed sync, cleared on success
    pub last_sync_error: Option<String>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Account {
    /// True when the account is linked to a live data provider.
    ///
    /// Linked accounts treat the provider's current balance as ground truth
    /// and reconstruct history backward; manual accounts accumulate forward.
    pub fn is_linked(&self) -> bool {
        self.provider.is_some()
    }
}

/// Input model for creating a new account.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAccount {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub classification: AccountClassification,
    pub currency: String,
    pub provider: Option<String>,
    pub provider_account_id: Option<String>,
}

impl NewAccount {
    /// Validates the new account data.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Account name cannot be empty".to_string(),
            )));
        }
        if self.currency.trim().is_empty() {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Currency cannot be empty".to_string(),
            )));
        }
        Ok(())
    }
}
