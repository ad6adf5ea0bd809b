//! Repository traits for accounts.

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::{Account, AccountStatus};
use crate::errors::Result;

/// Trait defining the contract for account repository operations.
#[async_trait]
pub trait AccountRepositoryTrait: Send + Sync {
    fn get_by_id(&self, account_id: &str) -> Result<Account>;

    fn list_active(&self) -> Result<Vec<Account>>;

    /// Set the sync status, attaching an error message for `Error` status.
    async fn set_status(
        &self,
        account_id: &str,
        status: AccountStatus,
        message: Option<String>,
    ) -> Result<()>;

    /// Refresh the cached aggregate fields from the latest reconstructed
    /// records, in the account's native currency. Must be applied in the
    /// same transaction as the record upserts so a concurrent reader never
    /// sees a half-updated aggregate.
    async fn update_cached_balances(
        &self,
        account_id: &str,
        balance: Decimal,
        cash_balance: Decimal,
        holdings_value: Decimal,
    ) -> Result<()>;

    /// Mark a successful sync: status `Ok`, clear the last error, and
    /// advance `last_synced_date`.
    async fn mark_synced(&self, account_id: &str, as_of: NaiveDate) -> Result<()>;
}
