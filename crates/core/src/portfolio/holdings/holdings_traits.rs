//! Repository traits for holding records.

use async_trait::async_trait;
use chrono::NaiveDate;

use super::HoldingRecord;
use crate::errors::Result;

/// Repository trait for managing reconstructed holding records.
///
/// Records are exclusively owned by their account and fully replaced on each
/// reconstruction pass, keyed by `(account, security, date, currency)`.
#[async_trait]
pub trait HoldingRepositoryTrait: Send + Sync {
    fn get_records(
        &self,
        account_id: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<HoldingRecord>>;

    /// The most recent record of each security held by the account.
    fn get_latest_for_account(&self, account_id: &str) -> Result<Vec<HoldingRecord>>;

    /// Atomically replace the account's full holdings series.
    async fn replace_for_account(
        &self,
        account_id: &str,
        records: &[HoldingRecord],
    ) -> Result<()>;

    /// Delete records dated strictly before `cutoff`. Returns the number of
    /// deleted records.
    async fn delete_before(&self, account_id: &str, cutoff: NaiveDate) -> Result<usize>;
}
