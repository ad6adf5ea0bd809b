//! Repository traits for balance records.

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::BalanceRecord;
use crate::errors::Result;

/// Repository trait for managing reconstructed balance records.
///
/// Records are exclusively owned by their account and fully replaced (upsert
/// by natural key) on each reconstruction pass. Readers always see the last
/// fully-committed pass, never a partial one.
#[async_trait]
pub trait BalanceRepositoryTrait: Send + Sync {
    fn get_records(
        &self,
        account_id: &str,
        currency: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<BalanceRecord>>;

    /// The most recent record for the account in the given currency.
    fn get_latest(&self, account_id: &str, currency: &str) -> Result<Option<BalanceRecord>>;

    /// Atomically replace the account's series in one currency.
    async fn replace_for_account(
        &self,
        account_id: &str,
        currency: &str,
        records: &[BalanceRecord],
    ) -> Result<()>;

    /// Delete records dated strictly before `cutoff`, across all currencies.
    /// Returns the number of deleted records.
    async fn delete_before(&self, account_id: &str, cutoff: NaiveDate) -> Result<usize>;

    /// Apply a single corrective delta to one record outside full
    /// recomputation. Compares `expected_version` against the stored
    /// version and returns `Error::Conflict` on mismatch; the caller
    /// decides retry policy.
    async fn apply_adjustment(
        &self,
        account_id: &str,
        date: NaiveDate,
        currency: &str,
        delta: Decimal,
        expected_version: i64,
    ) -> Result<BalanceRecord>;
}
