//! Repository traits for ledger entries - the entry feed consumed by the
//! reconstruction pipeline.

use async_trait::async_trait;
use chrono::NaiveDate;

use super::{LedgerEntry, NewLedgerEntry};
use crate::errors::Result;

/// Trait defining the contract for the ledger entry feed.
#[async_trait]
pub trait EntryRepositoryTrait: Send + Sync {
    /// All entries for the account. Callers re-sort with the valuation
    /// tie-break rule for their iteration direction.
    fn list_entries(&self, account_id: &str) -> Result<Vec<LedgerEntry>>;

    /// The oldest entry date, which floors the reconstruction window.
    fn earliest_entry_date(&self, account_id: &str) -> Result<Option<NaiveDate>>;

    /// Insert a new entry. Implementations must enforce the one-valuation-
    /// per-date invariant via `check_valuation_uniqueness`.
    async fn add_entry(&self, new_entry: NewLedgerEntry) -> Result<LedgerEntry>;
}
