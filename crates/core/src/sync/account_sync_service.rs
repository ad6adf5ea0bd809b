//! Per-account sync orchestration.
//!
//! Sequences holdings reconstruction, balance reconstruction, reporting-
//! currency conversion, stale-record purge, and cached-aggregate refresh for
//! one account. Concurrency lives one layer up in the sync tree; within an
//! account the pipeline is strictly sequential because total balance depends
//! on freshly computed holdings.

use async_trait::async_trait;
use chrono::{Duration, NaiveDate};
use log::{debug, warn};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use super::{SyncOutcome, SyncWindow, Syncable, SyncableRef};
use crate::accounts::{Account, AccountRepositoryTrait, AccountStatus};
use crate::calendar::TradingCalendarTrait;
use crate::errors::Result;
use crate::fx::CurrencyConverter;
use crate::ledger::EntryRepositoryTrait;
use crate::market_data::{PositionSourceTrait, PriceSourceTrait};
use crate::portfolio::balances::{
    calculate_balances, holdings_values_by_date, BalanceRepositoryTrait,
};
use crate::portfolio::holdings::{HoldingRepositoryTrait, HoldingsCalculator};
use crate::portfolio::{Direction, ReconstructionWarning};

/// Orchestrates one account's recomputation from its ledger entries.
pub struct AccountSyncService {
    accounts: Arc<dyn AccountRepositoryTrait>,
    entries: Arc<dyn EntryRepositoryTrait>,
    balances: Arc<dyn BalanceRepositoryTrait>,
    holdings: Arc<dyn HoldingRepositoryTrait>,
    positions: Arc<dyn PositionSourceTrait>,
    converter: Arc<CurrencyConverter>,
    holdings_calculator: HoldingsCalculator,
    calendar: Arc<dyn TradingCalendarTrait>,
    reporting_currency: Arc<RwLock<String>>,
}

impl AccountSyncService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        accounts: Arc<dyn AccountRepositoryTrait>,
        entries: Arc<dyn EntryRepositoryTrait>,
        balances: Arc<dyn BalanceRepositoryTrait>,
        holdings: Arc<dyn HoldingRepositoryTrait>,
        positions: Arc<dyn PositionSourceTrait>,
        prices: Arc<dyn PriceSourceTrait>,
        converter: Arc<CurrencyConverter>,
        calendar: Arc<dyn TradingCalendarTrait>,
        reporting_currency: Arc<RwLock<String>>,
    ) -> Self {
        let holdings_calculator = HoldingsCalculator::new(prices, converter.clone());
        Self {
            accounts,
            entries,
            balances,
            holdings,
            positions,
            converter,
            holdings_calculator,
            calendar,
            reporting_currency,
        }
    }

    /// Recomputes the account's balance and holdings series through `as_of`.
    ///
    /// `window_start` means "recompute from at least this date forward"; the
    /// pipeline recomputes from the account's full history so valuation
    /// anchors and the reverse seed stay consistent.
    ///
    /// Any error aborts the pipeline before the purge, leaving previously
    /// persisted records untouched; the account lands in `Error` status and
    /// `last_synced_date` does not advance.
    pub async fn sync_account(
        &self,
        account_id: &str,
        window_start: Option<NaiveDate>,
        as_of: NaiveDate,
    ) -> Result<SyncOutcome> {
        let account = self.accounts.get_by_id(account_id)?;
        self.accounts
            .set_status(account_id, AccountStatus::Syncing, None)
            .await?;

        match self.run_pipeline(&account, window_start, as_of).await {
            Ok(outcome) => {
                self.accounts.mark_synced(account_id, as_of).await?;
                Ok(outcome)
            }
            Err(e) => {
                self.accounts
                    .set_status(account_id, AccountStatus::Error, Some(e.to_string()))
                    .await?;
                Err(e)
            }
        }
    }

    async fn run_pipeline(
        &self,
        account: &Account,
        window_start: Option<NaiveDate>,
        as_of: NaiveDate,
    ) -> Result<SyncOutcome> {
        let entries = self.entries.list_entries(&account.id)?;
        if entries.is_empty() {
            debug!("Account {} has no ledger entries; nothing to sync", account.id);
            return Ok(SyncOutcome::default());
        }

        let direction = Direction::for_account(account);
        if let Some(start) = window_start {
            debug!(
                "Sync for account {} requested from {}; recomputing full history ({:?})",
                account.id, start, direction
            );
        }

        // 1. Holdings first: total balance includes holdings value.
        let current_quantities = if direction == Direction::Reverse {
            self.positions.current_quantities(&account.id)?
        } else {
            HashMap::new()
        };
        let holdings_pass = self.holdings_calculator.calculate(
            account,
            &entries,
            direction,
            as_of,
            &current_quantities,
            self.calendar.as_ref(),
        )?;
        let mut warnings = holdings_pass.warnings.clone();

        // 2. Balances over the same entry set.
        let holdings_values = holdings_values_by_date(&holdings_pass.records);
        let balance_records =
            calculate_balances(account, &entries, &holdings_values, direction, as_of)?;

        self.holdings
            .replace_for_account(&account.id, &holdings_pass.records)
            .await?;
        self.balances
            .replace_for_account(&account.id, &account.currency, &balance_records)
            .await?;

        // 3. Reporting-currency conversion. A single unresolvable date
        // aborts the whole converted sub-series rather than persisting a
        // partially-converted one that lies about totals.
        let reporting = self.reporting_currency.read().unwrap().clone();
        if account.currency != reporting {
            let (converted, missing_dates) = self
                .converter
                .convert_balance_series(&balance_records, &reporting)?;
            if missing_dates.is_empty() {
                self.balances
                    .replace_for_account(&account.id, &reporting, &converted)
                    .await?;
            } else {
                warn!(
                    "Missing {}->{} exchange rates for {} date(s); skipping converted series for account {}",
                    account.currency,
                    reporting,
                    missing_dates.len(),
                    account.id
                );
                warnings.push(ReconstructionWarning {
                    account_id: account.id.clone(),
                    security_id: None,
                    date: missing_dates.first().copied(),
                    message: format!(
                        "Missing {}->{} exchange rates for {} date(s); converted balances skipped",
                        account.currency,
                        reporting,
                        missing_dates.len()
                    ),
                });
            }
        }

        // 4. Purge stale records only after both series are freshly written,
        // so a concurrent reader never observes a gap. The floor moves
        // forward as old entries are deleted; records left behind would
        // corrupt future reconciliation anchors.
        if let Some(earliest) = self.entries.earliest_entry_date(&account.id)? {
            let floor = earliest - Duration::days(1);
            self.balances.delete_before(&account.id, floor).await?;
            self.holdings.delete_before(&account.id, floor).await?;
        }

        // 5. Refresh the cached aggregates from the most recent records, in
        // the account's native currency.
        let latest_balance = self.balances.get_latest(&account.id, &account.currency)?;
        let balance_as_of = latest_balance.as_ref().map(|r| r.date);
        if let Some(latest) = latest_balance {
            let holdings_value: rust_decimal::Decimal = self
                .holdings
                .get_latest_for_account(&account.id)?
                .iter()
                .map(|r| r.value)
                .sum();
            self.accounts
                .update_cached_balances(
                    &account.id,
                    latest.balance,
                    latest.cash_balance,
                    holdings_value,
                )
                .await?;
        }

        Ok(SyncOutcome {
            balance_as_of,
            warnings,
        })
    }
}

/// Adapter running an account through the sync tree: the node's `perform`
/// lands here.
pub struct AccountSyncable {
    account_id: String,
    service: Arc<AccountSyncService>,
}

impl AccountSyncable {
    pub fn new(account_id: &str, service: Arc<AccountSyncService>) -> Self {
        Self {
            account_id: account_id.to_string(),
            service,
        }
    }
}

#[async_trait]
impl Syncable for AccountSyncable {
    fn syncable_ref(&self) -> SyncableRef {
        SyncableRef::account(&self.account_id)
    }

    async fn sync(&self, window: &SyncWindow) -> Result<SyncOutcome> {
        self.service
            .sync_account(&self.account_id, Some(window.start), window.end)
            .await
    }
}
