//! Holdings reconstruction over a pre-loaded entry set.
//!
//! Mirrors the balance calculator but tracks a per-security quantity map
//! driven only by trade entries, then gap-fills each security's series so a
//! quiet position still shows a flat line instead of disappearing.

use chrono::NaiveDate;
use log::debug;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use crate::accounts::Account;
use crate::calendar::TradingCalendarTrait;
use crate::errors::Result;
use crate::fx::CurrencyConverter;
use crate::ledger::{EntryKind, LedgerEntry};
use crate::market_data::PriceSourceTrait;
use crate::portfolio::gap_filler;
use crate::portfolio::holdings::HoldingRecord;
use crate::portfolio::{Direction, ReconstructionWarning};
use crate::utils::time_utils::get_days_between;

/// Result of a holdings pass: the reconstructed records plus any non-fatal
/// issues encountered along the way.
#[derive(Debug, Clone)]
pub struct HoldingsReconstruction {
    pub records: Vec<HoldingRecord>,
    pub warnings: Vec<ReconstructionWarning>,
}

impl HoldingsReconstruction {
    pub fn empty() -> Self {
        Self {
            records: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// A dated trade delta extracted from a ledger entry.
struct TradeDelta<'a> {
    security_id: &'a str,
    quantity: Decimal,
}

/// Calculates the daily per-security position series for one account.
pub struct HoldingsCalculator {
    prices: Arc<dyn PriceSourceTrait>,
    converter: Arc<CurrencyConverter>,
}

impl HoldingsCalculator {
    pub fn new(prices: Arc<dyn PriceSourceTrait>, converter: Arc<CurrencyConverter>) -> Self {
        Self { prices, converter }
    }

    /// Reconstructs the account's holdings series from its trade entries.
    ///
    /// Forward mode accumulates signed quantities from zero; reverse mode
    /// starts from the provider-reported `current_quantities` and subtracts
    /// each trade's effect walking backward. A security with no resolvable
    /// price on a date contributes no record for that date. After
    /// generation, each security's series is gap-filled independently from
    /// its first observed date through `as_of`.
    pub fn calculate(
        &self,
        account: &Account,
        entries: &[LedgerEntry],
        direction: Direction,
        as_of: NaiveDate,
        current_quantities: &HashMap<String, Decimal>,
        calendar: &dyn TradingCalendarTrait,
    ) -> Result<HoldingsReconstruction> {
        let trades = trade_deltas_by_date(entries);
        if trades.is_empty() && current_quantities.is_empty() {
            return Ok(HoldingsReconstruction::empty());
        }
        debug!(
            "Reconstructing holdings for account {} ({:?}) through {}",
            account.id, direction, as_of
        );

        let first = trades.keys().next().copied().unwrap_or(as_of);
        let mut pass = MissingDataTracker::default();

        let sparse = match direction {
            Direction::Forward => {
                self.walk_forward(account, &trades, first, as_of, calendar, &mut pass)?
            }
            Direction::Reverse => self.walk_reverse(
                account,
                &trades,
                first,
                as_of,
                current_quantities,
                calendar,
                &mut pass,
            )?,
        };

        let records = fill_per_security(sparse, &pass.held_until, calendar);
        Ok(HoldingsReconstruction {
            records,
            warnings: pass.into_warnings(account),
        })
    }

    fn walk_forward(
        &self,
        account: &Account,
        trades: &BTreeMap<NaiveDate, Vec<TradeDelta<'_>>>,
        first: NaiveDate,
        as_of: NaiveDate,
        calendar: &dyn TradingCalendarTrait,
        pass: &mut MissingDataTracker,
    ) -> Result<Vec<HoldingRecord>> {
        let mut quantities: BTreeMap<String, Decimal> = BTreeMap::new();
        let mut records = Vec::new();

        for date in get_days_between(first, as_of) {
            if let Some(day_trades) = trades.get(&date) {
                for trade in day_trades {
                    *quantities
                        .entry(trade.security_id.to_string())
                        .or_insert(Decimal::ZERO) += trade.quantity;
                }
            }
            self.snapshot_day(account, &quantities, date, calendar, &mut records, pass)?;
        }

        Ok(records)
    }

    fn walk_reverse(
        &self,
        account: &Account,
        trades: &BTreeMap<NaiveDate, Vec<TradeDelta<'_>>>,
        first: NaiveDate,
        as_of: NaiveDate,
        current_quantities: &HashMap<String, Decimal>,
        calendar: &dyn TradingCalendarTrait,
        pass: &mut MissingDataTracker,
    ) -> Result<Vec<HoldingRecord>> {
        let mut quantities: BTreeMap<String, Decimal> = current_quantities
            .iter()
            .map(|(security_id, quantity)| (security_id.clone(), *quantity))
            .collect();
        let mut records = Vec::new();

        let mut dates = get_days_between(first, as_of);
        dates.reverse();

        for date in dates {
            self.snapshot_day(account, &quantities, date, calendar, &mut records, pass)?;
            // Undo the day's trades to obtain the previous day's positions.
            if let Some(day_trades) = trades.get(&date) {
                for trade in day_trades {
                    *quantities
                        .entry(trade.security_id.to_string())
                        .or_insert(Decimal::ZERO) -= trade.quantity;
                }
            }
        }

        records.reverse();
        Ok(records)
    }

    /// Emits one record per nonzero position on `date`, skipping securities
    /// with no resolvable price or exchange rate.
    fn snapshot_day(
        &self,
        account: &Account,
        quantities: &BTreeMap<String, Decimal>,
        date: NaiveDate,
        calendar: &dyn TradingCalendarTrait,
        records: &mut Vec<HoldingRecord>,
        pass: &mut MissingDataTracker,
    ) -> Result<()> {
        for (security_id, quantity) in quantities {
            if quantity.is_zero() {
                continue;
            }
            pass.held_on(security_id, date);
            match self.resolve_price(security_id, date, &account.currency)? {
                PriceResolution::Resolved(price) => {
                    records.push(HoldingRecord::new(
                        &account.id,
                        security_id,
                        date,
                        &account.currency,
                        *quantity,
                        price,
                    ));
                }
                PriceResolution::MissingPrice => {
                    debug!(
                        "No price for {} on {}; omitting holding record",
                        security_id, date
                    );
                    // A quiet weekend or holiday is the gap filler's job,
                    // not a data-quality problem.
                    if !calendar.is_non_activity_day(date) {
                        pass.missing_price(security_id, date);
                    }
                }
                PriceResolution::MissingRate(currency) => {
                    if !calendar.is_non_activity_day(date) {
                        pass.missing_rate(security_id, &currency, date);
                    }
                }
            }
        }
        Ok(())
    }

    /// Resolves a price in the account currency for a security/date.
    fn resolve_price(
        &self,
        security_id: &str,
        date: NaiveDate,
        account_currency: &str,
    ) -> Result<PriceResolution> {
        let Some(price) = self.prices.price(security_id, date)? else {
            return Ok(PriceResolution::MissingPrice);
        };

        if price.currency == account_currency {
            return Ok(PriceResolution::Resolved(price.price));
        }

        let (rate, found) = self
            .converter
            .rate(&price.currency, account_currency, date)?;
        if found {
            Ok(PriceResolution::Resolved(price.price * rate))
        } else {
            Ok(PriceResolution::MissingRate(price.currency))
        }
    }
}

enum PriceResolution {
    Resolved(Decimal),
    MissingPrice,
    MissingRate(String),
}

fn trade_deltas_by_date(entries: &[LedgerEntry]) -> BTreeMap<NaiveDate, Vec<TradeDelta<'_>>> {
    let mut by_date: BTreeMap<NaiveDate, Vec<TradeDelta<'_>>> = BTreeMap::new();
    for entry in entries {
        if let EntryKind::Trade {
            security_id,
            quantity,
            ..
        } = &entry.kind
        {
            by_date.entry(entry.date).or_default().push(TradeDelta {
                security_id,
                quantity: *quantity,
            });
        }
    }
    by_date
}

/// Gap-fills each security independently, from its first observed date
/// through the last date it was actually held - never past a sale to zero.
fn fill_per_security(
    sparse: Vec<HoldingRecord>,
    held_until: &BTreeMap<String, NaiveDate>,
    calendar: &dyn TradingCalendarTrait,
) -> Vec<HoldingRecord> {
    let mut by_security: BTreeMap<String, Vec<HoldingRecord>> = BTreeMap::new();
    for record in sparse {
        by_security
            .entry(record.security_id.clone())
            .or_default()
            .push(record);
    }

    let mut dense = Vec::new();
    for (security_id, series) in &by_security {
        let first = match series.iter().map(|r| r.date).min() {
            Some(first) => first,
            None => continue,
        };
        let end = held_until
            .get(security_id)
            .copied()
            .unwrap_or_else(|| series.iter().map(|r| r.date).max().unwrap_or(first));
        dense.extend(gap_filler::fill(series, first, end, calendar));
    }

    dense.sort_by(|a, b| {
        a.date
            .cmp(&b.date)
            .then_with(|| a.security_id.cmp(&b.security_id))
    });
    dense
}

/// Accumulates missing-data sites during a pass and condenses them into one
/// warning per security at the end.
#[derive(Default)]
struct MissingDataTracker {
    missing_prices: BTreeMap<String, Vec<NaiveDate>>,
    missing_rates: BTreeMap<(String, String), Vec<NaiveDate>>,
    /// Latest date each security had a nonzero position, price or not.
    held_until: BTreeMap<String, NaiveDate>,
}

impl MissingDataTracker {
    fn held_on(&mut self, security_id: &str, date: NaiveDate) {
        self.held_until
            .entry(security_id.to_string())
            .and_modify(|latest| *latest = (*latest).max(date))
            .or_insert(date);
    }

    fn missing_price(&mut self, security_id: &str, date: NaiveDate) {
        self.missing_prices
            .entry(security_id.to_string())
            .or_default()
            .push(date);
    }

    fn missing_rate(&mut self, security_id: &str, currency: &str, date: NaiveDate) {
        self.missing_rates
            .entry((security_id.to_string(), currency.to_string()))
            .or_default()
            .push(date);
    }

    fn into_warnings(self, account: &Account) -> Vec<ReconstructionWarning> {
        let mut warnings = Vec::new();
        for (security_id, dates) in self.missing_prices {
            warnings.push(ReconstructionWarning {
                account_id: account.id.clone(),
                security_id: Some(security_id),
                date: dates.first().copied(),
                message: format!(
                    "No price for {} date(s); holding records omitted",
                    dates.len()
                ),
            });
        }
        for ((security_id, currency), dates) in self.missing_rates {
            warnings.push(ReconstructionWarning {
                account_id: account.id.clone(),
                security_id: Some(security_id),
                date: dates.first().copied(),
                message: format!(
                    "No exchange rate {}->{} for {} date(s); holding records omitted",
                    currency, account.currency, dates.len()
                ),
            });
        }
        warnings
    }
}
