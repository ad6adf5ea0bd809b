//! Balance reconstruction over a pre-loaded entry set.
//!
//! Two algorithms, selected by data-source trust: forward chronological
//! accumulation for manually tracked accounts, and reverse-chronological
//! derivation for linked accounts where the provider's current balance is
//! ground truth.

use chrono::{Duration, NaiveDate};
use log::debug;
use rust_decimal::Decimal;
use std::collections::HashMap;

use crate::accounts::Account;
use crate::errors::{CalculatorError, Error, Result};
use crate::ledger::{sort_for_forward, sort_for_reverse, LedgerEntry};
use crate::portfolio::balances::BalanceRecord;
use crate::portfolio::Direction;
use crate::utils::time_utils::get_days_between;

/// Total holdings value per date in the account's native currency,
/// pre-computed from the holdings pass. Dates absent from the map carry no
/// holdings value.
pub type HoldingsValueMap = HashMap<NaiveDate, Decimal>;

/// Reconstructs the account's daily balance series from its ledger entries.
///
/// Emits one record per date from the oldest entry date through `as_of`,
/// chronologically ordered in both directions. A date with a valuation entry
/// anchors the series: `balance` is the asserted amount and `cash_balance`
/// backs out the holdings value, overriding whatever the accumulated deltas
/// would have produced.
pub fn calculate_balances(
    account: &Account,
    entries: &[LedgerEntry],
    holdings_values: &HoldingsValueMap,
    direction: Direction,
    as_of: NaiveDate,
) -> Result<Vec<BalanceRecord>> {
    if entries.is_empty() {
        return Ok(Vec::new());
    }
    debug!(
        "Reconstructing balances for account {} ({:?}) through {}",
        account.id, direction, as_of
    );

    match direction {
        Direction::Forward => calculate_forward(account, entries, holdings_values, as_of),
        Direction::Reverse => calculate_reverse(account, entries, holdings_values, as_of),
    }
}

fn first_entry_date(entries: &[LedgerEntry]) -> Result<NaiveDate> {
    entries
        .iter()
        .map(|e| e.date)
        .min()
        .ok_or_else(|| Error::Calculation(CalculatorError::Calculation("empty entry set".into())))
}

fn group_by_date(entries: &[LedgerEntry]) -> HashMap<NaiveDate, Vec<&LedgerEntry>> {
    let mut by_date: HashMap<NaiveDate, Vec<&LedgerEntry>> = HashMap::new();
    for entry in entries {
        by_date.entry(entry.date).or_default().push(entry);
    }
    by_date
}

fn valuation_on<'a>(day_entries: Option<&Vec<&'a LedgerEntry>>) -> Option<&'a LedgerEntry> {
    day_entries.and_then(|entries| entries.iter().find(|e| e.kind.is_valuation()).copied())
}

fn flow_delta(account: &Account, day_entries: Option<&Vec<&LedgerEntry>>) -> Decimal {
    day_entries
        .map(|entries| {
            entries
                .iter()
                .filter(|e| !e.kind.is_valuation())
                .map(|e| e.signed_flow(account.classification))
                .sum()
        })
        .unwrap_or(Decimal::ZERO)
}

fn holdings_value_on(holdings_values: &HoldingsValueMap, date: NaiveDate) -> Decimal {
    holdings_values.get(&date).copied().unwrap_or(Decimal::ZERO)
}

/// Chronological accumulation from a zero seed one day before the oldest
/// entry. The seed date initializes carried state and emits no record.
fn calculate_forward(
    account: &Account,
    entries: &[LedgerEntry],
    holdings_values: &HoldingsValueMap,
    as_of: NaiveDate,
) -> Result<Vec<BalanceRecord>> {
    let mut sorted = entries.to_vec();
    sort_for_forward(&mut sorted);

    let first = first_entry_date(&sorted)?;
    let seed = first - Duration::days(1);
    let by_date = group_by_date(&sorted);

    let mut prior_cash = Decimal::ZERO;
    let mut records = Vec::new();

    for date in get_days_between(seed, as_of) {
        let day_entries = by_date.get(&date);
        let holdings_value = holdings_value_on(holdings_values, date);

        let (cash, balance) = match valuation_on(day_entries) {
            Some(valuation) => (valuation.amount - holdings_value, valuation.amount),
            None => {
                let cash = prior_cash + flow_delta(account, day_entries);
                (cash, cash + holdings_value)
            }
        };

        if date > seed {
            records.push(BalanceRecord::new(
                &account.id,
                date,
                &account.currency,
                balance,
                cash,
            ));
        }
        prior_cash = cash;
    }

    Ok(records)
}

/// Reverse-chronological derivation seeded from the account's current cash
/// balance. Each day's end-of-day state is emitted, then the day's flows are
/// undone to obtain the previous day's state. Output is reversed back to
/// chronological order before returning.
fn calculate_reverse(
    account: &Account,
    entries: &[LedgerEntry],
    holdings_values: &HoldingsValueMap,
    as_of: NaiveDate,
) -> Result<Vec<BalanceRecord>> {
    let mut sorted = entries.to_vec();
    sort_for_reverse(&mut sorted);

    let first = first_entry_date(&sorted)?;
    let by_date = group_by_date(&sorted);
    let mut cash = account.cash_balance;
    let mut records = Vec::new();

    let mut dates = get_days_between(first, as_of);
    dates.reverse();

    for date in dates {
        let day_entries = by_date.get(&date);
        let holdings_value = holdings_value_on(holdings_values, date);

        let (day_cash, balance) = match valuation_on(day_entries) {
            Some(valuation) => (valuation.amount - holdings_value, valuation.amount),
            None => (cash, cash + holdings_value),
        };

        records.push(BalanceRecord::new(
            &account.id,
            date,
            &account.currency,
            balance,
            day_cash,
        ));

        // The state carried to the previous day is this day's opening cash:
        // end-of-day value with the day's flows undone.
        cash = day_cash - flow_delta(account, day_entries);
    }

    records.reverse();
    Ok(records)
}

/// Sums each date's holdings value from a chronological holdings record set.
pub fn holdings_values_by_date(
    records: &[crate::portfolio::holdings::HoldingRecord],
) -> HoldingsValueMap {
    let mut map: HoldingsValueMap = HashMap::new();
    for record in records {
        *map.entry(record.date).or_insert(Decimal::ZERO) += record.value;
    }
    map
}
