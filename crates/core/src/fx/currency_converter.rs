use chrono::NaiveDate;
use log::warn;
use rust_decimal::Decimal;
use std::sync::Arc;

use crate::errors::Result;
use crate::fx::RateSourceTrait;
use crate::portfolio::balances::BalanceRecord;

/// Resolves daily rates from a rate source and converts balance series into
/// a reporting currency.
///
/// The converter never guesses silently: when no rate exists for the exact
/// date it returns a fallback of `1` together with `found = false`, and the
/// caller decides the fallback policy.
pub struct CurrencyConverter {
    source: Arc<dyn RateSourceTrait>,
}

impl CurrencyConverter {
    pub fn new(source: Arc<dyn RateSourceTrait>) -> Self {
        Self { source }
    }

    /// Resolves the rate for a `(from, to, date)` triple.
    ///
    /// Returns `(1, true)` without lookup when `from == to`. When the direct
    /// pair is missing, falls back to the inverse pair before giving up with
    /// `(1, false)`.
    pub fn rate(&self, from: &str, to: &str, date: NaiveDate) -> Result<(Decimal, bool)> {
        if from == to {
            return Ok((Decimal::ONE, true));
        }

        if let Some(rate) = self.source.rate(from, to, date)? {
            return Ok((rate, true));
        }

        // Inverse lookup
        if let Some(inverse) = self.source.rate(to, from, date)? {
            if !inverse.is_zero() {
                return Ok((Decimal::ONE / inverse, true));
            }
        }

        warn!(
            "No exchange rate for {}->{} on {}. Inverse lookup also failed or rate was zero.",
            from, to, date
        );
        Ok((Decimal::ONE, false))
    }

    /// Converts every record of a balance series into `target_currency`,
    /// returning the converted series together with the list of dates that
    /// had no resolvable rate.
    ///
    /// The caller decides whether to abort the converted sub-series when any
    /// date is missing, rather than persist partially-converted totals.
    pub fn convert_balance_series(
        &self,
        records: &[BalanceRecord],
        target_currency: &str,
    ) -> Result<(Vec<BalanceRecord>, Vec<NaiveDate>)> {
        let mut converted = Vec::with_capacity(records.len());
        let mut missing_dates = Vec::new();

        for record in records {
            let (rate, found) = self.rate(&record.currency, target_currency, record.date)?;
            if !found {
                missing_dates.push(record.date);
                continue;
            }
            converted.push(record.converted_to(
                target_currency,
                record.balance * rate,
                record.cash_balance * rate,
            ));
        }

        Ok((converted, missing_dates))
    }
}
