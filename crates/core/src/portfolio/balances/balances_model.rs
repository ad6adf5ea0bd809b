//! Balance record domain models.

use chrono::{NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::portfolio::gap_filler::Carryable;

/// The reconstructed state of an account at the close of one day, in one
/// currency. One record per `(account, date, currency)`.
///
/// Produced only by the reconstructor; never hand-edited except through an
/// explicit valuation entry. `version` is the optimistic counter for the
/// direct incremental adjustment path outside full recomputation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceRecord {
    pub id: String,
    pub account_id: String,
    pub date: NaiveDate,
    pub currency: String,
    /// Total balance, including holdings value
    pub balance: Decimal,
    /// Balance excluding holdings value
    pub cash_balance: Decimal,
    pub version: i64,
    pub calculated_at: NaiveDateTime,
}

impl BalanceRecord {
    pub fn record_id(account_id: &str, date: NaiveDate, currency: &str) -> String {
        format!("{}_{}_{}", account_id, date, currency)
    }

    pub fn new(
        account_id: &str,
        date: NaiveDate,
        currency: &str,
        balance: Decimal,
        cash_balance: Decimal,
    ) -> Self {
        Self {
            id: Self::record_id(account_id, date, currency),
            account_id: account_id.to_string(),
            date,
            currency: currency.to_string(),
            balance,
            cash_balance,
            version: 0,
            calculated_at: Utc::now().naive_utc(),
        }
    }

    /// A copy of this record re-denominated in `currency`.
    pub fn converted_to(
        &self,
        currency: &str,
        balance: Decimal,
        cash_balance: Decimal,
    ) -> Self {
        Self {
            id: Self::record_id(&self.account_id, self.date, currency),
            currency: currency.to_string(),
            balance,
            cash_balance,
            ..self.clone()
        }
    }
}

impl Carryable for BalanceRecord {
    fn date(&self) -> NaiveDate {
        self.date
    }

    fn carried_to(&self, date: NaiveDate) -> Self {
        Self {
            id: Self::record_id(&self.account_id, date, &self.currency),
            date,
            ..self.clone()
        }
    }
}
