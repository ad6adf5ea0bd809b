//! Holding record domain models.

use chrono::{NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::portfolio::gap_filler::Carryable;

/// The reconstructed position in one security at the close of one day.
/// One record per `(account, security, date, currency)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoldingRecord {
    pub id: String,
    pub account_id: String,
    pub security_id: String,
    pub date: NaiveDate,
    pub currency: String,
    pub quantity: Decimal,
    pub price_per_unit: Decimal,
    pub value: Decimal,
    pub calculated_at: NaiveDateTime,
}

impl HoldingRecord {
    pub fn record_id(account_id: &str, security_id: &str, date: NaiveDate) -> String {
        format!("{}_{}_{}", account_id, security_id, date)
    }

    pub fn new(
        account_id: &str,
        security_id: &str,
        date: NaiveDate,
        currency: &str,
        quantity: Decimal,
        price_per_unit: Decimal,
    ) -> Self {
        Self {
            id: Self::record_id(account_id, security_id, date),
            account_id: account_id.to_string(),
            security_id: security_id.to_string(),
            date,
            currency: currency.to_string(),
            quantity,
            price_per_unit,
            value: quantity * price_per_unit,
            calculated_at: Utc::now().naive_utc(),
        }
    }
}

impl Carryable for HoldingRecord {
    fn date(&self) -> NaiveDate {
        self.date
    }

    /// Clones the position forward onto a quiet date. The quantity carries
    /// unchanged; the price may be refreshed independently by a market-data
    /// collaborator.
    fn carried_to(&self, date: NaiveDate) -> Self {
        Self {
            id: Self::record_id(&self.account_id, &self.security_id, date),
            date,
            ..self.clone()
        }
    }
}
