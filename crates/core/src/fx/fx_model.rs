//! FX domain models.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A stored daily exchange rate for one currency pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeRate {
    pub id: String,
    pub from_currency: String,
    pub to_currency: String,
    pub date: NaiveDate,
    pub rate: Decimal,
}

impl ExchangeRate {
    pub fn new(from: &str, to: &str, date: NaiveDate, rate: Decimal) -> Self {
        Self {
            id: format!("{}{}_{}", from, to, date),
            from_currency: from.to_string(),
            to_currency: to.to_string(),
            date,
            rate,
        }
    }
}
