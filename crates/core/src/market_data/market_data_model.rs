//! Market data domain models.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A security price on a specific date, in the security's listing currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityPrice {
    pub security_id: String,
    pub date: NaiveDate,
    pub price: Decimal,
    pub currency: String,
}
