//! Traits for market data lookup.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::HashMap;

use super::SecurityPrice;
use crate::errors::Result;

/// Contract the engine requires from a market-data provider: a price for a
/// `(security, date)` pair, `None` when no price is resolvable for that date.
pub trait PriceSourceTrait: Send + Sync {
    fn price(&self, security_id: &str, date: NaiveDate) -> Result<Option<SecurityPrice>>;
}

/// Current position quantities reported by a linked provider, used to seed
/// reverse holdings reconstruction.
pub trait PositionSourceTrait: Send + Sync {
    fn current_quantities(&self, account_id: &str) -> Result<HashMap<String, Decimal>>;
}
