//! Traits for FX rate lookup.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::errors::Result;

/// Contract the engine requires from a rate provider: a daily rate for a
/// `(from, to, date)` triple, `None` when unresolved for that exact date.
pub trait RateSourceTrait: Send + Sync {
    fn rate(&self, from_currency: &str, to_currency: &str, date: NaiveDate)
        -> Result<Option<Decimal>>;
}
