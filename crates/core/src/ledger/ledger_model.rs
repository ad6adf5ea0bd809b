//! Ledger entry domain models.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::accounts::AccountClassification;
use crate::{errors::ValidationError, Error, Result};

/// Kind-specific payload of a ledger entry, matched exhaustively by the
/// calculators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntryKind {
    /// A plain cash movement.
    Transaction,
    /// A security trade. `quantity` is signed: positive for buys,
    /// negative for sells.
    Trade {
        #[serde(rename = "securityId")]
        security_id: String,
        quantity: Decimal,
        #[serde(rename = "pricePerUnit")]
        price_per_unit: Decimal,
    },
    /// An assertion of the account's true balance on this date, overriding
    /// whatever the accumulated deltas would have produced. At most one per
    /// `(account, date)`.
    Valuation,
}

impl EntryKind {
    pub fn is_valuation(&self) -> bool {
        matches!(self, EntryKind::Valuation)
    }

    pub fn is_trade(&self) -> bool {
        matches!(self, EntryKind::Trade { .. })
    }
}

/// A dated, signed monetary fact belonging to one account.
///
/// Entries are immutable facts; edits create a new version and trigger a
/// resync from the minimum of the old/new date.
///
/// Sign convention for `amount`: positive = outflow/expense for asset
/// accounts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEntry {
    pub id: String,
    pub account_id: String,
    pub date: NaiveDate,
    pub amount: Decimal,
    pub currency: String,
    #[serde(flatten)]
    pub kind: EntryKind,
    pub created_at: DateTime<Utc>,
}

impl LedgerEntry {
    /// The entry's contribution to the daily cash delta, under one
    /// consistent sign rule for both reconstruction directions:
    /// asset accounts lose cash on a positive amount, liability accounts
    /// grow their balance on it (a liability inflow increases balance).
    pub fn signed_flow(&self, classification: AccountClassification) -> Decimal {
        match classification {
            AccountClassification::Asset => -self.amount,
            AccountClassification::Liability => self.amount,
        }
    }
}

/// Sorts entries chronologically for forward reconstruction.
///
/// Within a date, valuations sort last so non-valuation entries still occur
/// "within" the day before the anchor re-asserts the balance. Ties break by
/// creation order.
pub fn sort_for_forward(entries: &mut [LedgerEntry]) {
    entries.sort_by(|a, b| {
        a.date
            .cmp(&b.date)
            .then_with(|| a.kind.is_valuation().cmp(&b.kind.is_valuation()))
            .then_with(|| a.created_at.cmp(&b.created_at))
    });
}

/// Sorts entries reverse-chronologically for reverse reconstruction.
/// Within a date, valuations sort first (the mirror of forward order).
pub fn sort_for_reverse(entries: &mut [LedgerEntry]) {
    entries.sort_by(|a, b| {
        b.date
            .cmp(&a.date)
            .then_with(|| b.kind.is_valuation().cmp(&a.kind.is_valuation()))
            .then_with(|| b.created_at.cmp(&a.created_at))
    });
}

/// Input model for creating a new ledger entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLedgerEntry {
    pub id: Option<String>,
    pub account_id: String,
    pub date: NaiveDate,
    pub amount: Decimal,
    pub currency: String,
    #[serde(flatten)]
    pub kind: EntryKind,
}

impl NewLedgerEntry {
    /// Validates the new entry data.
    pub fn validate(&self) -> Result<()> {
        if self.account_id.trim().is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "accountId".to_string(),
            )));
        }
        if self.currency.trim().is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "currency".to_string(),
            )));
        }
        if let EntryKind::Trade {
            security_id,
            quantity,
            ..
        } = &self.kind
        {
            if security_id.trim().is_empty() {
                return Err(Error::Validation(ValidationError::MissingField(
                    "securityId".to_string(),
                )));
            }
            if quantity.is_zero() {
                return Err(Error::Validation(ValidationError::InvalidInput(
                    "Trade quantity cannot be zero".to_string(),
                )));
            }
        }
        Ok(())
    }
}

/// Rejects a second valuation for the same `(account, date)`.
///
/// Repository implementations call this before inserting so the invariant
/// never reaches the reconstruction loop.
pub fn check_valuation_uniqueness(
    existing: &[LedgerEntry],
    candidate: &NewLedgerEntry,
) -> Result<()> {
    if !candidate.kind.is_valuation() {
        return Ok(());
    }
    let duplicate = existing
        .iter()
        .any(|e| e.kind.is_valuation() && e.date == candidate.date);
    if duplicate {
        return Err(Error::Validation(ValidationError::DuplicateValuation {
            account_id: candidate.account_id.clone(),
            date: candidate.date,
        }));
    }
    Ok(())
}
