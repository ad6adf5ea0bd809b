//! Core error types for the Tidemark engine.
//!
//! This module defines database-agnostic error types. Storage-specific errors
//! are converted to these types by the storage layer.

use chrono::{NaiveDate, ParseError as ChronoParseError};
use thiserror::Error;

use crate::fx::FxError;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the reconstruction engine.
///
/// Database-specific errors are wrapped in string form to keep this type
/// database-agnostic.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Reconstruction failed: {0}")]
    Calculation(#[from] CalculatorError),

    #[error("Fx error: {0}")]
    Fx(#[from] FxError),

    #[error("Sync error: {0}")]
    Sync(#[from] SyncError),

    #[error("Repository error: {0}")]
    Repository(String),

    #[error("Version conflict: {0}")]
    Conflict(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl Error {
    /// True when the caller may safely retry the failed operation.
    /// Only optimistic-version conflicts qualify.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Conflict(_))
    }
}

/// Errors that occur during balance or holdings reconstruction.
#[derive(Error, Debug)]
pub enum CalculatorError {
    #[error("Invalid ledger entry: {0}")]
    InvalidEntry(String),

    #[error("No price found for security {security_id} on date {date}")]
    MissingPrice {
        security_id: String,
        date: NaiveDate,
    },

    #[error("Calculation failed: {0}")]
    Calculation(String),
}

/// Validation errors for user input and data parsing.
///
/// Structural invariant violations (duplicate valuations, inverted windows)
/// are rejected here, before they can reach the reconstruction loop.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Required field '{0}' is missing")]
    MissingField(String),

    #[error("A valuation already exists for account {account_id} on {date}")]
    DuplicateValuation {
        account_id: String,
        date: NaiveDate,
    },

    #[error("Invalid sync window: start {start} is after end {end}")]
    InvalidWindow { start: NaiveDate, end: NaiveDate },

    #[error("Failed to parse decimal number: {0}")]
    DecimalParse(#[from] rust_decimal::Error),

    #[error("Failed to parse date/time: {0}")]
    DateTimeParse(#[from] ChronoParseError),
}

/// Errors raised by the sync tree state machine.
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Unknown sync node: {0}")]
    UnknownNode(String),

    #[error("Sync already in progress for {0}")]
    AlreadyRunning(String),

    #[error("Sync aborted: {0}")]
    Aborted(String),
}

// === From implementations for common error types ===

impl From<rust_decimal::Error> for Error {
    fn from(err: rust_decimal::Error) -> Self {
        Error::Validation(ValidationError::DecimalParse(err))
    }
}

impl From<ChronoParseError> for Error {
    fn from(err: ChronoParseError) -> Self {
        Error::Validation(ValidationError::DateTimeParse(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Validation(ValidationError::InvalidInput(err.to_string()))
    }
}

impl From<Error> for String {
    fn from(err: Error) -> Self {
        err.to_string()
    }
}
