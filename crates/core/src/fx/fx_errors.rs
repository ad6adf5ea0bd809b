use thiserror::Error;

/// Errors raised by FX rate resolution and conversion.
#[derive(Error, Debug)]
pub enum FxError {
    #[error("Exchange rate not found: {0}")]
    RateNotFound(String),

    #[error("Invalid exchange rate: {0}")]
    InvalidRate(String),

    #[error("Rate source error: {0}")]
    SourceFailure(String),
}
