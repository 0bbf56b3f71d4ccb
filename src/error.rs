// ⚠️ Pricing Errors
// Hard failures only. Business-rule outcomes (rule mismatch, RBD fail) are
// status values, never errors.

use thiserror::Error;

/// Errors raised while pricing a transaction
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PricingError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Exchange rate not available: {from} - {to}")]
    RateNotFound { from: String, to: String },

    #[error("NUC rate not available for currency {0}")]
    NucNotFound(String),

    #[error("Unknown currency: {0}")]
    UnknownCurrency(String),

    #[error("BSR double override error: sales currency {0} same as override currency")]
    DoubleOverride(String),

    #[error("Unknown fare indicator: {0}")]
    UnknownFareIndicator(char),

    #[error("Negative fare amount: {0:.2}")]
    NegativeFare(f64),

    #[error("Unknown location: {0}")]
    UnknownLocation(String),

    #[error("Data access error: {0}")]
    DataAccess(String),
}

impl From<rusqlite::Error> for PricingError {
    fn from(err: rusqlite::Error) -> Self {
        PricingError::DataAccess(err.to_string())
    }
}

impl From<serde_json::Error> for PricingError {
    fn from(err: serde_json::Error) -> Self {
        PricingError::DataAccess(err.to_string())
    }
}

pub type PricingResult<T> = Result<T, PricingError>;
