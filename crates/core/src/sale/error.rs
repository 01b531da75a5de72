//! Sale error types.

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors raised while pricing a sale.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SaleError {
    /// Discount percentage outside 0..=100.
    #[error("Discount must be between 0 and 100 percent, got {0}")]
    InvalidDiscount(Decimal),

    /// Execution type is neither plan nor execute.
    #[error("Unknown execution type: {0}")]
    UnknownExecutionType(String),
}

impl SaleError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidDiscount(_) => "INVALID_DISCOUNT",
            Self::UnknownExecutionType(_) => "UNKNOWN_EXECUTION_TYPE",
        }
    }

    /// Returns the HTTP status code.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        400
    }
}
