//! Payment error types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;
use tradeledger_shared::types::BusinessPartnerId;

/// Errors raised by payment voucher validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PaymentError {
    /// Posting date precedes the current financial year.
    #[error("Posting date {date} does not fall within the financial year starting {year_start}")]
    OutsideFinancialYear {
        /// Requested posting date.
        date: NaiveDate,
        /// First day of the current financial year.
        year_start: NaiveDate,
    },

    /// Posting date is after today.
    #[error("Posting date {0} is in the future")]
    FuturePostingDate(NaiveDate),

    /// Payment amount is not positive.
    #[error("Payment amount must be positive, got {0}")]
    NonPositiveAmount(Decimal),

    /// No supplier allocations given.
    #[error("Payment must be allocated to at least one supplier")]
    NoAllocations,

    /// An allocation amount is not positive.
    #[error("Allocation to {business_partner_id} must be positive, got {amount}")]
    NonPositiveAllocation {
        /// Supplier.
        business_partner_id: BusinessPartnerId,
        /// Offending amount.
        amount: Decimal,
    },

    /// Allocations do not add up to the payment.
    #[error("Allocations total {allocated} but payment is {amount}")]
    AllocationMismatch {
        /// Payment amount.
        amount: Decimal,
        /// Sum of allocations.
        allocated: Decimal,
    },

    /// Financial year start month is not 1-12.
    #[error("Invalid financial year start month: {0}")]
    InvalidYearStartMonth(u32),
}

impl PaymentError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::OutsideFinancialYear { .. } => "OUTSIDE_FINANCIAL_YEAR",
            Self::FuturePostingDate(_) => "FUTURE_POSTING_DATE",
            Self::NonPositiveAmount(_) => "NON_POSITIVE_AMOUNT",
            Self::NoAllocations => "NO_ALLOCATIONS",
            Self::NonPositiveAllocation { .. } => "NON_POSITIVE_ALLOCATION",
            Self::AllocationMismatch { .. } => "ALLOCATION_MISMATCH",
            Self::InvalidYearStartMonth(_) => "INVALID_YEAR_START_MONTH",
        }
    }

    /// Returns the HTTP status code.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::InvalidYearStartMonth(_) => 500,
            _ => 400,
        }
    }
}
