//! Purchasing error types.

use rust_decimal::Decimal;
use thiserror::Error;
use tradeledger_shared::types::ItemId;

/// Errors raised by purchase order and receipt validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PurchasingError {
    // ========== Validation Errors ==========
    /// Document has no lines.
    #[error("Document must have at least one line")]
    NoLines,

    /// Line quantity below one.
    #[error("Quantity for item {item_id} must be at least 1, got {qty}")]
    InvalidQuantity {
        /// Line item.
        item_id: ItemId,
        /// Offending quantity.
        qty: i32,
    },

    /// Unit price below zero.
    #[error("Unit price for item {item_id} cannot be negative: {unit_price}")]
    NegativePrice {
        /// Line item.
        item_id: ItemId,
        /// Offending price.
        unit_price: Decimal,
    },

    /// Discount out of range or larger than the amount discounted.
    #[error("Invalid discount {discount}: discounted total would be {total}")]
    InvalidDiscount {
        /// Discount value.
        discount: Decimal,
        /// Resulting total.
        total: Decimal,
    },

    /// Discount type string is not recognised.
    #[error("Unknown discount type: {0}")]
    UnknownDiscountType(String),

    // ========== Reconciliation Errors ==========
    /// Cancelling more than is still outstanding on the order line.
    #[error("Cannot cancel {requested} units, only {outstanding} outstanding")]
    CancelExceedsOutstanding {
        /// Units asked to cancel.
        requested: i32,
        /// Units neither received nor cancelled.
        outstanding: i32,
    },
}

impl PurchasingError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NoLines => "NO_LINES",
            Self::InvalidQuantity { .. } => "INVALID_QUANTITY",
            Self::NegativePrice { .. } => "NEGATIVE_PRICE",
            Self::InvalidDiscount { .. } => "INVALID_DISCOUNT",
            Self::UnknownDiscountType(_) => "UNKNOWN_DISCOUNT_TYPE",
            Self::CancelExceedsOutstanding { .. } => "CANCEL_EXCEEDS_OUTSTANDING",
        }
    }

    /// Returns the HTTP status code.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::CancelExceedsOutstanding { .. } => 422,
            _ => 400,
        }
    }
}
