//! Inventory error types.

use thiserror::Error;
use tradeledger_shared::types::ItemId;

/// Errors raised by stock checks and lot arithmetic.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InventoryError {
    // ========== Validation Errors ==========
    /// Request carries no lines.
    #[error("At least one item must be requested")]
    EmptyRequest,

    /// Requested quantity is below one unit.
    #[error("Quantity for item {item_id} must be at least 1, got {qty}")]
    InvalidQuantity {
        /// Requested item.
        item_id: ItemId,
        /// Offending quantity.
        qty: i32,
    },

    // ========== Stock Errors ==========
    /// The warehouse holds no on-hand stock of the item.
    #[error("Item {0} does not exist in the warehouse")]
    ItemNotInWarehouse(ItemId),

    /// On-hand stock does not cover the request.
    #[error("Insufficient stock for item {item_id}: requested {requested}, available {available}")]
    InsufficientStock {
        /// Requested item.
        item_id: ItemId,
        /// Total quantity requested across all lines.
        requested: i64,
        /// Total on-hand quantity.
        available: i64,
    },

    // ========== Lot Arithmetic Errors ==========
    /// A lot mutation would drive `qty` or `float_qty` negative.
    #[error("Lot cannot cover {requested} units: qty {qty}, float {float_qty}")]
    LotUnderflow {
        /// Units the mutation needed.
        requested: i32,
        /// On-hand quantity at the time.
        qty: i32,
        /// Float quantity at the time.
        float_qty: i32,
    },
}

impl InventoryError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyRequest => "EMPTY_REQUEST",
            Self::InvalidQuantity { .. } => "INVALID_QUANTITY",
            Self::ItemNotInWarehouse(_) => "ITEM_NOT_IN_WAREHOUSE",
            Self::InsufficientStock { .. } => "INSUFFICIENT_STOCK",
            Self::LotUnderflow { .. } => "LOT_UNDERFLOW",
        }
    }

    /// Returns the HTTP status code.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::EmptyRequest | Self::InvalidQuantity { .. } => 400,
            Self::ItemNotInWarehouse(_) | Self::InsufficientStock { .. } => 422,
            Self::LotUnderflow { .. } => 500,
        }
    }
}
