//! Transfer error types.

use thiserror::Error;
use tradeledger_shared::types::WarehouseId;

use crate::inventory::InventoryError;

/// Errors raised by transfer validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransferError {
    /// Source and destination are the same warehouse.
    #[error("Cannot transfer from warehouse {0} to itself")]
    SameWarehouse(WarehouseId),

    /// Resolution string is not one of approved, provisional, rejected.
    #[error("Unknown transfer resolution: {0}")]
    UnknownResolution(String),

    /// Requested lines are invalid.
    #[error(transparent)]
    Inventory(#[from] InventoryError),
}

impl TransferError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::SameWarehouse(_) => "SAME_WAREHOUSE",
            Self::UnknownResolution(_) => "UNKNOWN_RESOLUTION",
            Self::Inventory(e) => e.error_code(),
        }
    }

    /// Returns the HTTP status code.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::SameWarehouse(_) | Self::UnknownResolution(_) => 400,
            Self::Inventory(e) => e.http_status_code(),
        }
    }
}
