//! Landed cost error types.

use rust_decimal::Decimal;
use thiserror::Error;
use tradeledger_shared::types::{ItemId, LandedCostTypeId};

/// Errors raised by landed cost allocation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LandedCostError {
    /// A cost entry carries a negative amount.
    #[error("Landed cost amount for type {cost_type_id} cannot be negative: {amount}")]
    NegativeAmount {
        /// Cost type of the entry.
        cost_type_id: LandedCostTypeId,
        /// The negative amount.
        amount: Decimal,
    },

    /// The receiving note has no lines to allocate over.
    #[error("Goods received note has no lines")]
    NoLines,

    /// A received line has no units.
    #[error("Received line for item {0} has zero quantity")]
    ZeroQuantity(ItemId),

    /// The receiving note's total value is zero, so no share can be computed.
    #[error("Goods received note total value is zero")]
    ZeroNoteValue,
}

impl LandedCostError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NegativeAmount { .. } => "NEGATIVE_LANDED_COST",
            Self::NoLines => "EMPTY_GOODS_RECEIVED_NOTE",
            Self::ZeroQuantity(_) => "ZERO_RECEIVED_QUANTITY",
            Self::ZeroNoteValue => "ZERO_NOTE_VALUE",
        }
    }

    /// Returns the HTTP status code.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::NegativeAmount { .. } => 400,
            Self::NoLines | Self::ZeroQuantity(_) | Self::ZeroNoteValue => 422,
        }
    }
}
