//! Requested stock lines.

use serde::{Deserialize, Serialize};
use tradeledger_shared::types::ItemId;

use super::error::InventoryError;

/// One requested line: an item and how many units of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockRequest {
    /// Requested item.
    pub item_id: ItemId,
    /// Requested whole units.
    pub qty: i32,
}

impl StockRequest {
    /// Creates a request line.
    #[must_use]
    pub const fn new(item_id: ItemId, qty: i32) -> Self {
        Self { item_id, qty }
    }

    /// Validates a batch of request lines.
    ///
    /// # Errors
    ///
    /// Returns an error if the batch is empty or any line asks for fewer than
    /// one unit.
    pub fn validate_all(requests: &[Self]) -> Result<(), InventoryError> {
        if requests.is_empty() {
            return Err(InventoryError::EmptyRequest);
        }
        match requests.iter().find(|r| r.qty < 1) {
            Some(r) => Err(InventoryError::InvalidQuantity {
                item_id: r.item_id,
                qty: r.qty,
            }),
            None => Ok(()),
        }
    }
}
