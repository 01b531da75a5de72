//! Lot domain types and quantity arithmetic.
//!
//! The arithmetic here mirrors the guarded updates the store applies, so
//! `qty` and `float_qty` can never go negative and every move between them
//! conserves the lot's total.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tradeledger_shared::types::{
    EntrySpecifier, GoodsReceivedNoteId, InventoryTransferId, ItemId, WarehouseId,
};

use super::error::InventoryError;

/// Identifying key of a lot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LotKey {
    /// Token minted when the lot was created.
    pub entry_specifier: EntrySpecifier,
    /// Warehouse holding the lot.
    pub warehouse_id: WarehouseId,
    /// Item in the lot.
    pub item_id: ItemId,
    /// Receiving document the stock originally arrived on.
    pub goods_received_note_id: GoodsReceivedNoteId,
    /// Transfer that created this lot, if it was transferred in.
    pub inventory_transfer_id: Option<InventoryTransferId>,
}

/// A lot of current stock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lot {
    /// Identifying key.
    pub key: LotKey,
    /// On-hand quantity, available for sale or transfer.
    pub qty: i32,
    /// Quantity reserved by in-flight transfers.
    pub float_qty: i32,
    /// Unit cost before landed costs.
    pub cost_price: Decimal,
    /// Unit landed-cost add-on.
    pub landed_costs: Decimal,
    /// Unit valuation (`cost_price + landed_costs`).
    pub price: Decimal,
    /// Creation time of the originating receiving document.
    pub received_at: DateTime<Utc>,
}

impl Lot {
    /// Total units in the lot, on hand plus in flight.
    #[must_use]
    pub fn total_qty(&self) -> i64 {
        i64::from(self.qty) + i64::from(self.float_qty)
    }

    /// Reserves on-hand units for a transfer (`qty -= n; float_qty += n`).
    ///
    /// # Errors
    ///
    /// Returns `LotUnderflow` if fewer than `n` units are on hand.
    pub fn reserve(&mut self, n: i32) -> Result<(), InventoryError> {
        self.ensure(n, self.qty)?;
        self.qty -= n;
        self.float_qty += n;
        Ok(())
    }

    /// Releases reserved units that left the warehouse (`float_qty -= n`).
    ///
    /// # Errors
    ///
    /// Returns `LotUnderflow` if fewer than `n` units are in flight.
    pub fn release(&mut self, n: i32) -> Result<(), InventoryError> {
        self.ensure(n, self.float_qty)?;
        self.float_qty -= n;
        Ok(())
    }

    /// Returns reserved units to on-hand (`qty += n; float_qty -= n`).
    ///
    /// # Errors
    ///
    /// Returns `LotUnderflow` if fewer than `n` units are in flight.
    pub fn restore(&mut self, n: i32) -> Result<(), InventoryError> {
        self.ensure(n, self.float_qty)?;
        self.float_qty -= n;
        self.qty += n;
        Ok(())
    }

    /// Removes sold units from on-hand (`qty -= n`).
    ///
    /// # Errors
    ///
    /// Returns `LotUnderflow` if fewer than `n` units are on hand.
    pub fn issue(&mut self, n: i32) -> Result<(), InventoryError> {
        self.ensure(n, self.qty)?;
        self.qty -= n;
        Ok(())
    }

    fn ensure(&self, n: i32, bucket: i32) -> Result<(), InventoryError> {
        if n < 0 || n > bucket {
            return Err(InventoryError::LotUnderflow {
                requested: n,
                qty: self.qty,
                float_qty: self.float_qty,
            });
        }
        Ok(())
    }
}

/// One step of a draw plan: take `qty` units from `lot`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Draw {
    /// Lot drawn from.
    pub lot: LotKey,
    /// Units drawn.
    pub qty: i32,
    /// Lot unit cost before landed costs.
    pub cost_price: Decimal,
    /// Lot unit landed-cost add-on.
    pub landed_costs: Decimal,
    /// Lot unit valuation.
    pub price: Decimal,
}

impl Draw {
    /// Draw `qty` units from `lot`, copying its cost basis.
    #[must_use]
    pub fn from_lot(lot: &Lot, qty: i32) -> Self {
        Self {
            lot: lot.key,
            qty,
            cost_price: lot.cost_price,
            landed_costs: lot.landed_costs,
            price: lot.price,
        }
    }

    /// Cost of the drawn units before landed costs.
    #[must_use]
    pub fn extended_cost(&self) -> Decimal {
        self.cost_price * Decimal::from(self.qty)
    }

    /// Valuation of the drawn units.
    #[must_use]
    pub fn extended_price(&self) -> Decimal {
        self.price * Decimal::from(self.qty)
    }
}
