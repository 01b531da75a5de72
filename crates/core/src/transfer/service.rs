//! Transfer state machine and lot arithmetic.

use chrono::Utc;
use tradeledger_shared::types::{EntrySpecifier, InventoryTransferId, UserId, WarehouseId};

use crate::inventory::{InventoryError, Lot, LotKey, StockRequest};

use super::error::TransferError;
use super::types::{LineEffect, TransferAction, TransferResolution, TransferStatus};

/// Stateless service validating transfer requests and resolutions.
pub struct TransferService;

impl TransferService {
    /// Validates a transfer request before any stock is read.
    ///
    /// # Errors
    ///
    /// - `SameWarehouse` if source and destination match
    /// - `Inventory(EmptyRequest | InvalidQuantity)` for bad lines
    pub fn validate_request(
        from_warehouse: WarehouseId,
        to_warehouse: WarehouseId,
        requests: &[StockRequest],
    ) -> Result<(), TransferError> {
        if from_warehouse == to_warehouse {
            return Err(TransferError::SameWarehouse(from_warehouse));
        }
        StockRequest::validate_all(requests)?;
        Ok(())
    }

    /// Decides what a resolution request does given the current status.
    ///
    /// A resolved transfer yields `AlreadyResolved` rather than an error so
    /// that retried or racing calls succeed without mutating lots again.
    #[must_use]
    pub fn resolve(
        status: TransferStatus,
        resolution: TransferResolution,
        resolved_by: UserId,
        remarks: Option<String>,
    ) -> TransferAction {
        match status {
            TransferStatus::Pending => TransferAction::Resolve {
                resolution,
                effect: resolution.line_effect(),
                resolved_by,
                resolved_on: Utc::now(),
                remarks: remarks.filter(|r| !r.trim().is_empty()),
            },
            TransferStatus::Resolved => TransferAction::AlreadyResolved,
        }
    }

    /// Applies one transfer line's resolution to the source lot.
    ///
    /// Returns the lot opened at the destination when stock moves.
    ///
    /// # Errors
    ///
    /// Returns `LotUnderflow` if the source lot holds less float than the line.
    pub fn apply_line(
        effect: LineEffect,
        source: &mut Lot,
        qty: i32,
        to_warehouse: WarehouseId,
        transfer_id: InventoryTransferId,
    ) -> Result<Option<Lot>, InventoryError> {
        match effect {
            LineEffect::MoveToDestination => {
                source.release(qty)?;
                Ok(Some(Self::destination_lot(source, qty, to_warehouse, transfer_id)))
            }
            LineEffect::RestoreToSource => {
                source.restore(qty)?;
                Ok(None)
            }
        }
    }

    /// Builds the lot a moved line opens at the destination.
    ///
    /// The new lot keeps the source's receiving document and cost basis,
    /// records this transfer as its origin, and gets a fresh entry specifier.
    #[must_use]
    pub fn destination_lot(
        source: &Lot,
        qty: i32,
        to_warehouse: WarehouseId,
        transfer_id: InventoryTransferId,
    ) -> Lot {
        Lot {
            key: LotKey {
                entry_specifier: EntrySpecifier::new(),
                warehouse_id: to_warehouse,
                item_id: source.key.item_id,
                goods_received_note_id: source.key.goods_received_note_id,
                inventory_transfer_id: Some(transfer_id),
            },
            qty,
            float_qty: 0,
            cost_price: source.cost_price,
            landed_costs: source.landed_costs,
            price: source.price,
            received_at: source.received_at,
        }
    }
}
