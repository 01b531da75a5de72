//! Transfer coordinator: the two-phase float protocol.
//!
//! Phase one moves the drawn quantity of each source lot from on-hand into
//! float. Phase two resolves the transfer exactly once: approval releases
//! the float and opens lots at the destination, rejection returns the float
//! to on-hand.

use chrono::Utc;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction, DbBackend, DbErr,
    EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
    prelude::DateTimeWithTimeZone, sea_query::Expr,
};
use tracing::{debug, info, instrument, warn};
use tradeledger_core::{
    inventory::{Lot, LotKey, StockRequest},
    transfer::{LineEffect, TransferAction, TransferResolution, TransferService, TransferStatus},
};
use tradeledger_shared::types::{
    EntrySpecifier, GoodsReceivedNoteId, InventoryTransferId, ItemId, UserId, WarehouseId,
};
use uuid::Uuid;

use crate::entities::{
    inventory_transfer, inventory_transfer_item,
    sea_orm_active_enums::TransferResolution as StoredResolution,
};
use crate::error::OperationError;
use crate::repositories::{idempotency, lot};

/// Input for creating a transfer.
#[derive(Debug, Clone)]
pub struct CreateTransferInput {
    /// Requesting user.
    pub user_id: UserId,
    /// Source warehouse.
    pub from_warehouse_id: WarehouseId,
    /// Destination warehouse.
    pub to_warehouse_id: WarehouseId,
    /// Requested items.
    pub lines: Vec<StockRequest>,
}

/// Input for resolving a transfer.
#[derive(Debug, Clone)]
pub struct TransferActionInput {
    /// Client retry token.
    pub request_id: Option<String>,
    /// Transfer to resolve.
    pub transfer_id: InventoryTransferId,
    /// Acting user.
    pub user_id: UserId,
    /// Chosen resolution.
    pub resolution: TransferResolution,
    /// Free-text remarks.
    pub remarks: Option<String>,
}

/// What a transfer action did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferActionOutcome {
    /// This call resolved the transfer.
    Resolved {
        /// Applied resolution.
        resolution: TransferResolution,
        /// Lots opened at the destination; empty on rejection.
        destination_lots: Vec<Lot>,
    },
    /// The transfer was resolved earlier; nothing changed.
    AlreadyResolved,
    /// The request id was seen before; nothing changed.
    Duplicate,
}

/// Transfer header with its lines.
#[derive(Debug, Clone)]
pub struct TransferWithLines {
    /// Transfer header.
    pub transfer: inventory_transfer::Model,
    /// One line per lot drawn.
    pub lines: Vec<inventory_transfer_item::Model>,
}

impl TransferWithLines {
    /// Current lifecycle state.
    #[must_use]
    pub fn status(&self) -> TransferStatus {
        TransferStatus::from_resolved_by(self.transfer.resolved_by.map(UserId::from_uuid))
    }
}

/// Repository for inventory transfers.
#[derive(Debug, Clone)]
pub struct TransferRepository {
    db: DatabaseConnection,
}

impl TransferRepository {
    /// Creates a new transfer repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a pending transfer and moves the drawn stock into float.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Source and destination are the same warehouse
    /// - A line has a quantity below one
    /// - An item is missing from the source warehouse or short of stock
    /// - A lot update does not affect exactly one row
    /// - Database operation fails
    #[instrument(skip(self, input), fields(from = %input.from_warehouse_id, to = %input.to_warehouse_id))]
    pub async fn create_transfer(
        &self,
        input: CreateTransferInput,
    ) -> Result<TransferWithLines, OperationError> {
        TransferService::validate_request(
            input.from_warehouse_id,
            input.to_warehouse_id,
            &input.lines,
        )?;

        let txn = self.db.begin().await?;

        let draws = lot::plan_from_warehouse(&txn, input.from_warehouse_id, &input.lines).await?;

        let transfer_id = InventoryTransferId::new();
        let header = inventory_transfer::ActiveModel {
            id: Set(transfer_id.into_inner()),
            user_id: Set(input.user_id.into_inner()),
            from_warehouse_id: Set(input.from_warehouse_id.into_inner()),
            to_warehouse_id: Set(input.to_warehouse_id.into_inner()),
            resolution: Set(None),
            resolved_by: Set(None),
            resolved_on: Set(None),
            resolution_remarks: Set(None),
            created_at: Set(Utc::now().into()),
        };
        inventory_transfer::Entity::insert(header).exec(&txn).await?;

        for draw in &draws {
            let line = inventory_transfer_item::ActiveModel {
                id: Set(Uuid::now_v7()),
                inventory_transfer_id: Set(transfer_id.into_inner()),
                entry_specifier: Set(draw.lot.entry_specifier.into_inner()),
                prev_inventory_transfer_id: Set(draw
                    .lot
                    .inventory_transfer_id
                    .map(InventoryTransferId::into_inner)),
                goods_received_note_id: Set(draw.lot.goods_received_note_id.into_inner()),
                item_id: Set(draw.lot.item_id.into_inner()),
                qty: Set(draw.qty),
            };
            inventory_transfer_item::Entity::insert(line).exec(&txn).await?;
            lot::reserve(&txn, &draw.lot, draw.qty).await?;
        }

        txn.commit().await?;

        info!(%transfer_id, draws = draws.len(), "Inventory transfer created");
        self.find_transfer(transfer_id)
            .await?
            .ok_or_else(|| OperationError::NotFound(format!("inventory transfer {transfer_id}")))
    }

    /// Resolves a pending transfer.
    ///
    /// Resolving is claimed with a conditional update on `resolved_by IS
    /// NULL`, so of several concurrent or repeated calls exactly one mutates
    /// lots. The others report `AlreadyResolved`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The transfer does not exist
    /// - A source lot no longer matches its transfer line
    /// - A lot update does not affect exactly one row
    /// - Database operation fails
    #[instrument(skip(self, input), fields(transfer_id = %input.transfer_id, resolution = %input.resolution))]
    pub async fn action_transfer(
        &self,
        input: TransferActionInput,
    ) -> Result<TransferActionOutcome, OperationError> {
        let request_id = input.request_id.as_deref().filter(|id| !id.is_empty());
        if let Some(request_id) = request_id
            && idempotency::request_exists(&self.db, request_id).await?
        {
            info!(request_id, "Request dropped");
            return Ok(TransferActionOutcome::Duplicate);
        }

        let txn = self.db.begin().await?;

        if let Some(request_id) = request_id
            && idempotency::record_request(&txn, request_id).await?.is_duplicate()
        {
            return Ok(TransferActionOutcome::Duplicate);
        }

        let header = find_header(&txn, input.transfer_id).await?.ok_or_else(|| {
            OperationError::NotFound(format!("inventory transfer {}", input.transfer_id))
        })?;
        let status = TransferStatus::from_resolved_by(header.resolved_by.map(UserId::from_uuid));

        let TransferAction::Resolve {
            resolution,
            effect,
            resolved_by,
            resolved_on,
            remarks,
        } = TransferService::resolve(status, input.resolution, input.user_id, input.remarks)
        else {
            txn.commit().await?;
            info!("Transfer already resolved");
            return Ok(TransferActionOutcome::AlreadyResolved);
        };

        let claimed = inventory_transfer::Entity::update_many()
            .col_expr(
                inventory_transfer::Column::Resolution,
                Expr::value(StoredResolution::from(resolution)),
            )
            .col_expr(
                inventory_transfer::Column::ResolvedBy,
                Expr::value(resolved_by.into_inner()),
            )
            .col_expr(
                inventory_transfer::Column::ResolvedOn,
                Expr::value(DateTimeWithTimeZone::from(resolved_on)),
            )
            .col_expr(inventory_transfer::Column::ResolutionRemarks, Expr::value(remarks))
            .filter(inventory_transfer::Column::Id.eq(header.id))
            .filter(inventory_transfer::Column::ResolvedBy.is_null())
            .exec(&txn)
            .await?;
        if claimed.rows_affected == 0 {
            txn.commit().await?;
            warn!("Transfer resolved by a concurrent request");
            return Ok(TransferActionOutcome::AlreadyResolved);
        }

        let destination_lots = apply_lines(&txn, &header, effect).await?;

        txn.commit().await?;

        info!(
            destination_lots = destination_lots.len(),
            "Inventory transfer resolved"
        );
        Ok(TransferActionOutcome::Resolved {
            resolution,
            destination_lots,
        })
    }

    /// Finds a transfer with its lines.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_transfer(
        &self,
        transfer_id: InventoryTransferId,
    ) -> Result<Option<TransferWithLines>, DbErr> {
        let Some(transfer) = inventory_transfer::Entity::find_by_id(transfer_id.into_inner())
            .one(&self.db)
            .await?
        else {
            return Ok(None);
        };
        let lines = transfer_lines(&self.db, transfer.id).await?;
        Ok(Some(TransferWithLines { transfer, lines }))
    }
}

async fn find_header(
    txn: &DatabaseTransaction,
    transfer_id: InventoryTransferId,
) -> Result<Option<inventory_transfer::Model>, DbErr> {
    let mut query = inventory_transfer::Entity::find_by_id(transfer_id.into_inner());
    if txn.get_database_backend() == DbBackend::Postgres {
        query = query.lock_exclusive();
    }
    query.one(txn).await
}

async fn transfer_lines<C>(
    conn: &C,
    transfer_id: Uuid,
) -> Result<Vec<inventory_transfer_item::Model>, DbErr>
where
    C: ConnectionTrait,
{
    inventory_transfer_item::Entity::find()
        .filter(inventory_transfer_item::Column::InventoryTransferId.eq(transfer_id))
        .order_by_asc(inventory_transfer_item::Column::Id)
        .all(conn)
        .await
}

/// Applies the resolution to every line's source lot.
async fn apply_lines(
    txn: &DatabaseTransaction,
    header: &inventory_transfer::Model,
    effect: LineEffect,
) -> Result<Vec<Lot>, OperationError> {
    let transfer_id = InventoryTransferId::from_uuid(header.id);
    let from_warehouse = WarehouseId::from_uuid(header.from_warehouse_id);
    let to_warehouse = WarehouseId::from_uuid(header.to_warehouse_id);

    let mut opened = Vec::new();
    for line in transfer_lines(txn, header.id).await? {
        let key = LotKey {
            entry_specifier: EntrySpecifier::from_uuid(line.entry_specifier),
            warehouse_id: from_warehouse,
            item_id: ItemId::from_uuid(line.item_id),
            goods_received_note_id: GoodsReceivedNoteId::from_uuid(line.goods_received_note_id),
            inventory_transfer_id: line
                .prev_inventory_transfer_id
                .map(InventoryTransferId::from_uuid),
        };

        let mut source = lot::find_lot(txn, key.entry_specifier)
            .await?
            .filter(|l| l.key == key)
            .ok_or_else(|| {
                OperationError::ConsistencyViolation(format!(
                    "source lot {} of transfer {transfer_id} no longer matches its line",
                    key.entry_specifier
                ))
            })?;

        let destination =
            TransferService::apply_line(effect, &mut source, line.qty, to_warehouse, transfer_id)?;
        match effect {
            LineEffect::MoveToDestination => lot::release(txn, &key, line.qty).await?,
            LineEffect::RestoreToSource => lot::restore(txn, &key, line.qty).await?,
        }

        if let Some(destination) = destination {
            lot::insert_lot(txn, &destination).await?;
            debug!(
                source = %key.entry_specifier,
                destination = %destination.key.entry_specifier,
                qty = line.qty,
                "Lot moved"
            );
            opened.push(destination);
        } else {
            debug!(source = %key.entry_specifier, qty = line.qty, "Float restored");
        }
    }
    Ok(opened)
}
