//! Lot store: reads and guarded mutations of `current_stock`.
//!
//! Every mutation is a conditional `UPDATE` that only matches when the lot
//! holds enough quantity, followed by a check that exactly one row changed.
//! Anything else is a lost race or a corrupt key and aborts the caller's
//! transaction.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sea_orm::{
    ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, DbBackend, DbErr, EntityTrait,
    FromQueryResult, QueryFilter, QueryOrder, QuerySelect, Set,
    sea_query::{Expr, SimpleExpr},
};
use tracing::{debug, instrument};
use tradeledger_core::inventory::{
    Draw, Lot, LotKey, StockRequest, check_availability, plan_draws, requested_totals,
    sort_fifo,
};
use tradeledger_shared::types::{
    EntrySpecifier, GoodsReceivedNoteId, InventoryTransferId, ItemId, WarehouseId,
};
use uuid::Uuid;

use crate::entities::{current_stock, goods_received_note};
use crate::error::OperationError;

/// Read access to lots.
#[derive(Debug, Clone)]
pub struct LotRepository {
    db: DatabaseConnection,
}

impl LotRepository {
    /// Creates a new lot repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists every lot in a warehouse, including empty ones, in FIFO order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn warehouse_stock(&self, warehouse_id: WarehouseId) -> Result<Vec<Lot>, DbErr> {
        let rows = current_stock::Entity::find()
            .filter(current_stock::Column::WarehouseId.eq(warehouse_id.into_inner()))
            .order_by_asc(current_stock::Column::CreatedAt)
            .all(&self.db)
            .await?;
        let mut lots = with_received_at(&self.db, rows).await?;
        sort_fifo(&mut lots);
        Ok(lots)
    }

    /// Lists the lots of one item in a warehouse in FIFO order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn lots_for_item(
        &self,
        warehouse_id: WarehouseId,
        item_id: ItemId,
    ) -> Result<Vec<Lot>, DbErr> {
        let rows = current_stock::Entity::find()
            .filter(current_stock::Column::WarehouseId.eq(warehouse_id.into_inner()))
            .filter(current_stock::Column::ItemId.eq(item_id.into_inner()))
            .all(&self.db)
            .await?;
        let mut lots = with_received_at(&self.db, rows).await?;
        sort_fifo(&mut lots);
        Ok(lots)
    }

    /// Finds one lot by its entry specifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find(&self, entry_specifier: EntrySpecifier) -> Result<Option<Lot>, DbErr> {
        find_lot(&self.db, entry_specifier).await
    }

    /// Lists the lots opened from one goods received note, in any warehouse.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn lots_for_note(
        &self,
        goods_received_note_id: GoodsReceivedNoteId,
    ) -> Result<Vec<Lot>, DbErr> {
        let rows = current_stock::Entity::find()
            .filter(
                current_stock::Column::GoodsReceivedNoteId.eq(goods_received_note_id.into_inner()),
            )
            .order_by_asc(current_stock::Column::CreatedAt)
            .all(&self.db)
            .await?;
        with_received_at(&self.db, rows).await
    }
}

#[derive(Debug, FromQueryResult)]
struct ItemQty {
    item_id: Uuid,
    qty: i64,
}

/// On-hand quantity per requested item, counting only lots with stock.
///
/// Items with no such lot are absent from the map.
pub(crate) async fn available_quantities<C>(
    conn: &C,
    warehouse_id: WarehouseId,
    item_ids: &[ItemId],
) -> Result<HashMap<ItemId, i64>, DbErr>
where
    C: ConnectionTrait,
{
    let ids: Vec<Uuid> = item_ids.iter().map(|id| id.into_inner()).collect();
    let rows = current_stock::Entity::find()
        .select_only()
        .column(current_stock::Column::ItemId)
        .column_as(Expr::col(current_stock::Column::Qty).sum(), "qty")
        .filter(current_stock::Column::WarehouseId.eq(warehouse_id.into_inner()))
        .filter(current_stock::Column::ItemId.is_in(ids))
        .filter(current_stock::Column::Qty.gt(0))
        .group_by(current_stock::Column::ItemId)
        .into_model::<ItemQty>()
        .all(conn)
        .await?;

    Ok(rows
        .into_iter()
        .map(|row| (ItemId::from_uuid(row.item_id), row.qty))
        .collect())
}

/// Loads the lots that can serve the requested items, grouped by item.
///
/// On Postgres the rows are locked `FOR UPDATE` until the caller's
/// transaction ends.
pub(crate) async fn fifo_candidates<C>(
    conn: &C,
    warehouse_id: WarehouseId,
    item_ids: &[ItemId],
) -> Result<HashMap<ItemId, Vec<Lot>>, DbErr>
where
    C: ConnectionTrait,
{
    let ids: Vec<Uuid> = item_ids.iter().map(|id| id.into_inner()).collect();
    let mut query = current_stock::Entity::find()
        .filter(current_stock::Column::WarehouseId.eq(warehouse_id.into_inner()))
        .filter(current_stock::Column::ItemId.is_in(ids))
        .filter(current_stock::Column::Qty.gt(0));
    if conn.get_database_backend() == DbBackend::Postgres {
        query = query.lock_exclusive();
    }
    let rows = query.all(conn).await?;

    let mut grouped: HashMap<ItemId, Vec<Lot>> = HashMap::new();
    for lot in with_received_at(conn, rows).await? {
        grouped.entry(lot.key.item_id).or_default().push(lot);
    }
    Ok(grouped)
}

/// Plans FIFO draws for a batch of request lines against one warehouse.
///
/// Runs the aggregate availability check first so a missing item or a
/// short item fails before any lot is read for drawing.
#[instrument(skip(conn, requests), fields(lines = requests.len()))]
pub(crate) async fn plan_from_warehouse<C>(
    conn: &C,
    warehouse_id: WarehouseId,
    requests: &[StockRequest],
) -> Result<Vec<Draw>, OperationError>
where
    C: ConnectionTrait,
{
    StockRequest::validate_all(requests)?;
    let item_ids: Vec<ItemId> = requested_totals(requests)
        .into_iter()
        .map(|(item_id, _)| item_id)
        .collect();

    let available = available_quantities(conn, warehouse_id, &item_ids).await?;
    check_availability(requests, &available)?;

    let candidates = fifo_candidates(conn, warehouse_id, &item_ids).await?;
    let draws = plan_draws(requests, &candidates)?;
    debug!(?draws, "Draw plan");
    Ok(draws)
}

/// Moves `qty` of a lot from on-hand into float.
pub(crate) async fn reserve<C>(conn: &C, key: &LotKey, qty: i32) -> Result<(), OperationError>
where
    C: ConnectionTrait,
{
    let result = current_stock::Entity::update_many()
        .col_expr(current_stock::Column::Qty, Expr::col(current_stock::Column::Qty).sub(qty))
        .col_expr(
            current_stock::Column::FloatQty,
            Expr::col(current_stock::Column::FloatQty).add(qty),
        )
        .filter(key_condition(key))
        .filter(current_stock::Column::Qty.gte(qty))
        .exec(conn)
        .await?;
    expect_one_row("reserve lot", key, result.rows_affected)
}

/// Removes `qty` from a lot's float once it has moved elsewhere.
pub(crate) async fn release<C>(conn: &C, key: &LotKey, qty: i32) -> Result<(), OperationError>
where
    C: ConnectionTrait,
{
    let result = current_stock::Entity::update_many()
        .col_expr(
            current_stock::Column::FloatQty,
            Expr::col(current_stock::Column::FloatQty).sub(qty),
        )
        .filter(key_condition(key))
        .filter(current_stock::Column::FloatQty.gte(qty))
        .exec(conn)
        .await?;
    expect_one_row("release lot float", key, result.rows_affected)
}

/// Returns `qty` of a lot's float to on-hand.
pub(crate) async fn restore<C>(conn: &C, key: &LotKey, qty: i32) -> Result<(), OperationError>
where
    C: ConnectionTrait,
{
    let result = current_stock::Entity::update_many()
        .col_expr(current_stock::Column::Qty, Expr::col(current_stock::Column::Qty).add(qty))
        .col_expr(
            current_stock::Column::FloatQty,
            Expr::col(current_stock::Column::FloatQty).sub(qty),
        )
        .filter(key_condition(key))
        .filter(current_stock::Column::FloatQty.gte(qty))
        .exec(conn)
        .await?;
    expect_one_row("restore lot", key, result.rows_affected)
}

/// Removes `qty` of on-hand stock from a lot for a sale.
pub(crate) async fn issue<C>(conn: &C, key: &LotKey, qty: i32) -> Result<(), OperationError>
where
    C: ConnectionTrait,
{
    let result = current_stock::Entity::update_many()
        .col_expr(current_stock::Column::Qty, Expr::col(current_stock::Column::Qty).sub(qty))
        .filter(key_condition(key))
        .filter(current_stock::Column::Qty.gte(qty))
        .exec(conn)
        .await?;
    expect_one_row("issue lot", key, result.rows_affected)
}

/// Inserts a new lot row.
pub(crate) async fn insert_lot<C>(conn: &C, lot: &Lot) -> Result<(), DbErr>
where
    C: ConnectionTrait,
{
    let row = current_stock::ActiveModel {
        entry_specifier: Set(lot.key.entry_specifier.into_inner()),
        warehouse_id: Set(lot.key.warehouse_id.into_inner()),
        item_id: Set(lot.key.item_id.into_inner()),
        goods_received_note_id: Set(lot.key.goods_received_note_id.into_inner()),
        inventory_transfer_id: Set(lot.key.inventory_transfer_id.map(InventoryTransferId::into_inner)),
        cost_price: Set(lot.cost_price),
        landed_costs: Set(lot.landed_costs),
        price: Set(lot.price),
        qty: Set(lot.qty),
        float_qty: Set(lot.float_qty),
        created_at: Set(Utc::now().into()),
    };
    current_stock::Entity::insert(row).exec(conn).await?;
    Ok(())
}

/// Loads one lot by entry specifier.
pub(crate) async fn find_lot<C>(conn: &C, entry_specifier: EntrySpecifier) -> Result<Option<Lot>, DbErr>
where
    C: ConnectionTrait,
{
    let Some(row) = current_stock::Entity::find_by_id(entry_specifier.into_inner())
        .one(conn)
        .await?
    else {
        return Ok(None);
    };
    Ok(with_received_at(conn, vec![row]).await?.pop())
}

/// Matches a lot by its full identifying key.
fn key_condition(key: &LotKey) -> Condition {
    let transfer: SimpleExpr = match key.inventory_transfer_id {
        Some(id) => current_stock::Column::InventoryTransferId.eq(id.into_inner()),
        None => current_stock::Column::InventoryTransferId.is_null(),
    };
    Condition::all()
        .add(current_stock::Column::EntrySpecifier.eq(key.entry_specifier.into_inner()))
        .add(current_stock::Column::WarehouseId.eq(key.warehouse_id.into_inner()))
        .add(current_stock::Column::ItemId.eq(key.item_id.into_inner()))
        .add(current_stock::Column::GoodsReceivedNoteId.eq(key.goods_received_note_id.into_inner()))
        .add(transfer)
}

fn expect_one_row(what: &str, key: &LotKey, rows: u64) -> Result<(), OperationError> {
    if rows == 1 {
        Ok(())
    } else {
        Err(OperationError::rows_affected(
            format!("{what} {}", key.entry_specifier),
            rows,
        ))
    }
}

/// Converts rows into lots dated by their receiving note.
async fn with_received_at<C>(conn: &C, rows: Vec<current_stock::Model>) -> Result<Vec<Lot>, DbErr>
where
    C: ConnectionTrait,
{
    let mut note_ids: Vec<Uuid> = rows.iter().map(|r| r.goods_received_note_id).collect();
    note_ids.sort_unstable();
    note_ids.dedup();

    let received: HashMap<Uuid, DateTime<Utc>> = if note_ids.is_empty() {
        HashMap::new()
    } else {
        goods_received_note::Entity::find()
            .filter(goods_received_note::Column::Id.is_in(note_ids))
            .all(conn)
            .await?
            .into_iter()
            .map(|note| (note.id, note.created_at.with_timezone(&Utc)))
            .collect()
    };

    Ok(rows
        .into_iter()
        .map(|row| {
            let received_at = received
                .get(&row.goods_received_note_id)
                .copied()
                .unwrap_or_else(|| row.created_at.with_timezone(&Utc));
            lot_from_model(row, received_at)
        })
        .collect())
}

fn lot_from_model(row: current_stock::Model, received_at: DateTime<Utc>) -> Lot {
    Lot {
        key: LotKey {
            entry_specifier: EntrySpecifier::from_uuid(row.entry_specifier),
            warehouse_id: WarehouseId::from_uuid(row.warehouse_id),
            item_id: ItemId::from_uuid(row.item_id),
            goods_received_note_id: GoodsReceivedNoteId::from_uuid(row.goods_received_note_id),
            inventory_transfer_id: row.inventory_transfer_id.map(InventoryTransferId::from_uuid),
        },
        qty: row.qty,
        float_qty: row.float_qty,
        cost_price: row.cost_price,
        landed_costs: row.landed_costs,
        price: row.price,
        received_at,
    }
}
