//! Purchase order and goods received note repository.
//!
//! Receiving against an order reconciles each line through an atomic
//! guarded increment, so concurrent receipts can never push
//! `total_reconciled + total_cancelled` past the ordered quantity.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DatabaseTransaction, DbBackend, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait, ConnectionTrait,
    sea_query::Expr,
};
use tracing::{debug, info, instrument};
use tradeledger_core::purchasing::{
    DiscountType, OrderLineProgress, PurchasingError, apply_discount, price_line,
};
use tradeledger_shared::types::{
    BusinessPartnerId, GoodsReceivedNoteId, ItemId, PurchaseOrderId, PurchaseOrderItemId, UserId,
    WarehouseId,
};
use uuid::Uuid;

use crate::entities::{
    goods_received_note, goods_received_note_item, purchase_order, purchase_order_item,
    purchase_order_item_reconciliation,
};
use crate::error::OperationError;

/// One ordered line.
#[derive(Debug, Clone)]
pub struct PurchaseOrderLineInput {
    /// Ordered item.
    pub item_id: ItemId,
    /// Ordered units.
    pub qty: i32,
    /// Unit price before discount.
    pub unit_price: Decimal,
    /// Line discount type.
    pub discount_type: DiscountType,
    /// Line discount value.
    pub discount_amount: Decimal,
}

/// Input for creating a purchase order.
#[derive(Debug, Clone)]
pub struct CreatePurchaseOrderInput {
    /// Ordering user.
    pub user_id: UserId,
    /// Supplier.
    pub supplier_id: BusinessPartnerId,
    /// Receiving warehouse.
    pub warehouse_id: WarehouseId,
    /// Header discount type.
    pub discount_type: DiscountType,
    /// Header discount value.
    pub discount_amount: Decimal,
    /// Free-text remarks.
    pub remarks: Option<String>,
    /// Ordered lines.
    pub lines: Vec<PurchaseOrderLineInput>,
}

/// One received line.
#[derive(Debug, Clone)]
pub struct ReceivedLineInput {
    /// Received item.
    pub item_id: ItemId,
    /// Received units.
    pub qty: i32,
    /// Unit cost.
    pub unit_price: Decimal,
}

/// Input for creating a goods received note.
#[derive(Debug, Clone)]
pub struct CreateGoodsReceivedNoteInput {
    /// Receiving user.
    pub user_id: UserId,
    /// Supplier.
    pub supplier_id: BusinessPartnerId,
    /// Receiving warehouse.
    pub warehouse_id: WarehouseId,
    /// Order being fulfilled, if any.
    pub purchase_order_id: Option<PurchaseOrderId>,
    /// Header discount type.
    pub discount_type: DiscountType,
    /// Header discount value.
    pub discount_amount: Decimal,
    /// Free-text remarks.
    pub remarks: Option<String>,
    /// Received lines.
    pub lines: Vec<ReceivedLineInput>,
}

/// Purchase order with its lines.
#[derive(Debug, Clone)]
pub struct PurchaseOrderWithLines {
    /// Order header.
    pub order: purchase_order::Model,
    /// Order lines.
    pub lines: Vec<purchase_order_item::Model>,
}

/// Goods received note with its lines and reconciliations.
#[derive(Debug, Clone)]
pub struct GoodsReceivedNoteWithLines {
    /// Note header.
    pub note: goods_received_note::Model,
    /// Received lines.
    pub lines: Vec<goods_received_note_item::Model>,
    /// Order lines this note reconciled against.
    pub reconciliations: Vec<purchase_order_item_reconciliation::Model>,
}

/// Repository for purchasing documents.
#[derive(Debug, Clone)]
pub struct PurchasingRepository {
    db: DatabaseConnection,
}

impl PurchasingRepository {
    /// Creates a new purchasing repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a purchase order with discounted line and header totals.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The order has no lines
    /// - A line has a quantity below one, a negative price, or an invalid discount
    /// - The header discount is invalid
    /// - Database operation fails
    #[instrument(skip(self, input), fields(supplier_id = %input.supplier_id))]
    pub async fn create_purchase_order(
        &self,
        input: CreatePurchaseOrderInput,
    ) -> Result<PurchaseOrderWithLines, OperationError> {
        if input.lines.is_empty() {
            return Err(PurchasingError::NoLines.into());
        }

        let mut priced = Vec::with_capacity(input.lines.len());
        for line in &input.lines {
            priced.push(price_line(
                line.item_id,
                line.unit_price,
                line.qty,
                line.discount_type,
                line.discount_amount,
            )?);
        }
        let subtotal: Decimal = priced.iter().map(|p| p.total_price).sum();
        let total_price = apply_discount(subtotal, input.discount_type, input.discount_amount)?;

        let order_id = PurchaseOrderId::new();
        let now = Utc::now().into();

        let txn = self.db.begin().await?;

        let order = purchase_order::ActiveModel {
            id: Set(order_id.into_inner()),
            user_id: Set(input.user_id.into_inner()),
            supplier_id: Set(input.supplier_id.into_inner()),
            warehouse_id: Set(input.warehouse_id.into_inner()),
            discount_type: Set(input.discount_type.as_str().to_owned()),
            discount_amount: Set(input.discount_amount),
            price_before_discount: Set(subtotal),
            total_price: Set(total_price),
            remarks: Set(input.remarks.clone()),
            created_at: Set(now),
        };
        purchase_order::Entity::insert(order).exec(&txn).await?;

        let rows: Vec<purchase_order_item::ActiveModel> = input
            .lines
            .iter()
            .zip(&priced)
            .map(|(line, priced)| purchase_order_item::ActiveModel {
                id: Set(PurchaseOrderItemId::new().into_inner()),
                purchase_order_id: Set(order_id.into_inner()),
                item_id: Set(line.item_id.into_inner()),
                unit_price: Set(line.unit_price),
                qty: Set(line.qty),
                discount_type: Set(line.discount_type.as_str().to_owned()),
                discount_amount: Set(line.discount_amount),
                price_before_discount: Set(priced.price_before_discount),
                total_price: Set(priced.total_price),
                total_reconciled: Set(0),
                total_cancelled: Set(0),
            })
            .collect();
        purchase_order_item::Entity::insert_many(rows).exec(&txn).await?;

        txn.commit().await?;

        info!(purchase_order_id = %order_id, %total_price, "Purchase order created");
        self.find_purchase_order(order_id)
            .await?
            .ok_or_else(|| OperationError::NotFound(format!("purchase order {order_id}")))
    }

    /// Creates a goods received note and reconciles it against its order.
    ///
    /// Each received line whose item is on the order reconciles at most the
    /// line's outstanding quantity. Over-receipts and items not on the order
    /// are accepted without reconciliation. No lots are opened here; stock
    /// becomes available when landed cost is applied.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The note has no lines or a line is invalid
    /// - The referenced purchase order does not exist or has another supplier
    /// - A reconciliation update loses a race (`ConsistencyViolation`)
    /// - Database operation fails
    #[instrument(skip(self, input), fields(supplier_id = %input.supplier_id))]
    pub async fn create_goods_received_note(
        &self,
        input: CreateGoodsReceivedNoteInput,
    ) -> Result<GoodsReceivedNoteWithLines, OperationError> {
        if input.lines.is_empty() {
            return Err(PurchasingError::NoLines.into());
        }

        let mut line_totals = Vec::with_capacity(input.lines.len());
        for line in &input.lines {
            let priced = price_line(
                line.item_id,
                line.unit_price,
                line.qty,
                DiscountType::Amount,
                Decimal::ZERO,
            )?;
            line_totals.push(priced.total_price);
        }
        let subtotal: Decimal = line_totals.iter().copied().sum();
        let total_price = apply_discount(subtotal, input.discount_type, input.discount_amount)?;

        let note_id = GoodsReceivedNoteId::new();
        let now = Utc::now().into();

        let txn = self.db.begin().await?;

        if let Some(order_id) = input.purchase_order_id {
            let order = purchase_order::Entity::find_by_id(order_id.into_inner())
                .one(&txn)
                .await?
                .ok_or_else(|| OperationError::NotFound(format!("purchase order {order_id}")))?;
            if order.supplier_id != input.supplier_id.into_inner() {
                return Err(OperationError::Validation(format!(
                    "purchase order {order_id} was raised with a different supplier"
                )));
            }
        }

        let note = goods_received_note::ActiveModel {
            id: Set(note_id.into_inner()),
            user_id: Set(input.user_id.into_inner()),
            purchase_order_id: Set(input.purchase_order_id.map(PurchaseOrderId::into_inner)),
            supplier_id: Set(input.supplier_id.into_inner()),
            warehouse_id: Set(input.warehouse_id.into_inner()),
            discount_type: Set(input.discount_type.as_str().to_owned()),
            discount_amount: Set(input.discount_amount),
            price_before_discount: Set(subtotal),
            total_price: Set(total_price),
            remarks: Set(input.remarks.clone()),
            landed_cost_id: Set(None),
            created_at: Set(now),
        };
        goods_received_note::Entity::insert(note).exec(&txn).await?;

        let rows: Vec<goods_received_note_item::ActiveModel> = input
            .lines
            .iter()
            .zip(&line_totals)
            .map(|(line, total)| goods_received_note_item::ActiveModel {
                id: Set(Uuid::now_v7()),
                goods_received_note_id: Set(note_id.into_inner()),
                item_id: Set(line.item_id.into_inner()),
                unit_price: Set(line.unit_price),
                qty: Set(line.qty),
                total_price: Set(*total),
            })
            .collect();
        goods_received_note_item::Entity::insert_many(rows).exec(&txn).await?;

        if let Some(order_id) = input.purchase_order_id {
            reconcile_order(&txn, order_id, note_id, &input.lines).await?;
        }

        txn.commit().await?;

        info!(goods_received_note_id = %note_id, %subtotal, "Goods received note created");
        self.find_goods_received_note(note_id)
            .await?
            .ok_or_else(|| OperationError::NotFound(format!("goods received note {note_id}")))
    }

    /// Cancels outstanding units of a purchase order line.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The line does not exist
    /// - `qty` is below one or exceeds the outstanding quantity
    /// - The guarded update loses a race (`ConsistencyViolation`)
    /// - Database operation fails
    pub async fn cancel_purchase_order_item(
        &self,
        purchase_order_item_id: PurchaseOrderItemId,
        qty: i32,
    ) -> Result<purchase_order_item::Model, OperationError> {
        let txn = self.db.begin().await?;

        let line = find_order_line(&txn, purchase_order_item_id)
            .await?
            .ok_or_else(|| {
                OperationError::NotFound(format!("purchase order item {purchase_order_item_id}"))
            })?;
        progress_of(&line).cancel(qty)?;

        let result = purchase_order_item::Entity::update_many()
            .col_expr(
                purchase_order_item::Column::TotalCancelled,
                Expr::col(purchase_order_item::Column::TotalCancelled).add(qty),
            )
            .filter(purchase_order_item::Column::Id.eq(line.id))
            .filter(within_ordered(qty))
            .exec(&txn)
            .await?;
        if result.rows_affected != 1 {
            return Err(OperationError::rows_affected(
                format!("cancel purchase order item {purchase_order_item_id}"),
                result.rows_affected,
            ));
        }

        let updated = find_order_line(&txn, purchase_order_item_id)
            .await?
            .ok_or_else(|| {
                OperationError::NotFound(format!("purchase order item {purchase_order_item_id}"))
            })?;
        txn.commit().await?;

        info!(%purchase_order_item_id, qty, "Purchase order item cancelled");
        Ok(updated)
    }

    /// Finds a purchase order with its lines.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_purchase_order(
        &self,
        order_id: PurchaseOrderId,
    ) -> Result<Option<PurchaseOrderWithLines>, DbErr> {
        let Some(order) = purchase_order::Entity::find_by_id(order_id.into_inner())
            .one(&self.db)
            .await?
        else {
            return Ok(None);
        };
        let lines = purchase_order_item::Entity::find()
            .filter(purchase_order_item::Column::PurchaseOrderId.eq(order.id))
            .order_by_asc(purchase_order_item::Column::Id)
            .all(&self.db)
            .await?;
        Ok(Some(PurchaseOrderWithLines { order, lines }))
    }

    /// Finds a goods received note with its lines and reconciliations.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_goods_received_note(
        &self,
        note_id: GoodsReceivedNoteId,
    ) -> Result<Option<GoodsReceivedNoteWithLines>, DbErr> {
        let Some(note) = goods_received_note::Entity::find_by_id(note_id.into_inner())
            .one(&self.db)
            .await?
        else {
            return Ok(None);
        };
        let lines = goods_received_note_item::Entity::find()
            .filter(goods_received_note_item::Column::GoodsReceivedNoteId.eq(note.id))
            .order_by_asc(goods_received_note_item::Column::Id)
            .all(&self.db)
            .await?;
        let reconciliations = purchase_order_item_reconciliation::Entity::find()
            .filter(purchase_order_item_reconciliation::Column::GoodsReceivedNoteId.eq(note.id))
            .order_by_asc(purchase_order_item_reconciliation::Column::Id)
            .all(&self.db)
            .await?;
        Ok(Some(GoodsReceivedNoteWithLines {
            note,
            lines,
            reconciliations,
        }))
    }
}

/// Applies received quantities to the order's outstanding lines.
async fn reconcile_order(
    txn: &DatabaseTransaction,
    order_id: PurchaseOrderId,
    note_id: GoodsReceivedNoteId,
    received: &[ReceivedLineInput],
) -> Result<(), OperationError> {
    let mut query = purchase_order_item::Entity::find()
        .filter(purchase_order_item::Column::PurchaseOrderId.eq(order_id.into_inner()))
        .order_by_asc(purchase_order_item::Column::Id);
    if txn.get_database_backend() == DbBackend::Postgres {
        query = query.lock_exclusive();
    }
    let mut order_lines: Vec<(purchase_order_item::Model, OrderLineProgress)> = query
        .all(txn)
        .await?
        .into_iter()
        .map(|line| {
            let progress = progress_of(&line);
            (line, progress)
        })
        .collect();

    for line in received {
        let mut remaining = line.qty;
        for (order_line, progress) in order_lines
            .iter_mut()
            .filter(|(o, _)| o.item_id == line.item_id.into_inner())
        {
            if remaining == 0 {
                break;
            }
            let applied = progress.reconcile(remaining);
            if applied == 0 {
                continue;
            }
            remaining -= applied;

            let result = purchase_order_item::Entity::update_many()
                .col_expr(
                    purchase_order_item::Column::TotalReconciled,
                    Expr::col(purchase_order_item::Column::TotalReconciled).add(applied),
                )
                .filter(purchase_order_item::Column::Id.eq(order_line.id))
                .filter(within_ordered(applied))
                .exec(txn)
                .await?;
            if result.rows_affected != 1 {
                return Err(OperationError::rows_affected(
                    format!("reconcile purchase order item {}", order_line.id),
                    result.rows_affected,
                ));
            }

            let reconciliation = purchase_order_item_reconciliation::ActiveModel {
                id: Set(Uuid::now_v7()),
                purchase_order_item_id: Set(order_line.id),
                goods_received_note_id: Set(note_id.into_inner()),
                qty: Set(applied),
                created_at: Set(Utc::now().into()),
            };
            purchase_order_item_reconciliation::Entity::insert(reconciliation)
                .exec(txn)
                .await?;

            debug!(purchase_order_item_id = %order_line.id, applied, "Order line reconciled");
        }
    }
    Ok(())
}

async fn find_order_line<C>(
    conn: &C,
    purchase_order_item_id: PurchaseOrderItemId,
) -> Result<Option<purchase_order_item::Model>, DbErr>
where
    C: ConnectionTrait,
{
    let mut query = purchase_order_item::Entity::find_by_id(purchase_order_item_id.into_inner());
    if conn.get_database_backend() == DbBackend::Postgres {
        query = query.lock_exclusive();
    }
    query.one(conn).await
}

const fn progress_of(line: &purchase_order_item::Model) -> OrderLineProgress {
    OrderLineProgress {
        qty: line.qty,
        total_reconciled: line.total_reconciled,
        total_cancelled: line.total_cancelled,
    }
}

/// `total_reconciled + total_cancelled + delta <= qty`.
fn within_ordered(delta: i32) -> sea_orm::sea_query::SimpleExpr {
    Expr::expr(
        Expr::col(purchase_order_item::Column::TotalReconciled)
            .add(Expr::col(purchase_order_item::Column::TotalCancelled))
            .add(delta),
    )
    .lte(Expr::col(purchase_order_item::Column::Qty))
}
