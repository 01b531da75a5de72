//! Sale issuer.
//!
//! Issues invoices from FIFO draws, posts the four-line sale journal and
//! fires the customer notification once the sale is committed. `Plan`
//! requests run the whole computation and roll it back.

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use tracing::{info, instrument, warn};
use tradeledger_core::{
    inventory::StockRequest,
    sale::{ExecutionType, SaleAccounts, SaleQuote, sale_journal},
};
use tradeledger_shared::{
    config::PostingAccounts,
    notification::{SaleNotice, SaleNotifier},
    types::{AccountId, InventoryTransferId, InvoiceId, TransactionId, UserId, WarehouseId, round_money},
};
use uuid::Uuid;

use crate::entities::{invoice, invoice_item, users};
use crate::error::OperationError;
use crate::repositories::{IdempotencyRepository, idempotency, journal, lot};

/// Input for creating an invoice.
#[derive(Debug, Clone)]
pub struct CreateInvoiceInput {
    /// Client retry token.
    pub request_id: Option<String>,
    /// `Plan` previews without committing.
    pub execution_type: ExecutionType,
    /// Selling officer.
    pub user_id: UserId,
    /// Warehouse the goods leave from.
    pub warehouse_id: WarehouseId,
    /// Requested items.
    pub lines: Vec<StockRequest>,
    /// Discount percentage, 0 to 100.
    pub discount: Decimal,
    /// Customer name.
    pub customer_name: Option<String>,
    /// Customer phone number for the receipt message.
    pub customer_contact: Option<String>,
}

/// What an invoice request did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvoiceOutcome {
    /// The invoice was committed.
    Issued {
        /// New invoice.
        invoice_id: InvoiceId,
        /// Sale journal.
        transaction_id: TransactionId,
        /// Priced draw plan.
        quote: SaleQuote,
    },
    /// Plan request: priced and rolled back.
    Planned(SaleQuote),
    /// The request id was seen before; nothing changed.
    Duplicate,
}

/// Invoice header with its lines.
#[derive(Debug, Clone)]
pub struct InvoiceWithLines {
    /// Invoice header.
    pub invoice: invoice::Model,
    /// One line per lot drawn.
    pub lines: Vec<invoice_item::Model>,
}

/// Repository issuing sales invoices.
#[derive(Clone)]
pub struct InvoiceRepository {
    db: DatabaseConnection,
    accounts: PostingAccounts,
    notifier: Arc<dyn SaleNotifier>,
}

impl std::fmt::Debug for InvoiceRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InvoiceRepository")
            .field("accounts", &self.accounts)
            .finish_non_exhaustive()
    }
}

impl InvoiceRepository {
    /// Creates a new invoice repository.
    #[must_use]
    pub fn new(
        db: DatabaseConnection,
        accounts: PostingAccounts,
        notifier: Arc<dyn SaleNotifier>,
    ) -> Self {
        Self {
            db,
            accounts,
            notifier,
        }
    }

    /// Creates an invoice, or prices one without committing for `Plan`.
    ///
    /// A request id already recorded short-circuits with `Duplicate`. For
    /// `Plan` requests the id is recorded in its own committed transaction
    /// so the rollback of the preview does not erase it.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A line has a quantity below one or the discount is out of range
    /// - An item is missing from the warehouse or short of stock
    /// - The officer does not exist or has no cash account
    /// - A lot update does not affect exactly one row
    /// - Database operation fails
    #[instrument(
        skip(self, input),
        fields(
            warehouse_id = %input.warehouse_id,
            execution_type = ?input.execution_type,
            request_id = input.request_id.as_deref().unwrap_or_default()
        )
    )]
    pub async fn create_invoice(
        &self,
        input: CreateInvoiceInput,
    ) -> Result<InvoiceOutcome, OperationError> {
        let plan = input.execution_type.is_plan();
        let request_id = input.request_id.as_deref().filter(|id| !id.is_empty());

        if let Some(request_id) = request_id {
            if idempotency::request_exists(&self.db, request_id).await? {
                info!("Request dropped");
                return Ok(InvoiceOutcome::Duplicate);
            }
            if plan
                && IdempotencyRepository::new(self.db.clone())
                    .record_committed(request_id)
                    .await?
                    .is_duplicate()
            {
                return Ok(InvoiceOutcome::Duplicate);
            }
        }

        let txn = self.db.begin().await?;

        if let Some(request_id) = request_id
            && !plan
            && idempotency::record_request(&txn, request_id).await?.is_duplicate()
        {
            return Ok(InvoiceOutcome::Duplicate);
        }

        let draws = lot::plan_from_warehouse(&txn, input.warehouse_id, &input.lines).await?;
        let quote = SaleQuote::price(draws, input.discount)?;
        let cash = cash_account(&txn, input.user_id).await?;

        let accounts = SaleAccounts {
            cash,
            sales: AccountId::from_uuid(self.accounts.sales_account_id),
            cost_of_sales: AccountId::from_uuid(self.accounts.cost_of_sales_account_id),
            stock: AccountId::from_uuid(self.accounts.stock_account_id),
        };
        let transaction_id = journal::post_journal(
            &txn,
            input.user_id,
            Utc::now().date_naive(),
            Some("Sales invoice".to_owned()),
            sale_journal(
                &accounts,
                quote.price_after_discount,
                quote.totals.cost_price,
            ),
        )
        .await?;

        let invoice_id = insert_invoice(&txn, &input, &quote, transaction_id).await?;

        if plan {
            txn.rollback().await?;
            info!(price_after_discount = %quote.price_after_discount, "Invoice planned");
            return Ok(InvoiceOutcome::Planned(quote));
        }

        txn.commit().await?;

        info!(
            %invoice_id,
            %transaction_id,
            price_after_discount = %quote.price_after_discount,
            draws = quote.draws.len(),
            "Invoice issued"
        );
        self.notify(input.customer_contact, quote.price_after_discount);

        Ok(InvoiceOutcome::Issued {
            invoice_id,
            transaction_id,
            quote,
        })
    }

    /// Finds an invoice with its lines.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_invoice(&self, invoice_id: InvoiceId) -> Result<Option<InvoiceWithLines>, DbErr> {
        let Some(invoice) = invoice::Entity::find_by_id(invoice_id.into_inner())
            .one(&self.db)
            .await?
        else {
            return Ok(None);
        };
        let lines = invoice_item::Entity::find()
            .filter(invoice_item::Column::InvoiceId.eq(invoice.id))
            .order_by_asc(invoice_item::Column::Id)
            .all(&self.db)
            .await?;
        Ok(Some(InvoiceWithLines { invoice, lines }))
    }

    /// Sends the receipt message in the background; failures are logged.
    fn notify(&self, customer_contact: Option<String>, amount: Decimal) {
        let notifier = Arc::clone(&self.notifier);
        let notice = SaleNotice {
            customer_contact,
            amount,
        };
        tokio::spawn(async move {
            if let Err(error) = notifier.notify_sale(&notice).await {
                warn!(%error, "Sale notification failed");
            }
        });
    }
}

async fn cash_account(txn: &DatabaseTransaction, user_id: UserId) -> Result<AccountId, OperationError> {
    let user = users::Entity::find_by_id(user_id.into_inner())
        .one(txn)
        .await?
        .ok_or_else(|| OperationError::NotFound(format!("user {user_id}")))?;
    user.cash_account_id
        .map(AccountId::from_uuid)
        .ok_or(OperationError::MissingCashAccount(user_id))
}

/// Writes the header, then issues every drawn lot and records its line.
async fn insert_invoice(
    txn: &DatabaseTransaction,
    input: &CreateInvoiceInput,
    quote: &SaleQuote,
    transaction_id: TransactionId,
) -> Result<InvoiceId, OperationError> {
    let invoice_id = InvoiceId::new();
    let header = invoice::ActiveModel {
        id: Set(invoice_id.into_inner()),
        user_id: Set(input.user_id.into_inner()),
        warehouse_id: Set(input.warehouse_id.into_inner()),
        transaction_id: Set(Some(transaction_id.into_inner())),
        cost_price: Set(round_money(quote.totals.cost_price)),
        price_before_discount: Set(round_money(quote.totals.price)),
        discount: Set(quote.discount),
        price_after_discount: Set(quote.price_after_discount),
        customer_name: Set(input.customer_name.clone()),
        customer_contact: Set(input.customer_contact.clone()),
        created_at: Set(Utc::now().into()),
    };
    invoice::Entity::insert(header).exec(txn).await?;

    for draw in &quote.draws {
        lot::issue(txn, &draw.lot, draw.qty).await?;
        let line = invoice_item::ActiveModel {
            id: Set(Uuid::now_v7()),
            invoice_id: Set(invoice_id.into_inner()),
            entry_specifier: Set(draw.lot.entry_specifier.into_inner()),
            goods_received_note_id: Set(draw.lot.goods_received_note_id.into_inner()),
            inventory_transfer_id: Set(draw
                .lot
                .inventory_transfer_id
                .map(InventoryTransferId::into_inner)),
            item_id: Set(draw.lot.item_id.into_inner()),
            qty: Set(draw.qty),
            cost_price: Set(draw.cost_price),
            price: Set(draw.price),
        };
        invoice_item::Entity::insert(line).exec(txn).await?;
    }
    Ok(invoice_id)
}
