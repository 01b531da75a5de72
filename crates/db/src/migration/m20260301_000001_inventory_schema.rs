//! Inventory and ledger schema.
//!
//! Built with the schema builder so the same migration runs on Postgres and
//! on the SQLite databases used by tests.

use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::DbBackend;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Fixed-point money column.
///
/// SQLite has no fixed-point type and sea-query refuses precisions above 16
/// there, so SQLite gets its plain numeric column.
fn decimal<T: IntoIden>(backend: DbBackend, name: T, precision: u32, scale: u32) -> ColumnDef {
    let mut column = ColumnDef::new(name);
    if backend == DbBackend::Sqlite {
        column.decimal();
    } else {
        column.decimal_len(precision, scale);
    }
    column
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let backend = manager.get_database_backend();

        // ====================================================================
        // PART 1: Reference data
        // ====================================================================
        manager
            .create_table(
                Table::create()
                    .table(Account::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Account::Id).uuid().primary_key().not_null())
                    .col(ColumnDef::new(Account::Code).string_len(32).not_null().unique_key())
                    .col(ColumnDef::new(Account::Name).string_len(128).not_null())
                    .col(ColumnDef::new(Account::CreatedAt).timestamp_with_time_zone().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Warehouse::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Warehouse::Id).uuid().primary_key().not_null())
                    .col(ColumnDef::new(Warehouse::Name).string_len(128).not_null())
                    .col(ColumnDef::new(Warehouse::CreatedAt).timestamp_with_time_zone().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Item::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Item::Id).uuid().primary_key().not_null())
                    .col(ColumnDef::new(Item::ItemCode).string_len(64).not_null().unique_key())
                    .col(ColumnDef::new(Item::Name).string_len(256).not_null())
                    .col(ColumnDef::new(Item::CreatedAt).timestamp_with_time_zone().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(BusinessPartner::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(BusinessPartner::Id).uuid().primary_key().not_null())
                    .col(ColumnDef::new(BusinessPartner::Name).string_len(256).not_null())
                    .col(ColumnDef::new(BusinessPartner::PayableAccountId).uuid().null())
                    .col(ColumnDef::new(BusinessPartner::CreatedAt).timestamp_with_time_zone().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_business_partner_payable_account")
                            .from(BusinessPartner::Table, BusinessPartner::PayableAccountId)
                            .to(Account::Table, Account::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Users::Id).uuid().primary_key().not_null())
                    .col(ColumnDef::new(Users::Name).string_len(128).not_null())
                    .col(ColumnDef::new(Users::CashAccountId).uuid().null())
                    .col(ColumnDef::new(Users::CreatedAt).timestamp_with_time_zone().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_users_cash_account")
                            .from(Users::Table, Users::CashAccountId)
                            .to(Account::Table, Account::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(LandedCostType::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(LandedCostType::Id).uuid().primary_key().not_null())
                    .col(ColumnDef::new(LandedCostType::Name).string_len(128).not_null())
                    .col(ColumnDef::new(LandedCostType::ExpenseAccountId).uuid().null())
                    .col(ColumnDef::new(LandedCostType::PayableAccountId).uuid().null())
                    .to_owned(),
            )
            .await?;

        // ====================================================================
        // PART 2: Journal
        // ====================================================================
        manager
            .create_table(
                Table::create()
                    .table(Transaction::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Transaction::Id).uuid().primary_key().not_null())
                    .col(ColumnDef::new(Transaction::UserId).uuid().not_null())
                    .col(ColumnDef::new(Transaction::Datetime).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(Transaction::PostingDate).date().not_null())
                    .col(ColumnDef::new(Transaction::Remark).text().null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AccountTransaction::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(AccountTransaction::Id).uuid().primary_key().not_null())
                    .col(ColumnDef::new(AccountTransaction::TransactionId).uuid().not_null())
                    .col(ColumnDef::new(AccountTransaction::AccountId).uuid().not_null())
                    .col(ColumnDef::new(AccountTransaction::Type).string_len(2).not_null())
                    .col(
                        decimal(backend, AccountTransaction::Amount, 18, 2)
                            .not_null()
                            .check(Expr::col(AccountTransaction::Amount).gt(0)),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_account_transaction_transaction")
                            .from(AccountTransaction::Table, AccountTransaction::TransactionId)
                            .to(Transaction::Table, Transaction::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_account_transaction_account")
                            .from(AccountTransaction::Table, AccountTransaction::AccountId)
                            .to(Account::Table, Account::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_account_transaction_transaction")
                    .table(AccountTransaction::Table)
                    .col(AccountTransaction::TransactionId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(BusinessPartnerFinancial::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(BusinessPartnerFinancial::Id).uuid().primary_key().not_null())
                    .col(ColumnDef::new(BusinessPartnerFinancial::BusinessPartnerId).uuid().not_null())
                    .col(ColumnDef::new(BusinessPartnerFinancial::TransactionId).uuid().not_null())
                    .col(ColumnDef::new(BusinessPartnerFinancial::Type).string_len(2).not_null())
                    .col(decimal(backend, BusinessPartnerFinancial::Amount, 18, 2).not_null())
                    .col(ColumnDef::new(BusinessPartnerFinancial::EffectiveDate).date().null())
                    .col(ColumnDef::new(BusinessPartnerFinancial::CreatedAt).timestamp_with_time_zone().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_bp_financial_partner")
                            .from(BusinessPartnerFinancial::Table, BusinessPartnerFinancial::BusinessPartnerId)
                            .to(BusinessPartner::Table, BusinessPartner::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_bp_financial_transaction")
                            .from(BusinessPartnerFinancial::Table, BusinessPartnerFinancial::TransactionId)
                            .to(Transaction::Table, Transaction::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PaymentVoucher::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(PaymentVoucher::Id).uuid().primary_key().not_null())
                    .col(ColumnDef::new(PaymentVoucher::TransactionId).uuid().not_null())
                    .col(ColumnDef::new(PaymentVoucher::FromAccountId).uuid().not_null())
                    .col(decimal(backend, PaymentVoucher::Amount, 18, 2).not_null())
                    .col(ColumnDef::new(PaymentVoucher::CheckNumber).string_len(64).null())
                    .col(ColumnDef::new(PaymentVoucher::Payee).string_len(256).null())
                    .col(ColumnDef::new(PaymentVoucher::DueDate).date().null())
                    .col(ColumnDef::new(PaymentVoucher::EffectiveDate).date().null())
                    .col(ColumnDef::new(PaymentVoucher::CreatedAt).timestamp_with_time_zone().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_payment_voucher_transaction")
                            .from(PaymentVoucher::Table, PaymentVoucher::TransactionId)
                            .to(Transaction::Table, Transaction::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(UniqueRequests::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(UniqueRequests::Id).uuid().primary_key().not_null())
                    .col(ColumnDef::new(UniqueRequests::RequestId).string_len(128).not_null())
                    .col(ColumnDef::new(UniqueRequests::CreatedAt).timestamp_with_time_zone().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_unique_requests_request_id")
                    .table(UniqueRequests::Table)
                    .col(UniqueRequests::RequestId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ====================================================================
        // PART 3: Purchasing
        // ====================================================================
        manager
            .create_table(
                Table::create()
                    .table(PurchaseOrder::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(PurchaseOrder::Id).uuid().primary_key().not_null())
                    .col(ColumnDef::new(PurchaseOrder::UserId).uuid().not_null())
                    .col(ColumnDef::new(PurchaseOrder::SupplierId).uuid().not_null())
                    .col(ColumnDef::new(PurchaseOrder::WarehouseId).uuid().not_null())
                    .col(ColumnDef::new(PurchaseOrder::DiscountType).string_len(8).not_null())
                    .col(decimal(backend, PurchaseOrder::DiscountAmount, 18, 2).not_null())
                    .col(decimal(backend, PurchaseOrder::PriceBeforeDiscount, 18, 2).not_null())
                    .col(decimal(backend, PurchaseOrder::TotalPrice, 18, 2).not_null())
                    .col(ColumnDef::new(PurchaseOrder::Remarks).text().null())
                    .col(ColumnDef::new(PurchaseOrder::CreatedAt).timestamp_with_time_zone().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_purchase_order_supplier")
                            .from(PurchaseOrder::Table, PurchaseOrder::SupplierId)
                            .to(BusinessPartner::Table, BusinessPartner::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_purchase_order_warehouse")
                            .from(PurchaseOrder::Table, PurchaseOrder::WarehouseId)
                            .to(Warehouse::Table, Warehouse::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PurchaseOrderItem::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(PurchaseOrderItem::Id).uuid().primary_key().not_null())
                    .col(ColumnDef::new(PurchaseOrderItem::PurchaseOrderId).uuid().not_null())
                    .col(ColumnDef::new(PurchaseOrderItem::ItemId).uuid().not_null())
                    .col(decimal(backend, PurchaseOrderItem::UnitPrice, 18, 6).not_null())
                    .col(ColumnDef::new(PurchaseOrderItem::Qty).integer().not_null())
                    .col(ColumnDef::new(PurchaseOrderItem::DiscountType).string_len(8).not_null())
                    .col(decimal(backend, PurchaseOrderItem::DiscountAmount, 18, 2).not_null())
                    .col(decimal(backend, PurchaseOrderItem::PriceBeforeDiscount, 18, 2).not_null())
                    .col(decimal(backend, PurchaseOrderItem::TotalPrice, 18, 2).not_null())
                    .col(ColumnDef::new(PurchaseOrderItem::TotalReconciled).integer().not_null().default(0))
                    .col(ColumnDef::new(PurchaseOrderItem::TotalCancelled).integer().not_null().default(0))
                    .check(
                        Expr::expr(
                            Expr::col(PurchaseOrderItem::TotalReconciled)
                                .add(Expr::col(PurchaseOrderItem::TotalCancelled)),
                        )
                        .lte(Expr::col(PurchaseOrderItem::Qty)),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_purchase_order_item_order")
                            .from(PurchaseOrderItem::Table, PurchaseOrderItem::PurchaseOrderId)
                            .to(PurchaseOrder::Table, PurchaseOrder::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_purchase_order_item_item")
                            .from(PurchaseOrderItem::Table, PurchaseOrderItem::ItemId)
                            .to(Item::Table, Item::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(GoodsReceivedNote::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(GoodsReceivedNote::Id).uuid().primary_key().not_null())
                    .col(ColumnDef::new(GoodsReceivedNote::UserId).uuid().not_null())
                    .col(ColumnDef::new(GoodsReceivedNote::PurchaseOrderId).uuid().null())
                    .col(ColumnDef::new(GoodsReceivedNote::SupplierId).uuid().not_null())
                    .col(ColumnDef::new(GoodsReceivedNote::WarehouseId).uuid().not_null())
                    .col(ColumnDef::new(GoodsReceivedNote::DiscountType).string_len(8).not_null())
                    .col(decimal(backend, GoodsReceivedNote::DiscountAmount, 18, 2).not_null())
                    .col(decimal(backend, GoodsReceivedNote::PriceBeforeDiscount, 18, 2).not_null())
                    .col(decimal(backend, GoodsReceivedNote::TotalPrice, 18, 2).not_null())
                    .col(ColumnDef::new(GoodsReceivedNote::Remarks).text().null())
                    .col(ColumnDef::new(GoodsReceivedNote::LandedCostId).uuid().null())
                    .col(ColumnDef::new(GoodsReceivedNote::CreatedAt).timestamp_with_time_zone().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_grn_purchase_order")
                            .from(GoodsReceivedNote::Table, GoodsReceivedNote::PurchaseOrderId)
                            .to(PurchaseOrder::Table, PurchaseOrder::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_grn_supplier")
                            .from(GoodsReceivedNote::Table, GoodsReceivedNote::SupplierId)
                            .to(BusinessPartner::Table, BusinessPartner::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_grn_warehouse")
                            .from(GoodsReceivedNote::Table, GoodsReceivedNote::WarehouseId)
                            .to(Warehouse::Table, Warehouse::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(GoodsReceivedNoteItem::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(GoodsReceivedNoteItem::Id).uuid().primary_key().not_null())
                    .col(ColumnDef::new(GoodsReceivedNoteItem::GoodsReceivedNoteId).uuid().not_null())
                    .col(ColumnDef::new(GoodsReceivedNoteItem::ItemId).uuid().not_null())
                    .col(decimal(backend, GoodsReceivedNoteItem::UnitPrice, 18, 6).not_null())
                    .col(
                        ColumnDef::new(GoodsReceivedNoteItem::Qty)
                            .integer()
                            .not_null()
                            .check(Expr::col(GoodsReceivedNoteItem::Qty).gt(0)),
                    )
                    .col(decimal(backend, GoodsReceivedNoteItem::TotalPrice, 18, 2).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_grn_item_grn")
                            .from(GoodsReceivedNoteItem::Table, GoodsReceivedNoteItem::GoodsReceivedNoteId)
                            .to(GoodsReceivedNote::Table, GoodsReceivedNote::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_grn_item_item")
                            .from(GoodsReceivedNoteItem::Table, GoodsReceivedNoteItem::ItemId)
                            .to(Item::Table, Item::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PurchaseOrderItemReconciliation::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(PurchaseOrderItemReconciliation::Id).uuid().primary_key().not_null())
                    .col(ColumnDef::new(PurchaseOrderItemReconciliation::PurchaseOrderItemId).uuid().not_null())
                    .col(ColumnDef::new(PurchaseOrderItemReconciliation::GoodsReceivedNoteId).uuid().not_null())
                    .col(ColumnDef::new(PurchaseOrderItemReconciliation::Qty).integer().not_null())
                    .col(ColumnDef::new(PurchaseOrderItemReconciliation::CreatedAt).timestamp_with_time_zone().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_po_reconciliation_item")
                            .from(PurchaseOrderItemReconciliation::Table, PurchaseOrderItemReconciliation::PurchaseOrderItemId)
                            .to(PurchaseOrderItem::Table, PurchaseOrderItem::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_po_reconciliation_grn")
                            .from(PurchaseOrderItemReconciliation::Table, PurchaseOrderItemReconciliation::GoodsReceivedNoteId)
                            .to(GoodsReceivedNote::Table, GoodsReceivedNote::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // ====================================================================
        // PART 4: Landed cost
        // ====================================================================
        manager
            .create_table(
                Table::create()
                    .table(LandedCost::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(LandedCost::Id).uuid().primary_key().not_null())
                    .col(ColumnDef::new(LandedCost::UserId).uuid().not_null())
                    .col(ColumnDef::new(LandedCost::GoodsReceivedNoteId).uuid().not_null().unique_key())
                    .col(ColumnDef::new(LandedCost::TransactionId).uuid().not_null())
                    .col(ColumnDef::new(LandedCost::CreatedAt).timestamp_with_time_zone().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_landed_cost_grn")
                            .from(LandedCost::Table, LandedCost::GoodsReceivedNoteId)
                            .to(GoodsReceivedNote::Table, GoodsReceivedNote::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_landed_cost_transaction")
                            .from(LandedCost::Table, LandedCost::TransactionId)
                            .to(Transaction::Table, Transaction::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(LandedCostItem::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(LandedCostItem::Id).uuid().primary_key().not_null())
                    .col(ColumnDef::new(LandedCostItem::LandedCostId).uuid().not_null())
                    .col(ColumnDef::new(LandedCostItem::LandedCostTypeId).uuid().not_null())
                    .col(decimal(backend, LandedCostItem::Amount, 18, 2).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_landed_cost_item_header")
                            .from(LandedCostItem::Table, LandedCostItem::LandedCostId)
                            .to(LandedCost::Table, LandedCost::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_landed_cost_item_type")
                            .from(LandedCostItem::Table, LandedCostItem::LandedCostTypeId)
                            .to(LandedCostType::Table, LandedCostType::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // ====================================================================
        // PART 5: Lots and movements
        // ====================================================================
        manager
            .create_table(
                Table::create()
                    .table(InventoryTransfer::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(InventoryTransfer::Id).uuid().primary_key().not_null())
                    .col(ColumnDef::new(InventoryTransfer::UserId).uuid().not_null())
                    .col(ColumnDef::new(InventoryTransfer::FromWarehouseId).uuid().not_null())
                    .col(ColumnDef::new(InventoryTransfer::ToWarehouseId).uuid().not_null())
                    .col(ColumnDef::new(InventoryTransfer::Resolution).string_len(16).null())
                    .col(ColumnDef::new(InventoryTransfer::ResolvedBy).uuid().null())
                    .col(ColumnDef::new(InventoryTransfer::ResolvedOn).timestamp_with_time_zone().null())
                    .col(ColumnDef::new(InventoryTransfer::ResolutionRemarks).text().null())
                    .col(ColumnDef::new(InventoryTransfer::CreatedAt).timestamp_with_time_zone().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_inventory_transfer_from")
                            .from(InventoryTransfer::Table, InventoryTransfer::FromWarehouseId)
                            .to(Warehouse::Table, Warehouse::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_inventory_transfer_to")
                            .from(InventoryTransfer::Table, InventoryTransfer::ToWarehouseId)
                            .to(Warehouse::Table, Warehouse::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CurrentStock::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(CurrentStock::EntrySpecifier).uuid().primary_key().not_null())
                    .col(ColumnDef::new(CurrentStock::WarehouseId).uuid().not_null())
                    .col(ColumnDef::new(CurrentStock::ItemId).uuid().not_null())
                    .col(ColumnDef::new(CurrentStock::GoodsReceivedNoteId).uuid().not_null())
                    .col(ColumnDef::new(CurrentStock::InventoryTransferId).uuid().null())
                    .col(decimal(backend, CurrentStock::CostPrice, 18, 6).not_null())
                    .col(decimal(backend, CurrentStock::LandedCosts, 18, 6).not_null())
                    .col(decimal(backend, CurrentStock::Price, 18, 6).not_null())
                    .col(
                        ColumnDef::new(CurrentStock::Qty)
                            .integer()
                            .not_null()
                            .check(Expr::col(CurrentStock::Qty).gte(0)),
                    )
                    .col(
                        ColumnDef::new(CurrentStock::FloatQty)
                            .integer()
                            .not_null()
                            .default(0)
                            .check(Expr::col(CurrentStock::FloatQty).gte(0)),
                    )
                    .col(ColumnDef::new(CurrentStock::CreatedAt).timestamp_with_time_zone().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_current_stock_warehouse")
                            .from(CurrentStock::Table, CurrentStock::WarehouseId)
                            .to(Warehouse::Table, Warehouse::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_current_stock_item")
                            .from(CurrentStock::Table, CurrentStock::ItemId)
                            .to(Item::Table, Item::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_current_stock_grn")
                            .from(CurrentStock::Table, CurrentStock::GoodsReceivedNoteId)
                            .to(GoodsReceivedNote::Table, GoodsReceivedNote::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_current_stock_transfer")
                            .from(CurrentStock::Table, CurrentStock::InventoryTransferId)
                            .to(InventoryTransfer::Table, InventoryTransfer::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // Lot selection filters by warehouse and item.
        manager
            .create_index(
                Index::create()
                    .name("idx_current_stock_warehouse_item")
                    .table(CurrentStock::Table)
                    .col(CurrentStock::WarehouseId)
                    .col(CurrentStock::ItemId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(InventoryTransferItem::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(InventoryTransferItem::Id).uuid().primary_key().not_null())
                    .col(ColumnDef::new(InventoryTransferItem::InventoryTransferId).uuid().not_null())
                    .col(ColumnDef::new(InventoryTransferItem::EntrySpecifier).uuid().not_null())
                    .col(ColumnDef::new(InventoryTransferItem::PrevInventoryTransferId).uuid().null())
                    .col(ColumnDef::new(InventoryTransferItem::GoodsReceivedNoteId).uuid().not_null())
                    .col(ColumnDef::new(InventoryTransferItem::ItemId).uuid().not_null())
                    .col(
                        ColumnDef::new(InventoryTransferItem::Qty)
                            .integer()
                            .not_null()
                            .check(Expr::col(InventoryTransferItem::Qty).gt(0)),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_transfer_item_transfer")
                            .from(InventoryTransferItem::Table, InventoryTransferItem::InventoryTransferId)
                            .to(InventoryTransfer::Table, InventoryTransfer::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_transfer_item_lot")
                            .from(InventoryTransferItem::Table, InventoryTransferItem::EntrySpecifier)
                            .to(CurrentStock::Table, CurrentStock::EntrySpecifier),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_transfer_item_transfer")
                    .table(InventoryTransferItem::Table)
                    .col(InventoryTransferItem::InventoryTransferId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Invoice::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Invoice::Id).uuid().primary_key().not_null())
                    .col(ColumnDef::new(Invoice::UserId).uuid().not_null())
                    .col(ColumnDef::new(Invoice::WarehouseId).uuid().not_null())
                    .col(ColumnDef::new(Invoice::TransactionId).uuid().null())
                    .col(decimal(backend, Invoice::CostPrice, 18, 2).not_null())
                    .col(decimal(backend, Invoice::PriceBeforeDiscount, 18, 2).not_null())
                    .col(decimal(backend, Invoice::Discount, 5, 2).not_null())
                    .col(decimal(backend, Invoice::PriceAfterDiscount, 18, 2).not_null())
                    .col(ColumnDef::new(Invoice::CustomerName).string_len(256).null())
                    .col(ColumnDef::new(Invoice::CustomerContact).string_len(32).null())
                    .col(ColumnDef::new(Invoice::CreatedAt).timestamp_with_time_zone().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_invoice_warehouse")
                            .from(Invoice::Table, Invoice::WarehouseId)
                            .to(Warehouse::Table, Warehouse::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(InvoiceItem::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(InvoiceItem::Id).uuid().primary_key().not_null())
                    .col(ColumnDef::new(InvoiceItem::InvoiceId).uuid().not_null())
                    .col(ColumnDef::new(InvoiceItem::EntrySpecifier).uuid().not_null())
                    .col(ColumnDef::new(InvoiceItem::GoodsReceivedNoteId).uuid().not_null())
                    .col(ColumnDef::new(InvoiceItem::InventoryTransferId).uuid().null())
                    .col(ColumnDef::new(InvoiceItem::ItemId).uuid().not_null())
                    .col(ColumnDef::new(InvoiceItem::Qty).integer().not_null())
                    .col(decimal(backend, InvoiceItem::CostPrice, 18, 6).not_null())
                    .col(decimal(backend, InvoiceItem::Price, 18, 6).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_invoice_item_invoice")
                            .from(InvoiceItem::Table, InvoiceItem::InvoiceId)
                            .to(Invoice::Table, Invoice::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_invoice_item_lot")
                            .from(InvoiceItem::Table, InvoiceItem::EntrySpecifier)
                            .to(CurrentStock::Table, CurrentStock::EntrySpecifier),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Reverse dependency order.
        let tables: [TableRef; 23] = [
            TableRef::Table(InvoiceItem::Table.into_iden()),
            TableRef::Table(Invoice::Table.into_iden()),
            TableRef::Table(InventoryTransferItem::Table.into_iden()),
            TableRef::Table(CurrentStock::Table.into_iden()),
            TableRef::Table(InventoryTransfer::Table.into_iden()),
            TableRef::Table(LandedCostItem::Table.into_iden()),
            TableRef::Table(LandedCost::Table.into_iden()),
            TableRef::Table(PurchaseOrderItemReconciliation::Table.into_iden()),
            TableRef::Table(GoodsReceivedNoteItem::Table.into_iden()),
            TableRef::Table(GoodsReceivedNote::Table.into_iden()),
            TableRef::Table(PurchaseOrderItem::Table.into_iden()),
            TableRef::Table(PurchaseOrder::Table.into_iden()),
            TableRef::Table(UniqueRequests::Table.into_iden()),
            TableRef::Table(PaymentVoucher::Table.into_iden()),
            TableRef::Table(BusinessPartnerFinancial::Table.into_iden()),
            TableRef::Table(AccountTransaction::Table.into_iden()),
            TableRef::Table(Transaction::Table.into_iden()),
            TableRef::Table(LandedCostType::Table.into_iden()),
            TableRef::Table(Users::Table.into_iden()),
            TableRef::Table(BusinessPartner::Table.into_iden()),
            TableRef::Table(Item::Table.into_iden()),
            TableRef::Table(Warehouse::Table.into_iden()),
            TableRef::Table(Account::Table.into_iden()),
        ];

        for table in tables {
            manager
                .drop_table(Table::drop().table(table).if_exists().to_owned())
                .await?;
        }
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Account {
    Table,
    Id,
    Code,
    Name,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Warehouse {
    Table,
    Id,
    Name,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Item {
    Table,
    Id,
    ItemCode,
    Name,
    CreatedAt,
}

#[derive(DeriveIden)]
enum BusinessPartner {
    Table,
    Id,
    Name,
    PayableAccountId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Name,
    CashAccountId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum LandedCostType {
    Table,
    Id,
    Name,
    ExpenseAccountId,
    PayableAccountId,
}

#[derive(DeriveIden)]
enum Transaction {
    Table,
    Id,
    UserId,
    Datetime,
    PostingDate,
    Remark,
}

#[derive(DeriveIden)]
enum AccountTransaction {
    Table,
    Id,
    TransactionId,
    AccountId,
    Type,
    Amount,
}

#[derive(DeriveIden)]
enum BusinessPartnerFinancial {
    Table,
    Id,
    BusinessPartnerId,
    TransactionId,
    Type,
    Amount,
    EffectiveDate,
    CreatedAt,
}

#[derive(DeriveIden)]
enum PaymentVoucher {
    Table,
    Id,
    TransactionId,
    FromAccountId,
    Amount,
    CheckNumber,
    Payee,
    DueDate,
    EffectiveDate,
    CreatedAt,
}

#[derive(DeriveIden)]
enum UniqueRequests {
    Table,
    Id,
    RequestId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum PurchaseOrder {
    Table,
    Id,
    UserId,
    SupplierId,
    WarehouseId,
    DiscountType,
    DiscountAmount,
    PriceBeforeDiscount,
    TotalPrice,
    Remarks,
    CreatedAt,
}

#[derive(DeriveIden)]
enum PurchaseOrderItem {
    Table,
    Id,
    PurchaseOrderId,
    ItemId,
    UnitPrice,
    Qty,
    DiscountType,
    DiscountAmount,
    PriceBeforeDiscount,
    TotalPrice,
    TotalReconciled,
    TotalCancelled,
}

#[derive(DeriveIden)]
enum GoodsReceivedNote {
    Table,
    Id,
    UserId,
    PurchaseOrderId,
    SupplierId,
    WarehouseId,
    DiscountType,
    DiscountAmount,
    PriceBeforeDiscount,
    TotalPrice,
    Remarks,
    LandedCostId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum GoodsReceivedNoteItem {
    Table,
    Id,
    GoodsReceivedNoteId,
    ItemId,
    UnitPrice,
    Qty,
    TotalPrice,
}

#[derive(DeriveIden)]
enum PurchaseOrderItemReconciliation {
    Table,
    Id,
    PurchaseOrderItemId,
    GoodsReceivedNoteId,
    Qty,
    CreatedAt,
}

#[derive(DeriveIden)]
enum LandedCost {
    Table,
    Id,
    UserId,
    GoodsReceivedNoteId,
    TransactionId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum LandedCostItem {
    Table,
    Id,
    LandedCostId,
    LandedCostTypeId,
    Amount,
}

#[derive(DeriveIden)]
enum InventoryTransfer {
    Table,
    Id,
    UserId,
    FromWarehouseId,
    ToWarehouseId,
    Resolution,
    ResolvedBy,
    ResolvedOn,
    ResolutionRemarks,
    CreatedAt,
}

#[derive(DeriveIden)]
enum CurrentStock {
    Table,
    EntrySpecifier,
    WarehouseId,
    ItemId,
    GoodsReceivedNoteId,
    InventoryTransferId,
    CostPrice,
    LandedCosts,
    Price,
    Qty,
    FloatQty,
    CreatedAt,
}

#[derive(DeriveIden)]
enum InventoryTransferItem {
    Table,
    Id,
    InventoryTransferId,
    EntrySpecifier,
    PrevInventoryTransferId,
    GoodsReceivedNoteId,
    ItemId,
    Qty,
}

#[derive(DeriveIden)]
enum Invoice {
    Table,
    Id,
    UserId,
    WarehouseId,
    TransactionId,
    CostPrice,
    PriceBeforeDiscount,
    Discount,
    PriceAfterDiscount,
    CustomerName,
    CustomerContact,
    CreatedAt,
}

#[derive(DeriveIden)]
enum InvoiceItem {
    Table,
    Id,
    InvoiceId,
    EntrySpecifier,
    GoodsReceivedNoteId,
    InventoryTransferId,
    ItemId,
    Qty,
    CostPrice,
    Price,
}
