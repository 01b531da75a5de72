//! Shared fixtures for repository integration tests.
//!
//! Every test gets its own in-memory SQLite database with the full schema
//! migrated and a small chart of accounts seeded. Tests that need real row
//! locks or exact fixed-point storage use `setup_postgres`, which migrates a
//! throwaway schema in the database named by `DATABASE_URL`.

#![allow(dead_code)]

use std::{env, sync::Arc};

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, EntityTrait, Set};
use sea_orm_migration::MigratorTrait;
use tokio::sync::mpsc;
use uuid::Uuid;
use tradeledger_core::{inventory::Lot, landed_cost::LandedCostEntry};
use tradeledger_shared::{
    config::{FiscalConfig, PostingAccounts},
    notification::{NoopNotifier, NotificationError, SaleNotice, SaleNotifier},
    types::{
        AccountId, BusinessPartnerId, GoodsReceivedNoteId, ItemId, LandedCostTypeId, UserId,
        WarehouseId,
    },
};
use tradeledger_db::{
    entities::{account, business_partner, item, landed_cost_type, users, warehouse},
    migration::Migrator,
    repositories::{
        AppliedLandedCost, ApplyLandedCostInput, CreateGoodsReceivedNoteInput,
        IdempotencyRepository, InvoiceRepository, JournalRepository, LandedCostRepository,
        LotRepository, PaymentRepository, PurchasingRepository, ReceivedLineInput,
        TransferRepository,
    },
};

/// Seeded reference data.
pub struct Fixture {
    pub db: DatabaseConnection,
    pub accounts: PostingAccounts,
    pub stock: AccountId,
    pub sales: AccountId,
    pub cost_of_sales: AccountId,
    pub cash: AccountId,
    pub supplier_payable: AccountId,
    pub freight_expense: AccountId,
    pub freight_payable: AccountId,
    pub warehouse_a: WarehouseId,
    pub warehouse_b: WarehouseId,
    pub item_x: ItemId,
    pub item_y: ItemId,
    pub supplier: BusinessPartnerId,
    pub supplier_without_account: BusinessPartnerId,
    pub officer: UserId,
    pub officer_without_cash: UserId,
    pub freight: LandedCostTypeId,
    pub unconfigured_cost_type: LandedCostTypeId,
    /// Postgres schema owned by this fixture.
    pub schema: Option<String>,
}

/// Connects to a fresh in-memory database and seeds it.
pub async fn setup() -> Fixture {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    let db = Database::connect(options).await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    seed(db, None).await
}

fn get_database_url() -> Option<String> {
    env::var("DATABASE_URL")
        .or_else(|_| env::var("TRADELEDGER__DATABASE__URL"))
        .ok()
}

/// Migrates a fresh schema on Postgres and seeds it.
///
/// Returns `None` when no database is configured or reachable so callers
/// can skip.
pub async fn setup_postgres(max_connections: u32) -> Option<Fixture> {
    let Some(url) = get_database_url() else {
        eprintln!("Skipping test - DATABASE_URL not set");
        return None;
    };
    let admin = match Database::connect(&url).await {
        Ok(db) => db,
        Err(e) => {
            eprintln!("Skipping test - database not available: {}", e);
            return None;
        }
    };
    if admin.get_database_backend() != sea_orm::DbBackend::Postgres {
        eprintln!("Skipping test - DATABASE_URL is not a Postgres database");
        return None;
    }

    let schema = format!("tradeledger_test_{}", Uuid::new_v4().simple());
    admin
        .execute_unprepared(&format!("CREATE SCHEMA {schema}"))
        .await
        .unwrap();
    admin.close().await.unwrap();

    let mut options = ConnectOptions::new(url);
    options
        .max_connections(max_connections)
        .min_connections(1)
        .set_schema_search_path(schema.clone())
        .sqlx_logging(false);
    let db = Database::connect(options).await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    Some(seed(db, Some(schema)).await)
}

async fn seed(db: DatabaseConnection, schema: Option<String>) -> Fixture {
    let stock = insert_account(&db, "1200", "Stock").await;
    let sales = insert_account(&db, "4000", "Sales").await;
    let cost_of_sales = insert_account(&db, "5000", "Cost of Sales").await;
    let cash = insert_account(&db, "1000", "Cash in Hand").await;
    let supplier_payable = insert_account(&db, "2100", "Trade Payables").await;
    let freight_expense = insert_account(&db, "5100", "Freight Inwards").await;
    let freight_payable = insert_account(&db, "2200", "Freight Payable").await;

    let warehouse_a = insert_warehouse(&db, "Main Store").await;
    let warehouse_b = insert_warehouse(&db, "Branch Store").await;
    let item_x = insert_item(&db, "X-100", "Widget").await;
    let item_y = insert_item(&db, "Y-200", "Gadget").await;

    let supplier = insert_partner(&db, "Acme Supplies", Some(supplier_payable)).await;
    let supplier_without_account = insert_partner(&db, "Cash Supplier", None).await;

    let officer = insert_user(&db, "Sales Officer", Some(cash)).await;
    let officer_without_cash = insert_user(&db, "Trainee", None).await;

    let freight = insert_cost_type(&db, "Freight", Some((freight_expense, freight_payable))).await;
    let unconfigured_cost_type = insert_cost_type(&db, "Duty", None).await;

    Fixture {
        db,
        accounts: PostingAccounts {
            stock_account_id: stock.into_inner(),
            sales_account_id: sales.into_inner(),
            cost_of_sales_account_id: cost_of_sales.into_inner(),
        },
        stock,
        sales,
        cost_of_sales,
        cash,
        supplier_payable,
        freight_expense,
        freight_payable,
        warehouse_a,
        warehouse_b,
        item_x,
        item_y,
        supplier,
        supplier_without_account,
        officer,
        officer_without_cash,
        freight,
        unconfigured_cost_type,
        schema,
    }
}

impl Fixture {
    /// Drops the Postgres schema created by `setup_postgres`.
    pub async fn teardown(self) {
        if let Some(schema) = &self.schema {
            self.db
                .execute_unprepared(&format!("DROP SCHEMA {schema} CASCADE"))
                .await
                .unwrap();
        }
    }

    pub fn lots(&self) -> LotRepository {
        LotRepository::new(self.db.clone())
    }

    pub fn journal(&self) -> JournalRepository {
        JournalRepository::new(self.db.clone())
    }

    pub fn purchasing(&self) -> PurchasingRepository {
        PurchasingRepository::new(self.db.clone())
    }

    pub fn landed_costs(&self) -> LandedCostRepository {
        LandedCostRepository::new(self.db.clone(), self.accounts)
    }

    pub fn transfers(&self) -> TransferRepository {
        TransferRepository::new(self.db.clone())
    }

    pub fn invoices(&self) -> InvoiceRepository {
        self.invoices_with(Arc::new(NoopNotifier))
    }

    pub fn invoices_with(&self, notifier: Arc<dyn SaleNotifier>) -> InvoiceRepository {
        InvoiceRepository::new(self.db.clone(), self.accounts, notifier)
    }

    pub fn payments(&self) -> PaymentRepository {
        PaymentRepository::new(self.db.clone(), FiscalConfig::default())
    }

    pub fn idempotency(&self) -> IdempotencyRepository {
        IdempotencyRepository::new(self.db.clone())
    }

    /// Receives goods into `warehouse` without a purchase order.
    pub async fn receive(
        &self,
        warehouse: WarehouseId,
        lines: &[(ItemId, i32, Decimal)],
    ) -> GoodsReceivedNoteId {
        let note = self
            .purchasing()
            .create_goods_received_note(CreateGoodsReceivedNoteInput {
                user_id: self.officer,
                supplier_id: self.supplier,
                warehouse_id: warehouse,
                purchase_order_id: None,
                discount_type: tradeledger_core::purchasing::DiscountType::Amount,
                discount_amount: Decimal::ZERO,
                remarks: None,
                lines: lines
                    .iter()
                    .map(|&(item_id, qty, unit_price)| ReceivedLineInput {
                        item_id,
                        qty,
                        unit_price,
                    })
                    .collect(),
            })
            .await
            .unwrap();
        GoodsReceivedNoteId::from_uuid(note.note.id)
    }

    /// Receives goods and applies a freight landed cost, opening the lots.
    pub async fn stock_up(
        &self,
        warehouse: WarehouseId,
        lines: &[(ItemId, i32, Decimal)],
        freight: Decimal,
    ) -> AppliedLandedCost {
        let note_id = self.receive(warehouse, lines).await;
        self.landed_costs()
            .apply_landed_cost(ApplyLandedCostInput {
                user_id: self.officer,
                goods_received_note_id: note_id,
                entries: vec![LandedCostEntry {
                    cost_type_id: self.freight,
                    amount: freight,
                }],
                posting_date: None,
            })
            .await
            .unwrap()
    }

    /// Re-reads a lot from the database.
    pub async fn reload(&self, lot: &Lot) -> Lot {
        self.lots()
            .find(lot.key.entry_specifier)
            .await
            .unwrap()
            .unwrap()
    }
}

/// Notifier forwarding every notice to a channel.
pub struct ChannelNotifier(pub mpsc::UnboundedSender<SaleNotice>);

#[async_trait::async_trait]
impl SaleNotifier for ChannelNotifier {
    async fn notify_sale(&self, notice: &SaleNotice) -> Result<(), NotificationError> {
        let _ = self.0.send(notice.clone());
        Ok(())
    }
}

/// Notifier that always fails.
pub struct FailingNotifier;

#[async_trait::async_trait]
impl SaleNotifier for FailingNotifier {
    async fn notify_sale(&self, _notice: &SaleNotice) -> Result<(), NotificationError> {
        Err(NotificationError::NoRecipients)
    }
}

pub async fn insert_account(db: &DatabaseConnection, code: &str, name: &str) -> AccountId {
    let id = AccountId::new();
    account::Entity::insert(account::ActiveModel {
        id: Set(id.into_inner()),
        code: Set(code.to_string()),
        name: Set(name.to_string()),
        created_at: Set(Utc::now().into()),
    })
    .exec(db)
    .await
    .unwrap();
    id
}

pub async fn insert_warehouse(db: &DatabaseConnection, name: &str) -> WarehouseId {
    let id = WarehouseId::new();
    warehouse::Entity::insert(warehouse::ActiveModel {
        id: Set(id.into_inner()),
        name: Set(name.to_string()),
        created_at: Set(Utc::now().into()),
    })
    .exec(db)
    .await
    .unwrap();
    id
}

pub async fn insert_item(db: &DatabaseConnection, code: &str, name: &str) -> ItemId {
    let id = ItemId::new();
    item::Entity::insert(item::ActiveModel {
        id: Set(id.into_inner()),
        item_code: Set(code.to_string()),
        name: Set(name.to_string()),
        created_at: Set(Utc::now().into()),
    })
    .exec(db)
    .await
    .unwrap();
    id
}

pub async fn insert_partner(
    db: &DatabaseConnection,
    name: &str,
    payable: Option<AccountId>,
) -> BusinessPartnerId {
    let id = BusinessPartnerId::new();
    business_partner::Entity::insert(business_partner::ActiveModel {
        id: Set(id.into_inner()),
        name: Set(name.to_string()),
        payable_account_id: Set(payable.map(AccountId::into_inner)),
        created_at: Set(Utc::now().into()),
    })
    .exec(db)
    .await
    .unwrap();
    id
}

pub async fn insert_user(db: &DatabaseConnection, name: &str, cash: Option<AccountId>) -> UserId {
    let id = UserId::new();
    users::Entity::insert(users::ActiveModel {
        id: Set(id.into_inner()),
        name: Set(name.to_string()),
        cash_account_id: Set(cash.map(AccountId::into_inner)),
        created_at: Set(Utc::now().into()),
    })
    .exec(db)
    .await
    .unwrap();
    id
}

pub async fn insert_cost_type(
    db: &DatabaseConnection,
    name: &str,
    accounts: Option<(AccountId, AccountId)>,
) -> LandedCostTypeId {
    let id = LandedCostTypeId::new();
    landed_cost_type::Entity::insert(landed_cost_type::ActiveModel {
        id: Set(id.into_inner()),
        name: Set(name.to_string()),
        expense_account_id: Set(accounts.map(|(expense, _)| expense.into_inner())),
        payable_account_id: Set(accounts.map(|(_, payable)| payable.into_inner())),
    })
    .exec(db)
    .await
    .unwrap();
    id
}
