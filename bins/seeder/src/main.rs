//! Reference data seeder for Tradeledger development and testing.
//!
//! Seeds the posting accounts named in configuration, two warehouses, a few
//! items, a supplier, a sales officer with a cash account and the landed
//! cost types. Existing rows are left untouched, so the seeder can be run
//! repeatedly.
//!
//! Usage: cargo run --bin seeder

use anyhow::Context;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use tracing::info;
use tracing_subscriber::EnvFilter;
use tradeledger_db::entities::{
    account, business_partner, item, landed_cost_type, users, warehouse,
};
use tradeledger_shared::config::{AppConfig, PostingAccounts};
use uuid::Uuid;

const CASH_ACCOUNT_ID: Uuid = Uuid::from_u128(0x0192_a5b0_0000_7000_8000_0000_0000_0010);
const TRADE_PAYABLES_ID: Uuid = Uuid::from_u128(0x0192_a5b0_0000_7000_8000_0000_0000_0011);
const FREIGHT_EXPENSE_ID: Uuid = Uuid::from_u128(0x0192_a5b0_0000_7000_8000_0000_0000_0012);
const FREIGHT_PAYABLE_ID: Uuid = Uuid::from_u128(0x0192_a5b0_0000_7000_8000_0000_0000_0013);
const DUTY_EXPENSE_ID: Uuid = Uuid::from_u128(0x0192_a5b0_0000_7000_8000_0000_0000_0014);

const MAIN_STORE_ID: Uuid = Uuid::from_u128(0x0192_a5b0_0000_7000_8000_0000_0000_0100);
const BRANCH_STORE_ID: Uuid = Uuid::from_u128(0x0192_a5b0_0000_7000_8000_0000_0000_0101);

const ITEM_IDS: [Uuid; 3] = [
    Uuid::from_u128(0x0192_a5b0_0000_7000_8000_0000_0000_0500),
    Uuid::from_u128(0x0192_a5b0_0000_7000_8000_0000_0000_0501),
    Uuid::from_u128(0x0192_a5b0_0000_7000_8000_0000_0000_0502),
];

const SUPPLIER_ID: Uuid = Uuid::from_u128(0x0192_a5b0_0000_7000_8000_0000_0000_0200);
const OFFICER_ID: Uuid = Uuid::from_u128(0x0192_a5b0_0000_7000_8000_0000_0000_0300);

const FREIGHT_TYPE_ID: Uuid = Uuid::from_u128(0x0192_a5b0_0000_7000_8000_0000_0000_0400);
const DUTY_TYPE_ID: Uuid = Uuid::from_u128(0x0192_a5b0_0000_7000_8000_0000_0000_0401);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tradeledger_db=debug")),
        )
        .init();

    let config = AppConfig::load().context("Failed to load configuration")?;

    info!("Connecting to database...");
    let db = tradeledger_db::connect_with(&config.database)
        .await
        .context("Failed to connect to database")?;

    seed_accounts(&db, &config.accounts).await?;
    seed_warehouses(&db).await?;
    seed_items(&db).await?;
    seed_partners(&db).await?;
    seed_officer(&db).await?;
    seed_landed_cost_types(&db).await?;

    info!("Seeding complete");
    Ok(())
}

/// Seeds the chart of accounts the engine posts to.
async fn seed_accounts(db: &DatabaseConnection, posting: &PostingAccounts) -> anyhow::Result<()> {
    let accounts = [
        (posting.stock_account_id, "1200", "Stock"),
        (posting.sales_account_id, "4000", "Sales"),
        (posting.cost_of_sales_account_id, "5000", "Cost of Sales"),
        (CASH_ACCOUNT_ID, "1000", "Cash in Hand"),
        (TRADE_PAYABLES_ID, "2100", "Trade Payables"),
        (FREIGHT_EXPENSE_ID, "5100", "Freight Inwards"),
        (FREIGHT_PAYABLE_ID, "2200", "Freight Payable"),
        (DUTY_EXPENSE_ID, "5110", "Import Duty"),
    ];

    for (id, code, name) in accounts {
        if account::Entity::find_by_id(id).one(db).await?.is_some() {
            info!(code, "Account already exists, skipping");
            continue;
        }
        account::ActiveModel {
            id: Set(id),
            code: Set(code.to_string()),
            name: Set(name.to_string()),
            created_at: Set(Utc::now().into()),
        }
        .insert(db)
        .await
        .with_context(|| format!("Failed to insert account {code}"))?;
        info!(code, name, "Created account");
    }
    Ok(())
}

async fn seed_warehouses(db: &DatabaseConnection) -> anyhow::Result<()> {
    for (id, name) in [(MAIN_STORE_ID, "Main Store"), (BRANCH_STORE_ID, "Branch Store")] {
        if warehouse::Entity::find_by_id(id).one(db).await?.is_some() {
            continue;
        }
        warehouse::ActiveModel {
            id: Set(id),
            name: Set(name.to_string()),
            created_at: Set(Utc::now().into()),
        }
        .insert(db)
        .await
        .with_context(|| format!("Failed to insert warehouse {name}"))?;
        info!(name, "Created warehouse");
    }
    Ok(())
}

async fn seed_items(db: &DatabaseConnection) -> anyhow::Result<()> {
    let items = [
        (ITEM_IDS[0], "WID-100", "Widget"),
        (ITEM_IDS[1], "GAD-200", "Gadget"),
        (ITEM_IDS[2], "SPR-300", "Sprocket"),
    ];

    for (id, code, name) in items {
        if item::Entity::find_by_id(id).one(db).await?.is_some() {
            continue;
        }
        item::ActiveModel {
            id: Set(id),
            item_code: Set(code.to_string()),
            name: Set(name.to_string()),
            created_at: Set(Utc::now().into()),
        }
        .insert(db)
        .await
        .with_context(|| format!("Failed to insert item {code}"))?;
        info!(code, %id, "Created item");
    }
    Ok(())
}

async fn seed_partners(db: &DatabaseConnection) -> anyhow::Result<()> {
    if business_partner::Entity::find_by_id(SUPPLIER_ID)
        .one(db)
        .await?
        .is_some()
    {
        info!("Supplier already exists, skipping");
        return Ok(());
    }
    business_partner::ActiveModel {
        id: Set(SUPPLIER_ID),
        name: Set("Acme Supplies".to_string()),
        payable_account_id: Set(Some(TRADE_PAYABLES_ID)),
        created_at: Set(Utc::now().into()),
    }
    .insert(db)
    .await
    .context("Failed to insert supplier")?;
    info!(id = %SUPPLIER_ID, "Created supplier");
    Ok(())
}

async fn seed_officer(db: &DatabaseConnection) -> anyhow::Result<()> {
    if users::Entity::find_by_id(OFFICER_ID).one(db).await?.is_some() {
        info!("Sales officer already exists, skipping");
        return Ok(());
    }
    users::ActiveModel {
        id: Set(OFFICER_ID),
        name: Set("Sales Officer".to_string()),
        cash_account_id: Set(Some(CASH_ACCOUNT_ID)),
        created_at: Set(Utc::now().into()),
    }
    .insert(db)
    .await
    .context("Failed to insert sales officer")?;
    info!(id = %OFFICER_ID, "Created sales officer");
    Ok(())
}

/// Duty is left without a payable account so its misconfiguration path can
/// be exercised by hand.
async fn seed_landed_cost_types(db: &DatabaseConnection) -> anyhow::Result<()> {
    let types = [
        (FREIGHT_TYPE_ID, "Freight", Some(FREIGHT_EXPENSE_ID), Some(FREIGHT_PAYABLE_ID)),
        (DUTY_TYPE_ID, "Import Duty", Some(DUTY_EXPENSE_ID), None),
    ];

    for (id, name, expense, payable) in types {
        if landed_cost_type::Entity::find_by_id(id).one(db).await?.is_some() {
            continue;
        }
        landed_cost_type::ActiveModel {
            id: Set(id),
            name: Set(name.to_string()),
            expense_account_id: Set(expense),
            payable_account_id: Set(payable),
        }
        .insert(db)
        .await
        .with_context(|| format!("Failed to insert landed cost type {name}"))?;
        info!(name, "Created landed cost type");
    }
    Ok(())
}
