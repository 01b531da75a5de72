//! Concurrency and storage tests against a real Postgres.
//!
//! These need `DATABASE_URL` (or `TRADELEDGER__DATABASE__URL`) to point at a
//! Postgres server and are skipped otherwise. Each test migrates its own
//! schema and runs through a multi-connection pool, so concurrent callers
//! really contend for row locks instead of queueing on one connection.

#![allow(clippy::uninlined_format_args)]
#![allow(clippy::items_after_statements)]

mod common;

use std::sync::Arc;

use futures::future::join_all;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tokio::sync::Barrier;
use tradeledger_core::{
    inventory::{InventoryError, StockRequest},
    purchasing::DiscountType,
    sale::ExecutionType,
    transfer::TransferResolution,
};
use tradeledger_db::{
    OperationError,
    repositories::{
        CreateGoodsReceivedNoteInput, CreateInvoiceInput, CreatePurchaseOrderInput,
        CreateTransferInput, InvoiceOutcome, PurchaseOrderLineInput, ReceivedLineInput,
        RecordOutcome, TransferActionInput, TransferActionOutcome,
    },
};
use tradeledger_shared::types::{InventoryTransferId, PurchaseOrderId};

use common::Fixture;

const POOL_SIZE: u32 = 16;

fn sale(f: &Fixture, qty: i32) -> CreateInvoiceInput {
    CreateInvoiceInput {
        request_id: None,
        execution_type: ExecutionType::Execute,
        user_id: f.officer,
        warehouse_id: f.warehouse_a,
        lines: vec![StockRequest::new(f.item_x, qty)],
        discount: Decimal::ZERO,
        customer_name: None,
        customer_contact: None,
    }
}

#[tokio::test]
async fn test_unit_costs_round_trip_exactly() {
    let Some(f) = common::setup_postgres(POOL_SIZE).await else {
        return;
    };

    // 16 significant digits: more than an f64 carries.
    let applied = f
        .stock_up(f.warehouse_a, &[(f.item_x, 3, dec!(1234567890.12))], dec!(1))
        .await;
    let lot = f.reload(&applied.lots[0]).await;
    assert_eq!(lot.cost_price, dec!(1234567890.12));
    assert_eq!(lot.landed_costs, dec!(0.333333));
    assert_eq!(lot.price, dec!(1234567890.453333));
    assert_eq!(
        f.journal().account_balance(f.stock).await.unwrap(),
        dec!(3703703670.36)
    );

    let outcome = f.invoices().create_invoice(sale(&f, 1)).await.unwrap();
    let InvoiceOutcome::Issued { invoice_id, .. } = outcome else {
        panic!("expected an issued invoice, got {:?}", outcome);
    };
    let stored = f.invoices().find_invoice(invoice_id).await.unwrap().unwrap();
    assert_eq!(stored.invoice.price_after_discount, dec!(1234567890.45));
    assert_eq!(stored.invoice.cost_price, dec!(1234567890.12));
    assert_eq!(stored.lines[0].price, dec!(1234567890.453333));
    assert_eq!(
        f.journal().account_balance(f.cash).await.unwrap(),
        dec!(1234567890.45)
    );
    assert_eq!(
        f.journal().account_balance(f.stock).await.unwrap(),
        dec!(2469135780.24)
    );

    f.teardown().await;
}

#[tokio::test]
async fn test_racing_sales_never_overdraw_a_lot() {
    let Some(f) = common::setup_postgres(POOL_SIZE).await else {
        return;
    };
    let applied = f
        .stock_up(f.warehouse_a, &[(f.item_x, 10, dec!(10))], Decimal::ZERO)
        .await;

    const CALLERS: usize = 8;
    let barrier = Arc::new(Barrier::new(CALLERS));
    let handles: Vec<_> = (0..CALLERS)
        .map(|_| {
            let repo = f.invoices();
            let input = sale(&f, 3);
            let barrier = Arc::clone(&barrier);
            tokio::spawn(async move {
                barrier.wait().await;
                repo.create_invoice(input).await
            })
        })
        .collect();

    let results: Vec<_> = join_all(handles)
        .await
        .into_iter()
        .map(|joined| joined.unwrap())
        .collect();

    let issued = results
        .iter()
        .filter(|r| matches!(r, Ok(InvoiceOutcome::Issued { .. })))
        .count();
    assert_eq!(issued, 3, "results: {:?}", results);
    for err in results.iter().filter_map(|r| r.as_ref().err()) {
        assert!(
            matches!(
                err,
                OperationError::Inventory(InventoryError::InsufficientStock { .. })
            ),
            "unexpected error: {:?}",
            err
        );
    }

    let lot = f.reload(&applied.lots[0]).await;
    assert_eq!((lot.qty, lot.float_qty), (1, 0));
    assert_eq!(
        f.journal().account_balance(f.cost_of_sales).await.unwrap(),
        dec!(90)
    );

    f.teardown().await;
}

#[tokio::test]
async fn test_racing_transfer_actions_resolve_once() {
    let Some(f) = common::setup_postgres(POOL_SIZE).await else {
        return;
    };
    let applied = f
        .stock_up(f.warehouse_a, &[(f.item_x, 100, dec!(10))], dec!(50))
        .await;
    let transfer = f
        .transfers()
        .create_transfer(CreateTransferInput {
            user_id: f.officer,
            from_warehouse_id: f.warehouse_a,
            to_warehouse_id: f.warehouse_b,
            lines: vec![StockRequest::new(f.item_x, 30)],
        })
        .await
        .unwrap();
    let transfer_id = InventoryTransferId::from_uuid(transfer.transfer.id);

    const CALLERS: usize = 8;
    let barrier = Arc::new(Barrier::new(CALLERS));
    let officer = f.officer;
    let handles: Vec<_> = (0..CALLERS)
        .map(|i| {
            let repo = f.transfers();
            let barrier = Arc::clone(&barrier);
            tokio::spawn(async move {
                barrier.wait().await;
                let resolution = if i % 2 == 0 {
                    TransferResolution::Approved
                } else {
                    TransferResolution::Rejected
                };
                repo.action_transfer(TransferActionInput {
                    request_id: Some(format!("pg-action-{}", i)),
                    transfer_id,
                    user_id: officer,
                    resolution,
                    remarks: None,
                })
                .await
            })
        })
        .collect();

    let outcomes: Vec<TransferActionOutcome> = join_all(handles)
        .await
        .into_iter()
        .map(|joined| joined.unwrap().unwrap())
        .collect();

    let resolved: Vec<&TransferActionOutcome> = outcomes
        .iter()
        .filter(|o| matches!(o, TransferActionOutcome::Resolved { .. }))
        .collect();
    assert_eq!(resolved.len(), 1, "outcomes: {:?}", outcomes);

    let source = f.reload(&applied.lots[0]).await;
    assert_eq!(source.float_qty, 0);
    let destination: i32 = f
        .lots()
        .warehouse_stock(f.warehouse_b)
        .await
        .unwrap()
        .iter()
        .map(|l| l.qty)
        .sum();
    assert_eq!(source.qty + destination, 100);
    match resolved[0] {
        TransferActionOutcome::Resolved {
            resolution: TransferResolution::Rejected,
            ..
        } => assert_eq!(destination, 0),
        _ => assert_eq!(destination, 30),
    }

    f.teardown().await;
}

#[tokio::test]
async fn test_concurrent_receipts_never_over_reconcile() {
    let Some(f) = common::setup_postgres(POOL_SIZE).await else {
        return;
    };
    let order = f
        .purchasing()
        .create_purchase_order(CreatePurchaseOrderInput {
            user_id: f.officer,
            supplier_id: f.supplier,
            warehouse_id: f.warehouse_a,
            discount_type: DiscountType::Amount,
            discount_amount: Decimal::ZERO,
            remarks: None,
            lines: vec![PurchaseOrderLineInput {
                item_id: f.item_x,
                qty: 10,
                unit_price: dec!(10),
                discount_type: DiscountType::Amount,
                discount_amount: Decimal::ZERO,
            }],
        })
        .await
        .unwrap();
    let order_id = PurchaseOrderId::from_uuid(order.order.id);

    const CALLERS: usize = 4;
    let barrier = Arc::new(Barrier::new(CALLERS));
    let handles: Vec<_> = (0..CALLERS)
        .map(|_| {
            let repo = f.purchasing();
            let barrier = Arc::clone(&barrier);
            let input = CreateGoodsReceivedNoteInput {
                user_id: f.officer,
                supplier_id: f.supplier,
                warehouse_id: f.warehouse_a,
                purchase_order_id: Some(order_id),
                discount_type: DiscountType::Amount,
                discount_amount: Decimal::ZERO,
                remarks: None,
                lines: vec![ReceivedLineInput {
                    item_id: f.item_x,
                    qty: 5,
                    unit_price: dec!(10),
                }],
            };
            tokio::spawn(async move {
                barrier.wait().await;
                repo.create_goods_received_note(input).await
            })
        })
        .collect();

    let notes: Vec<_> = join_all(handles)
        .await
        .into_iter()
        .map(|joined| joined.unwrap().unwrap())
        .collect();
    let reconciled: i32 = notes
        .iter()
        .flat_map(|n| n.reconciliations.iter().map(|r| r.qty))
        .sum();
    assert_eq!(reconciled, 10);

    let stored = f
        .purchasing()
        .find_purchase_order(order_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.lines[0].total_reconciled, 10);
    assert_eq!(stored.lines[0].total_cancelled, 0);

    f.teardown().await;
}

#[tokio::test]
async fn test_racing_request_ids_admit_one() {
    let Some(f) = common::setup_postgres(POOL_SIZE).await else {
        return;
    };

    const CALLERS: usize = 6;
    let barrier = Arc::new(Barrier::new(CALLERS));
    let handles: Vec<_> = (0..CALLERS)
        .map(|_| {
            let guard = f.idempotency();
            let barrier = Arc::clone(&barrier);
            tokio::spawn(async move {
                barrier.wait().await;
                guard.record_committed("pg-batch-1").await
            })
        })
        .collect();

    let outcomes: Vec<RecordOutcome> = join_all(handles)
        .await
        .into_iter()
        .map(|joined| joined.unwrap().unwrap())
        .collect();
    assert_eq!(
        outcomes
            .iter()
            .filter(|o| **o == RecordOutcome::Recorded)
            .count(),
        1
    );

    f.teardown().await;
}
