//! Supplier payment voucher tests.

#![allow(clippy::uninlined_format_args)]

mod common;

use chrono::{Duration, Months, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use tradeledger_core::{
    ledger::JournalLine,
    payment::{PaymentAllocation, PaymentError},
};
use tradeledger_db::{
    OperationError,
    entities::{business_partner_financial, sea_orm_active_enums::EntryType},
    repositories::PaySuppliersInput,
};
use tradeledger_shared::types::BusinessPartnerId;

use common::Fixture;

fn payment(f: &Fixture, amount: Decimal, allocations: &[(BusinessPartnerId, Decimal)]) -> PaySuppliersInput {
    PaySuppliersInput {
        user_id: f.officer,
        posting_date: Utc::now().date_naive(),
        from_account_id: f.cash,
        amount,
        allocations: allocations
            .iter()
            .map(|&(business_partner_id, amount)| PaymentAllocation {
                business_partner_id,
                amount,
            })
            .collect(),
        remark: Some("Settlement".to_owned()),
        effective_date: None,
        check_number: Some("000123".to_owned()),
        payee: Some("Suppliers".to_owned()),
        due_date: None,
    }
}

#[tokio::test]
async fn test_payment_settles_each_supplier() {
    let f = common::setup().await;
    let freight_payable = f.freight_payable;
    let carrier = common::insert_partner(&f.db, "Carrier", Some(freight_payable)).await;

    let input = payment(
        &f,
        dec!(500),
        &[(f.supplier, dec!(300)), (carrier, dec!(200))],
    );
    let posting_date = input.posting_date;
    let recorded = f.payments().pay_suppliers(input).await.unwrap();

    let header = f
        .journal()
        .find_transaction(recorded.transaction_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(header.posting_date, posting_date);
    assert_eq!(header.user_id, f.officer.into_inner());
    assert_eq!(header.remark.as_deref(), Some("Settlement"));

    let lines = f.journal().lines(recorded.transaction_id).await.unwrap();
    assert_eq!(lines.len(), 3);
    assert!(lines.contains(&JournalLine::credit(f.cash, dec!(500))));
    assert!(lines.contains(&JournalLine::debit(f.supplier_payable, dec!(300))));
    assert!(lines.contains(&JournalLine::debit(f.freight_payable, dec!(200))));

    let sub_ledger = business_partner_financial::Entity::find()
        .filter(business_partner_financial::Column::TransactionId.eq(recorded.transaction_id.into_inner()))
        .all(&f.db)
        .await
        .unwrap();
    assert_eq!(sub_ledger.len(), 2);
    assert!(sub_ledger.iter().all(|row| row.entry_type == EntryType::Debit));
    assert_eq!(sub_ledger.iter().map(|row| row.amount).sum::<Decimal>(), dec!(500));

    let voucher = f
        .payments()
        .find_voucher(recorded.voucher_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(voucher.amount, dec!(500));
    assert_eq!(voucher.from_account_id, f.cash.into_inner());
    assert_eq!(voucher.check_number.as_deref(), Some("000123"));
}

#[tokio::test]
async fn test_allocations_must_add_up() {
    let f = common::setup().await;
    let err = f
        .payments()
        .pay_suppliers(payment(&f, dec!(500), &[(f.supplier, dec!(400))]))
        .await
        .unwrap_err();
    assert!(
        matches!(
            err,
            OperationError::Payment(PaymentError::AllocationMismatch { .. })
        ),
        "unexpected error: {:?}",
        err
    );
    assert_eq!(f.journal().account_balance(f.cash).await.unwrap(), Decimal::ZERO);
}

#[tokio::test]
async fn test_posting_date_must_be_in_current_financial_year() {
    let f = common::setup().await;
    let today = Utc::now().date_naive();

    let mut stale = payment(&f, dec!(100), &[(f.supplier, dec!(100))]);
    stale.posting_date = today.checked_sub_months(Months::new(24)).unwrap();
    let err = f.payments().pay_suppliers(stale).await.unwrap_err();
    assert!(
        matches!(
            err,
            OperationError::Payment(PaymentError::OutsideFinancialYear { .. })
        ),
        "unexpected error: {:?}",
        err
    );

    let mut future = payment(&f, dec!(100), &[(f.supplier, dec!(100))]);
    future.posting_date = today + Duration::days(1);
    let err = f.payments().pay_suppliers(future).await.unwrap_err();
    assert!(
        matches!(err, OperationError::Payment(PaymentError::FuturePostingDate(_))),
        "unexpected error: {:?}",
        err
    );
}

#[tokio::test]
async fn test_supplier_without_payable_account_rolls_back() {
    let f = common::setup().await;
    let err = f
        .payments()
        .pay_suppliers(payment(
            &f,
            dec!(100),
            &[(f.supplier, dec!(60)), (f.supplier_without_account, dec!(40))],
        ))
        .await
        .unwrap_err();
    assert!(
        matches!(err, OperationError::MissingSupplierAccount(s) if s == f.supplier_without_account),
        "unexpected error: {:?}",
        err
    );
    assert_eq!(f.journal().account_balance(f.cash).await.unwrap(), Decimal::ZERO);
    assert_eq!(
        f.journal().account_balance(f.supplier_payable).await.unwrap(),
        Decimal::ZERO
    );
}
