//! Supplier payment vouchers.

use std::collections::HashMap;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait, QueryFilter, Set,
    TransactionTrait,
};
use tracing::{info, instrument};
use tradeledger_core::payment::{
    PaymentAllocation, payment_journal, validate_allocations, validate_posting_date,
};
use tradeledger_shared::{
    config::FiscalConfig,
    types::{AccountId, BusinessPartnerId, PaymentVoucherId, TransactionId, UserId},
};
use uuid::Uuid;

use crate::entities::{
    business_partner, business_partner_financial, payment_voucher,
    sea_orm_active_enums::EntryType,
};
use crate::error::OperationError;
use crate::repositories::journal;

/// Input for paying one or more suppliers from a single account.
#[derive(Debug, Clone)]
pub struct PaySuppliersInput {
    /// Acting user.
    pub user_id: UserId,
    /// Journal posting date.
    pub posting_date: NaiveDate,
    /// Bank or cash account paid from.
    pub from_account_id: AccountId,
    /// Total paid.
    pub amount: Decimal,
    /// Split of the total per supplier.
    pub allocations: Vec<PaymentAllocation>,
    /// Journal remark.
    pub remark: Option<String>,
    /// Date the payment takes effect on the supplier ledger.
    pub effective_date: Option<NaiveDate>,
    /// Cheque number, if paid by cheque.
    pub check_number: Option<String>,
    /// Name printed on the cheque.
    pub payee: Option<String>,
    /// Cheque due date.
    pub due_date: Option<NaiveDate>,
}

/// A recorded payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaymentVoucherRecorded {
    /// Voucher row.
    pub voucher_id: PaymentVoucherId,
    /// Payment journal.
    pub transaction_id: TransactionId,
}

/// Repository for supplier payments.
#[derive(Debug, Clone)]
pub struct PaymentRepository {
    db: DatabaseConnection,
    fiscal: FiscalConfig,
}

impl PaymentRepository {
    /// Creates a new payment repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection, fiscal: FiscalConfig) -> Self {
        Self { db, fiscal }
    }

    /// Pays suppliers: credits the paying account, debits each supplier's
    /// payable account and records the voucher.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The posting date is before the current financial year or in the future
    /// - The amount is not positive or the allocations do not add up to it
    /// - A supplier does not exist or has no payable account
    /// - Database operation fails
    #[instrument(skip(self, input), fields(amount = %input.amount, suppliers = input.allocations.len()))]
    pub async fn pay_suppliers(
        &self,
        input: PaySuppliersInput,
    ) -> Result<PaymentVoucherRecorded, OperationError> {
        let today = Utc::now().date_naive();
        validate_posting_date(input.posting_date, today, self.fiscal.year_start_month)?;
        validate_allocations(input.amount, &input.allocations)?;

        let txn = self.db.begin().await?;

        let payables = supplier_payables(&txn, &input.allocations).await?;
        let transaction_id = journal::post_journal(
            &txn,
            input.user_id,
            input.posting_date,
            input.remark.clone(),
            payment_journal(input.from_account_id, input.amount, &payables),
        )
        .await?;

        let now = Utc::now();
        let rows: Vec<business_partner_financial::ActiveModel> = input
            .allocations
            .iter()
            .map(|allocation| business_partner_financial::ActiveModel {
                id: Set(Uuid::now_v7()),
                business_partner_id: Set(allocation.business_partner_id.into_inner()),
                transaction_id: Set(transaction_id.into_inner()),
                entry_type: Set(EntryType::Debit),
                amount: Set(allocation.amount),
                effective_date: Set(input.effective_date),
                created_at: Set(now.into()),
            })
            .collect();
        business_partner_financial::Entity::insert_many(rows)
            .exec(&txn)
            .await?;

        let voucher_id = PaymentVoucherId::new();
        let voucher = payment_voucher::ActiveModel {
            id: Set(voucher_id.into_inner()),
            transaction_id: Set(transaction_id.into_inner()),
            from_account_id: Set(input.from_account_id.into_inner()),
            amount: Set(input.amount),
            check_number: Set(input.check_number.clone()),
            payee: Set(input.payee.clone()),
            due_date: Set(input.due_date),
            effective_date: Set(input.effective_date),
            created_at: Set(now.into()),
        };
        payment_voucher::Entity::insert(voucher).exec(&txn).await?;

        txn.commit().await?;

        info!(%voucher_id, %transaction_id, "Supplier payment recorded");
        Ok(PaymentVoucherRecorded {
            voucher_id,
            transaction_id,
        })
    }

    /// Finds a payment voucher.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_voucher(
        &self,
        voucher_id: PaymentVoucherId,
    ) -> Result<Option<payment_voucher::Model>, DbErr> {
        payment_voucher::Entity::find_by_id(voucher_id.into_inner())
            .one(&self.db)
            .await
    }
}

/// Payable account and amount per allocation, in allocation order.
async fn supplier_payables(
    txn: &DatabaseTransaction,
    allocations: &[PaymentAllocation],
) -> Result<Vec<(AccountId, Decimal)>, OperationError> {
    let ids: Vec<Uuid> = allocations
        .iter()
        .map(|a| a.business_partner_id.into_inner())
        .collect();
    let partners: HashMap<Uuid, Option<Uuid>> = business_partner::Entity::find()
        .filter(business_partner::Column::Id.is_in(ids))
        .all(txn)
        .await?
        .into_iter()
        .map(|p| (p.id, p.payable_account_id))
        .collect();

    allocations
        .iter()
        .map(|allocation| {
            let partner_id: BusinessPartnerId = allocation.business_partner_id;
            match partners.get(&partner_id.into_inner()) {
                None => Err(OperationError::NotFound(format!("business partner {partner_id}"))),
                Some(None) => Err(OperationError::MissingSupplierAccount(partner_id)),
                Some(Some(account)) => Ok((AccountId::from_uuid(*account), allocation.amount)),
            }
        })
        .collect()
}
