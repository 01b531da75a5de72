//! Journal poster.
//!
//! Every posting opens a `transaction` header and writes one
//! `account_transaction` row per journal line. Lines are normalized and
//! re-checked for balance before anything is inserted.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set,
};
use tracing::debug;
use tradeledger_core::ledger::{self, JournalLine, JournalTotals, normalize_journal};
use tradeledger_shared::types::{AccountId, TransactionId, UserId};
use uuid::Uuid;

use crate::entities::{account_transaction, sea_orm_active_enums::EntryType, transaction};
use crate::error::OperationError;

/// Read access to posted journals.
#[derive(Debug, Clone)]
pub struct JournalRepository {
    db: DatabaseConnection,
}

impl JournalRepository {
    /// Creates a new journal repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds a transaction header.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_transaction(
        &self,
        transaction_id: TransactionId,
    ) -> Result<Option<transaction::Model>, DbErr> {
        transaction::Entity::find_by_id(transaction_id.into_inner())
            .one(&self.db)
            .await
    }

    /// Lists the lines posted under a transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn lines(&self, transaction_id: TransactionId) -> Result<Vec<JournalLine>, DbErr> {
        let rows = account_transaction::Entity::find()
            .filter(account_transaction::Column::TransactionId.eq(transaction_id.into_inner()))
            .order_by_asc(account_transaction::Column::Id)
            .all(&self.db)
            .await?;

        Ok(rows.into_iter().map(line_from_model).collect())
    }

    /// Net debit balance of an account across all postings.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn account_balance(&self, account_id: AccountId) -> Result<Decimal, DbErr> {
        let rows = account_transaction::Entity::find()
            .filter(account_transaction::Column::AccountId.eq(account_id.into_inner()))
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| line_from_model(row).signed_amount())
            .sum())
    }
}

fn line_from_model(row: account_transaction::Model) -> JournalLine {
    let account_id = AccountId::from_uuid(row.account_id);
    match row.entry_type {
        EntryType::Debit => JournalLine::debit(account_id, row.amount),
        EntryType::Credit => JournalLine::credit(account_id, row.amount),
    }
}

/// Inserts a transaction header and returns its id.
pub(crate) async fn open_transaction<C>(
    conn: &C,
    user_id: UserId,
    posting_date: NaiveDate,
    remark: Option<String>,
) -> Result<TransactionId, DbErr>
where
    C: ConnectionTrait,
{
    let id = TransactionId::new();
    let header = transaction::ActiveModel {
        id: Set(id.into_inner()),
        user_id: Set(user_id.into_inner()),
        datetime: Set(Utc::now().into()),
        posting_date: Set(posting_date),
        remark: Set(remark),
    };
    transaction::Entity::insert(header).exec(conn).await?;
    Ok(id)
}

/// Writes journal lines under an existing transaction.
///
/// Zero-amount lines are dropped; the rest must be non-negative and
/// balanced or nothing is written.
pub(crate) async fn issue_journal_entries<C>(
    conn: &C,
    transaction_id: TransactionId,
    lines: Vec<JournalLine>,
) -> Result<JournalTotals, OperationError>
where
    C: ConnectionTrait,
{
    let lines = normalize_journal(lines)?;
    if lines.is_empty() {
        return Ok(JournalTotals::default());
    }
    let totals = ledger::validate_journal(&lines)?;

    let rows: Vec<account_transaction::ActiveModel> = lines
        .iter()
        .map(|line| account_transaction::ActiveModel {
            id: Set(Uuid::now_v7()),
            transaction_id: Set(transaction_id.into_inner()),
            account_id: Set(line.account_id.into_inner()),
            entry_type: Set(line.entry_type.into()),
            amount: Set(line.amount),
        })
        .collect();
    account_transaction::Entity::insert_many(rows).exec(conn).await?;

    debug!(
        transaction_id = %transaction_id,
        lines = lines.len(),
        debits = %totals.debits,
        "Journal entries issued"
    );
    Ok(totals)
}

/// Opens a transaction and posts `lines` under it.
pub(crate) async fn post_journal<C>(
    conn: &C,
    user_id: UserId,
    posting_date: NaiveDate,
    remark: Option<String>,
    lines: Vec<JournalLine>,
) -> Result<TransactionId, OperationError>
where
    C: ConnectionTrait,
{
    let transaction_id = open_transaction(conn, user_id, posting_date, remark).await?;
    issue_journal_entries(conn, transaction_id, lines).await?;
    Ok(transaction_id)
}
