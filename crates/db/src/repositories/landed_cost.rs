//! Landed cost allocator.
//!
//! Applying landed cost to a goods received note is what opens its lots:
//! each received line becomes one lot valued at its unit cost plus its
//! share of the note's landed cost.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait, QueryFilter, QueryOrder,
    Set, TransactionTrait, sea_query::Expr,
};
use tracing::{debug, info, instrument};
use tradeledger_core::{
    inventory::{Lot, LotKey},
    landed_cost::{LandedCostEntry, ReceivedLine, allocate_all, total_landed_cost},
    ledger::JournalLine,
};
use tradeledger_shared::{
    config::PostingAccounts,
    types::{
        AccountId, BusinessPartnerId, EntrySpecifier, GoodsReceivedNoteId, ItemId, LandedCostId,
        LandedCostTypeId, TransactionId, UserId, WarehouseId,
    },
};
use uuid::Uuid;

use crate::entities::{
    business_partner, business_partner_financial, goods_received_note, goods_received_note_item,
    landed_cost, landed_cost_item, landed_cost_type, sea_orm_active_enums::EntryType,
};
use crate::error::OperationError;
use crate::repositories::{journal, lot};

/// Input for applying landed cost to a goods received note.
#[derive(Debug, Clone)]
pub struct ApplyLandedCostInput {
    /// Acting user.
    pub user_id: UserId,
    /// Note receiving the landed cost.
    pub goods_received_note_id: GoodsReceivedNoteId,
    /// Cost entries; zero amounts are recorded but not posted.
    pub entries: Vec<LandedCostEntry>,
    /// Posting date of the journal; today when absent.
    pub posting_date: Option<NaiveDate>,
}

/// Result of applying landed cost.
#[derive(Debug, Clone)]
pub struct AppliedLandedCost {
    /// Landed cost header.
    pub landed_cost_id: LandedCostId,
    /// Journal transaction carrying the cost and closing postings.
    pub transaction_id: TransactionId,
    /// Sum of all entries.
    pub total_landed_cost: Decimal,
    /// Lots opened for the note, in line order.
    pub lots: Vec<Lot>,
}

/// Repository applying landed cost.
#[derive(Debug, Clone)]
pub struct LandedCostRepository {
    db: DatabaseConnection,
    accounts: PostingAccounts,
}

impl LandedCostRepository {
    /// Creates a new landed cost repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection, accounts: PostingAccounts) -> Self {
        Self { db, accounts }
    }

    /// Applies landed cost to a goods received note and opens its lots.
    ///
    /// Posts, in one transaction: debit expense / credit payable for each
    /// entry, then debit stock / credit the supplier's payable account for
    /// the note's price before discount.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - An entry amount is negative
    /// - The note does not exist or already carries a landed cost
    /// - A cost type lacks its expense or payable account
    /// - The supplier lacks a payable account
    /// - Database operation fails
    ///
    /// Nothing is written when any step fails.
    #[instrument(skip(self, input), fields(goods_received_note_id = %input.goods_received_note_id))]
    pub async fn apply_landed_cost(
        &self,
        input: ApplyLandedCostInput,
    ) -> Result<AppliedLandedCost, OperationError> {
        let total = total_landed_cost(&input.entries)?;
        let note_id = input.goods_received_note_id;

        let txn = self.db.begin().await?;

        let note = goods_received_note::Entity::find_by_id(note_id.into_inner())
            .one(&txn)
            .await?
            .ok_or_else(|| OperationError::NotFound(format!("goods received note {note_id}")))?;
        if note.landed_cost_id.is_some() {
            return Err(OperationError::LandedCostAlreadyApplied(note_id));
        }

        let supplier_id = BusinessPartnerId::from_uuid(note.supplier_id);
        let supplier_payable = supplier_payable_account(&txn, supplier_id).await?;
        let cost_accounts = resolve_cost_accounts(&txn, &input.entries).await?;

        let posting_date = input.posting_date.unwrap_or_else(|| Utc::now().date_naive());
        let transaction_id = journal::open_transaction(
            &txn,
            input.user_id,
            posting_date,
            Some(format!("Landed cost for goods received note {note_id}")),
        )
        .await?;

        let landed_cost_id = LandedCostId::new();
        let header = landed_cost::ActiveModel {
            id: Set(landed_cost_id.into_inner()),
            user_id: Set(input.user_id.into_inner()),
            goods_received_note_id: Set(note_id.into_inner()),
            transaction_id: Set(transaction_id.into_inner()),
            created_at: Set(Utc::now().into()),
        };
        landed_cost::Entity::insert(header).exec(&txn).await?;
        link_note(&txn, note_id, landed_cost_id).await?;

        if !input.entries.is_empty() {
            let items: Vec<landed_cost_item::ActiveModel> = input
                .entries
                .iter()
                .map(|entry| landed_cost_item::ActiveModel {
                    id: Set(Uuid::now_v7()),
                    landed_cost_id: Set(landed_cost_id.into_inner()),
                    landed_cost_type_id: Set(entry.cost_type_id.into_inner()),
                    amount: Set(entry.amount),
                })
                .collect();
            landed_cost_item::Entity::insert_many(items).exec(&txn).await?;
        }

        let mut lines = Vec::with_capacity(input.entries.len() * 2 + 2);
        for entry in &input.entries {
            let (expense, payable) = cost_accounts[&entry.cost_type_id];
            lines.push(JournalLine::debit(expense, entry.amount));
            lines.push(JournalLine::credit(payable, entry.amount));
        }
        let stock_account = AccountId::from_uuid(self.accounts.stock_account_id);
        lines.push(JournalLine::debit(stock_account, note.price_before_discount));
        lines.push(JournalLine::credit(supplier_payable, note.price_before_discount));
        journal::issue_journal_entries(&txn, transaction_id, lines).await?;

        let sub_ledger = business_partner_financial::ActiveModel {
            id: Set(Uuid::now_v7()),
            business_partner_id: Set(supplier_id.into_inner()),
            transaction_id: Set(transaction_id.into_inner()),
            entry_type: Set(EntryType::Credit),
            amount: Set(note.price_before_discount),
            effective_date: Set(Some(posting_date)),
            created_at: Set(Utc::now().into()),
        };
        business_partner_financial::Entity::insert(sub_ledger)
            .exec(&txn)
            .await?;

        let lots = open_lots(&txn, &note, total).await?;

        txn.commit().await?;

        info!(
            %landed_cost_id,
            %transaction_id,
            total_landed_cost = %total,
            lots = lots.len(),
            "Landed cost applied"
        );
        Ok(AppliedLandedCost {
            landed_cost_id,
            transaction_id,
            total_landed_cost: total,
            lots,
        })
    }

    /// Lists the entries of a landed cost.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn entries(
        &self,
        landed_cost_id: LandedCostId,
    ) -> Result<Vec<LandedCostEntry>, sea_orm::DbErr> {
        let rows = landed_cost_item::Entity::find()
            .filter(landed_cost_item::Column::LandedCostId.eq(landed_cost_id.into_inner()))
            .order_by_asc(landed_cost_item::Column::Id)
            .all(&self.db)
            .await?;
        Ok(rows
            .into_iter()
            .map(|row| LandedCostEntry {
                cost_type_id: LandedCostTypeId::from_uuid(row.landed_cost_type_id),
                amount: row.amount,
            })
            .collect())
    }
}

async fn supplier_payable_account(
    txn: &DatabaseTransaction,
    supplier_id: BusinessPartnerId,
) -> Result<AccountId, OperationError> {
    let supplier = business_partner::Entity::find_by_id(supplier_id.into_inner())
        .one(txn)
        .await?
        .ok_or_else(|| OperationError::NotFound(format!("business partner {supplier_id}")))?;
    supplier
        .payable_account_id
        .map(AccountId::from_uuid)
        .ok_or(OperationError::MissingSupplierAccount(supplier_id))
}

/// Expense and payable account of every cost type the entries use.
async fn resolve_cost_accounts(
    txn: &DatabaseTransaction,
    entries: &[LandedCostEntry],
) -> Result<HashMap<LandedCostTypeId, (AccountId, AccountId)>, OperationError> {
    let mut ids: Vec<Uuid> = entries.iter().map(|e| e.cost_type_id.into_inner()).collect();
    ids.sort_unstable();
    ids.dedup();
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let types: HashMap<Uuid, landed_cost_type::Model> = landed_cost_type::Entity::find()
        .filter(landed_cost_type::Column::Id.is_in(ids.clone()))
        .all(txn)
        .await?
        .into_iter()
        .map(|t| (t.id, t))
        .collect();

    let mut accounts = HashMap::with_capacity(ids.len());
    for id in ids {
        let cost_type_id = LandedCostTypeId::from_uuid(id);
        let cost_type = types
            .get(&id)
            .ok_or_else(|| OperationError::NotFound(format!("landed cost type {cost_type_id}")))?;
        match (cost_type.expense_account_id, cost_type.payable_account_id) {
            (Some(expense), Some(payable)) => {
                accounts.insert(
                    cost_type_id,
                    (AccountId::from_uuid(expense), AccountId::from_uuid(payable)),
                );
            }
            _ => return Err(OperationError::MissingAccountConfiguration { cost_type_id }),
        }
    }
    Ok(accounts)
}

/// Points the note at its landed cost, once.
async fn link_note(
    txn: &DatabaseTransaction,
    note_id: GoodsReceivedNoteId,
    landed_cost_id: LandedCostId,
) -> Result<(), OperationError> {
    let result = goods_received_note::Entity::update_many()
        .col_expr(
            goods_received_note::Column::LandedCostId,
            Expr::value(landed_cost_id.into_inner()),
        )
        .filter(goods_received_note::Column::Id.eq(note_id.into_inner()))
        .filter(goods_received_note::Column::LandedCostId.is_null())
        .exec(txn)
        .await?;
    if result.rows_affected == 1 {
        Ok(())
    } else {
        Err(OperationError::LandedCostAlreadyApplied(note_id))
    }
}

/// Values every received line and inserts it as a lot.
async fn open_lots(
    txn: &DatabaseTransaction,
    note: &goods_received_note::Model,
    total_landed: Decimal,
) -> Result<Vec<Lot>, OperationError> {
    let items = goods_received_note_item::Entity::find()
        .filter(goods_received_note_item::Column::GoodsReceivedNoteId.eq(note.id))
        .order_by_asc(goods_received_note_item::Column::Id)
        .all(txn)
        .await?;

    let warehouse_id = WarehouseId::from_uuid(note.warehouse_id);
    let received: Vec<ReceivedLine> = items
        .iter()
        .map(|item| ReceivedLine {
            item_id: ItemId::from_uuid(item.item_id),
            warehouse_id,
            qty: item.qty,
            total_cost_price: item.total_price,
        })
        .collect();
    let valuations = allocate_all(&received, note.price_before_discount, total_landed)?;

    let received_at: DateTime<Utc> = note.created_at.with_timezone(&Utc);
    let mut lots = Vec::with_capacity(received.len());
    for (line, valuation) in received.iter().zip(valuations) {
        let opened = Lot {
            key: LotKey {
                entry_specifier: EntrySpecifier::new(),
                warehouse_id,
                item_id: line.item_id,
                goods_received_note_id: GoodsReceivedNoteId::from_uuid(note.id),
                inventory_transfer_id: None,
            },
            qty: line.qty,
            float_qty: 0,
            cost_price: valuation.cost_price,
            landed_costs: valuation.landed_costs,
            price: valuation.price,
            received_at,
        };
        lot::insert_lot(txn, &opened).await?;
        debug!(
            entry_specifier = %opened.key.entry_specifier,
            item_id = %line.item_id,
            price = %opened.price,
            "Lot opened"
        );
        lots.push(opened);
    }
    Ok(lots)
}
