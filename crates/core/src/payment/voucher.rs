//! Posting-date and allocation rules for supplier payments.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tradeledger_shared::types::{AccountId, BusinessPartnerId};

use crate::ledger::JournalLine;

use super::error::PaymentError;

/// Share of a payment settling one supplier's balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentAllocation {
    /// Supplier being paid.
    pub business_partner_id: BusinessPartnerId,
    /// Amount settled.
    pub amount: Decimal,
}

/// First day of the financial year containing `today`.
///
/// # Errors
///
/// Returns `InvalidYearStartMonth` if `start_month` is not 1-12.
pub fn financial_year_start(today: NaiveDate, start_month: u32) -> Result<NaiveDate, PaymentError> {
    let year = if today.month() < start_month {
        today.year() - 1
    } else {
        today.year()
    };
    NaiveDate::from_ymd_opt(year, start_month, 1).ok_or(PaymentError::InvalidYearStartMonth(start_month))
}

/// Checks that a posting date lies in the current financial year, up to today.
///
/// # Errors
///
/// - `OutsideFinancialYear` for dates before the year start
/// - `FuturePostingDate` for dates after `today`
pub fn validate_posting_date(
    date: NaiveDate,
    today: NaiveDate,
    start_month: u32,
) -> Result<(), PaymentError> {
    let year_start = financial_year_start(today, start_month)?;
    if date < year_start {
        return Err(PaymentError::OutsideFinancialYear { date, year_start });
    }
    if date > today {
        return Err(PaymentError::FuturePostingDate(date));
    }
    Ok(())
}

/// Checks that allocations are positive and add up to the payment.
///
/// # Errors
///
/// Returns the first violated rule.
pub fn validate_allocations(
    amount: Decimal,
    allocations: &[PaymentAllocation],
) -> Result<(), PaymentError> {
    if amount <= Decimal::ZERO {
        return Err(PaymentError::NonPositiveAmount(amount));
    }
    if allocations.is_empty() {
        return Err(PaymentError::NoAllocations);
    }
    if let Some(a) = allocations.iter().find(|a| a.amount <= Decimal::ZERO) {
        return Err(PaymentError::NonPositiveAllocation {
            business_partner_id: a.business_partner_id,
            amount: a.amount,
        });
    }

    let allocated: Decimal = allocations.iter().map(|a| a.amount).sum();
    if allocated != amount {
        return Err(PaymentError::AllocationMismatch { amount, allocated });
    }
    Ok(())
}

/// Builds the payment journal: credit the paying account, debit each
/// supplier's payable account with its allocation.
#[must_use]
pub fn payment_journal(
    from_account: AccountId,
    amount: Decimal,
    payables: &[(AccountId, Decimal)],
) -> Vec<JournalLine> {
    std::iter::once(JournalLine::credit(from_account, amount))
        .chain(payables.iter().map(|(account, amt)| JournalLine::debit(*account, *amt)))
        .collect()
}
