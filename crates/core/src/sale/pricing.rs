//! Invoice totals, discounting and the sale journal.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tradeledger_shared::types::{AccountId, round_money};

use crate::inventory::Draw;
use crate::ledger::JournalLine;

use super::error::SaleError;

/// Whether a sale request is committed or only priced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionType {
    /// Validate and price, then roll back.
    Plan,
    /// Validate, price and commit.
    #[default]
    Execute,
}

impl ExecutionType {
    /// Returns true for a preview-only request.
    #[must_use]
    pub const fn is_plan(self) -> bool {
        matches!(self, Self::Plan)
    }
}

impl std::str::FromStr for ExecutionType {
    type Err = SaleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "plan" => Ok(Self::Plan),
            "execute" | "" => Ok(Self::Execute),
            other => Err(SaleError::UnknownExecutionType(other.to_string())),
        }
    }
}

/// Aggregates over a sale's draw plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SaleTotals {
    /// `Σ qty * cost_price`, the cost of sales basis.
    pub cost_price: Decimal,
    /// `Σ qty * price`, the price before discount.
    pub price: Decimal,
}

impl SaleTotals {
    /// Sums a draw plan.
    #[must_use]
    pub fn from_draws(draws: &[Draw]) -> Self {
        draws.iter().fold(Self::default(), |acc, d| Self {
            cost_price: acc.cost_price + d.extended_cost(),
            price: acc.price + d.extended_price(),
        })
    }
}

/// Applies a percentage discount and rounds to currency precision.
///
/// # Errors
///
/// Returns `InvalidDiscount` if `discount` is outside 0..=100.
pub fn price_after_discount(price: Decimal, discount: Decimal) -> Result<Decimal, SaleError> {
    if (discount.is_sign_negative() && !discount.is_zero()) || discount > Decimal::ONE_HUNDRED {
        return Err(SaleError::InvalidDiscount(discount));
    }
    Ok(round_money(
        price * (Decimal::ONE_HUNDRED - discount) / Decimal::ONE_HUNDRED,
    ))
}

/// Accounts a sale posts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaleAccounts {
    /// The selling officer's cash account.
    pub cash: AccountId,
    /// Sales revenue.
    pub sales: AccountId,
    /// Cost of goods sold.
    pub cost_of_sales: AccountId,
    /// Inventory asset.
    pub stock: AccountId,
}

/// Builds the four-line sale journal.
///
/// Dr cash / Cr sales at the discounted price, Dr cost of sales / Cr stock
/// at cost without landed costs.
#[must_use]
pub fn sale_journal(accounts: &SaleAccounts, revenue: Decimal, cost: Decimal) -> Vec<JournalLine> {
    let cost = round_money(cost);
    vec![
        JournalLine::debit(accounts.cash, revenue),
        JournalLine::credit(accounts.sales, revenue),
        JournalLine::debit(accounts.cost_of_sales, cost),
        JournalLine::credit(accounts.stock, cost),
    ]
}

/// Priced sale, returned by both plan and execute requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleQuote {
    /// Lots drawn, in draw order.
    pub draws: Vec<Draw>,
    /// Aggregates over the draws.
    pub totals: SaleTotals,
    /// Discount percentage applied.
    pub discount: Decimal,
    /// Final amount charged.
    pub price_after_discount: Decimal,
}

impl SaleQuote {
    /// Prices a draw plan.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDiscount` if the discount is out of range.
    pub fn price(draws: Vec<Draw>, discount: Decimal) -> Result<Self, SaleError> {
        let totals = SaleTotals::from_draws(&draws);
        let price_after_discount = price_after_discount(totals.price, discount)?;
        Ok(Self {
            draws,
            totals,
            discount,
            price_after_discount,
        })
    }
}
