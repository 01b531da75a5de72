//! Proportional landed cost allocation.
//!
//! For a received line with extended cost `T` and quantity `q` on a note
//! worth `G`, with total landed cost `L`:
//!
//! ```text
//! landed_costs = T * L / (G * q)   // per unit
//! cost_price   = T / q             // per unit
//! price        = cost_price + landed_costs
//! ```
//!
//! `T` is the line's extended value, so `landed_costs * q = L * T / G`, the
//! line's proportional share of `L`. Unit figures are rounded to
//! `COST_SCALE` places.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tradeledger_shared::types::{ItemId, LandedCostTypeId, WarehouseId, round_cost};

use super::error::LandedCostError;

/// One indirect cost to allocate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LandedCostEntry {
    /// Type of cost; determines the posting accounts.
    pub cost_type_id: LandedCostTypeId,
    /// Amount; zero is allowed and posts nothing.
    pub amount: Decimal,
}

/// A received line of the goods received note.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReceivedLine {
    /// Received item.
    pub item_id: ItemId,
    /// Receiving warehouse.
    pub warehouse_id: WarehouseId,
    /// Units received.
    pub qty: i32,
    /// Extended cost of the line (`unit_price * qty`).
    pub total_cost_price: Decimal,
}

/// Unit cost basis assigned to a new lot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LotValuation {
    /// Unit cost before landed costs.
    pub cost_price: Decimal,
    /// Unit landed-cost add-on.
    pub landed_costs: Decimal,
    /// `cost_price + landed_costs`.
    pub price: Decimal,
}

/// Sums entry amounts.
///
/// # Errors
///
/// Returns `NegativeAmount` for the first entry below zero.
pub fn total_landed_cost(entries: &[LandedCostEntry]) -> Result<Decimal, LandedCostError> {
    entries.iter().try_fold(Decimal::ZERO, |acc, e| {
        if e.amount.is_sign_negative() && !e.amount.is_zero() {
            return Err(LandedCostError::NegativeAmount {
                cost_type_id: e.cost_type_id,
                amount: e.amount,
            });
        }
        Ok(acc + e.amount)
    })
}

/// Computes the unit cost basis for one received line.
///
/// # Errors
///
/// - `ZeroQuantity` if the line has no units
/// - `ZeroNoteValue` if `note_total` is zero
pub fn allocate(
    line: &ReceivedLine,
    note_total: Decimal,
    total_landed: Decimal,
) -> Result<LotValuation, LandedCostError> {
    if line.qty <= 0 {
        return Err(LandedCostError::ZeroQuantity(line.item_id));
    }
    if note_total.is_zero() {
        return Err(LandedCostError::ZeroNoteValue);
    }

    let qty = Decimal::from(line.qty);
    let landed_costs = round_cost((line.total_cost_price * total_landed) / (note_total * qty));
    let cost_price = round_cost(line.total_cost_price / qty);

    Ok(LotValuation {
        cost_price,
        landed_costs,
        price: cost_price + landed_costs,
    })
}

/// Computes valuations for every line of a note.
///
/// # Errors
///
/// Returns `NoLines` for an empty note, otherwise the first `allocate` error.
pub fn allocate_all(
    lines: &[ReceivedLine],
    note_total: Decimal,
    total_landed: Decimal,
) -> Result<Vec<LotValuation>, LandedCostError> {
    if lines.is_empty() {
        return Err(LandedCostError::NoLines);
    }
    lines
        .iter()
        .map(|line| allocate(line, note_total, total_landed))
        .collect()
}
