//! Property-based tests for landed cost allocation.

use proptest::prelude::*;
use rust_decimal::Decimal;
use tradeledger_shared::types::{ItemId, WarehouseId};

use super::allocation::{ReceivedLine, allocate_all};

/// Strategy for received lines: (qty, unit price in cents).
fn lines_strategy() -> impl Strategy<Value = Vec<(i32, i64)>> {
    prop::collection::vec((1i32..1_000, 1i64..1_000_000), 1..10)
}

/// Strategy for a landed cost total in cents.
fn landed_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..10_000_000).prop_map(|c| Decimal::new(c, 2))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// **Property 1: Allocations add back up to the landed total**
    ///
    /// *For any* note, `Σ landed_costs * qty` equals the landed total within
    /// unit rounding (half a millionth per unit, per line).
    #[test]
    fn prop_allocation_sums_to_total(specs in lines_strategy(), landed in landed_strategy()) {
        let lines: Vec<ReceivedLine> = specs
            .iter()
            .map(|(qty, cents)| ReceivedLine {
                item_id: ItemId::new(),
                warehouse_id: WarehouseId::new(),
                qty: *qty,
                total_cost_price: Decimal::new(*cents, 2) * Decimal::from(*qty),
            })
            .collect();
        let note_total: Decimal = lines.iter().map(|l| l.total_cost_price).sum();
        let total_qty: i64 = lines.iter().map(|l| i64::from(l.qty)).sum();

        let vals = allocate_all(&lines, note_total, landed).unwrap();
        let allocated: Decimal = vals
            .iter()
            .zip(&lines)
            .map(|(v, l)| v.landed_costs * Decimal::from(l.qty))
            .sum();

        let tolerance = Decimal::new(5, 7) * Decimal::from(total_qty);
        prop_assert!((allocated - landed).abs() <= tolerance,
            "allocated {} vs landed {}", allocated, landed);
    }

    /// **Property 2: Price is cost plus landed share**
    #[test]
    fn prop_price_is_sum(specs in lines_strategy(), landed in landed_strategy()) {
        let lines: Vec<ReceivedLine> = specs
            .iter()
            .map(|(qty, cents)| ReceivedLine {
                item_id: ItemId::new(),
                warehouse_id: WarehouseId::new(),
                qty: *qty,
                total_cost_price: Decimal::new(*cents, 2) * Decimal::from(*qty),
            })
            .collect();
        let note_total: Decimal = lines.iter().map(|l| l.total_cost_price).sum();

        for v in allocate_all(&lines, note_total, landed).unwrap() {
            prop_assert_eq!(v.price, v.cost_price + v.landed_costs);
            prop_assert!(!v.landed_costs.is_sign_negative() || v.landed_costs.is_zero());
        }
    }
}
