//! Property-based tests for FIFO lot selection.

use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use tradeledger_shared::types::{EntrySpecifier, GoodsReceivedNoteId, ItemId, WarehouseId};

use super::error::InventoryError;
use super::lot::{Lot, LotKey};
use super::selection::select_lots;

fn make_lots(item_id: ItemId, specs: &[(i64, i32)]) -> Vec<Lot> {
    let base = Utc.with_ymd_and_hms(2024, 4, 1, 8, 0, 0).unwrap();
    specs
        .iter()
        .map(|(minutes, qty)| Lot {
            key: LotKey {
                entry_specifier: EntrySpecifier::new(),
                warehouse_id: WarehouseId::new(),
                item_id,
                goods_received_note_id: GoodsReceivedNoteId::new(),
                inventory_transfer_id: None,
            },
            qty: *qty,
            float_qty: 0,
            cost_price: Decimal::ONE,
            landed_costs: Decimal::ZERO,
            price: Decimal::ONE,
            received_at: base + Duration::minutes(*minutes),
        })
        .collect()
}

/// Strategy for a set of lots: (minutes after base, qty).
fn lot_specs() -> impl Strategy<Value = Vec<(i64, i32)>> {
    prop::collection::vec((0i64..10_000, 0i32..500), 1..12)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// **Property 1: Satisfiable requests are drawn exactly**
    ///
    /// *For any* lots and any quantity up to their total, the plan sums to
    /// the request and never exceeds a lot's on-hand units.
    #[test]
    fn prop_plan_sums_to_request(specs in lot_specs(), pick in 1i32..=1000) {
        let item = ItemId::new();
        let lots = make_lots(item, &specs);
        let total: i32 = lots.iter().map(|l| l.qty).sum();
        prop_assume!(total > 0);
        let qty = total.min(pick);

        let draws = select_lots(item, &lots, qty).unwrap();
        prop_assert_eq!(draws.iter().map(|d| d.qty).sum::<i32>(), qty);
        for d in &draws {
            let source = lots.iter().find(|l| l.key == d.lot).unwrap();
            prop_assert!(d.qty > 0 && d.qty <= source.qty);
        }
    }

    /// **Property 2: Draws follow receipt order**
    ///
    /// Every lot in the plan except the last is fully drained, and no lot
    /// older than a drawn lot is left with units.
    #[test]
    fn prop_fifo_order(specs in lot_specs(), pick in 1i32..=1000) {
        let item = ItemId::new();
        let lots = make_lots(item, &specs);
        let total: i32 = lots.iter().map(|l| l.qty).sum();
        prop_assume!(total > 0);
        let qty = total.min(pick);

        let draws = select_lots(item, &lots, qty).unwrap();
        let find = |key: &LotKey| lots.iter().find(|l| l.key == *key).unwrap();

        for pair in draws.windows(2) {
            prop_assert!(find(&pair[0].lot).received_at <= find(&pair[1].lot).received_at);
            prop_assert_eq!(pair[0].qty, find(&pair[0].lot).qty);
        }

        let newest_drawn = draws.iter().map(|d| find(&d.lot).received_at).max().unwrap();
        for lot in lots.iter().filter(|l| l.qty > 0 && l.received_at < newest_drawn) {
            let drew = draws.iter().find(|d| d.lot == lot.key).map(|d| d.qty);
            prop_assert_eq!(drew, Some(lot.qty));
        }
    }

    /// **Property 3: Over-requests fail without a plan**
    #[test]
    fn prop_over_request_rejected(specs in lot_specs(), extra in 1i32..100) {
        let item = ItemId::new();
        let lots = make_lots(item, &specs);
        let total: i32 = lots.iter().map(|l| l.qty).sum();
        prop_assume!(total > 0);

        let result = select_lots(item, &lots, total + extra);
        let is_insufficient = matches!(result, Err(InventoryError::InsufficientStock { .. }));
        prop_assert!(is_insufficient);
    }
}
