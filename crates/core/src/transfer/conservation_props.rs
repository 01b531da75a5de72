//! Property-based tests for quantity conservation across transfers.

use chrono::Utc;
use proptest::prelude::*;
use rust_decimal::Decimal;
use tradeledger_shared::types::{
    EntrySpecifier, GoodsReceivedNoteId, InventoryTransferId, ItemId, WarehouseId,
};

use crate::inventory::{Lot, LotKey};

use super::service::TransferService;
use super::types::TransferResolution;

fn resolution_strategy() -> impl Strategy<Value = TransferResolution> {
    prop_oneof![
        Just(TransferResolution::Approved),
        Just(TransferResolution::Provisional),
        Just(TransferResolution::Rejected),
    ]
}

fn fresh_lot(qty: i32) -> Lot {
    Lot {
        key: LotKey {
            entry_specifier: EntrySpecifier::new(),
            warehouse_id: WarehouseId::new(),
            item_id: ItemId::new(),
            goods_received_note_id: GoodsReceivedNoteId::new(),
            inventory_transfer_id: None,
        },
        qty,
        float_qty: 0,
        cost_price: Decimal::new(1000, 2),
        landed_costs: Decimal::new(50, 2),
        price: Decimal::new(1050, 2),
        received_at: Utc::now(),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// **Property 1: Conservation**
    ///
    /// *For any* sequence of transfer creations each followed by a
    /// resolution, `qty_before = qty + float_qty + Σ moved`.
    #[test]
    fn prop_quantity_conserved(
        initial in 1i32..10_000,
        steps in prop::collection::vec((1i32..500, resolution_strategy()), 1..20),
    ) {
        let mut lot = fresh_lot(initial);
        let mut moved = 0i64;

        for (want, resolution) in steps {
            let qty = want.min(lot.qty);
            if qty == 0 {
                break;
            }
            lot.reserve(qty).unwrap();
            prop_assert_eq!(lot.total_qty() + moved, i64::from(initial));

            let opened = TransferService::apply_line(
                resolution.line_effect(),
                &mut lot,
                qty,
                WarehouseId::new(),
                InventoryTransferId::new(),
            )
            .unwrap();
            if let Some(dest) = opened {
                prop_assert_eq!(dest.float_qty, 0);
                prop_assert_eq!(dest.price, lot.price);
                moved += i64::from(dest.qty);
            }

            prop_assert_eq!(lot.float_qty, 0);
            prop_assert!(lot.qty >= 0);
            prop_assert_eq!(i64::from(lot.qty) + moved, i64::from(initial));
        }
    }

    /// **Property 2: Over-reservation is refused and leaves the lot intact**
    #[test]
    fn prop_over_reserve_rejected(initial in 0i32..1_000, extra in 1i32..100) {
        let mut lot = fresh_lot(initial);
        prop_assert!(lot.reserve(initial + extra).is_err());
        prop_assert_eq!((lot.qty, lot.float_qty), (initial, 0));
    }
}
