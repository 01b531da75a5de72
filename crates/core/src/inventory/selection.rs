//! FIFO lot selection.
//!
//! Candidates are ordered by the creation time of their originating
//! receiving document, then by GRN id and entry specifier so that lots
//! received at the same instant still draw in a stable order.

use std::collections::{BTreeMap, HashMap};

use tradeledger_shared::types::{EntrySpecifier, ItemId};

use super::error::InventoryError;
use super::lot::{Draw, Lot};
use super::request::StockRequest;

/// Sums requested quantities per item, in first-seen order.
#[must_use]
pub fn requested_totals(requests: &[StockRequest]) -> Vec<(ItemId, i64)> {
    let mut order: Vec<ItemId> = Vec::new();
    let mut totals: HashMap<ItemId, i64> = HashMap::new();
    for r in requests {
        let entry = totals.entry(r.item_id).or_insert_with(|| {
            order.push(r.item_id);
            0
        });
        *entry += i64::from(r.qty);
    }
    order.into_iter().map(|id| (id, totals[&id])).collect()
}

/// Checks the whole batch against aggregated on-hand stock before any draw.
///
/// `on_hand` maps item to the sum of on-hand `qty` over the warehouse's
/// lots; float quantity is never counted.
///
/// # Errors
///
/// - `ItemNotInWarehouse` if an item has no lots or zero on-hand units
/// - `InsufficientStock` if the summed request for an item exceeds on-hand
pub fn check_availability(
    requests: &[StockRequest],
    on_hand: &HashMap<ItemId, i64>,
) -> Result<(), InventoryError> {
    let totals = requested_totals(requests);

    if let Some((item_id, _)) = totals
        .iter()
        .find(|(id, _)| on_hand.get(id).copied().unwrap_or_default() <= 0)
    {
        return Err(InventoryError::ItemNotInWarehouse(*item_id));
    }

    for (item_id, requested) in totals {
        let available = on_hand.get(&item_id).copied().unwrap_or_default();
        if requested > available {
            return Err(InventoryError::InsufficientStock {
                item_id,
                requested,
                available,
            });
        }
    }

    Ok(())
}

/// Orders lots oldest receipt first.
pub fn sort_fifo(lots: &mut [Lot]) {
    lots.sort_by(|a, b| {
        a.received_at
            .cmp(&b.received_at)
            .then_with(|| a.key.goods_received_note_id.cmp(&b.key.goods_received_note_id))
            .then_with(|| a.key.entry_specifier.cmp(&b.key.entry_specifier))
    });
}

/// Picks lots for a single request.
///
/// Returns draws whose quantities sum to exactly `qty`. Never returns a
/// partial plan.
///
/// # Errors
///
/// - `InvalidQuantity` if `qty < 1`
/// - `ItemNotInWarehouse` if no candidate has on-hand units
/// - `InsufficientStock` if the candidates together hold fewer than `qty`
pub fn select_lots(
    item_id: ItemId,
    candidates: &[Lot],
    qty: i32,
) -> Result<Vec<Draw>, InventoryError> {
    if qty < 1 {
        return Err(InventoryError::InvalidQuantity { item_id, qty });
    }

    let mut ordered: Vec<Lot> = candidates
        .iter()
        .filter(|l| l.key.item_id == item_id && l.qty > 0)
        .cloned()
        .collect();
    if ordered.is_empty() {
        return Err(InventoryError::ItemNotInWarehouse(item_id));
    }

    let available: i64 = ordered.iter().map(|l| i64::from(l.qty)).sum();
    if i64::from(qty) > available {
        return Err(InventoryError::InsufficientStock {
            item_id,
            requested: i64::from(qty),
            available,
        });
    }

    sort_fifo(&mut ordered);

    let mut remaining = qty;
    let mut draws = Vec::new();
    for lot in &ordered {
        if remaining == 0 {
            break;
        }
        let take = remaining.min(lot.qty);
        draws.push(Draw::from_lot(lot, take));
        remaining -= take;
    }

    Ok(draws)
}

/// Plans draws for a whole batch of request lines.
///
/// Lines are served in request order. Capacity consumed by an earlier line
/// is not offered again, so two lines for the same item never draw the same
/// units twice.
///
/// # Errors
///
/// Propagates the first `select_lots` failure.
pub fn plan_draws(
    requests: &[StockRequest],
    candidates: &HashMap<ItemId, Vec<Lot>>,
) -> Result<Vec<Draw>, InventoryError> {
    StockRequest::validate_all(requests)?;

    let mut consumed: BTreeMap<EntrySpecifier, i32> = BTreeMap::new();
    let mut plan = Vec::new();

    for request in requests {
        let lots: Vec<Lot> = candidates
            .get(&request.item_id)
            .map(|lots| {
                lots.iter()
                    .map(|l| {
                        let mut remaining = l.clone();
                        remaining.qty -= consumed.get(&l.key.entry_specifier).copied().unwrap_or_default();
                        remaining
                    })
                    .collect()
            })
            .unwrap_or_default();

        let draws = select_lots(request.item_id, &lots, request.qty)?;
        for d in &draws {
            *consumed.entry(d.lot.entry_specifier).or_default() += d.qty;
        }
        plan.extend(draws);
    }

    Ok(plan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use rust_decimal_macros::dec;
    use tradeledger_shared::types::{GoodsReceivedNoteId, WarehouseId};

    use crate::inventory::lot::LotKey;

    fn lot_on_day(item_id: ItemId, day: i64, qty: i32) -> Lot {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        Lot {
            key: LotKey {
                entry_specifier: EntrySpecifier::new(),
                warehouse_id: WarehouseId::new(),
                item_id,
                goods_received_note_id: GoodsReceivedNoteId::new(),
                inventory_transfer_id: None,
            },
            qty,
            float_qty: 0,
            cost_price: dec!(10),
            landed_costs: dec!(0),
            price: dec!(10),
            received_at: base + Duration::days(day),
        }
    }

    #[test]
    fn test_fifo_oldest_first() {
        let item = ItemId::new();
        // B listed first, but A is older.
        let b = lot_on_day(item, 2, 10);
        let a = lot_on_day(item, 1, 5);

        let draws = select_lots(item, &[b.clone(), a.clone()], 7).unwrap();
        assert_eq!(draws.len(), 2);
        assert_eq!((draws[0].lot, draws[0].qty), (a.key, 5));
        assert_eq!((draws[1].lot, draws[1].qty), (b.key, 2));
    }

    #[test]
    fn test_exact_fit_uses_single_lot() {
        let item = ItemId::new();
        let a = lot_on_day(item, 1, 5);
        let b = lot_on_day(item, 2, 10);
        let draws = select_lots(item, &[a.clone(), b], 5).unwrap();
        assert_eq!(draws.len(), 1);
        assert_eq!(draws[0].lot, a.key);
    }

    #[test]
    fn test_insufficient_never_partial() {
        let item = ItemId::new();
        let lots = [lot_on_day(item, 1, 5), lot_on_day(item, 2, 10)];
        assert_eq!(
            select_lots(item, &lots, 16),
            Err(InventoryError::InsufficientStock {
                item_id: item,
                requested: 16,
                available: 15
            })
        );
    }

    #[test]
    fn test_empty_lots_skipped() {
        let item = ItemId::new();
        let empty = lot_on_day(item, 0, 0);
        let full = lot_on_day(item, 1, 3);
        let draws = select_lots(item, &[empty, full.clone()], 2).unwrap();
        assert_eq!(draws[0].lot, full.key);
    }

    #[test]
    fn test_availability_missing_item() {
        let present = ItemId::new();
        let missing = ItemId::new();
        let on_hand = HashMap::from([(present, 10)]);
        let requests = [StockRequest::new(present, 1), StockRequest::new(missing, 1)];
        assert_eq!(
            check_availability(&requests, &on_hand),
            Err(InventoryError::ItemNotInWarehouse(missing))
        );
    }

    #[test]
    fn test_availability_aggregates_repeated_lines() {
        let item = ItemId::new();
        let on_hand = HashMap::from([(item, 10)]);
        let requests = [StockRequest::new(item, 6), StockRequest::new(item, 5)];
        assert_eq!(
            check_availability(&requests, &on_hand),
            Err(InventoryError::InsufficientStock {
                item_id: item,
                requested: 11,
                available: 10
            })
        );
    }

    #[test]
    fn test_plan_shares_capacity_between_lines() {
        let item = ItemId::new();
        let a = lot_on_day(item, 1, 5);
        let b = lot_on_day(item, 2, 10);
        let candidates = HashMap::from([(item, vec![a.clone(), b.clone()])]);
        let requests = [StockRequest::new(item, 4), StockRequest::new(item, 4)];

        let plan = plan_draws(&requests, &candidates).unwrap();
        let summary: Vec<_> = plan.iter().map(|d| (d.lot, d.qty)).collect();
        assert_eq!(summary, vec![(a.key, 4), (a.key, 1), (b.key, 3)]);
    }

    #[test]
    fn test_requested_totals_keeps_first_seen_order() {
        let x = ItemId::new();
        let y = ItemId::new();
        let requests = [
            StockRequest::new(y, 1),
            StockRequest::new(x, 2),
            StockRequest::new(y, 3),
        ];
        assert_eq!(requested_totals(&requests), vec![(y, 4), (x, 2)]);
    }
}
