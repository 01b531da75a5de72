//! Property-based tests for order line reconciliation.

use proptest::prelude::*;

use super::reconciliation::OrderLineProgress;

#[derive(Debug, Clone, Copy)]
enum Event {
    Receive(i32),
    Cancel(i32),
}

fn event_strategy() -> impl Strategy<Value = Event> {
    prop_oneof![
        (0i32..200).prop_map(Event::Receive),
        (0i32..200).prop_map(Event::Cancel),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// **Property 1: Counters never exceed the ordered quantity**
    ///
    /// *For any* interleaving of receipts and cancellations,
    /// `total_reconciled + total_cancelled <= qty` holds after every step.
    #[test]
    fn prop_counters_bounded(
        qty in 1i32..500,
        events in prop::collection::vec(event_strategy(), 1..30),
    ) {
        let mut line = OrderLineProgress { qty, total_reconciled: 0, total_cancelled: 0 };

        for event in events {
            match event {
                Event::Receive(n) => {
                    let before = line.total_reconciled;
                    let applied = line.reconcile(n);
                    prop_assert!(applied <= n);
                    prop_assert_eq!(line.total_reconciled, before + applied);
                }
                Event::Cancel(n) => {
                    let before = line;
                    if line.cancel(n).is_err() {
                        prop_assert_eq!(line, before);
                    }
                }
            }
            prop_assert!(line.total_reconciled + line.total_cancelled <= line.qty);
            prop_assert!(line.outstanding() >= 0);
        }
    }
}
