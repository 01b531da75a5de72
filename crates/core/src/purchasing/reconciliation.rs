//! Receipt reconciliation against purchase order lines.
//!
//! Invariant: `total_reconciled + total_cancelled <= qty`.

use serde::{Deserialize, Serialize};

use super::error::PurchasingError;

/// Progress counters of one purchase order line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLineProgress {
    /// Ordered units.
    pub qty: i32,
    /// Units received against the line so far.
    pub total_reconciled: i32,
    /// Units cancelled on the line so far.
    pub total_cancelled: i32,
}

impl OrderLineProgress {
    /// Units neither received nor cancelled.
    #[must_use]
    pub fn outstanding(&self) -> i32 {
        (self.qty - self.total_reconciled - self.total_cancelled).max(0)
    }

    /// Units of a receipt that count against this line, capped at what is
    /// outstanding. Excess received units are accepted but not reconciled.
    #[must_use]
    pub fn reconcilable(&self, received: i32) -> i32 {
        received.clamp(0, self.outstanding())
    }

    /// Records a receipt, returning the units reconciled.
    pub fn reconcile(&mut self, received: i32) -> i32 {
        let applied = self.reconcilable(received);
        self.total_reconciled += applied;
        applied
    }

    /// Cancels outstanding units.
    ///
    /// # Errors
    ///
    /// Returns an error if `qty` is below one or exceeds what is outstanding.
    pub fn cancel(&mut self, qty: i32) -> Result<(), PurchasingError> {
        let outstanding = self.outstanding();
        if qty < 1 || qty > outstanding {
            return Err(PurchasingError::CancelExceedsOutstanding {
                requested: qty,
                outstanding,
            });
        }
        self.total_cancelled += qty;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_then_over_receipt() {
        let mut line = OrderLineProgress {
            qty: 10,
            total_reconciled: 0,
            total_cancelled: 2,
        };
        assert_eq!(line.reconcile(5), 5);
        assert_eq!(line.reconcile(5), 3);
        assert_eq!(line.outstanding(), 0);
        assert_eq!(line.reconcile(1), 0);
        assert_eq!(line.total_reconciled, 8);
    }

    #[test]
    fn test_cancel_bounded() {
        let mut line = OrderLineProgress {
            qty: 10,
            total_reconciled: 7,
            total_cancelled: 0,
        };
        assert_eq!(
            line.cancel(4),
            Err(PurchasingError::CancelExceedsOutstanding {
                requested: 4,
                outstanding: 3
            })
        );
        line.cancel(3).unwrap();
        assert_eq!(line.outstanding(), 0);
    }
}
