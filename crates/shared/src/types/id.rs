//! Typed IDs for type-safe entity references.
//!
//! Using typed IDs prevents accidentally passing a `WarehouseId` where an `ItemId` is expected.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Macro to generate typed ID wrappers.
macro_rules! typed_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Creates a new random ID using UUID v7 (time-ordered).
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Creates an ID from an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the inner UUID.
            #[must_use]
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

typed_id!(UserId, "Unique identifier for a user (sales officer or approver).");
typed_id!(AccountId, "Unique identifier for a chart of accounts entry.");
typed_id!(BusinessPartnerId, "Unique identifier for a supplier or customer.");
typed_id!(WarehouseId, "Unique identifier for a warehouse.");
typed_id!(ItemId, "Unique identifier for a catalog item.");
typed_id!(PurchaseOrderId, "Unique identifier for a purchase order.");
typed_id!(PurchaseOrderItemId, "Unique identifier for a purchase order line.");
typed_id!(GoodsReceivedNoteId, "Unique identifier for a goods received note.");
typed_id!(LandedCostId, "Unique identifier for a landed cost header.");
typed_id!(LandedCostTypeId, "Unique identifier for a landed cost type (freight, duty).");
typed_id!(InventoryTransferId, "Unique identifier for an inventory transfer.");
typed_id!(InvoiceId, "Unique identifier for a sales invoice.");
typed_id!(TransactionId, "Unique identifier for a journal transaction.");
typed_id!(PaymentVoucherId, "Unique identifier for a supplier payment voucher.");
typed_id!(
    EntrySpecifier,
    "Token minted when a lot is created, distinguishing lots that share a document key."
);

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_ids_are_time_ordered() {
        let first = EntrySpecifier::new();
        let second = EntrySpecifier::new();
        assert_ne!(first, second);
        assert_eq!(first.into_inner().get_version_num(), 7);
    }

    #[test]
    fn test_display_from_str_roundtrip() {
        let id = ItemId::new();
        assert_eq!(ItemId::from_str(&id.to_string()).unwrap(), id);
        assert!(WarehouseId::from_str("not-a-uuid").is_err());
    }

    #[test]
    fn test_serde_transparent() {
        let uuid = Uuid::now_v7();
        let id = WarehouseId::from_uuid(uuid);
        assert_eq!(serde_json::to_string(&id).unwrap(), format!("\"{uuid}\""));
    }
}
