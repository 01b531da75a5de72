//! Purchase order and goods received note arithmetic.
//!
//! - Discounted line and header totals
//! - Reconciliation of receipts against order lines

pub mod error;
pub mod pricing;
pub mod reconciliation;

#[cfg(test)]
mod reconciliation_props;

pub use error::PurchasingError;
pub use pricing::{DiscountType, PricedLine, apply_discount, price_line};
pub use reconciliation::OrderLineProgress;
