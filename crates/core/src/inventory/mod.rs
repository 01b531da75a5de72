//! Lot-level stock tracking and FIFO lot selection.
//!
//! A lot is one received (or transferred-in) quantity of an item in a
//! warehouse, carrying its own cost basis. Outgoing stock is always drawn
//! from specific lots, oldest receipt first.

pub mod error;
pub mod lot;
pub mod request;
pub mod selection;

#[cfg(test)]
mod selection_props;

pub use error::InventoryError;
pub use lot::{Draw, Lot, LotKey};
pub use request::StockRequest;
pub use selection::{check_availability, plan_draws, requested_totals, select_lots, sort_fifo};
