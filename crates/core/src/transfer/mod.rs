//! Two-phase inventory transfers between warehouses.
//!
//! Phase one moves drawn units from `qty` to `float_qty` on the source lots.
//! Phase two resolves the transfer exactly once: approval (or provisional
//! approval) releases the float and opens new lots at the destination,
//! rejection returns the float to on-hand.

pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod conservation_props;

pub use error::TransferError;
pub use service::TransferService;
pub use types::{LineEffect, TransferAction, TransferResolution, TransferStatus};
