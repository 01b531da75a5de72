//! Core business logic for Tradeledger.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `ledger` - Journal lines and balance validation
//! - `inventory` - Lots, stock requests and FIFO lot selection
//! - `transfer` - Two-phase warehouse transfer state machine
//! - `landed_cost` - Proportional landed cost allocation
//! - `sale` - Invoice pricing and the sale journal
//! - `purchasing` - Order and receipt totals, reconciliation counters
//! - `payment` - Supplier payment voucher rules

pub mod inventory;
pub mod landed_cost;
pub mod ledger;
pub mod payment;
pub mod purchasing;
pub mod sale;
pub mod transfer;
