//! Common types used across the application.

pub mod id;
pub mod money;

pub use id::*;
pub use money::{COST_SCALE, MONEY_SCALE, round_cost, round_money};
