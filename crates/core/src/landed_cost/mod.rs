//! Landed cost allocation.
//!
//! Spreads indirect acquisition costs (freight, duty) over the lines of a
//! goods received note in proportion to each line's share of the note's
//! value, producing the unit cost basis of the lots the note opens.

pub mod allocation;
pub mod error;

#[cfg(test)]
mod allocation_props;

pub use allocation::{LandedCostEntry, LotValuation, ReceivedLine, allocate, allocate_all, total_landed_cost};
pub use error::LandedCostError;
