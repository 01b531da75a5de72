//! Double-entry journal rules.
//!
//! This module implements the posting side of the inventory engine:
//! - Journal lines (debits and credits against an account)
//! - Balance validation performed before any line is written
//! - Error types for journal operations

pub mod entry;
pub mod error;
pub mod validation;

#[cfg(test)]
mod validation_props;

pub use entry::{EntryType, JournalLine};
pub use error::LedgerError;
pub use validation::{JournalTotals, normalize_journal, validate_journal};
