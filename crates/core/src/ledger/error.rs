//! Ledger error types.

use rust_decimal::Decimal;
use thiserror::Error;
use tradeledger_shared::types::AccountId;

/// Errors raised while validating journal lines.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LedgerError {
    /// Journal has no lines.
    #[error("Journal must have at least one line")]
    NoEntries,

    /// Journal line amount is zero.
    #[error("Journal line for account {0} has a zero amount")]
    ZeroAmount(AccountId),

    /// Journal line amount is negative.
    #[error("Journal line for account {account_id} has a negative amount: {amount}")]
    NegativeAmount {
        /// Account of the offending line.
        account_id: AccountId,
        /// The negative amount.
        amount: Decimal,
    },

    /// Journal has only one side.
    #[error("Journal must have both debit and credit lines")]
    SingleSided,

    /// Journal does not balance.
    #[error("Journal is not balanced. Debit: {debits}, Credit: {credits}")]
    Unbalanced {
        /// Total debits.
        debits: Decimal,
        /// Total credits.
        credits: Decimal,
    },
}

impl LedgerError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NoEntries => "NO_ENTRIES",
            Self::ZeroAmount(_) => "ZERO_AMOUNT",
            Self::NegativeAmount { .. } => "NEGATIVE_AMOUNT",
            Self::SingleSided => "SINGLE_SIDED",
            Self::Unbalanced { .. } => "UNBALANCED_JOURNAL",
        }
    }

    /// Returns the HTTP status code. Journals are built internally, so every
    /// failure here is a server-side fault.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        500
    }
}
