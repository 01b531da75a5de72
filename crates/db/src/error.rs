//! Error type shared by the inventory repositories.

use sea_orm::DbErr;
use thiserror::Error;
use tradeledger_core::{
    inventory::InventoryError, landed_cost::LandedCostError, ledger::LedgerError,
    payment::PaymentError, purchasing::PurchasingError, sale::SaleError, transfer::TransferError,
};
use tradeledger_shared::{
    AppError,
    types::{BusinessPartnerId, GoodsReceivedNoteId, LandedCostTypeId, UserId},
};

/// Failure of a mutating inventory or ledger operation.
///
/// Any error returned from a repository operation means its database
/// transaction was rolled back.
#[derive(Debug, Error)]
pub enum OperationError {
    /// Malformed input rejected before touching the database.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Stock check or lot arithmetic failed.
    #[error(transparent)]
    Inventory(#[from] InventoryError),

    /// Journal would not balance.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Landed cost allocation failed.
    #[error(transparent)]
    LandedCost(#[from] LandedCostError),

    /// Transfer request or resolution rejected.
    #[error(transparent)]
    Transfer(#[from] TransferError),

    /// Purchase document rejected.
    #[error(transparent)]
    Purchasing(#[from] PurchasingError),

    /// Payment voucher rejected.
    #[error(transparent)]
    Payment(#[from] PaymentError),

    /// Sale pricing rejected.
    #[error(transparent)]
    Sale(#[from] SaleError),

    /// A landed cost type has no expense or payable account.
    #[error("Landed cost type {cost_type_id} has no expense/payable account configured")]
    MissingAccountConfiguration {
        /// Offending cost type.
        cost_type_id: LandedCostTypeId,
    },

    /// A supplier has no payable account.
    #[error("Supplier {0} has no payable account configured")]
    MissingSupplierAccount(BusinessPartnerId),

    /// The acting officer has no cash account.
    #[error("User {0} has no cash account configured")]
    MissingCashAccount(UserId),

    /// A targeted row update did not affect exactly one row.
    #[error("Consistency violation: {0}")]
    ConsistencyViolation(String),

    /// Referenced document or master record does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The goods received note already carries a landed cost.
    #[error("Landed cost already applied to goods received note {0}")]
    LandedCostAlreadyApplied(GoodsReceivedNoteId),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl OperationError {
    /// Builds a `ConsistencyViolation` for an update that hit the wrong
    /// number of rows.
    pub(crate) fn rows_affected(what: impl std::fmt::Display, rows: u64) -> Self {
        Self::ConsistencyViolation(format!("{what}: expected 1 row affected, got {rows}"))
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Inventory(e) => e.error_code(),
            Self::Ledger(e) => e.error_code(),
            Self::LandedCost(e) => e.error_code(),
            Self::Transfer(e) => e.error_code(),
            Self::Purchasing(e) => e.error_code(),
            Self::Payment(e) => e.error_code(),
            Self::Sale(e) => e.error_code(),
            Self::MissingAccountConfiguration { .. } => "MISSING_ACCOUNT_CONFIGURATION",
            Self::MissingSupplierAccount(_) => "MISSING_SUPPLIER_ACCOUNT",
            Self::MissingCashAccount(_) => "MISSING_CASH_ACCOUNT",
            Self::ConsistencyViolation(_) => "CONSISTENCY_VIOLATION",
            Self::NotFound(_) => "NOT_FOUND",
            Self::LandedCostAlreadyApplied(_) => "LANDED_COST_ALREADY_APPLIED",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::Inventory(e) => e.http_status_code(),
            Self::Ledger(e) => e.http_status_code(),
            Self::LandedCost(e) => e.http_status_code(),
            Self::Transfer(e) => e.http_status_code(),
            Self::Purchasing(e) => e.http_status_code(),
            Self::Payment(e) => e.http_status_code(),
            Self::Sale(e) => e.http_status_code(),
            Self::MissingAccountConfiguration { .. }
            | Self::MissingSupplierAccount(_)
            | Self::MissingCashAccount(_) => 422,
            Self::NotFound(_) => 404,
            Self::LandedCostAlreadyApplied(_) => 409,
            Self::ConsistencyViolation(_) | Self::Database(_) => 500,
        }
    }
}

impl From<OperationError> for AppError {
    fn from(err: OperationError) -> Self {
        let message = err.to_string();
        match &err {
            OperationError::Database(_) => Self::Database(message),
            OperationError::ConsistencyViolation(_) => Self::Internal(message),
            OperationError::MissingAccountConfiguration { .. }
            | OperationError::MissingSupplierAccount(_)
            | OperationError::MissingCashAccount(_) => Self::Configuration(message),
            _ => match err.http_status_code() {
                400 => Self::Validation(message),
                404 => Self::NotFound(message),
                409 => Self::Conflict(message),
                422 => Self::BusinessRule(message),
                _ => Self::Internal(message),
            },
        }
    }
}
