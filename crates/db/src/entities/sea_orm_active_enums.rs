//! `SeaORM` active enums stored as short strings.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Journal line side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(2))")]
pub enum EntryType {
    /// Debit.
    #[sea_orm(string_value = "DR")]
    Debit,
    /// Credit.
    #[sea_orm(string_value = "CR")]
    Credit,
}

impl From<tradeledger_core::ledger::EntryType> for EntryType {
    fn from(value: tradeledger_core::ledger::EntryType) -> Self {
        match value {
            tradeledger_core::ledger::EntryType::Debit => Self::Debit,
            tradeledger_core::ledger::EntryType::Credit => Self::Credit,
        }
    }
}

/// Transfer resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum TransferResolution {
    /// Approved.
    #[sea_orm(string_value = "approved")]
    Approved,
    /// Provisionally approved.
    #[sea_orm(string_value = "provisional")]
    Provisional,
    /// Rejected.
    #[sea_orm(string_value = "rejected")]
    Rejected,
}

impl From<tradeledger_core::transfer::TransferResolution> for TransferResolution {
    fn from(value: tradeledger_core::transfer::TransferResolution) -> Self {
        use tradeledger_core::transfer::TransferResolution as R;
        match value {
            R::Approved => Self::Approved,
            R::Provisional => Self::Provisional,
            R::Rejected => Self::Rejected,
        }
    }
}

impl From<TransferResolution> for tradeledger_core::transfer::TransferResolution {
    fn from(value: TransferResolution) -> Self {
        match value {
            TransferResolution::Approved => Self::Approved,
            TransferResolution::Provisional => Self::Provisional,
            TransferResolution::Rejected => Self::Rejected,
        }
    }
}
