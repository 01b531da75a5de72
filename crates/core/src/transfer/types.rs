//! Transfer lifecycle types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use tradeledger_shared::types::UserId;

use super::error::TransferError;

/// Final outcome of a transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransferResolution {
    /// Goods arrived and are accepted.
    Approved,
    /// Goods are accepted at the destination pending paperwork.
    Provisional,
    /// Goods stay at the source.
    Rejected,
}

impl TransferResolution {
    /// Returns the string representation of the resolution.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Approved => "approved",
            Self::Provisional => "provisional",
            Self::Rejected => "rejected",
        }
    }

    /// What the resolution does to each transfer line.
    #[must_use]
    pub const fn line_effect(self) -> LineEffect {
        match self {
            Self::Approved | Self::Provisional => LineEffect::MoveToDestination,
            Self::Rejected => LineEffect::RestoreToSource,
        }
    }
}

impl fmt::Display for TransferResolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TransferResolution {
    type Err = TransferError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "approved" => Ok(Self::Approved),
            "provisional" => Ok(Self::Provisional),
            "rejected" => Ok(Self::Rejected),
            _ => Err(TransferError::UnknownResolution(s.to_string())),
        }
    }
}

/// Lifecycle state of a transfer.
///
/// `Pending` → `Resolved`, once. `resolved_by` is the stored marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferStatus {
    /// Created, units sitting in float at the source.
    Pending,
    /// Resolved; no further lot mutation is allowed.
    Resolved,
}

impl TransferStatus {
    /// Derives the status from the stored `resolved_by` column.
    #[must_use]
    pub const fn from_resolved_by(resolved_by: Option<UserId>) -> Self {
        match resolved_by {
            None => Self::Pending,
            Some(_) => Self::Resolved,
        }
    }

    /// Returns true if the transfer still awaits resolution.
    #[must_use]
    pub const fn is_pending(self) -> bool {
        matches!(self, Self::Pending)
    }
}

/// Per-line lot mutation applied by a resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEffect {
    /// `float_qty -= q` on the source lot, new lot of `q` at the destination.
    MoveToDestination,
    /// `qty += q; float_qty -= q` on the source lot.
    RestoreToSource,
}

/// Outcome of asking to resolve a transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferAction {
    /// The transfer is pending and should be resolved now.
    Resolve {
        /// Chosen resolution.
        resolution: TransferResolution,
        /// Lot mutation to apply per line.
        effect: LineEffect,
        /// Acting user.
        resolved_by: UserId,
        /// Resolution timestamp.
        resolved_on: DateTime<Utc>,
        /// Free-text remarks.
        remarks: Option<String>,
    },
    /// The transfer was already resolved; nothing to do.
    AlreadyResolved,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_resolution_parse() {
        assert_eq!(
            TransferResolution::from_str("Approved").unwrap(),
            TransferResolution::Approved
        );
        assert_eq!(
            TransferResolution::from_str(" provisional ").unwrap(),
            TransferResolution::Provisional
        );
        assert!(matches!(
            TransferResolution::from_str("lost"),
            Err(TransferError::UnknownResolution(_))
        ));
    }

    #[test]
    fn test_provisional_moves_stock() {
        assert_eq!(
            TransferResolution::Provisional.line_effect(),
            LineEffect::MoveToDestination
        );
        assert_eq!(
            TransferResolution::Rejected.line_effect(),
            LineEffect::RestoreToSource
        );
    }

    #[test]
    fn test_status_from_resolved_by() {
        assert!(TransferStatus::from_resolved_by(None).is_pending());
        assert_eq!(
            TransferStatus::from_resolved_by(Some(UserId::new())),
            TransferStatus::Resolved
        );
    }
}
