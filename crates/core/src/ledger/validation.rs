//! Balance validation for journal lines.

use rust_decimal::Decimal;

use super::entry::{EntryType, JournalLine};
use super::error::LedgerError;

/// Debit and credit totals of a validated journal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JournalTotals {
    /// Sum of debit amounts.
    pub debits: Decimal,
    /// Sum of credit amounts.
    pub credits: Decimal,
}

/// Validates that a set of journal lines is complete and balanced.
///
/// # Errors
///
/// Returns an error if there are no lines, any amount is zero or negative,
/// only one side is present, or debits differ from credits.
pub fn validate_journal(lines: &[JournalLine]) -> Result<JournalTotals, LedgerError> {
    if lines.is_empty() {
        return Err(LedgerError::NoEntries);
    }

    let mut debits = Decimal::ZERO;
    let mut credits = Decimal::ZERO;
    let mut has_debit = false;
    let mut has_credit = false;

    for line in lines {
        if line.amount.is_zero() {
            return Err(LedgerError::ZeroAmount(line.account_id));
        }
        if line.amount.is_sign_negative() {
            return Err(LedgerError::NegativeAmount {
                account_id: line.account_id,
                amount: line.amount,
            });
        }

        match line.entry_type {
            EntryType::Debit => {
                debits += line.amount;
                has_debit = true;
            }
            EntryType::Credit => {
                credits += line.amount;
                has_credit = true;
            }
        }
    }

    if !has_debit || !has_credit {
        return Err(LedgerError::SingleSided);
    }

    if debits != credits {
        return Err(LedgerError::Unbalanced { debits, credits });
    }

    Ok(JournalTotals { debits, credits })
}

/// Drops zero-amount lines and validates what remains.
///
/// A journal whose lines are all zero normalizes to an empty set, which
/// posts nothing.
///
/// # Errors
///
/// Returns an error if any amount is negative or the non-zero lines do not
/// balance.
pub fn normalize_journal(lines: Vec<JournalLine>) -> Result<Vec<JournalLine>, LedgerError> {
    if let Some(line) = lines.iter().find(|l| l.amount.is_sign_negative() && !l.amount.is_zero()) {
        return Err(LedgerError::NegativeAmount {
            account_id: line.account_id,
            amount: line.amount,
        });
    }

    let kept: Vec<JournalLine> = lines.into_iter().filter(|l| !l.amount.is_zero()).collect();
    if kept.is_empty() {
        return Ok(kept);
    }

    validate_journal(&kept)?;
    Ok(kept)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use tradeledger_shared::types::AccountId;

    #[test]
    fn test_balanced_four_line_sale() {
        let (cash, sales, cogs, stock) = (
            AccountId::new(),
            AccountId::new(),
            AccountId::new(),
            AccountId::new(),
        );
        let lines = vec![
            JournalLine::debit(cash, dec!(210)),
            JournalLine::credit(sales, dec!(210)),
            JournalLine::debit(cogs, dec!(200)),
            JournalLine::credit(stock, dec!(200)),
        ];

        let totals = validate_journal(&lines).unwrap();
        assert_eq!(totals.debits, dec!(410));
        assert_eq!(totals.credits, dec!(410));
    }

    #[test]
    fn test_unbalanced() {
        let lines = vec![
            JournalLine::debit(AccountId::new(), dec!(100)),
            JournalLine::credit(AccountId::new(), dec!(50)),
        ];
        assert_eq!(
            validate_journal(&lines),
            Err(LedgerError::Unbalanced {
                debits: dec!(100),
                credits: dec!(50)
            })
        );
    }

    #[test]
    fn test_no_entries() {
        assert_eq!(validate_journal(&[]), Err(LedgerError::NoEntries));
    }

    #[test]
    fn test_single_sided() {
        let lines = vec![
            JournalLine::debit(AccountId::new(), dec!(100)),
            JournalLine::debit(AccountId::new(), dec!(50)),
        ];
        assert_eq!(validate_journal(&lines), Err(LedgerError::SingleSided));
    }

    #[test]
    fn test_normalize_drops_zero_pair() {
        let lines = vec![
            JournalLine::debit(AccountId::new(), Decimal::ZERO),
            JournalLine::credit(AccountId::new(), Decimal::ZERO),
            JournalLine::debit(AccountId::new(), dec!(40)),
            JournalLine::credit(AccountId::new(), dec!(40)),
        ];
        assert_eq!(normalize_journal(lines).unwrap().len(), 2);
    }

    #[test]
    fn test_normalize_all_zero_is_empty() {
        let lines = vec![
            JournalLine::debit(AccountId::new(), Decimal::ZERO),
            JournalLine::credit(AccountId::new(), Decimal::ZERO),
        ];
        assert!(normalize_journal(lines).unwrap().is_empty());
    }

    #[test]
    fn test_normalize_rejects_negative() {
        let account = AccountId::new();
        let lines = vec![
            JournalLine::debit(account, dec!(-5)),
            JournalLine::credit(AccountId::new(), dec!(-5)),
        ];
        assert_eq!(
            normalize_journal(lines),
            Err(LedgerError::NegativeAmount {
                account_id: account,
                amount: dec!(-5)
            })
        );
    }
}
