//! Property-based tests for journal validation.

use proptest::prelude::*;
use rust_decimal::Decimal;
use tradeledger_shared::types::AccountId;

use super::entry::JournalLine;
use super::error::LedgerError;
use super::validation::{normalize_journal, validate_journal};

/// Strategy to generate a valid positive amount (> 0).
fn positive_amount() -> impl Strategy<Value = Decimal> {
    // 0.01 to 1,000,000.00
    (1i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// **Property 1: Paired lines always balance**
    ///
    /// *For any* list of amounts, posting each as a debit/credit pair yields
    /// a journal whose debits equal its credits.
    #[test]
    fn prop_paired_lines_balance(amounts in prop::collection::vec(positive_amount(), 1..10)) {
        let lines: Vec<JournalLine> = amounts
            .iter()
            .flat_map(|a| [
                JournalLine::debit(AccountId::new(), *a),
                JournalLine::credit(AccountId::new(), *a),
            ])
            .collect();

        let totals = validate_journal(&lines).unwrap();
        let expected: Decimal = amounts.iter().sum();
        prop_assert_eq!(totals.debits, expected);
        prop_assert_eq!(totals.credits, expected);
        prop_assert_eq!(lines.iter().map(JournalLine::signed_amount).sum::<Decimal>(), Decimal::ZERO);
    }

    /// **Property 2: Any skew is detected**
    #[test]
    fn prop_skew_rejected(amount in positive_amount(), skew in positive_amount()) {
        let lines = vec![
            JournalLine::debit(AccountId::new(), amount + skew),
            JournalLine::credit(AccountId::new(), amount),
        ];
        let is_unbalanced = matches!(validate_journal(&lines), Err(LedgerError::Unbalanced { .. }));
        prop_assert!(is_unbalanced);
    }

    /// **Property 3: Zero lines never change the outcome**
    #[test]
    fn prop_zero_lines_ignored(amount in positive_amount(), zeros in 0usize..4) {
        let mut lines = vec![
            JournalLine::debit(AccountId::new(), amount),
            JournalLine::credit(AccountId::new(), amount),
        ];
        for _ in 0..zeros {
            lines.push(JournalLine::debit(AccountId::new(), Decimal::ZERO));
        }

        let kept = normalize_journal(lines).unwrap();
        prop_assert_eq!(kept.len(), 2);
    }
}
