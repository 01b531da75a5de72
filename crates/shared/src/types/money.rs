//! Money rounding rules.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Every amount is a `rust_decimal::Decimal`.

use rust_decimal::{Decimal, RoundingStrategy};

/// Decimal places kept on invoice totals and journal amounts.
pub const MONEY_SCALE: u32 = 2;

/// Decimal places kept on per-unit lot costs.
pub const COST_SCALE: u32 = 6;

/// Rounds an amount to currency precision, half away from zero.
#[must_use]
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds a per-unit cost to lot precision, half away from zero.
#[must_use]
pub fn round_cost(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(COST_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_round_money_half_away_from_zero() {
        assert_eq!(round_money(dec!(10.005)), dec!(10.01));
        assert_eq!(round_money(dec!(10.004)), dec!(10.00));
        assert_eq!(round_money(dec!(-10.005)), dec!(-10.01));
    }

    #[test]
    fn test_round_cost() {
        assert_eq!(round_cost(dec!(3.3333333333)), dec!(3.333333));
        assert_eq!(round_cost(dec!(0.5)), dec!(0.5));
    }
}
