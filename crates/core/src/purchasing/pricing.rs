//! Discounted totals for order and receipt lines.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tradeledger_shared::types::{ItemId, round_money};

use super::error::PurchasingError;

/// How a discount value is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscountType {
    /// Percentage off (`"per"`).
    #[serde(alias = "per")]
    Percentage,
    /// Fixed amount off per unit on lines, or off the total on headers (`"amt"`).
    #[default]
    #[serde(alias = "amt")]
    Amount,
}

impl DiscountType {
    /// Stored representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Percentage => "per",
            Self::Amount => "amt",
        }
    }
}

impl std::str::FromStr for DiscountType {
    type Err = PurchasingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "per" | "percentage" => Ok(Self::Percentage),
            "amt" | "amount" | "" => Ok(Self::Amount),
            other => Err(PurchasingError::UnknownDiscountType(other.to_string())),
        }
    }
}

/// A priced order line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricedLine {
    /// `unit_price * qty`.
    pub price_before_discount: Decimal,
    /// Discounted line total.
    pub total_price: Decimal,
}

/// Prices one order line.
///
/// Percentage: `unit_price * (100 - d) * qty / 100`. Amount:
/// `(unit_price - d) * qty`.
///
/// # Errors
///
/// Returns an error for a quantity below one, a negative price, or a
/// discount that is negative, above 100 percent, or exceeds the unit price.
pub fn price_line(
    item_id: ItemId,
    unit_price: Decimal,
    qty: i32,
    discount_type: DiscountType,
    discount: Decimal,
) -> Result<PricedLine, PurchasingError> {
    if qty < 1 {
        return Err(PurchasingError::InvalidQuantity { item_id, qty });
    }
    if unit_price.is_sign_negative() && !unit_price.is_zero() {
        return Err(PurchasingError::NegativePrice {
            item_id,
            unit_price,
        });
    }

    let quantity = Decimal::from(qty);
    let total_price = match discount_type {
        DiscountType::Percentage => {
            unit_price * (Decimal::ONE_HUNDRED - discount) * quantity / Decimal::ONE_HUNDRED
        }
        DiscountType::Amount => (unit_price - discount) * quantity,
    };
    check_discount(discount_type, discount, total_price)?;

    Ok(PricedLine {
        price_before_discount: round_money(unit_price * quantity),
        total_price: round_money(total_price),
    })
}

/// Applies a header discount to a document subtotal.
///
/// # Errors
///
/// Returns `InvalidDiscount` when the discount is out of range.
pub fn apply_discount(
    subtotal: Decimal,
    discount_type: DiscountType,
    discount: Decimal,
) -> Result<Decimal, PurchasingError> {
    let total = match discount_type {
        DiscountType::Percentage => {
            subtotal * (Decimal::ONE_HUNDRED - discount) / Decimal::ONE_HUNDRED
        }
        DiscountType::Amount => subtotal - discount,
    };
    check_discount(discount_type, discount, total)?;
    Ok(round_money(total))
}

fn check_discount(
    discount_type: DiscountType,
    discount: Decimal,
    total: Decimal,
) -> Result<(), PurchasingError> {
    let negative = discount.is_sign_negative() && !discount.is_zero();
    let over_full = discount_type == DiscountType::Percentage && discount > Decimal::ONE_HUNDRED;
    if negative || over_full || (total.is_sign_negative() && !total.is_zero()) {
        return Err(PurchasingError::InvalidDiscount { discount, total });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;
    use std::str::FromStr;

    #[rstest]
    #[case(DiscountType::Percentage, dec!(10), dec!(90))]
    #[case(DiscountType::Amount, dec!(1), dec!(90))]
    #[case(DiscountType::Amount, dec!(0), dec!(100))]
    fn test_price_line(
        #[case] discount_type: DiscountType,
        #[case] discount: Decimal,
        #[case] expected: Decimal,
    ) {
        let priced = price_line(ItemId::new(), dec!(10), 10, discount_type, discount).unwrap();
        assert_eq!(priced.price_before_discount, dec!(100));
        assert_eq!(priced.total_price, expected);
    }

    #[test]
    fn test_amount_discount_above_price_rejected() {
        assert!(matches!(
            price_line(ItemId::new(), dec!(10), 2, DiscountType::Amount, dec!(11)),
            Err(PurchasingError::InvalidDiscount { .. })
        ));
    }

    #[test]
    fn test_zero_qty_rejected() {
        let item = ItemId::new();
        assert_eq!(
            price_line(item, dec!(10), 0, DiscountType::Amount, Decimal::ZERO),
            Err(PurchasingError::InvalidQuantity { item_id: item, qty: 0 })
        );
    }

    #[test]
    fn test_header_discount() {
        assert_eq!(
            apply_discount(dec!(1000), DiscountType::Percentage, dec!(2.5)).unwrap(),
            dec!(975)
        );
        assert_eq!(
            apply_discount(dec!(1000), DiscountType::Amount, dec!(25)).unwrap(),
            dec!(975)
        );
        assert!(apply_discount(dec!(10), DiscountType::Percentage, dec!(101)).is_err());
    }

    #[test]
    fn test_discount_type_parse() {
        assert_eq!(DiscountType::from_str("per").unwrap(), DiscountType::Percentage);
        assert_eq!(DiscountType::from_str("AMT").unwrap(), DiscountType::Amount);
        assert!(DiscountType::from_str("bogus").is_err());
    }
}
