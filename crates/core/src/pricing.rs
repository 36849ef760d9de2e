//! Pricing

use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;

use crate::{
    coupons::Coupon,
    discounts::DiscountError,
    ids::FoodId,
    lines::CartLine,
    money::{AmountError, money},
};

/// Errors that can occur while pricing a cart.
#[derive(Debug, Error)]
pub enum PricingError {
    /// Price × quantity overflowed for a line.
    #[error("line total for food {0} overflowed")]
    LineOverflow(FoodId),

    /// An amount could not be represented as money.
    #[error(transparent)]
    Amount(#[from] AmountError),

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),

    /// The coupon discount could not be computed.
    #[error(transparent)]
    Discount(#[from] DiscountError),
}

/// Subtotal, coupon discount and payable total for a cart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Totals {
    /// Σ price × quantity.
    pub subtotal: Money<'static, Currency>,

    /// Amount taken off by the applied coupon.
    pub discount: Money<'static, Currency>,

    /// Subtotal minus discount.
    pub total: Money<'static, Currency>,
}

/// Calculates Σ(price × quantity) over the given lines.
///
/// # Errors
///
/// - [`PricingError::LineOverflow`]: a line's price × quantity overflowed.
/// - [`PricingError::Money`]: wrapped money arithmetic error.
pub fn subtotal(
    lines: &[CartLine],
    currency: &'static Currency,
) -> Result<Money<'static, Currency>, PricingError> {
    lines
        .iter()
        .try_fold(Money::from_minor(0, currency), |acc, line| {
            let line_total = line
                .line_total()
                .ok_or(PricingError::LineOverflow(line.food_id))?;

            Ok(acc.add(money(line_total, currency)?)?)
        })
}

/// Applies an optional coupon to a subtotal.
///
/// With no coupon the total equals the subtotal.
///
/// # Errors
///
/// Returns an error if the discount cannot be computed or the money arithmetic fails.
pub fn totals(
    subtotal: Money<'static, Currency>,
    coupon: Option<&Coupon>,
) -> Result<Totals, PricingError> {
    let currency = subtotal.currency();
    let subtotal_minor = u64::try_from(subtotal.to_minor_units()).unwrap_or_default();

    let discount = match coupon {
        Some(coupon) => money(coupon.discount_on(subtotal_minor)?, currency)?,
        None => Money::from_minor(0, currency),
    };

    Ok(Totals {
        subtotal,
        discount,
        total: subtotal.sub(discount)?,
    })
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use rusty_money::iso;
    use testresult::TestResult;

    use crate::ids::BranchId;

    use super::*;

    fn line(food: u64, price: u64, quantity: u32) -> CartLine {
        CartLine {
            food_id: FoodId::new(food),
            quantity,
            branch_id: BranchId::new(1),
            price,
            name: format!("Food {food}"),
            image_url: None,
        }
    }

    #[test]
    fn subtotal_sums_price_times_quantity() -> TestResult {
        let lines = [line(1, 50_000, 2), line(2, 30_000, 1)];

        assert_eq!(
            subtotal(&lines, iso::VND)?,
            Money::from_minor(130_000, iso::VND)
        );

        Ok(())
    }

    #[test]
    fn subtotal_of_no_lines_is_zero() -> TestResult {
        assert_eq!(subtotal(&[], iso::VND)?, Money::from_minor(0, iso::VND));

        Ok(())
    }

    #[test]
    fn subtotal_reports_overflowing_line() {
        let lines = [line(9, u64::MAX, 2)];

        assert!(matches!(
            subtotal(&lines, iso::VND),
            Err(PricingError::LineOverflow(food)) if food == FoodId::new(9)
        ));
    }

    #[test]
    fn totals_without_coupon_equal_subtotal() -> TestResult {
        let totals = totals(Money::from_minor(130_000, iso::VND), None)?;

        assert_eq!(totals.total, totals.subtotal);
        assert_eq!(totals.discount, Money::from_minor(0, iso::VND));

        Ok(())
    }

    #[test]
    fn half_price_coupon_halves_total() -> TestResult {
        let coupon = Coupon::new("SALE50", Decimal::from(50))?;
        let totals = totals(Money::from_minor(130_000, iso::VND), Some(&coupon))?;

        assert_eq!(totals.discount, Money::from_minor(65_000, iso::VND));
        assert_eq!(totals.total, Money::from_minor(65_000, iso::VND));

        Ok(())
    }
}
