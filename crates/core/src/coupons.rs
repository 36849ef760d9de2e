//! Coupons

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::discounts::{DiscountError, percent_of_minor, percentage_from_percent};

/// Errors raised when a coupon fails local validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CouponError {
    /// The coupon code is empty or whitespace.
    #[error("coupon code is blank")]
    BlankCode,

    /// The discount percentage falls outside `[0, 100]`.
    #[error("discount percent {0} is outside 0..=100")]
    PercentOutOfRange(Decimal),
}

/// A coupon verified by the server for a branch.
///
/// The discount is a flat percentage of the whole subtotal, never per line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CouponRecord", into = "CouponRecord")]
pub struct Coupon {
    code: String,
    discount_percent: Decimal,
}

impl Coupon {
    /// Create a coupon, validating the code and percentage range.
    ///
    /// # Errors
    ///
    /// Returns [`CouponError`] for blank codes or out-of-range percentages.
    pub fn new(code: impl Into<String>, discount_percent: Decimal) -> Result<Self, CouponError> {
        let code = normalize_code(&code.into()).ok_or(CouponError::BlankCode)?;

        if discount_percent < Decimal::ZERO || discount_percent > Decimal::ONE_HUNDRED {
            return Err(CouponError::PercentOutOfRange(discount_percent));
        }

        Ok(Self {
            code,
            discount_percent,
        })
    }

    /// The coupon code.
    pub fn code(&self) -> &str {
        &self.code
    }

    /// The discount as a whole-number percent.
    pub fn discount_percent(&self) -> Decimal {
        self.discount_percent
    }

    /// The discount this coupon grants on a subtotal, in minor units.
    ///
    /// This is the single place the coupon arithmetic lives; the cart summary
    /// and the frozen checkout snapshot both go through it.
    ///
    /// # Errors
    ///
    /// Returns [`DiscountError::PercentConversion`] if the amount cannot be represented.
    pub fn discount_on(&self, subtotal_minor: u64) -> Result<u64, DiscountError> {
        let minor = i64::try_from(subtotal_minor).map_err(|_overflow| DiscountError::PercentConversion)?;
        let percent = percentage_from_percent(self.discount_percent);
        let discount = percent_of_minor(&percent, minor)?;

        u64::try_from(discount)
            .map(|discount| discount.min(subtotal_minor))
            .map_err(|_negative| DiscountError::PercentConversion)
    }
}

/// Trim and upper-case a user-entered coupon code; `None` when blank.
pub fn normalize_code(raw: &str) -> Option<String> {
    let trimmed = raw.trim();

    (!trimmed.is_empty()).then(|| trimmed.to_uppercase())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CouponRecord {
    code: String,
    #[serde(with = "rust_decimal::serde::float")]
    discount_percent: Decimal,
}

impl TryFrom<CouponRecord> for Coupon {
    type Error = CouponError;

    fn try_from(record: CouponRecord) -> Result<Self, Self::Error> {
        Coupon::new(record.code, record.discount_percent)
    }
}

impl From<Coupon> for CouponRecord {
    fn from(coupon: Coupon) -> Self {
        Self {
            code: coupon.code,
            discount_percent: coupon.discount_percent,
        }
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn codes_are_normalized() -> TestResult {
        let coupon = Coupon::new("  sale50 ", Decimal::from(50))?;

        assert_eq!(coupon.code(), "SALE50");

        Ok(())
    }

    #[test]
    fn blank_code_is_rejected() {
        assert_eq!(
            Coupon::new("   ", Decimal::from(10)),
            Err(CouponError::BlankCode)
        );
    }

    #[test]
    fn percent_above_hundred_is_rejected() {
        assert_eq!(
            Coupon::new("BIG", Decimal::from(101)),
            Err(CouponError::PercentOutOfRange(Decimal::from(101)))
        );
    }

    #[test]
    fn negative_percent_is_rejected() {
        assert!(matches!(
            Coupon::new("NEG", Decimal::from(-1)),
            Err(CouponError::PercentOutOfRange(_))
        ));
    }

    #[test]
    fn deserializing_validates_range() {
        let result = serde_json::from_str::<Coupon>(r#"{"code":"X","discount_percent":150}"#);

        assert!(result.is_err(), "expected range error, got {result:?}");
    }

    #[test]
    fn deserializes_server_payload() -> TestResult {
        let coupon: Coupon = serde_json::from_str(r#"{"code":"SALE50","discount_percent":50.0}"#)?;

        assert_eq!(coupon.discount_percent(), Decimal::from(50));
        assert_eq!(coupon.discount_on(130_000)?, 65_000);

        Ok(())
    }

    #[test]
    fn full_discount_never_exceeds_subtotal() -> TestResult {
        let coupon = Coupon::new("FREE", Decimal::ONE_HUNDRED)?;

        assert_eq!(coupon.discount_on(999)?, 999);

        Ok(())
    }
}
