//! Payments
//!
//! The amount handed to the payment page may be missing or garbage (for
//! example when the handoff was restored from somewhere that lost it). A
//! [`PaymentAmount`] can only be built from a valid, strictly positive value,
//! so an invalid amount can never reach the payment request.

use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use serde::{Deserialize, Deserializer, Serialize, de::IgnoredAny};
use thiserror::Error;

use crate::{
    ids::OrderId,
    money::{AmountError, major_from_minor, minor_from_major, money},
};

/// Why an amount cannot be paid.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PaymentAmountError {
    /// No usable amount is known yet.
    #[error("payment amount is not available yet")]
    Missing,

    /// The amount is zero.
    #[error("payment amount must be greater than zero")]
    NotPositive,

    /// The amount cannot be represented.
    #[error(transparent)]
    Amount(#[from] AmountError),
}

/// A validated amount to submit for payment, in minor units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaymentAmount {
    minor: u64,
}

impl PaymentAmount {
    /// Wrap a minor-unit amount.
    ///
    /// # Errors
    ///
    /// Returns [`PaymentAmountError::NotPositive`] for zero.
    pub fn from_minor(minor: u64) -> Result<Self, PaymentAmountError> {
        if minor == 0 {
            return Err(PaymentAmountError::NotPositive);
        }

        Ok(Self { minor })
    }

    /// Validate a major-unit amount, typically one carried in a handoff or returned by the server.
    ///
    /// # Errors
    ///
    /// Returns [`PaymentAmountError::Missing`] when there is no amount, and
    /// [`PaymentAmountError::NotPositive`] or a wrapped [`AmountError`] when it is invalid.
    pub fn from_major(
        major: Option<Decimal>,
        currency: &Currency,
    ) -> Result<Self, PaymentAmountError> {
        let major = major.ok_or(PaymentAmountError::Missing)?;

        Self::from_minor(minor_from_major(major, currency)?)
    }

    /// Amount in minor units.
    pub fn minor(self) -> u64 {
        self.minor
    }

    /// Amount in major units, as sent on the wire.
    pub fn major(self, currency: &Currency) -> Decimal {
        major_from_minor(self.minor, currency)
    }

    /// Amount as money.
    ///
    /// # Errors
    ///
    /// Returns [`AmountError::OutOfRange`] if the amount exceeds `i64` minor units.
    pub fn money(self, currency: &'static Currency) -> Result<Money<'static, Currency>, AmountError> {
        money(self.minor, currency)
    }
}

/// State handed from checkout to the payment page for online payments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentHandoff {
    /// Order being paid.
    pub order_id: OrderId,

    /// Total as known to the previous page, in major units. Non-numeric values
    /// deserialize as `None`.
    #[serde(
        default,
        deserialize_with = "lenient_amount",
        serialize_with = "rust_decimal::serde::float_option::serialize"
    )]
    pub total_price: Option<Decimal>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawAmount {
    Number(#[serde(with = "rust_decimal::serde::float")] Decimal),
    Other(IgnoredAny),
}

fn lenient_amount<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Decimal>, D::Error> {
    Ok(match RawAmount::deserialize(deserializer)? {
        RawAmount::Number(amount) => Some(amount),
        RawAmount::Other(_) => None,
    })
}

#[cfg(test)]
mod tests {
    use rusty_money::iso;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn missing_amount_is_not_payable() {
        assert_eq!(
            PaymentAmount::from_major(None, iso::VND),
            Err(PaymentAmountError::Missing)
        );
    }

    #[test]
    fn zero_amount_is_not_payable() {
        assert_eq!(
            PaymentAmount::from_major(Some(Decimal::ZERO), iso::VND),
            Err(PaymentAmountError::NotPositive)
        );
    }

    #[test]
    fn negative_amount_is_not_payable() {
        assert!(matches!(
            PaymentAmount::from_major(Some(Decimal::from(-1)), iso::VND),
            Err(PaymentAmountError::Amount(AmountError::Negative(_)))
        ));
    }

    #[test]
    fn positive_amount_is_payable() -> TestResult {
        let amount = PaymentAmount::from_major(Some(Decimal::from(65_000)), iso::VND)?;

        assert_eq!(amount.minor(), 65_000);
        assert_eq!(amount.major(iso::VND), Decimal::from(65_000));

        Ok(())
    }

    #[test]
    fn handoff_without_total_deserializes() -> TestResult {
        let handoff: PaymentHandoff = serde_json::from_str(r#"{"order_id":5}"#)?;

        assert_eq!(handoff.order_id, OrderId::new(5));
        assert_eq!(handoff.total_price, None);

        Ok(())
    }

    #[test]
    fn handoff_with_garbage_total_deserializes_as_missing() -> TestResult {
        let handoff: PaymentHandoff =
            serde_json::from_str(r#"{"order_id":5,"total_price":"NaN"}"#)?;

        assert_eq!(handoff.total_price, None);

        let handoff: PaymentHandoff =
            serde_json::from_str(r#"{"order_id":5,"total_price":null}"#)?;

        assert_eq!(handoff.total_price, None);

        Ok(())
    }

    #[test]
    fn handoff_with_numeric_total_keeps_it() -> TestResult {
        let handoff: PaymentHandoff =
            serde_json::from_str(r#"{"order_id":5,"total_price":65000.0}"#)?;

        assert_eq!(handoff.total_price, Some(Decimal::from(65_000)));

        Ok(())
    }
}
