//! Money
//!
//! Amounts inside the pipeline are integer minor units of a single ISO
//! currency. The server speaks in major-unit decimals, so conversion happens
//! only at the wire boundary.

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use rusty_money::{
    Money,
    iso::{self, Currency},
};
use thiserror::Error;

/// Text rendered in place of an amount that has not been resolved yet.
pub const UNRESOLVED_AMOUNT: &str = "not yet available";

/// Errors converting between wire amounts and minor units.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AmountError {
    /// The amount is below zero.
    #[error("amount {0} is negative")]
    Negative(Decimal),

    /// The amount cannot be represented in minor units.
    #[error("amount {0} is out of range")]
    OutOfRange(Decimal),

    /// The currency code is not a known ISO currency.
    #[error("unknown currency code {0}")]
    UnknownCurrency(String),
}

/// Look up an ISO currency by its alpha code.
///
/// # Errors
///
/// Returns [`AmountError::UnknownCurrency`] when the code is not recognised.
pub fn currency(code: &str) -> Result<&'static Currency, AmountError> {
    iso::find(code).ok_or_else(|| AmountError::UnknownCurrency(code.to_string()))
}

fn minor_scale(currency: &Currency) -> Decimal {
    Decimal::from(10_u64.pow(currency.exponent))
}

/// Convert a major-unit wire amount into minor units, rounding half away from zero.
///
/// # Errors
///
/// Returns an error when the amount is negative or does not fit in `u64` minor units.
pub fn minor_from_major(major: Decimal, currency: &Currency) -> Result<u64, AmountError> {
    if major.is_sign_negative() && !major.is_zero() {
        return Err(AmountError::Negative(major));
    }

    major
        .checked_mul(minor_scale(currency))
        .map(|scaled| scaled.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|scaled| scaled.to_u64())
        .ok_or(AmountError::OutOfRange(major))
}

/// Convert minor units back into a major-unit wire amount.
pub fn major_from_minor(minor: u64, currency: &Currency) -> Decimal {
    Decimal::from(minor) / minor_scale(currency)
}

/// Build a [`Money`] value from minor units.
///
/// # Errors
///
/// Returns [`AmountError::OutOfRange`] if the amount exceeds `i64::MAX` minor units.
pub fn money(minor: u64, currency: &'static Currency) -> Result<Money<'static, Currency>, AmountError> {
    let minor = i64::try_from(minor).map_err(|_overflow| AmountError::OutOfRange(Decimal::from(minor)))?;

    Ok(Money::from_minor(minor, currency))
}

/// Render an amount for display, or the unresolved marker when there is none.
pub fn format_amount(amount: Option<&Money<'_, Currency>>) -> String {
    amount.map_or_else(|| UNRESOLVED_AMOUNT.to_string(), ToString::to_string)
}
