//! Priced Snapshot
//!
//! The frozen result of pricing a cart, handed from the cart to checkout. The
//! final price is computed exactly once, here; later stages read it and never
//! derive it again from the lines.

use rusty_money::{Money, iso::Currency};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    cart::Cart,
    coupons::Coupon,
    ids::BranchId,
    lines::CartLine,
    money::{AmountError, currency, money},
    pricing::{PricingError, totals},
};

/// Errors building a snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// There is nothing to check out.
    #[error("cart is empty")]
    EmptyCart,

    /// Pricing the cart failed.
    #[error(transparent)]
    Pricing(#[from] PricingError),
}

/// Immutable cart pricing carried into checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricedSnapshot {
    items: Vec<CartLine>,
    coupon: Option<Coupon>,
    final_price: u64,
    branch_id: BranchId,
    currency: String,
}

impl PricedSnapshot {
    /// Price the cart with an optional coupon and freeze the result.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::EmptyCart`] for an empty cart, or a pricing error.
    pub fn freeze(cart: &Cart, coupon: Option<&Coupon>) -> Result<Self, SnapshotError> {
        let branch_id = cart.branch_id().ok_or(SnapshotError::EmptyCart)?;
        let totals = totals(cart.subtotal()?, coupon)?;
        let final_price = u64::try_from(totals.total.to_minor_units())
            .map_err(|_negative| PricingError::Amount(AmountError::OutOfRange(totals.total.to_minor_units().into())))?;

        Ok(Self {
            items: cart.lines().to_vec(),
            coupon: coupon.cloned(),
            final_price,
            branch_id,
            currency: cart.currency().iso_alpha_code.to_string(),
        })
    }

    /// The lines as they were priced.
    pub fn items(&self) -> &[CartLine] {
        &self.items
    }

    /// The coupon that was applied, if any.
    pub fn coupon(&self) -> Option<&Coupon> {
        self.coupon.as_ref()
    }

    /// Final price in minor units.
    pub fn final_price(&self) -> u64 {
        self.final_price
    }

    /// Branch the cart belongs to.
    pub fn branch_id(&self) -> BranchId {
        self.branch_id
    }

    /// ISO code of the currency the snapshot was priced in.
    pub fn currency_code(&self) -> &str {
        &self.currency
    }

    /// The currency the snapshot was priced in.
    ///
    /// # Errors
    ///
    /// Returns [`AmountError::UnknownCurrency`] if the code was tampered with.
    pub fn currency(&self) -> Result<&'static Currency, AmountError> {
        currency(&self.currency)
    }

    /// Final price as money.
    ///
    /// # Errors
    ///
    /// Returns an [`AmountError`] if the currency is unknown or the amount is out of range.
    pub fn final_price_money(&self) -> Result<Money<'static, Currency>, AmountError> {
        money(self.final_price, self.currency()?)
    }

    /// Whether the snapshot carries no lines.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
