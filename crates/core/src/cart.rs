//! Cart

use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::{
    ids::{BranchId, FoodId},
    lines::CartLine,
    pricing::{PricingError, subtotal},
};

/// Errors related to cart construction or mutation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    /// A line's branch differs from the cart's branch (food, line branch, cart branch).
    #[error("food {0} belongs to branch {1}, but the cart belongs to branch {2}")]
    BranchConflict(FoodId, BranchId, BranchId),

    /// The same food appears on more than one line.
    #[error("food {0} appears on more than one line")]
    DuplicateLine(FoodId),

    /// No line exists for the food.
    #[error("food {0} is not in the cart")]
    LineNotFound(FoodId),

    /// Quantities must be at least one.
    #[error("quantity must be at least 1")]
    ZeroQuantity,
}

/// A single-branch collection of priced cart lines.
#[derive(Debug, Clone)]
pub struct Cart {
    lines: Vec<CartLine>,
    currency: &'static Currency,
}

impl Cart {
    /// Create an empty cart.
    pub fn new(currency: &'static Currency) -> Self {
        Cart {
            lines: Vec::new(),
            currency,
        }
    }

    /// Create a cart from already-enriched lines.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] if the lines span branches, repeat a food, or carry a zero quantity.
    pub fn with_lines(
        lines: impl Into<Vec<CartLine>>,
        currency: &'static Currency,
    ) -> Result<Self, CartError> {
        let lines = lines.into();
        let mut cart = Cart::new(currency);

        for line in lines {
            cart.ensure_addable(line.food_id, line.branch_id)?;

            if line.quantity == 0 {
                return Err(CartError::ZeroQuantity);
            }

            if cart.line(line.food_id).is_some() {
                return Err(CartError::DuplicateLine(line.food_id));
            }

            cart.lines.push(line);
        }

        Ok(cart)
    }

    /// Check that a food from `branch` could join this cart without a conflict.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::BranchConflict`] when the cart already holds another branch's food.
    pub fn ensure_addable(&self, food: FoodId, branch: BranchId) -> Result<(), CartError> {
        match self.branch_id() {
            Some(current) if current != branch => {
                Err(CartError::BranchConflict(food, branch, current))
            }
            _ => Ok(()),
        }
    }

    /// Set the quantity of an existing line.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::ZeroQuantity`] or [`CartError::LineNotFound`].
    pub fn set_quantity(&mut self, food: FoodId, quantity: u32) -> Result<(), CartError> {
        if quantity == 0 {
            return Err(CartError::ZeroQuantity);
        }

        let line = self
            .lines
            .iter_mut()
            .find(|line| line.food_id == food)
            .ok_or(CartError::LineNotFound(food))?;

        line.quantity = quantity;

        Ok(())
    }

    /// Remove a line, returning it.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::LineNotFound`] if there is no line for the food.
    pub fn remove(&mut self, food: FoodId) -> Result<CartLine, CartError> {
        let index = self
            .lines
            .iter()
            .position(|line| line.food_id == food)
            .ok_or(CartError::LineNotFound(food))?;

        Ok(self.lines.remove(index))
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Calculate the subtotal of the cart.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if a line total overflows.
    pub fn subtotal(&self) -> Result<Money<'static, Currency>, PricingError> {
        subtotal(&self.lines, self.currency)
    }

    /// The line for a food, if present.
    pub fn line(&self, food: FoodId) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.food_id == food)
    }

    /// All lines in load order.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// The branch every line belongs to, or `None` for an empty cart.
    pub fn branch_id(&self) -> Option<BranchId> {
        self.lines.first().map(|line| line.branch_id)
    }

    /// Get the number of lines in the cart.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Check if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Get the currency of the cart.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::{Money, iso};
    use testresult::TestResult;

    use super::*;

    fn line(food: u64, branch: u64, price: u64, quantity: u32) -> CartLine {
        CartLine {
            food_id: FoodId::new(food),
            quantity,
            branch_id: BranchId::new(branch),
            price,
            name: format!("Food {food}"),
            image_url: None,
        }
    }

    fn test_cart() -> Result<Cart, CartError> {
        Cart::with_lines(
            [line(1, 7, 50_000, 2), line(2, 7, 30_000, 1)],
            iso::VND,
        )
    }

    #[test]
    fn with_lines_branch_mismatch_errors() {
        let result = Cart::with_lines([line(1, 7, 100, 1), line(2, 8, 100, 1)], iso::VND);

        assert_eq!(
            result.map(|cart| cart.len()),
            Err(CartError::BranchConflict(
                FoodId::new(2),
                BranchId::new(8),
                BranchId::new(7)
            ))
        );
    }

    #[test]
    fn with_lines_duplicate_food_errors() {
        let result = Cart::with_lines([line(1, 7, 100, 1), line(1, 7, 100, 2)], iso::VND);

        assert!(matches!(result, Err(CartError::DuplicateLine(food)) if food == FoodId::new(1)));
    }

    #[test]
    fn subtotal_with_lines() -> TestResult {
        let cart = test_cart()?;

        assert_eq!(cart.subtotal()?, Money::from_minor(130_000, iso::VND));
        assert_eq!(cart.branch_id(), Some(BranchId::new(7)));

        Ok(())
    }

    #[test]
    fn set_quantity_updates_subtotal() -> TestResult {
        let mut cart = test_cart()?;

        cart.set_quantity(FoodId::new(2), 3)?;

        assert_eq!(cart.subtotal()?, Money::from_minor(190_000, iso::VND));

        Ok(())
    }

    #[test]
    fn set_quantity_zero_is_rejected() -> TestResult {
        let mut cart = test_cart()?;

        assert_eq!(
            cart.set_quantity(FoodId::new(1), 0),
            Err(CartError::ZeroQuantity)
        );

        Ok(())
    }

    #[test]
    fn remove_then_clear() -> TestResult {
        let mut cart = test_cart()?;

        let removed = cart.remove(FoodId::new(1))?;

        assert_eq!(removed.food_id, FoodId::new(1));
        assert_eq!(cart.len(), 1);

        cart.clear();

        assert!(cart.is_empty());
        assert_eq!(cart.branch_id(), None);

        Ok(())
    }

    #[test]
    fn remove_unknown_food_errors() -> TestResult {
        let mut cart = test_cart()?;

        assert_eq!(
            cart.remove(FoodId::new(99)).map(|line| line.food_id),
            Err(CartError::LineNotFound(FoodId::new(99)))
        );

        Ok(())
    }

    #[test]
    fn empty_cart_accepts_any_branch() {
        let cart = Cart::new(iso::VND);

        assert_eq!(cart.ensure_addable(FoodId::new(1), BranchId::new(3)), Ok(()));
    }
}
