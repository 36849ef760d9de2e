//! Cart Page

use futures::{StreamExt, stream};
use larder::{money::minor_from_major, prelude::*};
use rusty_money::{Money, iso::Currency};
use tracing::{debug, error, info, warn};

use crate::{
    api::{
        ApiError, CatalogApi,
        models::{NewCartLine, QuantityUpdate, RawCartLine},
    },
    context::AppContext,
};

use super::{Notices, Prompt, Route};

/// Result of adding a food from the shop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// The food is in the cart.
    Added,
    /// The cart was emptied and the food started a new cart.
    Replaced,
    /// The cart belongs to another branch and the user kept it.
    BranchConflict,
    /// The server refused; see the notices.
    Failed,
}

/// The cart: enriched lines, the applied coupon and derived totals.
#[derive(Debug)]
pub struct CartPage {
    ctx: AppContext,
    cart: Cart,
    coupon: Option<Coupon>,
    notices: Notices,
}

impl CartPage {
    pub fn new(ctx: AppContext) -> Self {
        let cart = Cart::new(ctx.settings.currency);

        Self {
            ctx,
            cart,
            coupon: None,
            notices: Notices::default(),
        }
    }

    /// Fetch the server cart and enrich every line from the catalog.
    ///
    /// Product lookups run concurrently up to the configured limit. A lookup
    /// that fails keeps the line as a zero-priced placeholder. Any previously
    /// applied coupon is dropped and must be applied again.
    pub async fn load(&mut self) {
        let currency = self.ctx.settings.currency;

        self.coupon = None;

        let raw = match self.ctx.carts.get_cart().await {
            Ok(raw) => raw,
            Err(error) => {
                error!(%error, "failed to load cart");
                self.cart = Cart::new(currency);
                self.notices.error("Could not load your cart");
                return;
            }
        };

        let catalog = self.ctx.catalog.as_ref();
        let lines: Vec<CartLine> = stream::iter(raw)
            .map(|line| enrich(catalog, line, currency))
            .buffered(self.ctx.settings.enrichment_concurrency.max(1))
            .collect()
            .await;

        match Cart::with_lines(lines, currency) {
            Ok(cart) => {
                debug!(lines = cart.len(), "loaded cart");
                self.cart = cart;
            }
            Err(error) => {
                error!(%error, "server cart is inconsistent");
                self.cart = Cart::new(currency);
                self.notices.error("Your cart could not be displayed");
            }
        }
    }

    /// Change a line's quantity on the server, then locally.
    ///
    /// A quantity below one, or a food not in the cart, is ignored.
    pub async fn set_quantity(&mut self, food: FoodId, quantity: u32) {
        if quantity < 1 || self.cart.line(food).is_none() {
            return;
        }

        if let Err(error) = self
            .ctx
            .carts
            .update_quantity(QuantityUpdate {
                food_id: food,
                quantity,
            })
            .await
        {
            error!(%error, %food, "failed to update quantity");
            self.notices.error(format!(
                "Could not update quantity: {}",
                error.detail_or("please try again")
            ));
            return;
        }

        if let Err(error) = self.cart.set_quantity(food, quantity) {
            warn!(%error, %food, "local cart out of sync");
        }
    }

    /// Remove a line after confirmation.
    pub async fn remove_line(&mut self, food: FoodId, prompt: &dyn Prompt) {
        if self.cart.line(food).is_none() || !prompt.confirm("Remove this item from your cart?") {
            return;
        }

        if self.ctx.carts.supports_line_removal() {
            if let Err(error) = self.ctx.carts.remove_line(food).await {
                error!(%error, %food, "failed to remove line");
                self.notices.error(format!(
                    "Could not remove item: {}",
                    error.detail_or("please try again")
                ));
                return;
            }
        }

        if let Err(error) = self.cart.remove(food) {
            warn!(%error, %food, "local cart out of sync");
        }

        // TODO: drop the clear-when-empty fallback once every deployment serves `DELETE /cart/{food_id}`.
        if !self.ctx.carts.supports_line_removal() {
            if self.cart.is_empty() {
                if let Err(error) = self.ctx.carts.clear_cart().await {
                    error!(%error, "failed to clear emptied cart");
                    self.notices.error("Could not update your cart");
                }
            } else {
                warn!(%food, "line removed locally, server cart unchanged");
                self.notices.warning(
                    "Removed here only: the server still holds this item and it returns when the cart reloads",
                );
            }
        }

        if self.cart.is_empty() {
            self.coupon = None;
        }
    }

    /// Empty the cart after confirmation.
    pub async fn clear(&mut self, prompt: &dyn Prompt) {
        if !prompt.confirm("Remove every item from your cart?") {
            return;
        }

        match self.ctx.carts.clear_cart().await {
            Ok(()) => {
                self.cart.clear();
                self.coupon = None;
                self.notices.info("Cart cleared");
            }
            Err(error) => {
                error!(%error, "failed to clear cart");
                self.notices.error(format!(
                    "Could not clear your cart: {}",
                    error.detail_or("please try again")
                ));
            }
        }
    }

    /// Verify a coupon code for the cart's branch.
    ///
    /// A rejected code removes any coupon that was applied before.
    pub async fn apply_coupon(&mut self, code: &str) {
        let Some(code) = normalize_code(code) else {
            return;
        };

        let Some(branch) = self.cart.branch_id() else {
            self.notices.warning("Your cart is empty");
            return;
        };

        match self.ctx.coupons.verify_coupon(code.clone(), branch).await {
            Ok(coupon) => {
                info!(code = coupon.code(), %branch, "applied coupon");
                self.notices
                    .success(format!("Coupon {} applied", coupon.code()));
                self.coupon = Some(coupon);
            }
            Err(error) => {
                debug!(%error, code = %code, %branch, "coupon rejected");
                self.coupon = None;
                self.notices.error("Coupon is invalid or expired");
            }
        }
    }

    /// Freeze the priced cart and move to checkout.
    pub fn proceed_to_checkout(&mut self) -> Option<Route> {
        if self.cart.is_empty() {
            self.notices.warning("Your cart is empty");
            return None;
        }

        match PricedSnapshot::freeze(&self.cart, self.coupon.as_ref()) {
            Ok(snapshot) => Some(Route::Checkout(snapshot)),
            Err(error) => {
                error!(%error, "failed to price cart");
                self.notices.error("Your cart could not be priced");
                None
            }
        }
    }

    /// Add a food from the shop.
    ///
    /// When the cart holds another branch's food the user is asked whether to
    /// start a new cart; declining leaves the cart untouched.
    pub async fn add_item(
        &mut self,
        food: FoodId,
        branch: BranchId,
        quantity: u32,
        prompt: &dyn Prompt,
    ) -> AddOutcome {
        let line = NewCartLine {
            food_id: food,
            branch_id: branch,
            quantity: quantity.max(1),
        };

        let conflict = match self.cart.ensure_addable(food, branch) {
            Err(_) => true,
            Ok(()) => match self.ctx.carts.add_line(line).await {
                Ok(()) => false,
                Err(error) if error.is_conflict() => true,
                Err(error) => return self.add_failed(&error),
            },
        };

        if !conflict {
            self.notices.success("Added to cart");
            self.load().await;
            return AddOutcome::Added;
        }

        if !prompt.confirm("Your cart holds food from another restaurant. Start a new cart?") {
            return AddOutcome::BranchConflict;
        }

        if let Err(error) = self.ctx.carts.clear_cart().await {
            return self.add_failed(&error);
        }

        if let Err(error) = self.ctx.carts.add_line(line).await {
            return self.add_failed(&error);
        }

        info!(%food, %branch, "started a new cart");
        self.notices.success("Started a new cart");
        self.load().await;

        AddOutcome::Replaced
    }

    fn add_failed(&mut self, error: &ApiError) -> AddOutcome {
        error!(%error, "failed to add to cart");
        self.notices.error(format!(
            "Could not add to cart: {}",
            error.detail_or("please try again")
        ));

        AddOutcome::Failed
    }

    /// Subtotal, discount and total for the current lines and coupon.
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if the amounts overflow.
    pub fn totals(&self) -> Result<Totals, PricingError> {
        totals(self.cart.subtotal()?, self.coupon.as_ref())
    }

    pub fn subtotal(&self) -> Result<Money<'static, Currency>, PricingError> {
        self.cart.subtotal()
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn coupon(&self) -> Option<&Coupon> {
        self.coupon.as_ref()
    }

    pub fn notices(&self) -> &Notices {
        &self.notices
    }

    pub fn notices_mut(&mut self) -> &mut Notices {
        &mut self.notices
    }
}

async fn enrich(catalog: &dyn CatalogApi, line: RawCartLine, currency: &'static Currency) -> CartLine {
    let detail = match catalog.get_food(line.food_id).await {
        Ok(detail) => detail,
        Err(error) => {
            warn!(%error, food = %line.food_id, "product lookup failed");
            return CartLine::placeholder(line.food_id, line.quantity, line.branch_id);
        }
    };

    match minor_from_major(detail.price, currency) {
        Ok(price) => CartLine {
            food_id: line.food_id,
            quantity: line.quantity,
            branch_id: line.branch_id,
            price,
            name: detail.name,
            image_url: detail.image_url,
        },
        Err(error) => {
            warn!(%error, food = %line.food_id, "product has an unusable price");
            CartLine::placeholder(line.food_id, line.quantity, line.branch_id)
        }
    }
}
