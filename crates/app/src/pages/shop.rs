//! Shop Page

use larder::prelude::*;
use tracing::{debug, error};

use crate::{
    api::models::{FoodOption, FoodSummary},
    context::AppContext,
};

use super::{AddOutcome, CartPage, Notices, Prompt};

/// Dish search and the branch offers for one dish.
#[derive(Debug)]
pub struct ShopPage {
    ctx: AppContext,
    foods: Vec<FoodSummary>,
    selected: Option<String>,
    options: Vec<FoodOption>,
    notices: Notices,
}

impl ShopPage {
    pub fn new(ctx: AppContext) -> Self {
        Self {
            ctx,
            foods: Vec::new(),
            selected: None,
            options: Vec::new(),
            notices: Notices::default(),
        }
    }

    /// Search dishes by name. A failed search keeps the previous results.
    pub async fn search(&mut self, query: &str) {
        match self.ctx.catalog.search_foods(query.trim().to_string()).await {
            Ok(foods) => {
                debug!(query, results = foods.len(), "searched dishes");
                self.foods = foods;
            }
            Err(error) => {
                error!(%error, query, "dish search failed");
                self.notices.error("Could not load dishes");
            }
        }
    }

    /// Load which branches sell the dish called `name`.
    pub async fn view_options(&mut self, name: &str) {
        let name = name.trim();

        if name.is_empty() {
            return;
        }

        match self.ctx.catalog.food_options(name.to_string()).await {
            Ok(options) => {
                if options.is_empty() {
                    self.notices.warning(format!("No branch sells {name}"));
                }

                self.selected = Some(name.to_string());
                self.options = options;
            }
            Err(error) => {
                error!(%error, name, "failed to load dish offers");
                self.notices.error(format!("Could not load offers for {name}"));
            }
        }
    }

    /// Put the selected dish from `branch` in the cart.
    ///
    /// Without a branch the dish must be sold by exactly one branch. Returns
    /// `None` when no offer could be chosen.
    pub async fn add_to_cart(
        &mut self,
        branch: Option<BranchId>,
        quantity: u32,
        prompt: &dyn Prompt,
    ) -> Option<AddOutcome> {
        let option = match branch {
            Some(branch) => self
                .options
                .iter()
                .find(|option| option.branch_id == branch),
            None => match self.options.as_slice() {
                [only] => Some(only),
                _ => None,
            },
        };

        let Some(option) = option.cloned() else {
            self.notices.warning(match branch {
                Some(branch) => format!("Branch #{branch} does not sell this dish"),
                None => "Several branches sell this dish, choose one".to_string(),
            });
            return None;
        };

        let mut cart = CartPage::new(self.ctx.clone());
        let outcome = cart
            .add_item(option.food_id, option.branch_id, quantity, prompt)
            .await;

        for notice in cart.notices_mut().drain() {
            self.notices.push(notice.level, notice.message);
        }

        if matches!(outcome, AddOutcome::Added | AddOutcome::Replaced) {
            self.selected = None;
            self.options.clear();
        }

        Some(outcome)
    }

    pub fn foods(&self) -> &[FoodSummary] {
        &self.foods
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn options(&self) -> &[FoodOption] {
        &self.options
    }

    pub fn notices(&self) -> &Notices {
        &self.notices
    }

    pub fn notices_mut(&mut self) -> &mut Notices {
        &mut self.notices
    }
}
