//! Catalog lookups.

use async_trait::async_trait;
use larder::prelude::{BranchId, FoodId};
use mockall::automock;
use reqwest::Method;

use super::{
    ApiError, HttpApi,
    models::{BranchDetail, FoodDetail, FoodOption, FoodSummary},
};

#[automock]
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// Name, price and image of a food.
    async fn get_food(&self, food: FoodId) -> Result<FoodDetail, ApiError>;

    /// Display data of a branch.
    async fn get_branch(&self, branch: BranchId) -> Result<BranchDetail, ApiError>;

    /// Dishes whose name matches `query`. An empty query lists every dish.
    async fn search_foods(&self, query: String) -> Result<Vec<FoodSummary>, ApiError>;

    /// Every branch's offer of the dish called `name`.
    async fn food_options(&self, name: String) -> Result<Vec<FoodOption>, ApiError>;
}

#[async_trait]
impl CatalogApi for HttpApi {
    async fn get_food(&self, food: FoodId) -> Result<FoodDetail, ApiError> {
        self.fetch(self.request(Method::GET, &format!("/foods/{food}")))
            .await
    }

    async fn get_branch(&self, branch: BranchId) -> Result<BranchDetail, ApiError> {
        self.fetch(self.request(Method::GET, &format!("/branches/{branch}")))
            .await
    }

    async fn search_foods(&self, query: String) -> Result<Vec<FoodSummary>, ApiError> {
        self.fetch(
            self.request(Method::GET, "/foods/search")
                .query(&[("q", query.as_str())]),
        )
        .await
    }

    async fn food_options(&self, name: String) -> Result<Vec<FoodOption>, ApiError> {
        self.fetch(
            self.request(Method::GET, "/foods/options")
                .query(&[("name", name.as_str())]),
        )
        .await
    }
}
