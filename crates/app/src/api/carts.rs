//! Server cart.

use async_trait::async_trait;
use larder::prelude::FoodId;
use mockall::automock;
use reqwest::Method;

use super::{
    ApiError, HttpApi,
    models::{NewCartLine, QuantityUpdate, RawCartLine},
};

#[automock]
#[async_trait]
pub trait CartApi: Send + Sync {
    /// Lines currently in the signed-in user's cart.
    async fn get_cart(&self) -> Result<Vec<RawCartLine>, ApiError>;

    /// Add a food. A `409` means the cart holds another branch's food.
    async fn add_line(&self, line: NewCartLine) -> Result<(), ApiError>;

    /// Change the quantity of a line.
    async fn update_quantity(&self, update: QuantityUpdate) -> Result<(), ApiError>;

    /// Delete a single line. Only meaningful when [`CartApi::supports_line_removal`].
    async fn remove_line(&self, food: FoodId) -> Result<(), ApiError>;

    /// Empty the cart.
    async fn clear_cart(&self) -> Result<(), ApiError>;

    /// Whether the backend can delete a single line.
    fn supports_line_removal(&self) -> bool;
}

#[async_trait]
impl CartApi for HttpApi {
    async fn get_cart(&self) -> Result<Vec<RawCartLine>, ApiError> {
        self.fetch(self.request(Method::GET, "/cart")).await
    }

    async fn add_line(&self, line: NewCartLine) -> Result<(), ApiError> {
        self.submit(self.request(Method::POST, "/cart").json(&line))
            .await
    }

    async fn update_quantity(&self, update: QuantityUpdate) -> Result<(), ApiError> {
        self.submit(self.request(Method::PUT, "/cart").json(&update))
            .await
    }

    async fn remove_line(&self, food: FoodId) -> Result<(), ApiError> {
        if !self.line_removal() {
            return Err(ApiError::Unsupported);
        }

        self.submit(self.request(Method::DELETE, &format!("/cart/{food}")))
            .await
    }

    async fn clear_cart(&self) -> Result<(), ApiError> {
        self.submit(self.request(Method::DELETE, "/cart")).await
    }

    fn supports_line_removal(&self) -> bool {
        self.line_removal()
    }
}
