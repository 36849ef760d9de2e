//! Orders.

use async_trait::async_trait;
use larder::prelude::{NewOrder, OrderId, OrderStatus};
use mockall::automock;
use reqwest::Method;

use super::{
    ApiError, HttpApi,
    models::{CreatedOrder, OrderFilter, OrderRecord},
};

#[automock]
#[async_trait]
pub trait OrdersApi: Send + Sync {
    /// Place an order.
    async fn create_order(&self, order: NewOrder) -> Result<CreatedOrder, ApiError>;

    /// Fetch a single order.
    async fn get_order(&self, order: OrderId) -> Result<OrderRecord, ApiError>;

    /// List a buyer's or a branch's orders.
    async fn list_orders(&self, filter: OrderFilter) -> Result<Vec<OrderRecord>, ApiError>;

    /// Request a status change.
    async fn set_order_status(&self, order: OrderId, status: OrderStatus) -> Result<(), ApiError>;
}

#[async_trait]
impl OrdersApi for HttpApi {
    async fn create_order(&self, order: NewOrder) -> Result<CreatedOrder, ApiError> {
        self.fetch(self.request(Method::POST, "/checkout").json(&order))
            .await
    }

    async fn get_order(&self, order: OrderId) -> Result<OrderRecord, ApiError> {
        self.fetch(self.request(Method::GET, &format!("/orders/{order}")))
            .await
    }

    async fn list_orders(&self, filter: OrderFilter) -> Result<Vec<OrderRecord>, ApiError> {
        self.fetch(self.request(Method::GET, "/orders").query(&[filter.query()]))
            .await
    }

    async fn set_order_status(&self, order: OrderId, status: OrderStatus) -> Result<(), ApiError> {
        self.submit(
            self.request(Method::PUT, &format!("/orders/{order}/status"))
                .query(&[("status", status.as_str())]),
        )
        .await
    }
}
