//! Payments and saved payment instruments.

use async_trait::async_trait;
use mockall::automock;
use reqwest::Method;

use super::{
    ApiError, HttpApi,
    models::{NewInstrument, PaymentRequest, SavedInstrument},
};

#[automock]
#[async_trait]
pub trait PaymentsApi: Send + Sync {
    /// Pay for an order.
    async fn submit_payment(&self, payment: PaymentRequest) -> Result<(), ApiError>;

    /// Instruments saved by the signed-in user.
    async fn list_instruments(&self) -> Result<Vec<SavedInstrument>, ApiError>;

    /// Save a new instrument.
    async fn save_instrument(&self, instrument: NewInstrument) -> Result<SavedInstrument, ApiError>;
}

#[async_trait]
impl PaymentsApi for HttpApi {
    async fn submit_payment(&self, payment: PaymentRequest) -> Result<(), ApiError> {
        self.submit(self.request(Method::POST, "/pay").json(&payment))
            .await
    }

    async fn list_instruments(&self) -> Result<Vec<SavedInstrument>, ApiError> {
        self.fetch(self.request(Method::GET, "/payment-methods"))
            .await
    }

    async fn save_instrument(&self, instrument: NewInstrument) -> Result<SavedInstrument, ApiError> {
        self.fetch(self.request(Method::POST, "/payment-methods").json(&instrument))
            .await
    }
}
