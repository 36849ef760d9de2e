//! Accounts: login and the address book.

use async_trait::async_trait;
use mockall::automock;
use reqwest::Method;

use super::{
    ApiError, HttpApi,
    models::{LoginRequest, LoginResponse, NewAddress, SavedAddress},
};

#[automock]
#[async_trait]
pub trait AccountsApi: Send + Sync {
    /// Exchange credentials for an access token.
    async fn login(&self, credentials: LoginRequest) -> Result<LoginResponse, ApiError>;

    /// Addresses saved by the signed-in user.
    async fn list_addresses(&self) -> Result<Vec<SavedAddress>, ApiError>;

    /// Save a new address.
    async fn save_address(&self, address: NewAddress) -> Result<SavedAddress, ApiError>;
}

#[async_trait]
impl AccountsApi for HttpApi {
    async fn login(&self, credentials: LoginRequest) -> Result<LoginResponse, ApiError> {
        self.fetch(self.request(Method::POST, "/login").json(&credentials))
            .await
    }

    async fn list_addresses(&self) -> Result<Vec<SavedAddress>, ApiError> {
        self.fetch(self.request(Method::GET, "/users/addresses"))
            .await
    }

    async fn save_address(&self, address: NewAddress) -> Result<SavedAddress, ApiError> {
        self.fetch(self.request(Method::POST, "/users/addresses").json(&address))
            .await
    }
}
