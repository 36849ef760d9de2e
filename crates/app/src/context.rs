//! App Context

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    sync::Arc,
};

use crate::{
    api::{AccountsApi, CartApi, CatalogApi, CouponsApi, HttpApi, OrdersApi, PaymentsApi},
    config::{ClientConfig, ConfigError, PipelineSettings},
    session::Session,
};

/// Backend services, the signed-in session and pipeline settings, shared by every page.
#[derive(Clone)]
pub struct AppContext {
    pub carts: Arc<dyn CartApi>,
    pub catalog: Arc<dyn CatalogApi>,
    pub coupons: Arc<dyn CouponsApi>,
    pub orders: Arc<dyn OrdersApi>,
    pub payments: Arc<dyn PaymentsApi>,
    pub accounts: Arc<dyn AccountsApi>,
    pub session: Option<Session>,
    pub settings: PipelineSettings,
}

impl AppContext {
    /// Build a context where every service talks to the same backend.
    pub fn from_http(api: HttpApi, session: Option<Session>, settings: PipelineSettings) -> Self {
        let api = Arc::new(api.with_token(session.as_ref().map(|session| session.token().to_string())));

        Self {
            carts: api.clone(),
            catalog: api.clone(),
            coupons: api.clone(),
            orders: api.clone(),
            payments: api.clone(),
            accounts: api,
            session,
            settings,
        }
    }

    /// Build a context from command-line configuration.
    ///
    /// # Errors
    ///
    /// Returns an error when the pipeline settings are invalid.
    pub fn from_config(config: &ClientConfig, session: Option<Session>) -> Result<Self, ConfigError> {
        let api = HttpApi::new(config.api.api_url.clone())
            .with_line_removal(config.api.line_removal_endpoint);

        Ok(Self::from_http(api, session, config.settings()?))
    }
}

impl Debug for AppContext {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("AppContext")
            .field("session", &self.session)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}
