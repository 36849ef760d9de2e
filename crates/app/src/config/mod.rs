//! Client configuration
//!
//! Every setting can come from a flag, an environment variable or a `.env`
//! file.

use std::time::Duration;

use clap::Args;
use larder::{money::currency, prelude::*};
use rusty_money::iso::Currency;
use thiserror::Error;

mod api;
mod logging;
mod pipeline;

pub use api::{ApiConfig, SessionConfig};
pub use logging::{LogFormat, LoggingConfig};
pub use pipeline::{PayloadVersion, PipelineConfig};

/// Invalid configuration values.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configured currency is not an ISO currency.
    #[error("unsupported currency")]
    Currency(#[from] AmountError),
}

/// Settings shared by every command.
#[derive(Debug, Args)]
pub struct ClientConfig {
    /// Backend settings.
    #[command(flatten)]
    pub api: ApiConfig,

    /// Session persistence settings.
    #[command(flatten)]
    pub session: SessionConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    /// Checkout pipeline tuning.
    #[command(flatten)]
    pub pipeline: PipelineConfig,
}

/// Resolved pipeline settings handed to the pages.
#[derive(Debug, Clone, Copy)]
pub struct PipelineSettings {
    /// Currency prices are expressed in.
    pub currency: &'static Currency,

    /// Simulated payment processing delay.
    pub payment_latency: Duration,

    /// Maximum concurrent product lookups while loading the cart.
    pub enrichment_concurrency: usize,

    /// Quiet period before a burst of push messages triggers a refresh.
    pub refresh_debounce: Duration,

    /// Interval between order history refreshes while watching.
    pub history_poll: Duration,

    /// Order-creation payload shape.
    pub payload_version: OrderPayloadVersion,
}

impl ClientConfig {
    /// Resolve the pipeline settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Currency`] for an unknown currency code.
    pub fn settings(&self) -> Result<PipelineSettings, ConfigError> {
        self.pipeline.settings()
    }
}

impl PipelineConfig {
    /// Resolve these values into [`PipelineSettings`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Currency`] for an unknown currency code.
    pub fn settings(&self) -> Result<PipelineSettings, ConfigError> {
        Ok(PipelineSettings {
            currency: currency(&self.currency.trim().to_uppercase())?,
            payment_latency: Duration::from_millis(self.payment_latency_ms),
            enrichment_concurrency: self.enrichment_concurrency.max(1),
            refresh_debounce: Duration::from_millis(self.refresh_debounce_ms),
            history_poll: Duration::from_millis(self.history_poll_ms.max(1)),
            payload_version: self.payload_version.into(),
        })
    }
}
