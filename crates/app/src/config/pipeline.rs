//! Pipeline Config

use clap::Args;
use larder::prelude::OrderPayloadVersion;

/// Order-creation payload shape, as chosen on the command line.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum PayloadVersion {
    /// Food ids and quantities only.
    Minimal,

    /// Also embed snapshot prices, names and images.
    Enriched,
}

impl From<PayloadVersion> for OrderPayloadVersion {
    fn from(version: PayloadVersion) -> Self {
        match version {
            PayloadVersion::Minimal => Self::Minimal,
            PayloadVersion::Enriched => Self::Enriched,
        }
    }
}

/// Checkout pipeline tuning.
#[derive(Debug, Args)]
pub struct PipelineConfig {
    /// ISO currency code prices are expressed in
    #[arg(long, env = "LARDER_CURRENCY", default_value = "VND")]
    pub currency: String,

    /// Simulated payment processing delay in milliseconds
    #[arg(long, env = "LARDER_PAYMENT_LATENCY_MS", default_value_t = 1_500_u64)]
    pub payment_latency_ms: u64,

    /// Maximum concurrent product lookups while loading the cart
    #[arg(long, env = "LARDER_ENRICHMENT_CONCURRENCY", default_value_t = 8_usize)]
    pub enrichment_concurrency: usize,

    /// Quiet period in milliseconds before push messages trigger a refresh
    #[arg(long, env = "LARDER_REFRESH_DEBOUNCE_MS", default_value_t = 250_u64)]
    pub refresh_debounce_ms: u64,

    /// Interval in milliseconds between order history refreshes while watching
    #[arg(long, env = "LARDER_HISTORY_POLL_MS", default_value_t = 5_000_u64)]
    pub history_poll_ms: u64,

    /// Order payload version (minimal, enriched)
    #[arg(long, env = "LARDER_PAYLOAD_VERSION", value_enum, default_value_t = PayloadVersion::Enriched)]
    pub payload_version: PayloadVersion,
}
