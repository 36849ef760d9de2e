//! Observability

use thiserror::Error;
use tracing_subscriber::util::TryInitError;

mod logging;

pub use logging::init_logging;

/// Errors initialising the tracing subscriber.
#[derive(Debug, Error)]
pub enum ObservabilityError {
    /// A global subscriber is already installed.
    #[error("failed to install tracing subscriber")]
    Subscriber(#[from] TryInitError),
}
