//! Backend & Session Config

use std::path::PathBuf;

use clap::Args;

/// Backend connection settings.
#[derive(Debug, Args)]
pub struct ApiConfig {
    /// Base URL of the ordering backend
    #[arg(long, env = "LARDER_API_URL", default_value = "http://localhost:8000")]
    pub api_url: String,

    /// Delete single cart lines on the server instead of clearing the cart once it empties
    #[arg(long, env = "LARDER_LINE_REMOVAL_ENDPOINT", default_value_t = false)]
    pub line_removal_endpoint: bool,
}

/// Session persistence settings.
#[derive(Debug, Args)]
pub struct SessionConfig {
    /// File the signed-in session is kept in
    #[arg(long, env = "LARDER_SESSION_FILE", default_value = ".larder-session.json")]
    pub session_file: PathBuf,
}
