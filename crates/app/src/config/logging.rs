//! Logging Config

use clap::Args;
use tracing::Level;

/// Log output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// One human-readable line per event.
    Compact,

    /// One JSON object per event, for log shippers.
    Json,
}

/// Client log settings. `RUST_LOG`, when set, replaces the level entirely.
#[derive(Debug, Args)]
pub struct LoggingConfig {
    /// Verbosity of the client's own events (trace, debug, info, warn, error)
    #[arg(long, env = "LARDER_LOG", default_value = "warn")]
    pub log_level: Level,

    /// Log format (compact, json)
    #[arg(long, env = "LARDER_LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

impl LoggingConfig {
    /// Filter directives applying the level to the client's crates only.
    ///
    /// HTTP and TLS dependencies stay at `warn` whatever the level.
    pub fn directives(&self) -> String {
        let level = self.log_level.as_str().to_lowercase();

        format!("warn,larder={level},larder_app={level}")
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use testresult::TestResult;

    use super::*;

    #[derive(Debug, Parser)]
    struct TestCli {
        #[command(flatten)]
        logging: LoggingConfig,
    }

    #[test]
    fn level_applies_to_client_crates_only() -> TestResult {
        let cli = TestCli::try_parse_from(["larder", "--log-level", "debug"])?;

        assert_eq!(
            cli.logging.directives(),
            "warn,larder=debug,larder_app=debug"
        );

        Ok(())
    }

    #[test]
    fn defaults_are_quiet_and_compact() -> TestResult {
        let cli = TestCli::try_parse_from(["larder"])?;

        assert_eq!(cli.logging.log_level, Level::WARN);
        assert_eq!(cli.logging.log_format, LogFormat::Compact);

        Ok(())
    }

    #[test]
    fn unknown_level_is_rejected() {
        assert!(TestCli::try_parse_from(["larder", "--log-level", "chatty"]).is_err());
    }
}
