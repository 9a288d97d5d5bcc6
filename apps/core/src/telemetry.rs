//! Tracing subscriber setup for the binary.
//!
//! Logs always go to stderr so `--json` output on stdout stays machine
//! readable. `RUST_LOG` overrides the default filter; `SENTIFY_LOG_FORMAT=json`
//! switches to Bunyan-formatted JSON lines.

use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Registry};

use crate::error::AppError;

pub const ENV_LOG_FORMAT: &str = "SENTIFY_LOG_FORMAT";

/// Output format of the log stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl LogFormat {
    pub fn from_env() -> Self {
        match std::env::var(ENV_LOG_FORMAT) {
            Ok(value) if value.trim().eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

/// Default filter: `info` for this crate (`debug` when verbose), `warn` for
/// everything else.
pub fn default_filter(verbose: bool) -> String {
    let level = if verbose { "debug" } else { "info" };
    format!("warn,sentify_core={},sentify={}", level, level)
}

/// Install the global subscriber. Fails if one is already installed.
pub fn init_tracing(verbose: bool) -> Result<(), AppError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    let result = match LogFormat::from_env() {
        LogFormat::Json => {
            let formatting_layer = BunyanFormattingLayer::new("sentify".into(), std::io::stderr);
            Registry::default()
                .with(filter)
                .with(JsonStorageLayer)
                .with(formatting_layer)
                .try_init()
        }
        LogFormat::Pretty => Registry::default()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
            .try_init(),
    };

    result.map_err(|e| AppError::Internal(format!("Failed to initialize tracing: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_from_env() {
        temp_env::with_var(ENV_LOG_FORMAT, Some("JSON"), || {
            assert_eq!(LogFormat::from_env(), LogFormat::Json);
        });
        temp_env::with_var(ENV_LOG_FORMAT, None::<&str>, || {
            assert_eq!(LogFormat::from_env(), LogFormat::Pretty);
        });
    }

    #[test]
    fn test_default_filter_parses() {
        assert!(EnvFilter::try_new(default_filter(false)).is_ok());
        assert!(default_filter(true).contains("sentify_core=debug"));
    }
}
