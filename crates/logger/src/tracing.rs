use std::env::var;
use std::str::FromStr;

use tracing::{level_filters::LevelFilter, warn};
use tracing_subscriber::{Layer, filter::EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Output shape selected through `RUST_LOG_FORMAT`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Compact,
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format {other:?}")),
        }
    }
}

/// Install the global subscriber at `info`, honouring `RUST_LOG` and `RUST_LOG_FORMAT`
pub fn init_tracing() {
    init_tracing_with(LevelFilter::INFO);
}

/// Same as [`init_tracing`] with a different default level
///
/// Does nothing if a global subscriber is already installed, so tests can
/// call it freely.
pub fn init_tracing_with(level: LevelFilter) {
    let env_filter = EnvFilter::builder().with_default_directive(level.into()).from_env_lossy();

    let (log_format, format_error) = match var("RUST_LOG_FORMAT").map(|raw| raw.parse::<LogFormat>()) {
        Ok(Ok(format)) => (format, None),
        Ok(Err(error)) => (LogFormat::default(), Some(error)),
        Err(_) => (LogFormat::default(), None),
    };

    let log_layer = match log_format {
        LogFormat::Json => tracing_subscriber::fmt::layer().json().with_filter(env_filter).boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer().pretty().with_filter(env_filter).boxed(),
        LogFormat::Compact => {
            tracing_subscriber::fmt::layer().compact().with_target(false).with_filter(env_filter).boxed()
        }
    };

    if tracing_subscriber::registry().with(log_layer).try_init().is_ok() {
        if let Some(error) = format_error {
            warn!("Invalid RUST_LOG_FORMAT, falling back to compact: {error}");
        }
    }
}
