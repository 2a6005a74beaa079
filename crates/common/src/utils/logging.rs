use std::io;
use tracing_subscriber::{fmt, EnvFilter};

// sqlx echoes every statement at info
const DEFAULT_FILTER: &str = "info,tower_http=info,axum=info,sqlx=warn";

/// Shape of the log lines written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

impl LogFormat {
    /// `json` (any case) selects JSON; anything else is compact.
    pub fn from_name(name: &str) -> Self {
        if name.trim().eq_ignore_ascii_case("json") { LogFormat::Json } else { LogFormat::Compact }
    }

    /// Format named by `LOG_FORMAT`, compact when unset.
    pub fn from_env() -> Self {
        std::env::var("LOG_FORMAT").map(|v| Self::from_name(&v)).unwrap_or_default()
    }
}

/// Install the global subscriber. `RUST_LOG` overrides the default filter;
/// storage operations log at debug, e.g. `RUST_LOG=info,service::posts=debug`.
/// A second call is a no-op.
pub fn init_logging(format: LogFormat) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let builder = fmt().with_env_filter(env_filter).with_writer(io::stdout);
    let _ = match format {
        LogFormat::Compact => builder.with_target(false).compact().try_init(),
        LogFormat::Json => builder.with_target(true).json().try_init(),
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_names() {
        assert_eq!(LogFormat::from_name("json"), LogFormat::Json);
        assert_eq!(LogFormat::from_name(" JSON "), LogFormat::Json);
        assert_eq!(LogFormat::from_name("pretty"), LogFormat::Compact);
        assert_eq!(LogFormat::from_name(""), LogFormat::Compact);
    }

    #[test]
    fn repeated_init_is_harmless() {
        init_logging(LogFormat::Compact);
        init_logging(LogFormat::Json);
    }
}
