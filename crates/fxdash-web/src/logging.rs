use tracing_subscriber::EnvFilter;

use crate::config::LogFormat;
use crate::error::WebError;

const DEFAULT_FILTER: &str = "info,tower_http=info";

/// Installs the global subscriber. `RUST_LOG` overrides the default filter.
pub fn init(format: LogFormat) -> Result<(), WebError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(false);

    let installed = match format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };

    installed.map_err(|error| WebError::Logging(error.to_string()))
}
