use tracing_subscriber::EnvFilter;

use crate::error::{Result, ToolError};

/// Installs the global stderr subscriber. `RUST_LOG` takes precedence over
/// the verbosity count.
pub fn init(verbosity: u8) -> Result<()> {
    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbosity >= 2)
        .try_init()
        .map_err(|error| ToolError::Logging(error.to_string()))
}
