// Logging module - Logging infrastructure
use crate::domain::error::{CmdTreeError, CmdTreeResult};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use std::io;

/// Initialize logging system.
///
/// `RUST_LOG` takes precedence over `level`. Fails if a global subscriber
/// is already installed.
pub fn init_logging(level: &str, with_location: bool) -> CmdTreeResult<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(format!("cmdtree={},warn", level)))
        .map_err(|e| CmdTreeError::Logging(format!("Invalid log level '{}': {}", level, e)))?;
    
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_target(true)
                .with_level(true)
                .with_file(with_location)
                .with_line_number(with_location)
        )
        .try_init()
        .map_err(|e| CmdTreeError::Logging(e.to_string()))?;
    
    tracing::debug!("cmdtree logging system initialized");
    Ok(())
}
