use herald_core::{HeraldError, Result};
use log::info;
use tracing_subscriber::EnvFilter;

/// Environment variable holding an env-filter directive that overrides `--log-level`
pub const LOG_ENV_VAR: &str = "HERALD_LOG";

/// Install the global tracing subscriber and route `log` records into it.
///
/// Output goes to stderr so that dispatch traces on stdout stay clean.
pub fn init(level: &str, json: bool) -> Result<()> {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .or_else(|_| EnvFilter::try_new(level))
        .map_err(|e| HeraldError::LoggingInit(format!("Invalid log filter '{}': {}", level, e)))?;

    tracing_log::LogTracer::init()
        .map_err(|e| HeraldError::LoggingInit(format!("Failed to bridge log records: {}", e)))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    let installed = if json {
        tracing::subscriber::set_global_default(builder.json().finish())
    } else {
        tracing::subscriber::set_global_default(builder.finish())
    };
    installed.map_err(|e| HeraldError::LoggingInit(format!("Failed to install subscriber: {}", e)))?;

    info!("Logging initialized (level: {}, json: {})", level, json);
    Ok(())
}
