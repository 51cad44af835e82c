//! Helpers shared across CLI commands.

use std::path::Path;

use mapsheet::config::ConfigFile;
use mapsheet::logging::{default_log_file, init_logging, LoggingGuard};
use mapsheet::provider::{provider_config, ProviderConfig};
use tracing::info;

use crate::error::CliError;

/// Loads the config file, falling back to defaults when it does not exist.
pub fn load_config(path: &Path) -> Result<ConfigFile, CliError> {
    Ok(ConfigFile::load_from(path)?)
}

/// Starts logging into the configured log directory.
pub fn start_logging(
    config: &ConfigFile,
    command: &str,
    stdout: bool,
) -> Result<LoggingGuard, CliError> {
    let guard = init_logging(&config.logging.directory, default_log_file(), stdout)
        .map_err(|e| CliError::LoggingInit(e.to_string()))?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        command, "mapsheet starting"
    );
    Ok(guard)
}

/// Resolves the provider: command line first, then config.
pub fn resolve_provider(
    cli_provider: Option<&str>,
    config: &ConfigFile,
) -> Result<&'static ProviderConfig, CliError> {
    let key = cli_provider.unwrap_or(&config.provider.name);
    Ok(provider_config(&key.to_lowercase())?)
}

/// Token for `provider`: command line first, then config.
///
/// Fails when the provider's URL needs a token and none is set.
pub fn resolve_token(
    provider: &ProviderConfig,
    cli_token: Option<String>,
    config: &ConfigFile,
) -> Result<String, CliError> {
    let token = cli_token.unwrap_or_else(|| config.provider.api_token.clone());
    if provider.requires_token() && token.is_empty() {
        return Err(CliError::Config(format!(
            "Provider '{}' requires an access token. \
             Set provider.api_token in config.ini or use --api-token",
            provider.key
        )));
    }
    Ok(token)
}
