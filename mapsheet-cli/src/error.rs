//! CLI error handling with user-friendly messages.

use std::fmt;
use std::process;

use mapsheet::config::ConfigFileError;
use mapsheet::export::ExportError;
use mapsheet::provider::ProviderError;

/// CLI-specific errors.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Invalid arguments or settings
    Config(String),
    /// Config file could not be read or written
    ConfigFile(ConfigFileError),
    /// Unknown provider or HTTP client setup failure
    Provider(ProviderError),
    /// Export could not start
    Export(ExportError),
    /// Async runtime could not be built
    Runtime(std::io::Error),
    /// Ctrl-C stopped the export early
    Cancelled { written: usize, total: usize },
    /// Some pages were not written
    Incomplete { failed: usize, total: usize },
}

impl CliError {
    /// Exit the process with an error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        match self {
            CliError::Provider(ProviderError::UnknownProvider(_)) => {
                eprintln!();
                eprintln!("Run 'mapsheet providers' to list the available providers.");
            }
            CliError::ConfigFile(ConfigFileError::InvalidValue { .. }) => {
                eprintln!();
                eprintln!("Fix the value with 'mapsheet config set <key> <value>'.");
            }
            _ => {}
        }

        let code = match self {
            CliError::Cancelled { .. } => 130,
            CliError::Incomplete { .. } => 2,
            _ => 1,
        };
        process::exit(code)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::ConfigFile(e) => write!(f, "{}", e),
            CliError::Provider(e) => write!(f, "Provider error: {}", e),
            CliError::Export(e) => write!(f, "Export failed: {}", e),
            CliError::Runtime(e) => write!(f, "Failed to start async runtime: {}", e),
            CliError::Cancelled { written, total } => {
                write!(f, "Export cancelled after {} of {} pages", written, total)
            }
            CliError::Incomplete { failed, total } => {
                write!(f, "{} of {} pages could not be written", failed, total)
            }
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::ConfigFile(e) => Some(e),
            CliError::Provider(e) => Some(e),
            CliError::Export(e) => Some(e),
            CliError::Runtime(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::ConfigFile(e)
    }
}

impl From<ProviderError> for CliError {
    fn from(e: ProviderError) -> Self {
        CliError::Provider(e)
    }
}

impl From<ExportError> for CliError {
    fn from(e: ExportError) -> Self {
        CliError::Export(e)
    }
}
