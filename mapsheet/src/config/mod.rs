//! User configuration
//!
//! Settings live in `~/.mapsheet/config.ini`. A missing file means defaults;
//! unknown sections and keys are ignored, invalid values are errors.
//!
//! ```ignore
//! use mapsheet::config::{ConfigFile, ConfigKey};
//!
//! let mut config = ConfigFile::load()?;
//! "export.dpi".parse::<ConfigKey>()?.set(&mut config, "150")?;
//! config.save()?;
//! ```

mod defaults;
mod file;
mod keys;
mod parser;
mod settings;
mod writer;

pub use defaults::*;
pub use file::{config_directory, config_file_path, ConfigFileError};
pub use keys::{ConfigKey, ConfigKeyError};
pub use settings::{
    ConfigFile, ExportSettings, HttpSettings, LoggingSettings, MapSettings, ProviderSettings,
};
