//! Configuration management commands: `config get`, `config set`,
//! `config list` and `config path`.

use std::path::Path;

use clap::Subcommand;
use mapsheet::config::{ConfigFile, ConfigKey};

use super::common::load_config;
use crate::error::CliError;

#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Get a configuration value
    Get {
        /// Configuration key in format section.key (e.g., export.dpi)
        key: String,
    },

    /// Set a configuration value
    Set {
        /// Configuration key in format section.key (e.g., export.dpi)
        key: String,

        /// Value to set
        value: String,
    },

    /// List all configuration settings
    List,

    /// Show the configuration file path
    Path,
}

pub fn run(command: ConfigCommands, path: &Path) -> Result<(), CliError> {
    match command {
        ConfigCommands::Get { key } => run_get(&key, path),
        ConfigCommands::Set { key, value } => run_set(&key, &value, path),
        ConfigCommands::List => run_list(path),
        ConfigCommands::Path => {
            println!("{}", path.display());
            Ok(())
        }
    }
}

fn parse_key(key: &str) -> Result<ConfigKey, CliError> {
    key.parse().map_err(|_| {
        CliError::Config(format!(
            "Unknown configuration key '{}'. Use 'mapsheet config list' to see available keys.",
            key
        ))
    })
}

fn run_get(key: &str, path: &Path) -> Result<(), CliError> {
    let config_key = parse_key(key)?;
    let config = load_config(path)?;
    let value = config_key.get(&config);

    if value.is_empty() {
        println!("(not set)");
    } else {
        println!("{}", value);
    }
    Ok(())
}

fn run_set(key: &str, value: &str, path: &Path) -> Result<(), CliError> {
    let config_key = parse_key(key)?;
    let mut config = load_config(path)?;
    set_value(&mut config, config_key, value)?;
    config.save_to(path)?;

    println!("Set {} = {}", config_key.name(), config_key.get(&config));
    Ok(())
}

fn set_value(config: &mut ConfigFile, key: ConfigKey, value: &str) -> Result<(), CliError> {
    key.set(config, value)
        .map_err(|e| CliError::Config(e.to_string()))
}

fn run_list(path: &Path) -> Result<(), CliError> {
    let config = load_config(path)?;

    println!("Configuration Settings ({})", path.display());
    println!("======================");

    let mut current_section = "";
    for key in ConfigKey::ALL {
        let section = key.section();
        if section != current_section {
            println!();
            println!("[{}]", section);
            current_section = section;
        }

        let value = key.get(&config);
        if value.is_empty() {
            println!("  {} = (not set)", key.key_name());
        } else {
            println!("  {} = {}", key.key_name(), value);
        }
    }
    Ok(())
}
