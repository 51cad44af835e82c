//! mapsheet CLI
//!
//! Exports a map view as a grid of A4 pages and manages the configuration
//! file.

mod commands;
mod error;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use commands::config::ConfigCommands;
use commands::export::ExportArgs;
use commands::tile_url::TileUrlArgs;

#[derive(Debug, Parser)]
#[command(name = "mapsheet")]
#[command(version, about = "Print a slippy-map area as a grid of A4 pages", long_about = None)]
struct Cli {
    /// Use this config file instead of ~/.mapsheet/config.ini
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Render the grid cells of a view into PNG pages
    Export(ExportArgs),

    /// List the built-in tile providers
    Providers,

    /// Print the URL of the tile covering a coordinate
    TileUrl(TileUrlArgs),

    /// View or modify configuration
    #[command(subcommand)]
    Config(ConfigCommands),
}

fn main() {
    let cli = Cli::parse();
    let config_path = cli
        .config
        .unwrap_or_else(mapsheet::config::config_file_path);

    let result = match cli.command {
        Commands::Export(args) => commands::export::run(args, &config_path),
        Commands::Providers => commands::providers::run(),
        Commands::TileUrl(args) => commands::tile_url::run(args, &config_path),
        Commands::Config(command) => commands::config::run(command, &config_path),
    };

    if let Err(e) = result {
        e.exit();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parses_export_with_negative_coordinates() {
        let cli = Cli::try_parse_from([
            "mapsheet", "export", "--lat", "-33.8688", "--lng", "151.2093", "--rows", "1",
        ])
        .unwrap();
        match cli.command {
            Commands::Export(args) => {
                assert_eq!(args.lat, Some(-33.8688));
                assert_eq!(args.rows, Some(1));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_global_config_flag() {
        let cli =
            Cli::try_parse_from(["mapsheet", "config", "path", "--config", "/tmp/m.ini"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/m.ini")));
    }
}
