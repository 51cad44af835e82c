//! `mapsheet providers`

use console::style;
use mapsheet::provider::{all_providers, DEFAULT_PROVIDER};

use crate::error::CliError;

pub fn run() -> Result<(), CliError> {
    println!("Tile Providers");
    println!("==============");
    println!();

    for provider in all_providers() {
        let marker = if provider.key == DEFAULT_PROVIDER {
            " (default)"
        } else {
            ""
        };
        println!("{}{}", style(provider.key).bold(), marker);
        println!("  Name:        {}", provider.label);
        println!("  Tile size:   {} px", provider.tile_size);
        println!("  Max zoom:    {}", provider.max_zoom);
        if provider.requires_token() {
            println!("  Token:       required (provider.api_token)");
        }
        println!("  Attribution: {}", provider.attribution);
        println!();
    }
    Ok(())
}
