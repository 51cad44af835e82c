//! `mapsheet tile-url`: which tile covers a coordinate, and where to get it.

use std::path::Path;

use clap::Args;
use mapsheet::coord::{GeoPoint, Projection};
use mapsheet::provider::build_tile_url;
use mapsheet::tile::TileKey;

use super::common::{load_config, resolve_provider, resolve_token};
use crate::error::CliError;

#[derive(Debug, Args)]
pub struct TileUrlArgs {
    /// Latitude in decimal degrees
    #[arg(long, allow_hyphen_values = true)]
    pub lat: f64,

    /// Longitude in decimal degrees
    #[arg(long, allow_hyphen_values = true)]
    pub lng: f64,

    /// Zoom level
    #[arg(long, default_value = "15")]
    pub zoom: u8,

    /// Tile provider key (default from config)
    #[arg(long)]
    pub provider: Option<String>,

    /// Access token for providers that need one
    #[arg(long)]
    pub api_token: Option<String>,
}

pub fn run(args: TileUrlArgs, config_path: &Path) -> Result<(), CliError> {
    let config = load_config(config_path)?;
    let provider = resolve_provider(args.provider.as_deref(), &config)?;
    if args.zoom > provider.max_zoom {
        return Err(CliError::Config(format!(
            "Zoom {} exceeds the maximum of {} for provider '{}'",
            args.zoom, provider.max_zoom, provider.key
        )));
    }
    let token = resolve_token(provider, args.api_token, &config)?;

    let key = tile_for(provider.tile_size, provider.key, args.lat, args.lng, args.zoom);
    println!("Tile: {}/{}/{}", key.zoom, key.x, key.y);
    println!("{}", build_tile_url(provider, &token, key.zoom, key.x, key.y));
    Ok(())
}

fn tile_for(tile_size: u32, provider: &'static str, lat: f64, lng: f64, zoom: u8) -> TileKey {
    let point = GeoPoint::new(lat, lng);
    let projection = Projection::new(tile_size);
    let pixel = projection.to_pixel(point.lng, point.lat, zoom);
    TileKey::normalized(
        provider,
        zoom,
        projection.tile_index(pixel.x),
        projection.tile_index(pixel.y),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_berlin_tile() {
        let key = tile_for(256, "osm", 52.52, 13.405, 15);
        assert_eq!((key.x, key.y), (17604, 10746));
    }

    #[test]
    fn test_longitude_wraps() {
        let key = tile_for(256, "osm", 0.0, 180.0, 2);
        assert_eq!(key.x, 0);
    }
}
