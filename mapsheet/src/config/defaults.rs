//! Default values for every configuration key.

use std::path::PathBuf;

use super::file::config_directory;

pub const DEFAULT_LAT: f64 = 52.52;
pub const DEFAULT_LNG: f64 = 13.405;
pub const DEFAULT_MAP_ZOOM: u8 = 15;
pub const DEFAULT_CANVAS_WIDTH: u32 = 1200;
pub const DEFAULT_CANVAS_HEIGHT: u32 = 800;

pub const DEFAULT_ROWS: u32 = 2;
pub const DEFAULT_COLS: u32 = 3;
pub const DEFAULT_ZOOM_DELTA: u8 = 0;

/// Milliseconds between consecutive exported cells.
pub const DEFAULT_PAUSE_MS: u64 = 140;

/// Largest grid dimension accepted from the config file.
pub const MAX_GRID_DIMENSION: u32 = 26 * 27;

/// Pages land in the working directory unless configured otherwise.
pub fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

/// `~/.mapsheet/logs`
pub fn default_log_directory() -> PathBuf {
    config_directory().join("logs")
}
