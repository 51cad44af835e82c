//! CLI command implementations.
//!
//! - [`export`] - render pages
//! - [`providers`] - list tile providers
//! - [`tile_url`] - resolve a coordinate to a tile URL
//! - [`config`] - configuration management (get, set, list, path)

pub mod common;
pub mod config;
pub mod export;
pub mod providers;
pub mod tile_url;
