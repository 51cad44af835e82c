//! mapsheet: print large areas of a slippy map as a grid of A4 pages.
//!
//! The crate is organised bottom-up:
//!
//! - [`coord`]: Web Mercator projection between degrees and world pixels
//! - [`provider`]: built-in raster tile providers and URL construction
//! - [`tile`]: an async, memoizing tile cache with single-resolution records
//! - [`viewport`]: the visible area and its split into a grid of cells
//! - [`session`]: headless map state (centre, zoom, grid, provider)
//! - [`export`]: renders each cell into a page image and saves it
//!
//! plus [`config`] for `~/.mapsheet/config.ini` and [`logging`] for hosts.

pub mod config;
pub mod coord;
pub mod export;
pub mod logging;
pub mod provider;
pub mod session;
pub mod tile;
pub mod viewport;
