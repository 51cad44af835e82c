//! Coordinate conversion module
//!
//! Spherical Web Mercator conversions between geographic coordinates
//! (latitude/longitude) and the global pixel plane, plus pixel → tile index
//! mapping. Everything here is pure; the only state is the tile edge length
//! of the active provider.

mod types;

pub use types::{
    GeoPoint, PixelPoint, DEFAULT_TILE_SIZE, MAX_LAT, MAX_ZOOM, MIN_LAT, MIN_VIEW_ZOOM, MIN_ZOOM,
};

use std::f64::consts::PI;

/// Clamps a latitude to the projectable range `[MIN_LAT, MAX_LAT]`.
#[inline]
pub fn clamp_latitude(lat: f64) -> f64 {
    lat.clamp(MIN_LAT, MAX_LAT)
}

/// Normalizes a longitude into `(-180, 180]`.
#[inline]
pub fn normalize_longitude(lng: f64) -> f64 {
    let mut normalized = lng % 360.0;
    if normalized > 180.0 {
        normalized -= 360.0;
    }
    if normalized <= -180.0 {
        normalized += 360.0;
    }
    normalized
}

/// Web Mercator projection for a given tile edge length.
///
/// # Example
///
/// ```
/// use mapsheet::coord::Projection;
///
/// let projection = Projection::new(256);
/// let centre = projection.to_pixel(0.0, 0.0, 1);
/// assert_eq!((centre.x, centre.y), (256.0, 256.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Projection {
    tile_size: u32,
}

impl Projection {
    /// Creates a projection for tiles of `tile_size` pixels.
    pub fn new(tile_size: u32) -> Self {
        Self {
            tile_size: tile_size.max(1),
        }
    }

    /// Tile edge length in pixels.
    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    /// Side length of the pixel plane at `zoom`.
    #[inline]
    pub fn world_size(&self, zoom: u8) -> f64 {
        self.tile_size as f64 * 2.0_f64.powi(zoom as i32)
    }

    /// Projects a geographic position into the pixel plane at `zoom`.
    ///
    /// Latitude must already be clamped to ±85°; at the poles `y` diverges.
    #[inline]
    pub fn to_pixel(&self, lng: f64, lat: f64, zoom: u8) -> PixelPoint {
        let scale = self.world_size(zoom);
        let x = (lng + 180.0) / 360.0 * scale;
        let lat_rad = lat * PI / 180.0;
        let y = (0.5 - lat_rad.tan().asinh() / (2.0 * PI)) * scale;
        PixelPoint { x, y }
    }

    /// Inverse of [`Projection::to_pixel`].
    #[inline]
    pub fn to_geo(&self, x: f64, y: f64, zoom: u8) -> GeoPoint {
        let scale = self.world_size(zoom);
        let lng = x / scale * 360.0 - 180.0;
        let n = PI - 2.0 * PI * (y / scale);
        let lat = n.sinh().atan() * 180.0 / PI;
        GeoPoint { lat, lng }
    }

    /// Index of the tile containing a pixel coordinate (either axis).
    #[inline]
    pub fn tile_index(&self, pixel: f64) -> i64 {
        (pixel / self.tile_size as f64).floor() as i64
    }
}

impl Default for Projection {
    fn default() -> Self {
        Self::new(DEFAULT_TILE_SIZE)
    }
}
