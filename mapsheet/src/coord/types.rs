//! Coordinate types and projection constants.

/// Southernmost latitude accepted by the map (Mercator singularity avoidance).
pub const MIN_LAT: f64 = -85.0;

/// Northernmost latitude accepted by the map.
pub const MAX_LAT: f64 = 85.0;

/// Lowest zoom level of the tile pyramid.
pub const MIN_ZOOM: u8 = 0;

/// Highest zoom level supported by the tile sources and the exporter.
pub const MAX_ZOOM: u8 = 19;

/// Lowest zoom level an interactive view may be set to.
pub const MIN_VIEW_ZOOM: u8 = 1;

/// Tile edge length used when a provider does not declare one.
pub const DEFAULT_TILE_SIZE: u32 = 256;

/// A geographic position in degrees.
///
/// Points built with [`GeoPoint::new`] satisfy the map invariants: latitude
/// clamped to `[MIN_LAT, MAX_LAT]` and longitude normalized to `(-180, 180]`.
/// Points produced by [`crate::coord::Projection::to_geo`] are the raw
/// inverse and may lie outside those ranges (e.g. past the antimeridian).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    /// Latitude in degrees, positive north.
    pub lat: f64,
    /// Longitude in degrees, positive east.
    pub lng: f64,
}

impl GeoPoint {
    /// Creates a point, clamping latitude and normalizing longitude.
    pub fn new(lat: f64, lng: f64) -> Self {
        Self {
            lat: super::clamp_latitude(lat),
            lng: super::normalize_longitude(lng),
        }
    }

    /// Returns this point with the map invariants applied.
    pub fn clamped(self) -> Self {
        Self::new(self.lat, self.lng)
    }
}

/// A position in the global pixel plane of one zoom level.
///
/// The plane is `tile_size × 2^zoom` pixels on each side, with the origin at
/// the north-west corner (180°W, ~85.05°N).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelPoint {
    pub x: f64,
    pub y: f64,
}

impl PixelPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}
