//! Canonical tile identity.

use std::fmt;

use crate::coord::MAX_ZOOM;

/// Identity of a cached tile: provider, zoom and normalized indices.
///
/// Always build keys with [`TileKey::normalized`] so that every request for
/// the same map tile lands on the same cache entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileKey {
    /// Provider registry key
    pub provider: &'static str,
    /// Zoom level
    pub zoom: u8,
    /// Column, wrapped into `[0, 2^zoom)`
    pub x: u32,
    /// Row, clamped into `[0, 2^zoom - 1]`
    pub y: u32,
}

impl TileKey {
    /// Builds a key from raw tile indices.
    ///
    /// `x` wraps east-west modulo `2^zoom`; `y` is clamped because the map
    /// does not wrap over the poles. `zoom` is capped at [`MAX_ZOOM`].
    ///
    /// ```
    /// use mapsheet::tile::TileKey;
    ///
    /// let key = TileKey::normalized("osm", 2, -1, 9);
    /// assert_eq!((key.x, key.y), (3, 3));
    /// ```
    pub fn normalized(provider: &'static str, zoom: u8, x: i64, y: i64) -> Self {
        let zoom = zoom.min(MAX_ZOOM);
        let tiles = 1_i64 << zoom;
        Self {
            provider,
            zoom,
            x: x.rem_euclid(tiles) as u32,
            y: y.clamp(0, tiles - 1) as u32,
        }
    }
}

impl fmt::Display for TileKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}/{}", self.provider, self.zoom, self.x, self.y)
    }
}
