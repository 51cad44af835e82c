//! Viewport geometry types.

use crate::coord::{PixelPoint, Projection};

/// Pixel rectangle within the canvas reserved for the map grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Frame {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Canvas-space centre of the frame.
    pub fn center(&self) -> (f64, f64) {
        (self.left + self.width / 2.0, self.top + self.height / 2.0)
    }
}

/// Rectangle in the global pixel plane of one zoom level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelBounds {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl PixelBounds {
    /// Builds bounds from edges; `right`/`bottom` must not be smaller than
    /// `left`/`top`.
    pub fn from_edges(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            width: right - left,
            height: bottom - top,
        }
    }

    #[inline]
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Tiles overlapping these bounds at the projection's tile size.
    pub fn covering_tiles(&self, projection: &Projection) -> TileRange {
        TileRange {
            min_x: projection.tile_index(self.left),
            max_x: projection.tile_index(self.right()),
            min_y: projection.tile_index(self.top),
            max_y: projection.tile_index(self.bottom()),
        }
    }
}

/// Geographic bounding box in degrees.
///
/// `w`/`e` come straight from the inverse projection and may lie outside
/// `[-180, 180]` when the box crosses the antimeridian.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLngBounds {
    pub n: f64,
    pub s: f64,
    pub w: f64,
    pub e: f64,
}

/// The visible pixel and geographic rectangle at a given centre and zoom.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub zoom: u8,
    pub pixel_bounds: PixelBounds,
    pub lat_lng_bounds: LatLngBounds,
    pub center_pixel: PixelPoint,
}

/// Geographic bounding box of one export grid cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellBBox {
    /// North edge latitude
    pub n: f64,
    /// South edge latitude
    pub s: f64,
    /// West edge longitude
    pub w: f64,
    /// East edge longitude
    pub e: f64,
    /// Grid row, 0 at the top
    pub row: u32,
    /// Grid column, 0 at the left
    pub col: u32,
    /// Pixel rectangle of the cell at the viewport zoom
    pub pixel_bounds: PixelBounds,
}

impl CellBBox {
    /// The geographic part of the cell.
    pub fn bounds(&self) -> LatLngBounds {
        LatLngBounds {
            n: self.n,
            s: self.s,
            w: self.w,
            e: self.e,
        }
    }
}

/// Inclusive range of tile indices, before wrap/clamp normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileRange {
    pub min_x: i64,
    pub max_x: i64,
    pub min_y: i64,
    pub max_y: i64,
}

impl TileRange {
    /// Number of tiles in the range.
    pub fn len(&self) -> usize {
        let cols = (self.max_x - self.min_x + 1).max(0) as usize;
        let rows = (self.max_y - self.min_y + 1).max(0) as usize;
        cols * rows
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates `(x, y)` in row-major order: all of row `min_y` first.
    pub fn iter(&self) -> TileRangeIter {
        TileRangeIter {
            range: *self,
            x: self.min_x,
            y: self.min_y,
        }
    }
}

impl IntoIterator for TileRange {
    type Item = (i64, i64);
    type IntoIter = TileRangeIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Row-major iterator over a [`TileRange`].
#[derive(Debug, Clone)]
pub struct TileRangeIter {
    range: TileRange,
    x: i64,
    y: i64,
}

impl Iterator for TileRangeIter {
    type Item = (i64, i64);

    fn next(&mut self) -> Option<Self::Item> {
        if self.y > self.range.max_y || self.range.min_x > self.range.max_x {
            return None;
        }

        let item = (self.x, self.y);
        if self.x == self.range.max_x {
            self.x = self.range.min_x;
            self.y += 1;
        } else {
            self.x += 1;
        }
        Some(item)
    }
}
