//! Viewport model
//!
//! Derives the pixel and geographic rectangle of the map grid from a centre
//! point, zoom level and canvas frame, and partitions it into an R×C grid of
//! cells, one per exported page.
//!
//! The map is always axis-aligned, so the top-left pixel corner of any
//! rectangle maps to its north-west geographic corner.

mod types;

pub use types::{
    CellBBox, Frame, LatLngBounds, PixelBounds, TileRange, TileRangeIter, Viewport,
};

use crate::coord::{GeoPoint, Projection};

/// Computes the grid frame for a canvas.
///
/// The frame is the largest rectangle with aspect ratio
/// `cols × page_ratio / rows` that fits the canvas, centred in it. Each grid
/// cell then has the aspect ratio of one page, which keeps the final
/// page resample close to 1:1.
pub fn compute_grid_frame(
    canvas_width: f64,
    canvas_height: f64,
    rows: u32,
    cols: u32,
    page_ratio: f64,
) -> Frame {
    let grid_ratio = (cols.max(1) as f64 * page_ratio) / rows.max(1) as f64;

    let mut width = canvas_width;
    let mut height = width / grid_ratio;
    if height > canvas_height {
        height = canvas_height;
        width = height * grid_ratio;
    }

    Frame {
        left: (canvas_width - width) / 2.0,
        top: (canvas_height - height) / 2.0,
        width,
        height,
    }
}

/// Builds the viewport that places `center` at the middle of `frame`.
///
/// `center` must already satisfy the latitude clamp.
pub fn create_viewport(
    projection: &Projection,
    center: GeoPoint,
    zoom: u8,
    frame: Frame,
) -> Viewport {
    let center_pixel = projection.to_pixel(center.lng, center.lat, zoom);
    let left = center_pixel.x - frame.width / 2.0;
    let top = center_pixel.y - frame.height / 2.0;
    let pixel_bounds = PixelBounds {
        left,
        top,
        width: frame.width,
        height: frame.height,
    };

    let nw = projection.to_geo(left, top, zoom);
    let se = projection.to_geo(pixel_bounds.right(), pixel_bounds.bottom(), zoom);

    Viewport {
        zoom,
        pixel_bounds,
        lat_lng_bounds: LatLngBounds {
            n: nw.lat,
            s: se.lat,
            w: nw.lng,
            e: se.lng,
        },
        center_pixel,
    }
}

/// Divides the viewport into `rows × cols` cells in row-major order.
///
/// Cell edges are fractional; adjacent cells share the exact same edge
/// value, and the outer edges equal the viewport's. Zero rows or columns
/// produce no cells.
pub fn split_viewport(
    projection: &Projection,
    viewport: &Viewport,
    rows: u32,
    cols: u32,
) -> Vec<CellBBox> {
    let bounds = viewport.pixel_bounds;
    let zoom = viewport.zoom;

    let x_edge = |col: u32| grid_edge(bounds.left, bounds.width, col, cols);
    let y_edge = |row: u32| grid_edge(bounds.top, bounds.height, row, rows);

    let mut cells = Vec::with_capacity(rows as usize * cols as usize);
    for row in 0..rows {
        for col in 0..cols {
            let (left, right) = (x_edge(col), x_edge(col + 1));
            let (top, bottom) = (y_edge(row), y_edge(row + 1));
            // Project the shared edge values, not left + width, so that
            // neighbouring cells agree on their common border.
            let nw = projection.to_geo(left, top, zoom);
            let se = projection.to_geo(right, bottom, zoom);
            let pixel_bounds = PixelBounds::from_edges(left, top, right, bottom);
            cells.push(CellBBox {
                n: nw.lat,
                s: se.lat,
                w: nw.lng,
                e: se.lng,
                row,
                col,
                pixel_bounds,
            });
        }
    }
    cells
}

/// Position of grid line `index` of `count` cells over `[start, start + length]`.
#[inline]
fn grid_edge(start: f64, length: f64, index: u32, count: u32) -> f64 {
    if index >= count {
        start + length
    } else {
        start + length * index as f64 / count as f64
    }
}
