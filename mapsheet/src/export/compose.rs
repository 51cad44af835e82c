//! Per-cell raster assembly.
//!
//! A cell is rendered by placing the tiles that cover its bounding box into
//! a raster anchored at the floor of the box's north-west pixel corner. Tiles
//! are placed, never scaled; the only resample happens when the finished
//! raster is stretched onto the page.
//!
//! Raster size grows with `4^zoom_delta`, so it is checked against
//! [`MAX_CELL_PIXELS`] before anything is allocated or fetched.

use futures::future::join_all;
use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use tracing::trace;

use super::error::ExportError;
use super::page::PageSize;
use crate::tile::{TileCache, TileLoader};
use crate::viewport::{LatLngBounds, PixelBounds};

/// Upper bound on `width × height` of a cell raster (256 MiB of RGBA).
pub const MAX_CELL_PIXELS: u64 = 64 * 1024 * 1024;

/// Raster assembled for one cell.
#[derive(Debug)]
pub struct RenderedCell {
    pub raster: RgbaImage,
    /// Tiles requested for the cell
    pub tiles: usize,
    /// Tiles that resolved without an image
    pub missing: usize,
}

/// Assembles the tiles covering `bounds` at `zoom` into one raster.
///
/// The raster spans `floor(nw)..ceil(se)` on each axis (at least 1×1) and
/// starts filled with `background`; regions whose tiles failed keep it.
/// All tiles are requested up front in row-major order so their fetches run
/// concurrently; placement waits until every record has resolved.
///
/// # Errors
///
/// [`ExportError::RasterTooLarge`] when the raster would exceed
/// [`MAX_CELL_PIXELS`]. No tile is requested in that case.
pub async fn render_bounding_box<L: TileLoader>(
    cache: &TileCache<L>,
    bounds: &LatLngBounds,
    zoom: u8,
    background: Rgba<u8>,
) -> Result<RenderedCell, ExportError> {
    let projection = cache.projection();
    let tile_size = projection.tile_size() as i64;

    let nw = projection.to_pixel(bounds.w, bounds.n, zoom);
    let se = projection.to_pixel(bounds.e, bounds.s, zoom);
    let pixel_bounds = PixelBounds::from_edges(nw.x, nw.y, se.x, se.y);
    let range = pixel_bounds.covering_tiles(&projection);

    let (width, height) = raster_size(nw.x, nw.y, se.x, se.y)?;
    let origin_x = nw.x.floor() as i64;
    let origin_y = nw.y.floor() as i64;

    let mut raster = RgbaImage::from_pixel(width, height, background);
    let mut missing = 0;

    let records: Vec<_> = range
        .iter()
        .map(|(tx, ty)| (tx, ty, cache.get_tile(zoom, tx, ty)))
        .collect();
    join_all(records.iter().map(|(_, _, record)| record.wait())).await;

    for (tx, ty, record) in &records {
        match record.image() {
            Some(tile) => {
                let dx = tx * tile_size - origin_x;
                let dy = ty * tile_size - origin_y;
                imageops::overlay(&mut raster, &*tile, dx, dy);
            }
            None => {
                trace!(tile = %record.key(), "Tile missing, leaving background");
                missing += 1;
            }
        }
    }

    Ok(RenderedCell {
        raster,
        tiles: range.len(),
        missing,
    })
}

/// Pixel size of the raster covering `left..right × top..bottom`.
fn raster_size(left: f64, top: f64, right: f64, bottom: f64) -> Result<(u32, u32), ExportError> {
    let width = (right.ceil() - left.floor()).max(1.0);
    let height = (bottom.ceil() - top.floor()).max(1.0);
    if width * height > MAX_CELL_PIXELS as f64 {
        return Err(ExportError::RasterTooLarge {
            width: width as u64,
            height: height as u64,
        });
    }
    Ok((width as u32, height as u32))
}

/// Stretches a cell raster onto a page of fixed pixel size.
///
/// Aspect mismatch between the cell and the page is absorbed here.
pub fn resample_to_page(raster: &RgbaImage, page: PageSize) -> RgbaImage {
    if raster.dimensions() == (page.width, page.height) {
        return raster.clone();
    }
    imageops::resize(raster, page.width, page.height, FilterType::Triangle)
}
