//! Headless map session
//!
//! [`MapSession`] holds the live inputs of the map view (centre, zoom, canvas
//! size, grid layout, export settings) and derives the viewport from them.
//! A host UI drives it with pointer and keyboard events and draws the
//! tiles returned by [`MapSession::visible_tiles`]; the export pipeline
//! consumes [`MapSession::export_cells`] and [`MapSession::export_options`].
//!
//! The derived viewport is cached and dropped on every input change that
//! affects it, then recomputed on the next read.

use std::sync::Arc;

use tracing::debug;

use crate::coord::{
    clamp_latitude, normalize_longitude, GeoPoint, Projection, MAX_ZOOM, MIN_VIEW_ZOOM,
};
use crate::export::{a4_ratio, ExportOptions, Orientation, DEFAULT_DPI, DEFAULT_FILE_PREFIX};
use crate::provider::{provider_config, ProviderError, DEFAULT_PROVIDER};
use crate::tile::{TileCache, TileLoader, TileRecord};
use crate::viewport::{
    compute_grid_frame, create_viewport, split_viewport, CellBBox, Frame, LatLngBounds, Viewport,
};

/// Initial values of a session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    pub center: GeoPoint,
    pub zoom: u8,
    pub canvas_width: f64,
    pub canvas_height: f64,
    pub rows: u32,
    pub cols: u32,
    pub zoom_delta: u8,
    pub orientation: Orientation,
    pub provider: String,
    pub dpi: u32,
    pub file_prefix: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            center: GeoPoint::new(52.52, 13.405),
            zoom: 15,
            canvas_width: 1200.0,
            canvas_height: 800.0,
            rows: 2,
            cols: 3,
            zoom_delta: 0,
            orientation: Orientation::Portrait,
            provider: DEFAULT_PROVIDER.to_string(),
            dpi: DEFAULT_DPI,
            file_prefix: DEFAULT_FILE_PREFIX.to_string(),
        }
    }
}

/// Point-in-time view of the session state, for hosts to display.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub center: GeoPoint,
    pub rows: u32,
    pub cols: u32,
    pub zoom: u8,
    pub zoom_delta: u8,
    pub provider: &'static str,
    pub orientation: Orientation,
    /// Geographic bounds of the last computed viewport, if still valid
    pub viewbox: Option<LatLngBounds>,
}

/// A tile positioned on the canvas.
#[derive(Debug, Clone)]
pub struct PlacedTile {
    pub record: Arc<TileRecord>,
    /// Canvas x of the tile's left edge
    pub x: f64,
    /// Canvas y of the tile's top edge
    pub y: f64,
    /// Edge length to draw the tile at
    pub size: u32,
}

/// Live map view state.
#[derive(Debug, Clone)]
pub struct MapSession {
    center: GeoPoint,
    zoom: u8,
    canvas_width: f64,
    canvas_height: f64,
    rows: u32,
    cols: u32,
    zoom_delta: u8,
    orientation: Orientation,
    provider: &'static str,
    projection: Projection,
    dpi: u32,
    file_prefix: String,
    viewport: Option<Viewport>,
}

impl MapSession {
    /// Creates a session from initial values.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::UnknownProvider` if `config.provider` is not
    /// registered.
    pub fn new(config: SessionConfig) -> Result<Self, ProviderError> {
        let provider = provider_config(&config.provider)?;
        Ok(Self {
            center: config.center.clamped(),
            zoom: config.zoom.clamp(MIN_VIEW_ZOOM, MAX_ZOOM),
            canvas_width: config.canvas_width.max(1.0),
            canvas_height: config.canvas_height.max(1.0),
            rows: config.rows.max(1),
            cols: config.cols.max(1),
            zoom_delta: config.zoom_delta,
            orientation: config.orientation,
            provider: provider.key,
            projection: Projection::new(provider.tile_size),
            dpi: config.dpi,
            file_prefix: config.file_prefix,
            viewport: None,
        })
    }

    pub fn center(&self) -> GeoPoint {
        self.center
    }

    pub fn zoom(&self) -> u8 {
        self.zoom
    }

    pub fn grid(&self) -> (u32, u32) {
        (self.rows, self.cols)
    }

    pub fn provider(&self) -> &'static str {
        self.provider
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    fn invalidate_viewport(&mut self) {
        self.viewport = None;
    }

    /// Moves the map centre, optionally changing zoom as well.
    ///
    /// Latitude is clamped to ±85° and longitude normalized; the zoom is
    /// rounded and clamped to `[1, 19]`.
    pub fn set_center(&mut self, lat: f64, lng: f64, zoom: Option<f64>) {
        self.center = GeoPoint::new(lat, lng);
        if let Some(zoom) = zoom {
            self.zoom = clamp_view_zoom(zoom.round() as i64);
        }
        self.invalidate_viewport();
    }

    /// Changes zoom while keeping the point under `(focus_x, focus_y)` fixed.
    ///
    /// Returns `false` when the clamped zoom equals the current one.
    pub fn set_zoom(&mut self, next: i64, focus_x: f64, focus_y: f64) -> bool {
        let clamped = clamp_view_zoom(next);
        if clamped == self.zoom {
            return false;
        }

        let before = self.screen_to_world(focus_x, focus_y);
        self.zoom = clamped;
        let after = self.screen_to_world(focus_x, focus_y);
        self.shift_center(before.lat - after.lat, before.lng - after.lng);

        debug!(zoom = self.zoom, "Zoom changed");
        true
    }

    /// Zooms by `step` levels around the canvas centre.
    pub fn zoom_by(&mut self, step: i64) -> bool {
        let focus_x = self.canvas_width / 2.0;
        let focus_y = self.canvas_height / 2.0;
        self.set_zoom(self.zoom as i64 + step, focus_x, focus_y)
    }

    /// Drags the map so the point under `from` ends up under `to`.
    pub fn pan(&mut self, from: (f64, f64), to: (f64, f64)) {
        let previous = self.screen_to_world(from.0, from.1);
        let current = self.screen_to_world(to.0, to.1);
        self.shift_center(previous.lat - current.lat, previous.lng - current.lng);
    }

    fn shift_center(&mut self, d_lat: f64, d_lng: f64) {
        self.center = GeoPoint {
            lat: clamp_latitude(self.center.lat + d_lat),
            lng: normalize_longitude(self.center.lng + d_lng),
        };
        self.invalidate_viewport();
    }

    /// Updates the canvas size. Both dimensions are floored at 1.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.canvas_width = width.max(1.0);
        self.canvas_height = height.max(1.0);
        self.invalidate_viewport();
    }

    /// Sets the export grid. Zero is raised to 1.
    pub fn set_grid(&mut self, rows: u32, cols: u32) {
        let (rows, cols) = (rows.max(1), cols.max(1));
        if (rows, cols) == (self.rows, self.cols) {
            return;
        }
        self.rows = rows;
        self.cols = cols;
        self.invalidate_viewport();
    }

    /// Extra zoom levels used for export. Does not affect the live view.
    pub fn set_zoom_delta(&mut self, delta: u8) {
        self.zoom_delta = delta;
    }

    pub fn set_orientation(&mut self, orientation: Orientation) {
        if orientation == self.orientation {
            return;
        }
        self.orientation = orientation;
        self.invalidate_viewport();
    }

    pub fn set_dpi(&mut self, dpi: u32) {
        self.dpi = dpi;
    }

    pub fn set_file_prefix(&mut self, prefix: impl Into<String>) {
        self.file_prefix = prefix.into();
    }

    /// Switches the tile provider of both the session and the shared cache.
    ///
    /// On error neither is changed.
    pub fn set_provider<L: TileLoader>(
        &mut self,
        key: &str,
        cache: &TileCache<L>,
    ) -> Result<(), ProviderError> {
        if key == self.provider {
            return Ok(());
        }
        cache.set_provider(key)?;
        let provider = cache.provider();
        self.provider = provider.key;
        self.projection = Projection::new(provider.tile_size);
        self.invalidate_viewport();
        Ok(())
    }

    /// The grid frame within the canvas.
    pub fn frame(&self) -> Frame {
        compute_grid_frame(
            self.canvas_width,
            self.canvas_height,
            self.rows,
            self.cols,
            a4_ratio(self.orientation),
        )
    }

    /// The current viewport, computed on first read after an input change.
    pub fn viewport(&mut self) -> Viewport {
        if let Some(viewport) = self.viewport {
            return viewport;
        }
        let viewport = create_viewport(&self.projection, self.center, self.zoom, self.frame());
        self.viewport = Some(viewport);
        viewport
    }

    /// Geographic position under a canvas pixel.
    ///
    /// The result is the raw inverse projection and may lie outside the
    /// normalized ranges.
    pub fn screen_to_world(&self, x: f64, y: f64) -> GeoPoint {
        let frame = self.frame();
        let center_pixel = self
            .projection
            .to_pixel(self.center.lng, self.center.lat, self.zoom);
        let px = center_pixel.x - frame.width / 2.0 + (x - frame.left);
        let py = center_pixel.y - frame.height / 2.0 + (y - frame.top);
        self.projection.to_geo(px, py, self.zoom)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            center: self.center,
            rows: self.rows,
            cols: self.cols,
            zoom: self.zoom,
            zoom_delta: self.zoom_delta,
            provider: self.provider,
            orientation: self.orientation,
            viewbox: self.viewport.map(|v| v.lat_lng_bounds),
        }
    }

    /// Tiles covering the viewport at the view zoom, with canvas offsets.
    ///
    /// Requests go through the shared cache and never block; tiles that are
    /// still pending are included so the host can draw them once ready.
    pub fn visible_tiles<L: TileLoader>(&mut self, cache: &TileCache<L>) -> Vec<PlacedTile> {
        let frame = self.frame();
        let viewport = self.viewport();
        let bounds = viewport.pixel_bounds;
        let tile_size = self.projection.tile_size();

        bounds
            .covering_tiles(&self.projection)
            .iter()
            .map(|(tx, ty)| PlacedTile {
                record: cache.get_tile(self.zoom, tx, ty),
                x: (tx * tile_size as i64) as f64 - bounds.left + frame.left,
                y: (ty * tile_size as i64) as f64 - bounds.top + frame.top,
                size: tile_size,
            })
            .collect()
    }

    /// Cell bounding boxes of the current grid, in row-major order.
    pub fn export_cells(&mut self) -> Vec<CellBBox> {
        let viewport = self.viewport();
        split_viewport(&self.projection, &viewport, self.rows, self.cols)
    }

    /// Export options for the current state, with default pause, labels and
    /// background.
    pub fn export_options(&self) -> ExportOptions {
        ExportOptions {
            rows: self.rows,
            cols: self.cols,
            zoom: self.zoom,
            zoom_delta: self.zoom_delta,
            orientation: self.orientation,
            dpi: self.dpi,
            file_prefix: self.file_prefix.clone(),
            ..Default::default()
        }
    }
}

#[inline]
fn clamp_view_zoom(zoom: i64) -> u8 {
    zoom.clamp(MIN_VIEW_ZOOM as i64, MAX_ZOOM as i64) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile::TileLoadError;
    use image::RgbaImage;
    use tokio::runtime::Handle;

    fn session() -> MapSession {
        MapSession::new(SessionConfig::default()).unwrap()
    }

    #[test]
    fn test_unknown_provider_rejected() {
        let config = SessionConfig {
            provider: "nope".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            MapSession::new(config),
            Err(ProviderError::UnknownProvider(_))
        ));
    }

    #[test]
    fn test_set_center_clamps_and_normalizes() {
        let mut s = session();
        s.set_center(88.0, 190.0, Some(25.4));
        assert_eq!(s.center().lat, 85.0);
        assert_eq!(s.center().lng, -170.0);
        assert_eq!(s.zoom(), 19);

        s.set_center(0.0, 0.0, Some(0.2));
        assert_eq!(s.zoom(), 1);
    }

    #[test]
    fn test_viewport_cached_until_input_changes() {
        let mut s = session();
        assert!(s.snapshot().viewbox.is_none());

        let first = s.viewport();
        assert_eq!(s.snapshot().viewbox, Some(first.lat_lng_bounds));

        s.resize(800.0, 800.0);
        assert!(s.snapshot().viewbox.is_none());
        let second = s.viewport();
        assert_ne!(first, second);
    }

    #[test]
    fn test_zoom_delta_keeps_viewport() {
        let mut s = session();
        s.viewport();
        s.set_zoom_delta(2);
        assert!(s.snapshot().viewbox.is_some());
        assert_eq!(s.export_options().target_zoom(), 17);
    }

    #[test]
    fn test_set_zoom_keeps_focus_point() {
        let mut s = session();
        let focus = (300.0, 250.0);
        let before = s.screen_to_world(focus.0, focus.1);

        assert!(s.set_zoom(16, focus.0, focus.1));
        let after = s.screen_to_world(focus.0, focus.1);

        // Mercator is not linear in latitude, so the correction is
        // approximate for off-centre focus points.
        assert!((before.lat - after.lat).abs() < 1e-4);
        assert!((before.lng - after.lng).abs() < 1e-9);
    }

    #[test]
    fn test_zoom_by_clamps() {
        let mut s = session();
        assert!(s.zoom_by(10));
        assert_eq!(s.zoom(), 19);
        assert!(!s.zoom_by(1));
        assert!(s.zoom_by(-100));
        assert_eq!(s.zoom(), 1);
    }

    #[test]
    fn test_zoom_by_keeps_center() {
        let mut s = session();
        let center = s.center();
        s.zoom_by(1);
        // The canvas centre is the frame centre, so the centre stays put.
        assert!((s.center().lat - center.lat).abs() < 1e-9);
        assert!((s.center().lng - center.lng).abs() < 1e-9);
    }

    #[test]
    fn test_pan_moves_against_drag() {
        let mut s = session();
        let center = s.center();
        // Drag right and down: the map moves west and north of the centre.
        s.pan((600.0, 400.0), (700.0, 500.0));
        assert!(s.center().lng < center.lng);
        assert!(s.center().lat > center.lat);
    }

    #[test]
    fn test_pan_round_trip() {
        let mut s = session();
        let center = s.center();
        s.pan((600.0, 400.0), (650.0, 420.0));
        s.pan((650.0, 420.0), (600.0, 400.0));
        assert!((s.center().lat - center.lat).abs() < 1e-6);
        assert!((s.center().lng - center.lng).abs() < 1e-9);
    }

    #[test]
    fn test_resize_and_grid_floor_at_one() {
        let mut s = session();
        s.resize(0.0, -5.0);
        s.set_grid(0, 0);
        assert_eq!(s.grid(), (1, 1));
        let frame = s.frame();
        assert!(frame.width <= 1.0 && frame.height <= 1.0);
    }

    #[test]
    fn test_frame_uses_orientation_ratio() {
        let mut s = session();
        s.set_grid(1, 1);
        let portrait = s.frame();
        s.set_orientation(Orientation::Landscape);
        let landscape = s.frame();
        assert!(portrait.width / portrait.height < 1.0);
        assert!(landscape.width / landscape.height > 1.0);
    }

    #[test]
    fn test_export_cells_match_grid() {
        let mut s = session();
        s.set_grid(3, 4);
        let cells = s.export_cells();
        assert_eq!(cells.len(), 12);
        assert_eq!((cells[11].row, cells[11].col), (2, 3));

        let options = s.export_options();
        assert_eq!((options.rows, options.cols), (3, 4));
        assert_eq!(options.cell_count(), cells.len());
    }

    #[test]
    fn test_export_options_carry_settings() {
        let mut s = session();
        s.set_dpi(150);
        s.set_file_prefix("berlin");
        s.set_orientation(Orientation::Landscape);
        let options = s.export_options();
        assert_eq!(options.dpi, 150);
        assert_eq!(options.file_prefix, "berlin");
        assert_eq!(options.orientation, Orientation::Landscape);
        assert_eq!(options.zoom, 15);
    }

    struct NullLoader;

    impl TileLoader for NullLoader {
        async fn load(&self, _url: &str) -> Result<RgbaImage, TileLoadError> {
            Ok(RgbaImage::new(256, 256))
        }
    }

    #[tokio::test]
    async fn test_visible_tiles_cover_frame() {
        let cache = TileCache::new("osm", NullLoader, Handle::current()).unwrap();
        let mut s = session();
        let frame = s.frame();
        let tiles = s.visible_tiles(&cache);

        assert!(!tiles.is_empty());
        let min_x = tiles.iter().map(|t| t.x).fold(f64::INFINITY, f64::min);
        let min_y = tiles.iter().map(|t| t.y).fold(f64::INFINITY, f64::min);
        let max_x = tiles.iter().map(|t| t.x + t.size as f64).fold(0.0, f64::max);
        let max_y = tiles.iter().map(|t| t.y + t.size as f64).fold(0.0, f64::max);
        assert!(min_x <= frame.left && min_y <= frame.top);
        assert!(max_x >= frame.left + frame.width);
        assert!(max_y >= frame.top + frame.height);

        // A second frame reuses the cached records
        let again = s.visible_tiles(&cache);
        assert_eq!(cache.stats().fetches as usize, tiles.len());
        assert!(Arc::ptr_eq(&tiles[0].record, &again[0].record));
    }

    #[tokio::test]
    async fn test_set_provider_updates_cache() {
        let cache = TileCache::new("osm", NullLoader, Handle::current()).unwrap();
        let mut s = session();
        s.viewport();

        s.set_provider("satellite", &cache).unwrap();
        assert_eq!(s.provider(), "satellite");
        assert_eq!(cache.provider().key, "satellite");
        assert!(s.snapshot().viewbox.is_none());

        assert!(s.set_provider("nope", &cache).is_err());
        assert_eq!(s.provider(), "satellite");
    }
}
