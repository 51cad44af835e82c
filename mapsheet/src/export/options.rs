//! Export run options.

use std::time::Duration;

use image::Rgba;

use super::error::ExportError;
use super::page::{a4_dimensions, Orientation, PageSize};
use crate::coord::MAX_ZOOM;

/// Default pause between consecutive cells.
pub const DEFAULT_CELL_PAUSE: Duration = Duration::from_millis(140);

/// Default page resolution.
pub const DEFAULT_DPI: u32 = 300;

/// Highest accepted page resolution.
///
/// An A4 page at 1200 dpi is already ~140 MB of RGBA.
pub const MAX_DPI: u32 = 1200;

/// Default file name prefix.
pub const DEFAULT_FILE_PREFIX: &str = "map";

/// Options for one export run. Immutable for the duration of the run.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportOptions {
    /// Grid rows
    pub rows: u32,
    /// Grid columns
    pub cols: u32,
    /// Zoom level of the live view
    pub zoom: u8,
    /// Extra zoom levels applied for export
    pub zoom_delta: u8,
    pub orientation: Orientation,
    pub dpi: u32,
    pub file_prefix: String,
    /// Stamp `A1`, `B1`, ... onto each page
    pub label_cells: bool,
    /// Delay between consecutive cells
    pub pause: Duration,
    /// Colour of regions without tile imagery
    pub background: Rgba<u8>,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            rows: 2,
            cols: 3,
            zoom: 15,
            zoom_delta: 0,
            orientation: Orientation::Portrait,
            dpi: DEFAULT_DPI,
            file_prefix: DEFAULT_FILE_PREFIX.to_string(),
            label_cells: false,
            pause: DEFAULT_CELL_PAUSE,
            background: Rgba([255, 255, 255, 255]),
        }
    }
}

impl ExportOptions {
    /// Zoom level tiles are fetched at: `min(19, zoom + zoom_delta)`.
    pub fn target_zoom(&self) -> u8 {
        self.zoom.saturating_add(self.zoom_delta).min(MAX_ZOOM)
    }

    /// Output page size in pixels.
    pub fn page_size(&self) -> PageSize {
        a4_dimensions(self.orientation, self.dpi)
    }

    /// Number of cells (pages) in the grid.
    pub fn cell_count(&self) -> usize {
        self.rows as usize * self.cols as usize
    }

    /// Checks that the options describe a runnable export.
    pub fn validate(&self) -> Result<(), ExportError> {
        if self.rows == 0 || self.cols == 0 {
            return Err(ExportError::InvalidOptions(format!(
                "grid must have at least one row and column, got {}×{}",
                self.rows, self.cols
            )));
        }
        if self.dpi == 0 || self.dpi > MAX_DPI {
            return Err(ExportError::InvalidOptions(format!(
                "dpi must be between 1 and {}, got {}",
                MAX_DPI, self.dpi
            )));
        }
        if self.zoom > MAX_ZOOM {
            return Err(ExportError::InvalidOptions(format!(
                "zoom must be at most {}, got {}",
                MAX_ZOOM, self.zoom
            )));
        }
        if self.file_prefix.is_empty() {
            return Err(ExportError::InvalidOptions(
                "file prefix must not be empty".to_string(),
            ));
        }
        if self
            .file_prefix
            .chars()
            .any(|c| std::path::is_separator(c) || c == '\0')
        {
            return Err(ExportError::InvalidOptions(format!(
                "file prefix must not contain path separators: '{}'",
                self.file_prefix
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = ExportOptions::default();
        assert_eq!(options.pause, Duration::from_millis(140));
        assert_eq!(options.file_prefix, "map");
        assert!(!options.label_cells);
        assert_eq!(options.cell_count(), 6);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_target_zoom_adds_delta() {
        let options = ExportOptions {
            zoom: 15,
            zoom_delta: 2,
            ..Default::default()
        };
        assert_eq!(options.target_zoom(), 17);
    }

    #[test]
    fn test_target_zoom_clamped() {
        let options = ExportOptions {
            zoom: 18,
            zoom_delta: 4,
            ..Default::default()
        };
        assert_eq!(options.target_zoom(), 19);

        let options = ExportOptions {
            zoom: 19,
            zoom_delta: u8::MAX,
            ..Default::default()
        };
        assert_eq!(options.target_zoom(), 19);
    }

    #[test]
    fn test_page_size_follows_orientation() {
        let options = ExportOptions {
            orientation: Orientation::Landscape,
            dpi: 300,
            ..Default::default()
        };
        assert_eq!(options.page_size(), PageSize { width: 3508, height: 2480 });
    }

    #[test]
    fn test_validate_rejects_empty_grid() {
        let options = ExportOptions {
            rows: 0,
            ..Default::default()
        };
        assert!(matches!(options.validate(), Err(ExportError::InvalidOptions(_))));
    }

    #[test]
    fn test_validate_rejects_dpi_out_of_range() {
        for dpi in [0, MAX_DPI + 1] {
            let options = ExportOptions {
                dpi,
                ..Default::default()
            };
            assert!(options.validate().is_err(), "dpi {}", dpi);
        }
    }

    #[test]
    fn test_validate_rejects_bad_prefix() {
        for prefix in ["", "../escape", "a/b"] {
            let options = ExportOptions {
                file_prefix: prefix.to_string(),
                ..Default::default()
            };
            assert!(options.validate().is_err(), "prefix {:?}", prefix);
        }
    }
}
