//! Error types for the export pipeline.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Errors raised while exporting a grid.
///
/// Only option validation aborts a run. Per-cell errors (encoding, saving,
/// labelling) are recorded in the run report and the export continues.
#[derive(Debug)]
pub enum ExportError {
    /// Export options are unusable.
    InvalidOptions(String),

    /// Unrecognized orientation name.
    InvalidOrientation(String),

    /// The number of cells does not match `rows × cols`.
    CellCountMismatch { expected: usize, actual: usize },

    /// Page could not be encoded.
    EncodeFailed(String),

    /// Label could not be drawn on the page.
    LabelFailed(String),

    /// The cell raster at the target zoom exceeds the pixel budget.
    RasterTooLarge { width: u64, height: u64 },

    /// Failed to create the output directory.
    CreateDirectoryFailed { path: PathBuf, source: io::Error },

    /// Failed to write a page file.
    WriteFailed { path: PathBuf, source: io::Error },
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportError::InvalidOptions(msg) => write!(f, "Invalid export options: {}", msg),
            ExportError::InvalidOrientation(value) => write!(
                f,
                "Invalid orientation '{}': expected 'portrait' or 'landscape'",
                value
            ),
            ExportError::CellCountMismatch { expected, actual } => write!(
                f,
                "Expected {} cells for the grid, got {}",
                expected, actual
            ),
            ExportError::EncodeFailed(msg) => write!(f, "Failed to encode page: {}", msg),
            ExportError::LabelFailed(msg) => write!(f, "Failed to draw label: {}", msg),
            ExportError::RasterTooLarge { width, height } => write!(
                f,
                "Cell raster of {}×{} px is too large; lower the zoom delta or split into more cells",
                width, height
            ),
            ExportError::CreateDirectoryFailed { path, source } => write!(
                f,
                "Failed to create directory {}: {}",
                path.display(),
                source
            ),
            ExportError::WriteFailed { path, source } => {
                write!(f, "Failed to write {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExportError::CreateDirectoryFailed { source, .. } => Some(source),
            ExportError::WriteFailed { source, .. } => Some(source),
            _ => None,
        }
    }
}
