//! Export pipeline
//!
//! Turns the cells of a split viewport into print-ready A4 page images. For
//! each cell the tiles covering its bounding box are fetched at the export
//! zoom (`zoom + zoom_delta`, at most 19), placed into one raster, stretched
//! to the DPI-derived page size, optionally labelled and handed to a
//! [`PageSink`] under a deterministic file name.
//!
//! Tile failures never abort an export: missing tiles leave the background
//! visible and the page is still produced.

mod compose;
mod error;
mod naming;
mod options;
mod page;
mod pipeline;
mod sink;
mod stamp;

pub use compose::{render_bounding_box, resample_to_page, RenderedCell, MAX_CELL_PIXELS};
pub use error::ExportError;
pub use naming::{cell_label, column_label, page_file_name};
pub use options::{ExportOptions, DEFAULT_CELL_PAUSE, DEFAULT_DPI, DEFAULT_FILE_PREFIX, MAX_DPI};
pub use page::{a4_dimensions, a4_ratio, Orientation, PageSize, A4_LONG_MM, A4_SHORT_MM};
pub use pipeline::{ExportProgress, ExportReport, FailedCell, GridExporter};
pub use sink::{encode_png, DirectorySink, PageSink};
pub use stamp::{label_module, stamp_label, LABEL_MODULE_DIVISOR, LABEL_PADDING};
