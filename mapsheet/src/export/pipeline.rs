//! Sequential grid export.
//!
//! Cells are processed strictly one at a time in row-major order: render
//! the cell raster, stretch it onto the page, optionally stamp the label,
//! hand the page to the sink, then pause before the next cell. Raster
//! memory is therefore bounded by one cell plus one page.
//!
//! # Example
//!
//! ```ignore
//! let exporter = GridExporter::new(Arc::clone(&cache), DirectorySink::new("out"));
//! let report = exporter
//!     .export_grid(&session.export_cells(), &session.export_options(), &CancellationToken::new())
//!     .await?;
//! println!("{} pages written", report.pages.len());
//! ```

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::compose::{render_bounding_box, resample_to_page};
use super::error::ExportError;
use super::naming::{cell_label, page_file_name};
use super::options::ExportOptions;
use super::page::PageSize;
use super::sink::PageSink;
use super::stamp::stamp_label;
use crate::tile::{TileCache, TileLoader};
use crate::viewport::CellBBox;

/// Progress events emitted during an export run.
#[derive(Debug, Clone, PartialEq)]
pub enum ExportProgress {
    /// A cell started rendering.
    CellStarted {
        index: usize,
        total: usize,
        row: u32,
        col: u32,
    },
    /// A page was persisted.
    PageWritten {
        index: usize,
        total: usize,
        path: PathBuf,
        missing_tiles: usize,
    },
    /// A page could not be persisted; the run continues.
    CellFailed {
        index: usize,
        total: usize,
        file_name: String,
        error: String,
    },
}

/// A cell whose page was not written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedCell {
    pub row: u32,
    pub col: u32,
    pub file_name: String,
    pub error: String,
}

/// Outcome of an export run.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportReport {
    /// Zoom level tiles were fetched at
    pub target_zoom: u8,
    pub page_size: PageSize,
    /// Written pages, in creation order
    pub pages: Vec<PathBuf>,
    pub failed: Vec<FailedCell>,
    /// Tiles that resolved without an image, over all cells
    pub missing_tiles: usize,
    /// Whether the run stopped early on cancellation
    pub cancelled: bool,
}

impl ExportReport {
    fn new(target_zoom: u8, page_size: PageSize) -> Self {
        Self {
            target_zoom,
            page_size,
            pages: Vec::new(),
            failed: Vec::new(),
            missing_tiles: 0,
            cancelled: false,
        }
    }

    /// Cells processed, written or failed.
    pub fn processed(&self) -> usize {
        self.pages.len() + self.failed.len()
    }

    /// Whether every processed cell produced a page.
    pub fn is_success(&self) -> bool {
        self.failed.is_empty() && !self.cancelled
    }
}

/// Exports grid cells as pages, reading tiles from a shared cache.
pub struct GridExporter<L: TileLoader, S: PageSink> {
    cache: Arc<TileCache<L>>,
    sink: S,
    progress: Option<mpsc::UnboundedSender<ExportProgress>>,
}

impl<L: TileLoader, S: PageSink> GridExporter<L, S> {
    pub fn new(cache: Arc<TileCache<L>>, sink: S) -> Self {
        Self {
            cache,
            sink,
            progress: None,
        }
    }

    /// Sends progress events to `tx`. A closed receiver is ignored.
    pub fn with_progress(mut self, tx: mpsc::UnboundedSender<ExportProgress>) -> Self {
        self.progress = Some(tx);
        self
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    fn emit(&self, event: ExportProgress) {
        if let Some(tx) = &self.progress {
            let _ = tx.send(event);
        }
    }

    /// Exports one page per cell.
    ///
    /// `cells` must hold `rows × cols` boxes in row-major order, as produced
    /// by [`crate::viewport::split_viewport`]. Cell `row * cols + col` is
    /// saved under the name for `(row, col)`.
    ///
    /// Cancelling `cancel` stops the run before the next cell starts (or
    /// during the pause); the cell in progress is finished and tile fetches
    /// already issued are left to complete into the cache.
    ///
    /// # Errors
    ///
    /// Only invalid options abort the run. Cells whose raster exceeds
    /// [`super::MAX_CELL_PIXELS`] and failed saves are recorded in the report.
    pub async fn export_grid(
        &self,
        cells: &[CellBBox],
        options: &ExportOptions,
        cancel: &CancellationToken,
    ) -> Result<ExportReport, ExportError> {
        options.validate()?;
        if cells.len() != options.cell_count() {
            return Err(ExportError::CellCountMismatch {
                expected: options.cell_count(),
                actual: cells.len(),
            });
        }

        let target_zoom = options.target_zoom();
        let page_size = options.page_size();
        let total = cells.len();
        let mut report = ExportReport::new(target_zoom, page_size);
        let started = Instant::now();

        info!(
            rows = options.rows,
            cols = options.cols,
            target_zoom,
            page = %page_size,
            provider = self.cache.provider().key,
            "Starting grid export"
        );

        'grid: for row in 0..options.rows {
            for col in 0..options.cols {
                let index = (row * options.cols + col) as usize;

                if index > 0 {
                    tokio::select! {
                        biased;
                        _ = cancel.cancelled() => {
                            report.cancelled = true;
                            break 'grid;
                        }
                        _ = tokio::time::sleep(options.pause) => {}
                    }
                } else if cancel.is_cancelled() {
                    report.cancelled = true;
                    break 'grid;
                }

                self.emit(ExportProgress::CellStarted {
                    index,
                    total,
                    row,
                    col,
                });

                let file_name =
                    page_file_name(&options.file_prefix, row, col, options.orientation, target_zoom);
                let (result, missing) = self
                    .export_cell(&cells[index], row, col, &file_name, options)
                    .await;
                report.missing_tiles += missing;

                match result {
                    Ok(path) => {
                        info!(
                            path = %path.display(),
                            row = row + 1,
                            col = col + 1,
                            missing_tiles = missing,
                            "Page exported"
                        );
                        self.emit(ExportProgress::PageWritten {
                            index,
                            total,
                            path: path.clone(),
                            missing_tiles: missing,
                        });
                        report.pages.push(path);
                    }
                    Err(e) => {
                        warn!(file = %file_name, error = %e, "Failed to export page");
                        self.emit(ExportProgress::CellFailed {
                            index,
                            total,
                            file_name: file_name.clone(),
                            error: e.to_string(),
                        });
                        report.failed.push(FailedCell {
                            row,
                            col,
                            file_name,
                            error: e.to_string(),
                        });
                    }
                }
            }
        }

        if report.cancelled {
            info!(
                written = report.pages.len(),
                remaining = total - report.processed(),
                "Grid export cancelled"
            );
        } else {
            info!(
                written = report.pages.len(),
                failed = report.failed.len(),
                missing_tiles = report.missing_tiles,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Grid export finished"
            );
        }

        Ok(report)
    }

    /// Renders, labels and saves one cell. Returns the save result and the
    /// number of missing tiles.
    async fn export_cell(
        &self,
        cell: &CellBBox,
        row: u32,
        col: u32,
        file_name: &str,
        options: &ExportOptions,
    ) -> (Result<PathBuf, ExportError>, usize) {
        let rendered = match render_bounding_box(
            &self.cache,
            &cell.bounds(),
            options.target_zoom(),
            options.background,
        )
        .await
        {
            Ok(rendered) => rendered,
            Err(e) => return (Err(e), 0),
        };
        debug!(
            row,
            col,
            width = rendered.raster.width(),
            height = rendered.raster.height(),
            tiles = rendered.tiles,
            missing = rendered.missing,
            "Cell assembled"
        );

        let mut page = resample_to_page(&rendered.raster, options.page_size());
        let missing = rendered.missing;
        drop(rendered);

        if options.label_cells {
            let label = cell_label(row, col);
            if let Err(e) = stamp_label(&mut page, &label) {
                warn!(label = %label, error = %e, "Saving page without label");
            }
        }

        (self.sink.save(page, file_name).await, missing)
    }
}
