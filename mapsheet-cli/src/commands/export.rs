//! `mapsheet export`: render the grid cells of a view into A4 pages.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use mapsheet::config::ConfigFile;
use mapsheet::export::{
    cell_label, DirectorySink, ExportOptions, ExportProgress, ExportReport, GridExporter,
    Orientation,
};
use mapsheet::provider::AsyncReqwestClient;
use mapsheet::session::MapSession;
use mapsheet::tile::{HttpTileLoader, TileCache};
use mapsheet::viewport::CellBBox;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::info;

use super::common::{load_config, resolve_provider, resolve_token, start_logging};
use crate::error::CliError;

/// Export inputs. Anything not given falls back to the config file.
#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Latitude of the view centre
    #[arg(long, allow_hyphen_values = true)]
    pub lat: Option<f64>,

    /// Longitude of the view centre
    #[arg(long, allow_hyphen_values = true)]
    pub lng: Option<f64>,

    /// View zoom level (1-19)
    #[arg(long)]
    pub zoom: Option<u8>,

    /// Grid rows
    #[arg(long)]
    pub rows: Option<u32>,

    /// Grid columns
    #[arg(long)]
    pub cols: Option<u32>,

    /// Extra zoom levels for the exported pages
    #[arg(long)]
    pub zoom_delta: Option<u8>,

    /// Page orientation: portrait or landscape
    #[arg(long)]
    pub orientation: Option<Orientation>,

    /// Page resolution
    #[arg(long)]
    pub dpi: Option<u32>,

    /// Tile provider key
    #[arg(long)]
    pub provider: Option<String>,

    /// Access token for providers that need one
    #[arg(long)]
    pub api_token: Option<String>,

    /// File name prefix
    #[arg(long)]
    pub prefix: Option<String>,

    /// Directory the pages are written to
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Stamp A1, B1, ... onto each page
    #[arg(long)]
    pub labels: bool,

    /// Pause between pages in milliseconds
    #[arg(long)]
    pub pause_ms: Option<u64>,

    /// Width of the virtual map canvas in pixels
    #[arg(long)]
    pub canvas_width: Option<u32>,

    /// Height of the virtual map canvas in pixels
    #[arg(long)]
    pub canvas_height: Option<u32>,

    /// Log to stdout instead of drawing a progress bar
    #[arg(long)]
    pub no_progress: bool,
}

impl ExportArgs {
    /// Overlays the command line onto the loaded configuration.
    fn apply(&self, config: &mut ConfigFile) -> Result<(), CliError> {
        let provider = resolve_provider(self.provider.as_deref(), config)?;
        config.provider.api_token = resolve_token(provider, self.api_token.clone(), config)?;
        config.provider.name = provider.key.to_string();

        if let Some(v) = self.lat {
            config.map.lat = v;
        }
        if let Some(v) = self.lng {
            config.map.lng = v;
        }
        if let Some(v) = self.zoom {
            config.map.zoom = v;
        }
        if let Some(v) = self.canvas_width {
            config.map.canvas_width = v;
        }
        if let Some(v) = self.canvas_height {
            config.map.canvas_height = v;
        }
        if let Some(v) = self.rows {
            config.export.rows = v;
        }
        if let Some(v) = self.cols {
            config.export.cols = v;
        }
        if let Some(v) = self.zoom_delta {
            config.export.zoom_delta = v;
        }
        if let Some(v) = self.orientation {
            config.export.orientation = v;
        }
        if let Some(v) = self.dpi {
            config.export.dpi = v;
        }
        if let Some(v) = &self.prefix {
            config.export.file_prefix = v.clone();
        }
        if let Some(v) = &self.output {
            config.export.output_dir = v.clone();
        }
        if let Some(v) = self.pause_ms {
            config.export.pause_ms = v;
        }
        config.export.labels |= self.labels;
        Ok(())
    }
}

/// A validated export job.
struct ExportPlan {
    cells: Vec<CellBBox>,
    options: ExportOptions,
}

fn plan(config: &ConfigFile) -> Result<ExportPlan, CliError> {
    let mut session = MapSession::new(config.session_config())?;
    let mut options = session.export_options();
    options.label_cells = config.export.labels;
    options.pause = config.cell_pause();
    options.validate()?;

    Ok(ExportPlan {
        cells: session.export_cells(),
        options,
    })
}

pub fn run(args: ExportArgs, config_path: &Path) -> Result<(), CliError> {
    let mut config = load_config(config_path)?;
    args.apply(&mut config)?;
    let plan = plan(&config)?;

    let _logging = start_logging(&config, "export", args.no_progress)?;

    print_banner(&config, &plan);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(CliError::Runtime)?;

    let report = runtime.block_on(export(&config, &plan, !args.no_progress))?;
    print_summary(&report, plan.cells.len());

    if report.cancelled {
        return Err(CliError::Cancelled {
            written: report.pages.len(),
            total: plan.cells.len(),
        });
    }
    if !report.failed.is_empty() {
        return Err(CliError::Incomplete {
            failed: report.failed.len(),
            total: plan.cells.len(),
        });
    }
    Ok(())
}

async fn export(
    config: &ConfigFile,
    plan: &ExportPlan,
    show_progress: bool,
) -> Result<ExportReport, CliError> {
    let client = AsyncReqwestClient::with_timeout(config.http.timeout_secs)?;
    let cache = Arc::new(TileCache::new(
        &config.provider.name,
        HttpTileLoader::new(client),
        tokio::runtime::Handle::current(),
    )?);
    cache.set_api_token(config.provider.api_token.clone());

    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    ctrlc::set_handler(move || {
        eprintln!();
        eprintln!("Received Ctrl-C, stopping after the current page...");
        on_signal.cancel();
    })
    .map_err(|e| CliError::Config(format!("Failed to set signal handler: {}", e)))?;

    let (tx, rx) = mpsc::unbounded_channel();
    let exporter = GridExporter::new(
        Arc::clone(&cache),
        DirectorySink::new(config.export.output_dir.clone()),
    )
    .with_progress(tx);

    let bar = progress_bar(plan.cells.len(), show_progress);
    let tracker = tokio::spawn(track_progress(rx, bar.clone()));

    let result = exporter
        .export_grid(&plan.cells, &plan.options, &cancel)
        .await;

    // Closes the progress channel so the tracker finishes.
    drop(exporter);
    let _ = tracker.await;
    bar.finish_and_clear();

    let stats = cache.stats();
    info!(
        requests = stats.requests,
        hits = stats.hits,
        fetches = stats.fetches,
        failures = stats.failures,
        "Tile cache totals"
    );

    Ok(result?)
}

fn progress_bar(total: usize, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(total as u64);
    if let Ok(style) = ProgressStyle::with_template(
        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
    ) {
        bar.set_style(style.progress_chars("#>-"));
    }
    bar
}

async fn track_progress(mut rx: mpsc::UnboundedReceiver<ExportProgress>, bar: ProgressBar) {
    while let Some(event) = rx.recv().await {
        match event {
            ExportProgress::CellStarted { row, col, .. } => {
                bar.set_message(format!("page {}", cell_label(row, col)));
            }
            ExportProgress::PageWritten {
                path,
                missing_tiles,
                ..
            } => {
                bar.inc(1);
                if missing_tiles > 0 {
                    bar.println(format!(
                        "{} {} ({} tiles missing)",
                        style("partial").yellow(),
                        path.display(),
                        missing_tiles
                    ));
                }
            }
            ExportProgress::CellFailed {
                file_name, error, ..
            } => {
                bar.inc(1);
                bar.println(format!("{} {}: {}", style("failed").red(), file_name, error));
            }
        }
    }
}

fn print_banner(config: &ConfigFile, plan: &ExportPlan) {
    let options = &plan.options;
    let page = options.page_size();
    println!("mapsheet export v{}", env!("CARGO_PKG_VERSION"));
    println!("====================");
    println!();
    println!("Centre:      {:.5}, {:.5}", config.map.lat, config.map.lng);
    println!("Provider:    {}", config.provider.name);
    println!(
        "Grid:        {} x {} at zoom {}",
        options.rows,
        options.cols,
        options.target_zoom()
    );
    println!(
        "Pages:       {} A4 {} ({} px at {} dpi)",
        plan.cells.len(),
        options.orientation,
        page,
        options.dpi
    );
    println!("Output:      {}", config.export.output_dir.display());
    println!();
}

fn print_summary(report: &ExportReport, total: usize) {
    println!(
        "{} {} of {} pages written",
        style("Done:").bold(),
        report.pages.len(),
        total
    );
    if report.missing_tiles > 0 {
        println!(
            "  {} tiles could not be loaded and were left blank",
            report.missing_tiles
        );
    }
    for failed in &report.failed {
        println!("  {} {}: {}", style("failed").red(), failed.file_name, failed.error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> ExportArgs {
        ExportArgs {
            lat: None,
            lng: None,
            zoom: None,
            rows: None,
            cols: None,
            zoom_delta: None,
            orientation: None,
            dpi: None,
            provider: None,
            api_token: None,
            prefix: None,
            output: None,
            labels: false,
            pause_ms: None,
            canvas_width: None,
            canvas_height: None,
            no_progress: true,
        }
    }

    #[test]
    fn test_arguments_override_config() {
        let mut config = ConfigFile::default();
        let args = ExportArgs {
            lat: Some(48.1),
            rows: Some(1),
            orientation: Some(Orientation::Landscape),
            provider: Some("SATELLITE".to_string()),
            labels: true,
            ..args()
        };
        args.apply(&mut config).unwrap();

        assert_eq!(config.map.lat, 48.1);
        assert_eq!(config.map.lng, ConfigFile::default().map.lng);
        assert_eq!(config.export.rows, 1);
        assert_eq!(config.export.orientation, Orientation::Landscape);
        assert_eq!(config.provider.name, "satellite");
        assert!(config.export.labels);
    }

    #[test]
    fn test_plan_from_defaults() {
        let plan = plan(&ConfigFile::default()).unwrap();
        assert_eq!(plan.cells.len(), 6);
        assert_eq!(plan.options.pause.as_millis(), 140);
        assert_eq!(plan.options.page_size().width, 2480);
    }

    #[test]
    fn test_plan_rejects_invalid_prefix() {
        let mut config = ConfigFile::default();
        args().apply(&mut config).unwrap();
        config.export.file_prefix = "a/b".to_string();
        assert!(matches!(plan(&config), Err(CliError::Export(_))));
    }
}
