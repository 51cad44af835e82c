//! Settings structs, one per `[section]` of `config.ini`.

use std::path::PathBuf;
use std::time::Duration;

use super::defaults::*;
use crate::coord::GeoPoint;
use crate::export::{Orientation, DEFAULT_DPI, DEFAULT_FILE_PREFIX};
use crate::provider::{DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_PROVIDER};
use crate::session::SessionConfig;

/// Complete configuration loaded from `config.ini`.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigFile {
    pub provider: ProviderSettings,
    pub map: MapSettings,
    pub export: ExportSettings,
    pub http: HttpSettings,
    pub logging: LoggingSettings,
}

/// `[provider]`
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderSettings {
    /// Registry key of the tile provider
    pub name: String,
    /// Substituted for `{token}` in the URL template; empty when unused
    pub api_token: String,
}

/// `[map]` - the initial view.
#[derive(Debug, Clone, PartialEq)]
pub struct MapSettings {
    pub lat: f64,
    pub lng: f64,
    pub zoom: u8,
    pub canvas_width: u32,
    pub canvas_height: u32,
}

/// `[export]`
#[derive(Debug, Clone, PartialEq)]
pub struct ExportSettings {
    pub rows: u32,
    pub cols: u32,
    pub zoom_delta: u8,
    pub orientation: Orientation,
    pub dpi: u32,
    pub file_prefix: String,
    pub output_dir: PathBuf,
    /// Stamp cell labels onto pages
    pub labels: bool,
    pub pause_ms: u64,
}

/// `[http]`
#[derive(Debug, Clone, PartialEq)]
pub struct HttpSettings {
    pub timeout_secs: u64,
}

/// `[logging]`
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingSettings {
    pub directory: PathBuf,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            provider: ProviderSettings {
                name: DEFAULT_PROVIDER.to_string(),
                api_token: String::new(),
            },
            map: MapSettings {
                lat: DEFAULT_LAT,
                lng: DEFAULT_LNG,
                zoom: DEFAULT_MAP_ZOOM,
                canvas_width: DEFAULT_CANVAS_WIDTH,
                canvas_height: DEFAULT_CANVAS_HEIGHT,
            },
            export: ExportSettings {
                rows: DEFAULT_ROWS,
                cols: DEFAULT_COLS,
                zoom_delta: DEFAULT_ZOOM_DELTA,
                orientation: Orientation::default(),
                dpi: DEFAULT_DPI,
                file_prefix: DEFAULT_FILE_PREFIX.to_string(),
                output_dir: default_output_dir(),
                labels: false,
                pause_ms: DEFAULT_PAUSE_MS,
            },
            http: HttpSettings {
                timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
            },
            logging: LoggingSettings {
                directory: default_log_directory(),
            },
        }
    }
}

impl ConfigFile {
    /// Initial session state described by the `[map]`, `[provider]` and
    /// `[export]` sections.
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            center: GeoPoint::new(self.map.lat, self.map.lng),
            zoom: self.map.zoom,
            canvas_width: f64::from(self.map.canvas_width),
            canvas_height: f64::from(self.map.canvas_height),
            rows: self.export.rows,
            cols: self.export.cols,
            zoom_delta: self.export.zoom_delta,
            orientation: self.export.orientation,
            provider: self.provider.name.clone(),
            dpi: self.export.dpi,
            file_prefix: self.export.file_prefix.clone(),
        }
    }

    pub fn cell_pause(&self) -> Duration {
        Duration::from_millis(self.export.pause_ms)
    }
}
