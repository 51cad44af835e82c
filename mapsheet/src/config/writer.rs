//! Serialization of `ConfigFile` to a commented INI string.

use std::path::Path;

use super::settings::ConfigFile;

pub(super) fn to_config_string(config: &ConfigFile) -> String {
    format!(
        r#"; mapsheet configuration
; Edit by hand or with `mapsheet config set <section.key> <value>`.

[provider]
; Tile provider: osm, satellite
name = {provider}
; Access token substituted into provider URLs that need one
api_token = {api_token}

[map]
; Initial view centre in degrees
lat = {lat}
lng = {lng}
; View zoom level (1-19)
zoom = {zoom}
; Size of the virtual map canvas in pixels
canvas_width = {canvas_width}
canvas_height = {canvas_height}

[export]
; Grid of pages laid over the view
rows = {rows}
cols = {cols}
; Extra zoom levels used when rendering pages
zoom_delta = {zoom_delta}
; portrait or landscape
orientation = {orientation}
; Page resolution; A4 at 300 dpi is 2480x3508 pixels
dpi = {dpi}
; Pages are named <prefix>_<row>_<col>_<orientation>_z<zoom>.png
file_prefix = {file_prefix}
output_dir = {output_dir}
; Stamp A1, B1, ... onto each page
labels = {labels}
; Pause between pages in milliseconds
pause_ms = {pause_ms}

[http]
timeout_secs = {timeout_secs}

[logging]
directory = {log_dir}
"#,
        provider = config.provider.name,
        api_token = config.provider.api_token,
        lat = config.map.lat,
        lng = config.map.lng,
        zoom = config.map.zoom,
        canvas_width = config.map.canvas_width,
        canvas_height = config.map.canvas_height,
        rows = config.export.rows,
        cols = config.export.cols,
        zoom_delta = config.export.zoom_delta,
        orientation = config.export.orientation,
        dpi = config.export.dpi,
        file_prefix = config.export.file_prefix,
        output_dir = path_to_string(&config.export.output_dir),
        labels = config.export.labels,
        pause_ms = config.export.pause_ms,
        timeout_secs = config.http.timeout_secs,
        log_dir = path_to_string(&config.logging.directory),
    )
}

/// Writes paths under the home directory with a leading `~`.
fn path_to_string(path: &Path) -> String {
    if let Some(home) = dirs::home_dir() {
        if let Ok(rest) = path.strip_prefix(&home) {
            return format!("~/{}", rest.display());
        }
    }
    path.display().to_string()
}
