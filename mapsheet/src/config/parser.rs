//! INI parsing: `Ini` → `ConfigFile`.
//!
//! The value parsers here are shared with [`super::keys`] so that a value
//! accepted by `config set` is always accepted when the file is loaded.

use std::path::PathBuf;
use std::str::FromStr;

use ini::Ini;

use super::defaults::MAX_GRID_DIMENSION;
use super::file::ConfigFileError;
use super::settings::ConfigFile;
use crate::coord::{MAX_ZOOM, MIN_VIEW_ZOOM};
use crate::export::{Orientation, MAX_DPI};
use crate::provider::provider_config;

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found in the INI.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    if let Some(section) = ini.section(Some("provider")) {
        if let Some(v) = section.get("name") {
            config.provider.name = field("provider", "name", v, parse_provider)?;
        }
        if let Some(v) = section.get("api_token") {
            config.provider.api_token = v.trim().to_string();
        }
    }

    if let Some(section) = ini.section(Some("map")) {
        if let Some(v) = section.get("lat") {
            config.map.lat = field("map", "lat", v, parse_latitude)?;
        }
        if let Some(v) = section.get("lng") {
            config.map.lng = field("map", "lng", v, parse_longitude)?;
        }
        if let Some(v) = section.get("zoom") {
            config.map.zoom = field("map", "zoom", v, parse_view_zoom)?;
        }
        if let Some(v) = section.get("canvas_width") {
            config.map.canvas_width = field("map", "canvas_width", v, parse_canvas_edge)?;
        }
        if let Some(v) = section.get("canvas_height") {
            config.map.canvas_height = field("map", "canvas_height", v, parse_canvas_edge)?;
        }
    }

    if let Some(section) = ini.section(Some("export")) {
        if let Some(v) = section.get("rows") {
            config.export.rows = field("export", "rows", v, parse_grid_dimension)?;
        }
        if let Some(v) = section.get("cols") {
            config.export.cols = field("export", "cols", v, parse_grid_dimension)?;
        }
        if let Some(v) = section.get("zoom_delta") {
            config.export.zoom_delta = field("export", "zoom_delta", v, parse_zoom_delta)?;
        }
        if let Some(v) = section.get("orientation") {
            config.export.orientation = field("export", "orientation", v, parse_orientation)?;
        }
        if let Some(v) = section.get("dpi") {
            config.export.dpi = field("export", "dpi", v, parse_dpi)?;
        }
        if let Some(v) = section.get("file_prefix") {
            config.export.file_prefix = field("export", "file_prefix", v, parse_file_prefix)?;
        }
        if let Some(v) = section.get("output_dir") {
            let v = v.trim();
            if !v.is_empty() {
                config.export.output_dir = expand_tilde(v);
            }
        }
        if let Some(v) = section.get("labels") {
            config.export.labels = field("export", "labels", v, parse_bool)?;
        }
        if let Some(v) = section.get("pause_ms") {
            config.export.pause_ms = field("export", "pause_ms", v, parse_number)?;
        }
    }

    if let Some(section) = ini.section(Some("http")) {
        if let Some(v) = section.get("timeout_secs") {
            config.http.timeout_secs = field("http", "timeout_secs", v, parse_timeout)?;
        }
    }

    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = section.get("directory") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.directory = expand_tilde(v);
            }
        }
    }

    Ok(config)
}

fn field<T>(
    section: &str,
    key: &str,
    value: &str,
    parse: impl FnOnce(&str) -> Result<T, String>,
) -> Result<T, ConfigFileError> {
    parse(value).map_err(|reason| ConfigFileError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason,
    })
}

pub(super) fn parse_number<T: FromStr>(value: &str) -> Result<T, String> {
    value
        .trim()
        .parse()
        .map_err(|_| "must be a non-negative integer".to_string())
}

fn parse_ranged<T>(value: &str, min: T, max: T) -> Result<T, String>
where
    T: FromStr + PartialOrd + std::fmt::Display + Copy,
{
    let parsed: T = parse_number(value)?;
    if parsed < min || parsed > max {
        return Err(format!("must be between {} and {}", min, max));
    }
    Ok(parsed)
}

fn parse_degrees(value: &str, limit: f64) -> Result<f64, String> {
    let parsed: f64 = value
        .trim()
        .parse()
        .map_err(|_| "must be a decimal number of degrees".to_string())?;
    if !parsed.is_finite() || parsed.abs() > limit {
        return Err(format!("must be between -{} and {}", limit, limit));
    }
    Ok(parsed)
}

pub(super) fn parse_provider(value: &str) -> Result<String, String> {
    let key = value.trim().to_lowercase();
    provider_config(&key).map_err(|e| e.to_string())?;
    Ok(key)
}

pub(super) fn parse_latitude(value: &str) -> Result<f64, String> {
    parse_degrees(value, 90.0)
}

pub(super) fn parse_longitude(value: &str) -> Result<f64, String> {
    parse_degrees(value, 180.0)
}

pub(super) fn parse_view_zoom(value: &str) -> Result<u8, String> {
    parse_ranged(value, MIN_VIEW_ZOOM, MAX_ZOOM)
}

pub(super) fn parse_canvas_edge(value: &str) -> Result<u32, String> {
    parse_ranged(value, 1, 16_384)
}

pub(super) fn parse_grid_dimension(value: &str) -> Result<u32, String> {
    parse_ranged(value, 1, MAX_GRID_DIMENSION)
}

pub(super) fn parse_zoom_delta(value: &str) -> Result<u8, String> {
    parse_ranged(value, 0, MAX_ZOOM)
}

pub(super) fn parse_dpi(value: &str) -> Result<u32, String> {
    parse_ranged(value, 1, MAX_DPI)
}

pub(super) fn parse_timeout(value: &str) -> Result<u64, String> {
    parse_ranged(value, 1, 3600)
}

pub(super) fn parse_orientation(value: &str) -> Result<Orientation, String> {
    value
        .parse()
        .map_err(|_| "must be 'portrait' or 'landscape'".to_string())
}

pub(super) fn parse_file_prefix(value: &str) -> Result<String, String> {
    let prefix = value.trim();
    if prefix.is_empty() {
        return Err("must not be empty".to_string());
    }
    if prefix.contains(['/', '\\', '\0']) {
        return Err("must not contain path separators".to_string());
    }
    Ok(prefix.to_string())
}

pub(super) fn parse_bool(value: &str) -> Result<bool, String> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err("must be true or false".to_string()),
    }
}

/// Expand `~` to the home directory.
pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    } else if path == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(content: &str) -> Result<ConfigFile, ConfigFileError> {
        let ini = Ini::load_from_str(content).unwrap();
        parse_ini(&ini)
    }

    #[test]
    fn test_empty_ini_gives_defaults() {
        assert_eq!(parse("").unwrap(), ConfigFile::default());
    }

    #[test]
    fn test_overlays_values() {
        let config = parse(
            "[provider]\nname = Satellite\napi_token = abc\n\
             [map]\nlat = -33.86\nlng = 151.2\nzoom = 12\n\
             [export]\nrows = 3\ncols = 4\nzoom_delta = 2\norientation = landscape\n\
             dpi = 150\nfile_prefix = sydney\nlabels = yes\npause_ms = 0\n\
             [http]\ntimeout_secs = 5\n",
        )
        .unwrap();

        assert_eq!(config.provider.name, "satellite");
        assert_eq!(config.provider.api_token, "abc");
        assert_eq!(config.map.lat, -33.86);
        assert_eq!(config.map.zoom, 12);
        assert_eq!(config.export.rows, 3);
        assert_eq!(config.export.cols, 4);
        assert_eq!(config.export.zoom_delta, 2);
        assert_eq!(config.export.orientation, Orientation::Landscape);
        assert_eq!(config.export.dpi, 150);
        assert_eq!(config.export.file_prefix, "sydney");
        assert!(config.export.labels);
        assert_eq!(config.export.pause_ms, 0);
        assert_eq!(config.http.timeout_secs, 5);
    }

    #[test]
    fn test_unknown_provider_rejected() {
        let err = parse("[provider]\nname = bing\n").unwrap_err();
        match err {
            ConfigFileError::InvalidValue { section, key, value, .. } => {
                assert_eq!(section, "provider");
                assert_eq!(key, "name");
                assert_eq!(value, "bing");
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_out_of_range_values_rejected() {
        assert!(parse("[map]\nzoom = 0\n").is_err());
        assert!(parse("[map]\nzoom = 20\n").is_err());
        assert!(parse("[map]\nlat = 91\n").is_err());
        assert!(parse("[export]\nrows = 0\n").is_err());
        assert!(parse("[export]\ndpi = 5000\n").is_err());
        assert!(parse("[export]\norientation = sideways\n").is_err());
        assert!(parse("[export]\nfile_prefix = a/b\n").is_err());
        assert!(parse("[export]\nlabels = maybe\n").is_err());
        assert!(parse("[http]\ntimeout_secs = 0\n").is_err());
    }

    #[test]
    fn test_empty_paths_keep_defaults() {
        let config = parse("[export]\noutput_dir =\n[logging]\ndirectory =\n").unwrap();
        let default = ConfigFile::default();
        assert_eq!(config.export.output_dir, default.export.output_dir);
        assert_eq!(config.logging.directory, default.logging.directory);
    }

    #[test]
    fn test_expand_tilde() {
        assert_eq!(expand_tilde("/tmp/pages"), PathBuf::from("/tmp/pages"));
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_tilde("~/maps"), home.join("maps"));
            assert_eq!(expand_tilde("~"), home);
        }
    }

    #[test]
    fn test_parse_bool_variants() {
        for v in ["true", "1", "YES", " on "] {
            assert_eq!(parse_bool(v), Ok(true));
        }
        for v in ["false", "0", "no", "Off"] {
            assert_eq!(parse_bool(v), Ok(false));
        }
    }
}
