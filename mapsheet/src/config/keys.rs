//! Typed access to configuration values by `section.key` name.

use std::str::FromStr;

use thiserror::Error;

use super::parser::{
    expand_tilde, parse_bool, parse_canvas_edge, parse_dpi, parse_file_prefix,
    parse_grid_dimension, parse_latitude, parse_longitude, parse_number, parse_orientation,
    parse_provider, parse_timeout, parse_view_zoom, parse_zoom_delta,
};
use super::settings::ConfigFile;

#[derive(Debug, Error)]
pub enum ConfigKeyError {
    #[error("Unknown configuration key '{0}'")]
    UnknownKey(String),

    #[error("Invalid value for {key}: {reason}")]
    ValidationFailed { key: String, reason: String },
}

/// Every key of `config.ini`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    ProviderName,
    ProviderApiToken,

    MapLat,
    MapLng,
    MapZoom,
    MapCanvasWidth,
    MapCanvasHeight,

    ExportRows,
    ExportCols,
    ExportZoomDelta,
    ExportOrientation,
    ExportDpi,
    ExportFilePrefix,
    ExportOutputDir,
    ExportLabels,
    ExportPauseMs,

    HttpTimeoutSecs,

    LoggingDirectory,
}

impl ConfigKey {
    /// In file order.
    pub const ALL: [ConfigKey; 18] = [
        Self::ProviderName,
        Self::ProviderApiToken,
        Self::MapLat,
        Self::MapLng,
        Self::MapZoom,
        Self::MapCanvasWidth,
        Self::MapCanvasHeight,
        Self::ExportRows,
        Self::ExportCols,
        Self::ExportZoomDelta,
        Self::ExportOrientation,
        Self::ExportDpi,
        Self::ExportFilePrefix,
        Self::ExportOutputDir,
        Self::ExportLabels,
        Self::ExportPauseMs,
        Self::HttpTimeoutSecs,
        Self::LoggingDirectory,
    ];

    /// `section.key`
    pub fn name(&self) -> &'static str {
        match self {
            Self::ProviderName => "provider.name",
            Self::ProviderApiToken => "provider.api_token",
            Self::MapLat => "map.lat",
            Self::MapLng => "map.lng",
            Self::MapZoom => "map.zoom",
            Self::MapCanvasWidth => "map.canvas_width",
            Self::MapCanvasHeight => "map.canvas_height",
            Self::ExportRows => "export.rows",
            Self::ExportCols => "export.cols",
            Self::ExportZoomDelta => "export.zoom_delta",
            Self::ExportOrientation => "export.orientation",
            Self::ExportDpi => "export.dpi",
            Self::ExportFilePrefix => "export.file_prefix",
            Self::ExportOutputDir => "export.output_dir",
            Self::ExportLabels => "export.labels",
            Self::ExportPauseMs => "export.pause_ms",
            Self::HttpTimeoutSecs => "http.timeout_secs",
            Self::LoggingDirectory => "logging.directory",
        }
    }

    pub fn section(&self) -> &'static str {
        self.split().0
    }

    pub fn key_name(&self) -> &'static str {
        self.split().1
    }

    fn split(&self) -> (&'static str, &'static str) {
        let name = self.name();
        name.split_once('.').unwrap_or((name, ""))
    }

    /// Current value, formatted as it would be written to the file.
    pub fn get(&self, config: &ConfigFile) -> String {
        match self {
            Self::ProviderName => config.provider.name.clone(),
            Self::ProviderApiToken => config.provider.api_token.clone(),
            Self::MapLat => config.map.lat.to_string(),
            Self::MapLng => config.map.lng.to_string(),
            Self::MapZoom => config.map.zoom.to_string(),
            Self::MapCanvasWidth => config.map.canvas_width.to_string(),
            Self::MapCanvasHeight => config.map.canvas_height.to_string(),
            Self::ExportRows => config.export.rows.to_string(),
            Self::ExportCols => config.export.cols.to_string(),
            Self::ExportZoomDelta => config.export.zoom_delta.to_string(),
            Self::ExportOrientation => config.export.orientation.to_string(),
            Self::ExportDpi => config.export.dpi.to_string(),
            Self::ExportFilePrefix => config.export.file_prefix.clone(),
            Self::ExportOutputDir => config.export.output_dir.display().to_string(),
            Self::ExportLabels => config.export.labels.to_string(),
            Self::ExportPauseMs => config.export.pause_ms.to_string(),
            Self::HttpTimeoutSecs => config.http.timeout_secs.to_string(),
            Self::LoggingDirectory => config.logging.directory.display().to_string(),
        }
    }

    /// Validates `value` and stores it. On error the config is unchanged.
    pub fn set(&self, config: &mut ConfigFile, value: &str) -> Result<(), ConfigKeyError> {
        let invalid = |reason: String| ConfigKeyError::ValidationFailed {
            key: self.name().to_string(),
            reason,
        };

        match self {
            Self::ProviderName => config.provider.name = parse_provider(value).map_err(invalid)?,
            Self::ProviderApiToken => config.provider.api_token = value.trim().to_string(),
            Self::MapLat => config.map.lat = parse_latitude(value).map_err(invalid)?,
            Self::MapLng => config.map.lng = parse_longitude(value).map_err(invalid)?,
            Self::MapZoom => config.map.zoom = parse_view_zoom(value).map_err(invalid)?,
            Self::MapCanvasWidth => {
                config.map.canvas_width = parse_canvas_edge(value).map_err(invalid)?
            }
            Self::MapCanvasHeight => {
                config.map.canvas_height = parse_canvas_edge(value).map_err(invalid)?
            }
            Self::ExportRows => config.export.rows = parse_grid_dimension(value).map_err(invalid)?,
            Self::ExportCols => config.export.cols = parse_grid_dimension(value).map_err(invalid)?,
            Self::ExportZoomDelta => {
                config.export.zoom_delta = parse_zoom_delta(value).map_err(invalid)?
            }
            Self::ExportOrientation => {
                config.export.orientation = parse_orientation(value).map_err(invalid)?
            }
            Self::ExportDpi => config.export.dpi = parse_dpi(value).map_err(invalid)?,
            Self::ExportFilePrefix => {
                config.export.file_prefix = parse_file_prefix(value).map_err(invalid)?
            }
            Self::ExportOutputDir => {
                config.export.output_dir = non_empty_path(value).map_err(invalid)?
            }
            Self::ExportLabels => config.export.labels = parse_bool(value).map_err(invalid)?,
            Self::ExportPauseMs => config.export.pause_ms = parse_number(value).map_err(invalid)?,
            Self::HttpTimeoutSecs => {
                config.http.timeout_secs = parse_timeout(value).map_err(invalid)?
            }
            Self::LoggingDirectory => {
                config.logging.directory = non_empty_path(value).map_err(invalid)?
            }
        }
        Ok(())
    }
}

fn non_empty_path(value: &str) -> Result<std::path::PathBuf, String> {
    let value = value.trim();
    if value.is_empty() {
        return Err("path must not be empty".to_string());
    }
    Ok(expand_tilde(value))
}

impl FromStr for ConfigKey {
    type Err = ConfigKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|key| key.name() == wanted)
            .ok_or_else(|| ConfigKeyError::UnknownKey(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::Orientation;

    #[test]
    fn test_parse_key_names() {
        assert_eq!("map.zoom".parse::<ConfigKey>().unwrap(), ConfigKey::MapZoom);
        assert_eq!(
            " Export.DPI ".parse::<ConfigKey>().unwrap(),
            ConfigKey::ExportDpi
        );
        assert!(matches!(
            "map.rotation".parse::<ConfigKey>(),
            Err(ConfigKeyError::UnknownKey(_))
        ));
    }

    #[test]
    fn test_names_are_unique_and_split() {
        for key in ConfigKey::ALL {
            assert_eq!(key.name().parse::<ConfigKey>().unwrap(), key);
            assert_eq!(
                format!("{}.{}", key.section(), key.key_name()),
                key.name()
            );
        }
    }

    #[test]
    fn test_get_defaults() {
        let config = ConfigFile::default();
        assert_eq!(ConfigKey::ProviderName.get(&config), "osm");
        assert_eq!(ConfigKey::ExportOrientation.get(&config), "portrait");
        assert_eq!(ConfigKey::ExportDpi.get(&config), "300");
        assert_eq!(ConfigKey::ExportLabels.get(&config), "false");
    }

    #[test]
    fn test_set_valid_values() {
        let mut config = ConfigFile::default();
        ConfigKey::ProviderName.set(&mut config, "SATELLITE").unwrap();
        ConfigKey::ExportOrientation.set(&mut config, "landscape").unwrap();
        ConfigKey::ExportLabels.set(&mut config, "on").unwrap();
        ConfigKey::MapLng.set(&mut config, "-0.1276").unwrap();

        assert_eq!(config.provider.name, "satellite");
        assert_eq!(config.export.orientation, Orientation::Landscape);
        assert!(config.export.labels);
        assert_eq!(config.map.lng, -0.1276);
    }

    #[test]
    fn test_set_invalid_leaves_config_unchanged() {
        let mut config = ConfigFile::default();
        let err = ConfigKey::ExportRows.set(&mut config, "0").unwrap_err();
        assert!(err.to_string().starts_with("Invalid value for export.rows"));
        assert!(ConfigKey::ProviderName.set(&mut config, "nope").is_err());
        assert!(ConfigKey::ExportOutputDir.set(&mut config, "  ").is_err());
        assert_eq!(config, ConfigFile::default());
    }

    #[test]
    fn test_set_then_get_round_trips() {
        let mut config = ConfigFile::default();
        ConfigKey::ExportPauseMs.set(&mut config, "250").unwrap();
        assert_eq!(ConfigKey::ExportPauseMs.get(&config), "250");
        assert_eq!(config.cell_pause(), std::time::Duration::from_millis(250));
    }
}
