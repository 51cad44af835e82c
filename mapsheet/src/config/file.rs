//! Configuration file handling for `~/.mapsheet/config.ini`.

use std::path::{Path, PathBuf};

use ini::Ini;
use thiserror::Error;

use super::settings::ConfigFile;

/// Failures reading, validating or writing `config.ini`.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    #[error("cannot parse config.ini: {0}")]
    ReadError(#[from] ini::Error),

    #[error("cannot write config.ini: {0}")]
    WriteError(String),

    #[error("[{section}] {key} = '{value}' is not accepted: {reason}")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
        reason: String,
    },

    #[error("cannot create the config directory: {0}")]
    DirectoryError(std::io::Error),
}

impl ConfigFile {
    /// Reads `~/.mapsheet/config.ini`.
    pub fn load() -> Result<Self, ConfigFileError> {
        Self::load_from(&config_file_path())
    }

    /// Reads the file at `path`; absent files fall back to defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigFileError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let ini = Ini::load_from_file(path)?;
        super::parser::parse_ini(&ini)
    }

    pub fn save(&self) -> Result<(), ConfigFileError> {
        self.save_to(&config_file_path())
    }

    /// Writes the commented INI rendering to `path`, creating parents.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigFileError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ConfigFileError::DirectoryError)?;
        }

        let content = super::writer::to_config_string(self);
        std::fs::write(path, content).map_err(|e| ConfigFileError::WriteError(e.to_string()))
    }

    /// Seeds `~/.mapsheet/config.ini` with defaults on first run.
    pub fn ensure_exists() -> Result<PathBuf, ConfigFileError> {
        let path = config_file_path();
        if !path.exists() {
            Self::default().save_to(&path)?;
        }
        Ok(path)
    }
}

/// `~/.mapsheet`, or `./.mapsheet` when there is no home directory.
pub fn config_directory() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".mapsheet")
}

pub fn config_file_path() -> PathBuf {
    config_directory().join("config.ini")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::Orientation;
    use tempfile::TempDir;

    #[test]
    fn test_load_nonexistent_returns_defaults() {
        let temp = TempDir::new().unwrap();
        let config = ConfigFile::load_from(&temp.path().join("missing.ini")).unwrap();
        assert_eq!(config, ConfigFile::default());
    }

    #[test]
    fn test_save_and_reload() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested/dir/config.ini");

        let mut config = ConfigFile::default();
        config.provider.name = "satellite".to_string();
        config.map.lat = 48.8566;
        config.map.lng = 2.3522;
        config.export.orientation = Orientation::Landscape;
        config.export.labels = true;
        config.export.output_dir = temp.path().join("pages");
        config.logging.directory = temp.path().join("logs");
        config.save_to(&path).unwrap();

        let loaded = ConfigFile::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_invalid_file_reports_value() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.ini");
        std::fs::write(&path, "[export]\ndpi = lots\n").unwrap();

        let err = ConfigFile::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("[export] dpi = 'lots'"));
    }

    #[test]
    fn test_config_paths() {
        assert!(config_directory().ends_with(".mapsheet"));
        assert!(config_file_path().ends_with(".mapsheet/config.ini"));
    }
}
