//! Provider types and errors

use thiserror::Error;

use crate::coord::{DEFAULT_TILE_SIZE, MAX_ZOOM};

/// Errors that can occur during provider operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProviderError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    HttpError(String),
    /// The provider key is not in the registry
    #[error("Unknown tile provider '{0}'")]
    UnknownProvider(String),
    /// Invalid response data from provider
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Static description of a raster tile source.
///
/// Only `template`, `subdomains` and `tile_size` drive tile fetching; the
/// remaining fields are presentation metadata for hosts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    /// Registry key, also the first component of every cached tile key.
    pub key: &'static str,
    /// Human-readable name.
    pub label: &'static str,
    /// URL template with `{z}`, `{x}`, `{y}` and optional `{s}`/`{token}`.
    pub template: &'static str,
    /// Subdomains substituted for `{s}`; empty when unused.
    pub subdomains: &'static [&'static str],
    /// Tile edge length in pixels.
    pub tile_size: u32,
    /// Attribution text the host must display.
    pub attribution: &'static str,
    /// Highest zoom level served.
    pub max_zoom: u8,
}

impl ProviderConfig {
    /// Creates a provider with the default tile size and zoom range.
    pub const fn new(
        key: &'static str,
        label: &'static str,
        template: &'static str,
        attribution: &'static str,
    ) -> Self {
        Self {
            key,
            label,
            template,
            subdomains: &[],
            tile_size: DEFAULT_TILE_SIZE,
            attribution,
            max_zoom: MAX_ZOOM,
        }
    }

    /// Sets the `{s}` subdomains.
    pub const fn with_subdomains(mut self, subdomains: &'static [&'static str]) -> Self {
        self.subdomains = subdomains;
        self
    }

    /// Sets the maximum zoom level.
    pub const fn with_max_zoom(mut self, max_zoom: u8) -> Self {
        self.max_zoom = max_zoom;
        self
    }

    /// Sets the tile edge length.
    pub const fn with_tile_size(mut self, tile_size: u32) -> Self {
        self.tile_size = tile_size;
        self
    }

    /// Whether the template needs an access token.
    pub fn requires_token(&self) -> bool {
        self.template.contains("{token}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_error_display() {
        let err = ProviderError::UnknownProvider("bogus".to_string());
        assert_eq!(err.to_string(), "Unknown tile provider 'bogus'");

        let err = ProviderError::HttpError("HTTP 404".to_string());
        assert_eq!(err.to_string(), "HTTP error: HTTP 404");
    }

    #[test]
    fn test_builder_defaults() {
        const P: ProviderConfig = ProviderConfig::new("k", "K", "https://t/{z}/{x}/{y}", "");
        assert_eq!(P.tile_size, 256);
        assert_eq!(P.max_zoom, 19);
        assert!(P.subdomains.is_empty());
        assert!(!P.requires_token());
    }

    #[test]
    fn test_requires_token() {
        let p = ProviderConfig::new("k", "K", "https://t/{z}/{x}/{y}?key={token}", "");
        assert!(p.requires_token());
    }
}
