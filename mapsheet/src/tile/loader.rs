//! Tile loading: fetch a URL and decode it to RGBA.

use std::future::Future;

use image::RgbaImage;
use thiserror::Error;

use crate::provider::{AsyncHttpClient, ProviderError};

/// Why a tile could not be loaded.
///
/// The cache does not distinguish causes; these exist for logging.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TileLoadError {
    /// Network or HTTP status failure
    #[error("fetch failed: {0}")]
    Fetch(#[from] ProviderError),
    /// Response body is not a decodable image
    #[error("decode failed: {0}")]
    Decode(String),
}

/// Source of decoded tile images.
///
/// The host's image-load operation; implementations must be cheap to share
/// across spawned fetch tasks.
pub trait TileLoader: Send + Sync + 'static {
    /// Loads and decodes the image at `url`.
    fn load(&self, url: &str) -> impl Future<Output = Result<RgbaImage, TileLoadError>> + Send;
}

/// Loads tiles over HTTP and decodes them with the `image` crate.
pub struct HttpTileLoader<C: AsyncHttpClient> {
    http_client: C,
}

impl<C: AsyncHttpClient> HttpTileLoader<C> {
    pub fn new(http_client: C) -> Self {
        Self { http_client }
    }
}

impl<C: AsyncHttpClient + 'static> TileLoader for HttpTileLoader<C> {
    async fn load(&self, url: &str) -> Result<RgbaImage, TileLoadError> {
        let bytes = self.http_client.get(url).await?;
        decode_tile(&bytes)
    }
}

/// Decodes an encoded raster (PNG, JPEG, ...) into RGBA.
pub fn decode_tile(bytes: &[u8]) -> Result<RgbaImage, TileLoadError> {
    image::load_from_memory(bytes)
        .map(|img| img.to_rgba8())
        .map_err(|e| TileLoadError::Decode(e.to_string()))
}
