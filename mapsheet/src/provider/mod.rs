//! Raster tile providers
//!
//! A provider is a static URL template plus a little metadata. This module
//! holds the built-in registry, URL construction and the HTTP client seam
//! used by the tile loader.
//!
//! ```ignore
//! use mapsheet::provider::{build_tile_url, provider_config};
//!
//! let provider = provider_config("osm")?;
//! let url = build_tile_url(provider, "", 15, 17604, 10746);
//! ```

mod http;
mod registry;
mod template;
mod types;

pub use http::{AsyncHttpClient, AsyncReqwestClient, DEFAULT_HTTP_TIMEOUT_SECS};
pub use registry::{
    all_providers, next_provider, provider_config, DEFAULT_PROVIDER, OSM, SATELLITE,
};
pub use template::build_tile_url;
pub use types::{ProviderConfig, ProviderError};

#[cfg(test)]
pub use http::tests::MockAsyncHttpClient;
