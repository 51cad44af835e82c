//! Asynchronous tile cache
//!
//! Tiles are addressed by [`TileKey`] and fetched at most once per key. A
//! request returns an `Arc<TileRecord>` immediately; callers that need the
//! image suspend on [`TileRecord::wait`] (or [`wait_for_tile`]) until the
//! single fetch completes. A failed fetch resolves the record without an
//! image and is not retried.
//!
//! # Example
//!
//! ```ignore
//! use mapsheet::provider::AsyncReqwestClient;
//! use mapsheet::tile::{HttpTileLoader, TileCache};
//!
//! let loader = HttpTileLoader::new(AsyncReqwestClient::new()?);
//! let cache = TileCache::new("osm", loader, tokio::runtime::Handle::current())?;
//!
//! let record = cache.get_tile(15, 17604, 10746);
//! record.wait().await;
//! if let Some(image) = record.image() {
//!     println!("{}x{}", image.width(), image.height());
//! }
//! ```

mod cache;
mod key;
mod loader;
mod record;

pub use cache::{TileCache, TileCacheStats};
pub use key::TileKey;
pub use loader::{decode_tile, HttpTileLoader, TileLoadError, TileLoader};
pub use record::{wait_for_tile, TileRecord, TileState};
