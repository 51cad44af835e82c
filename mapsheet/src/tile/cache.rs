//! Memoizing tile cache with at-most-one fetch per key.
//!
//! [`TileCache::get_tile`] never blocks: it returns the existing record for a
//! key or inserts a pending one and spawns its fetch on the runtime. Insertion
//! goes through the `DashMap` entry API, so concurrent callers for the same
//! key always observe a single record and a single fetch.
//!
//! Changing the provider or access token drops every record. Fetches still
//! in flight at that point finish into their detached records and are then
//! discarded with them.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::RwLock;
use tokio::runtime::Handle;
use tracing::{debug, info, warn};

use super::key::TileKey;
use super::loader::TileLoader;
use super::record::TileRecord;
use crate::coord::Projection;
use crate::provider::{build_tile_url, provider_config, ProviderConfig, ProviderError};

/// Counters describing cache effectiveness.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TileCacheStats {
    /// Calls to `get_tile`
    pub requests: u64,
    /// Calls answered by an existing record
    pub hits: u64,
    /// Fetches issued
    pub fetches: u64,
    /// Fetches that ended without an image
    pub failures: u64,
}

#[derive(Debug, Default)]
struct Counters {
    requests: AtomicU64,
    hits: AtomicU64,
    fetches: AtomicU64,
    failures: AtomicU64,
}

/// Active tile source: provider and template substitution values.
struct TileSource {
    provider: &'static ProviderConfig,
    token: String,
}

/// Keyed store of tile fetch results.
///
/// The cache is the only state shared between live rendering and export;
/// share it as `Arc<TileCache<L>>`.
pub struct TileCache<L: TileLoader> {
    loader: Arc<L>,
    source: RwLock<TileSource>,
    records: DashMap<TileKey, Arc<TileRecord>>,
    runtime: Handle,
    counters: Arc<Counters>,
}

impl<L: TileLoader> TileCache<L> {
    /// Creates an empty cache for the provider registered under `provider_key`.
    ///
    /// Fetches are spawned on `runtime`.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::UnknownProvider` for unregistered keys.
    pub fn new(provider_key: &str, loader: L, runtime: Handle) -> Result<Self, ProviderError> {
        let provider = provider_config(provider_key)?;
        Ok(Self::with_provider(provider, loader, runtime))
    }

    /// Creates an empty cache for an explicit provider definition.
    pub fn with_provider(provider: &'static ProviderConfig, loader: L, runtime: Handle) -> Self {
        Self {
            loader: Arc::new(loader),
            source: RwLock::new(TileSource {
                provider,
                token: String::new(),
            }),
            records: DashMap::new(),
            runtime,
            counters: Arc::new(Counters::default()),
        }
    }

    /// Returns the record for tile `(zoom, x, y)`, starting its fetch if needed.
    ///
    /// `x` wraps around the antimeridian and `y` is clamped to the map, so
    /// out-of-range indices resolve to the same record as their normalized
    /// form. Zoom levels above [`crate::coord::MAX_ZOOM`] are capped. The
    /// returned record may still be pending.
    pub fn get_tile(&self, zoom: u8, x: i64, y: i64) -> Arc<TileRecord> {
        self.counters.requests.fetch_add(1, Ordering::Relaxed);

        // Held across the insert so a concurrent provider change cannot
        // interleave between key construction and insertion.
        let source = self.source.read();
        let key = TileKey::normalized(source.provider.key, zoom, x, y);

        match self.records.entry(key) {
            Entry::Occupied(entry) => {
                self.counters.hits.fetch_add(1, Ordering::Relaxed);
                Arc::clone(entry.get())
            }
            Entry::Vacant(entry) => {
                let url = build_tile_url(source.provider, &source.token, key.zoom, key.x, key.y);
                let record = Arc::new(TileRecord::new(key, url));
                entry.insert(Arc::clone(&record));
                self.spawn_fetch(Arc::clone(&record));
                record
            }
        }
    }

    fn spawn_fetch(&self, record: Arc<TileRecord>) {
        let loader = Arc::clone(&self.loader);
        let counters = Arc::clone(&self.counters);
        counters.fetches.fetch_add(1, Ordering::Relaxed);

        self.runtime.spawn(async move {
            debug!(tile = %record.key(), url = record.url(), "Fetching tile");
            match loader.load(record.url()).await {
                Ok(image) => {
                    debug!(
                        tile = %record.key(),
                        width = image.width(),
                        height = image.height(),
                        "Tile ready"
                    );
                    record.resolve(Some(image));
                }
                Err(e) => {
                    counters.failures.fetch_add(1, Ordering::Relaxed);
                    warn!(tile = %record.key(), url = record.url(), error = %e, "Tile fetch failed");
                    record.resolve(None);
                }
            }
        });
    }

    /// Switches to another registered provider and clears the cache.
    ///
    /// On error the current provider and cached records are kept.
    pub fn set_provider(&self, key: &str) -> Result<(), ProviderError> {
        let provider = provider_config(key)?;
        let mut source = self.source.write();
        source.provider = provider;
        let dropped = self.records.len();
        self.records.clear();
        info!(provider = provider.key, dropped, "Tile provider changed, cache cleared");
        Ok(())
    }

    /// Replaces the `{token}` substitution value and clears the cache.
    pub fn set_api_token(&self, token: impl Into<String>) {
        let mut source = self.source.write();
        source.token = token.into();
        let dropped = self.records.len();
        self.records.clear();
        info!(dropped, "Access token changed, cache cleared");
    }

    /// The active provider.
    pub fn provider(&self) -> &'static ProviderConfig {
        self.source.read().provider
    }

    /// Tile edge length of the active provider.
    pub fn tile_size(&self) -> u32 {
        self.provider().tile_size
    }

    /// Projection matching the active provider's tile size.
    pub fn projection(&self) -> Projection {
        Projection::new(self.tile_size())
    }

    /// Number of cached records (pending or ready).
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Snapshot of the cache counters.
    pub fn stats(&self) -> TileCacheStats {
        TileCacheStats {
            requests: self.counters.requests.load(Ordering::Relaxed),
            hits: self.counters.hits.load(Ordering::Relaxed),
            fetches: self.counters.fetches.load(Ordering::Relaxed),
            failures: self.counters.failures.load(Ordering::Relaxed),
        }
    }
}
