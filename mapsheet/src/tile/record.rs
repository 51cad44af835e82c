//! Single-resolution tile records.
//!
//! A [`TileRecord`] starts `Pending` and transitions exactly once to
//! `Ready` or `Failed` when its fetch completes. The state lives in a
//! `tokio::sync::watch` channel: the sender is owned by the record, and each
//! waiter holds a receiver only while it is suspended, so `waiter_count()`
//! is the number of callers currently blocked on the record.

use std::sync::Arc;

use image::RgbaImage;
use tokio::sync::watch;
use tracing::warn;

use super::key::TileKey;

/// Fetch state of a tile.
#[derive(Debug, Clone)]
pub enum TileState {
    /// Fetch in flight
    Pending,
    /// Fetched and decoded
    Ready(Arc<RgbaImage>),
    /// Fetch or decode failed; permanently absent for this session
    Failed,
}

impl TileState {
    /// Whether the fetch has not completed yet.
    pub fn is_pending(&self) -> bool {
        matches!(self, TileState::Pending)
    }
}

/// A cached tile and its fetch state.
///
/// Records are created by [`crate::tile::TileCache`] and shared as
/// `Arc<TileRecord>`; consumers only read them.
#[derive(Debug)]
pub struct TileRecord {
    key: TileKey,
    url: String,
    state: watch::Sender<TileState>,
}

impl TileRecord {
    pub(crate) fn new(key: TileKey, url: String) -> Self {
        let (state, _) = watch::channel(TileState::Pending);
        Self { key, url, state }
    }

    /// The normalized key of this tile.
    pub fn key(&self) -> TileKey {
        self.key
    }

    /// The URL the tile was requested from.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Whether the fetch has completed, successfully or not.
    pub fn is_ready(&self) -> bool {
        !self.state.borrow().is_pending()
    }

    /// Whether the fetch completed without an image.
    pub fn is_failed(&self) -> bool {
        matches!(*self.state.borrow(), TileState::Failed)
    }

    /// The decoded image, if the tile is ready and loaded.
    pub fn image(&self) -> Option<Arc<RgbaImage>> {
        match &*self.state.borrow() {
            TileState::Ready(image) => Some(Arc::clone(image)),
            _ => None,
        }
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> TileState {
        self.state.borrow().clone()
    }

    /// Number of callers currently suspended in [`TileRecord::wait`].
    pub fn waiter_count(&self) -> usize {
        self.state.receiver_count()
    }

    /// Suspends until the record is ready.
    ///
    /// Returns immediately, without registering a waiter, when the record
    /// is already ready.
    pub async fn wait(&self) {
        if self.is_ready() {
            return;
        }
        let mut rx = self.state.subscribe();
        // wait_for checks the current value before sleeping, so a transition
        // between the check above and subscribe() is not lost.
        let _ = rx.wait_for(|state| !state.is_pending()).await;
    }

    /// Publishes the fetch outcome. Only the first call has any effect.
    ///
    /// Returns `true` when this call performed the transition.
    pub(crate) fn resolve(&self, image: Option<RgbaImage>) -> bool {
        let mut next = Some(match image {
            Some(image) => TileState::Ready(Arc::new(image)),
            None => TileState::Failed,
        });
        let resolved = self.state.send_if_modified(|state| {
            if state.is_pending() {
                if let Some(next) = next.take() {
                    *state = next;
                }
                true
            } else {
                false
            }
        });
        if !resolved {
            warn!(tile = %self.key, "Ignoring second resolution of tile record");
        }
        resolved
    }
}

/// Suspends until `record` is ready. See [`TileRecord::wait`].
pub async fn wait_for_tile(record: &TileRecord) {
    record.wait().await
}
