/// Display previews of the selected image
///
/// A preview is a decoded-on-demand iced image handle plus the image's
/// natural size. Each one is registered in a `PreviewRegistry` while alive and
/// unregistered exactly once when its owning `PreviewHandle` is dropped, so
/// replacing the selection, leaving the results view, or shutting down all
/// release it without any explicit bookkeeping by the caller.

use bytes::Bytes;
use iced::widget::image;
use iced::Size;
use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, warn};

#[derive(Debug, Default)]
struct RegistryInner {
    next_id: u64,
    live: HashSet<u64>,
    released: u64,
}

/// Tracks which previews are currently alive
#[derive(Debug, Clone, Default)]
pub struct PreviewRegistry {
    inner: Arc<Mutex<RegistryInner>>,
}

impl PreviewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, RegistryInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a new preview for the given encoded image bytes.
    ///
    /// Passing `Bytes` shares the buffer instead of copying it.
    pub fn acquire(&self, bytes: impl Into<Bytes>, natural_size: Size<u32>) -> PreviewHandle {
        let id = {
            let mut inner = self.lock();
            inner.next_id += 1;
            let id = inner.next_id;
            inner.live.insert(id);
            id
        };

        debug!(preview = id, width = natural_size.width, height = natural_size.height, "Preview acquired");

        PreviewHandle {
            id,
            image: image::Handle::from_bytes(bytes.into()),
            natural_size,
            registry: self.clone(),
        }
    }

    /// Number of previews acquired and not yet released
    pub fn live_count(&self) -> usize {
        self.lock().live.len()
    }

    /// Total number of releases performed
    pub fn released_count(&self) -> u64 {
        self.lock().released
    }

    fn release(&self, id: u64) {
        let mut inner = self.lock();
        if inner.live.remove(&id) {
            inner.released += 1;
            debug!(preview = id, "Preview released");
        } else {
            warn!(preview = id, "Preview released twice");
        }
    }
}

/// Exclusive owner of one registered preview.
///
/// Not `Clone`: ownership moves from the asset selector into the transfer
/// payload and ends with the results view.
#[derive(Debug)]
pub struct PreviewHandle {
    id: u64,
    image: image::Handle,
    natural_size: Size<u32>,
    registry: PreviewRegistry,
}

impl PreviewHandle {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Handle for the iced image widget
    pub fn image(&self) -> &image::Handle {
        &self.image
    }

    /// Pixel size of the underlying image
    pub fn natural_size(&self) -> Size<u32> {
        self.natural_size
    }
}

impl Drop for PreviewHandle {
    fn drop(&mut self) {
        self.registry.release(self.id);
    }
}
