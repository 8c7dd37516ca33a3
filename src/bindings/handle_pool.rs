// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
//! Batch allocation of texture handles.

use crate::backend::{Backend, TextureHandle};

/// Handles refilled per batch when no size is configured.
pub const DEFAULT_BATCH_SIZE: usize = 64;

/// A free list of handles, refilled a batch at a time with one backend call.
///
/// Handles leave the pool for good: a texture deletes its own handle when dropped, so the pool
/// only ever shrinks between refills.
#[derive(Debug)]
pub struct HandlePool {
    free: Vec<TextureHandle>,
    batch_size: usize,
}

impl HandlePool {
    pub fn new(batch_size: usize) -> Self {
        HandlePool {
            free: Vec::with_capacity(batch_size),
            batch_size: batch_size.max(1),
        }
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Handles minted but not yet handed out.
    pub fn len(&self) -> usize {
        self.free.len()
    }

    pub fn is_empty(&self) -> bool {
        self.free.is_empty()
    }

    /// Takes one handle, refilling the pool first if it is empty.
    ///
    /// Returns `None` only when the backend could not mint any handles.
    pub fn take(&mut self, backend: &mut dyn Backend) -> Option<TextureHandle> {
        if self.free.is_empty() {
            logwise::info_sync!(
                "Allocating {count} texture handles",
                count = self.batch_size
            );
            self.free = backend.gen_textures(self.batch_size);
        }
        self.free.pop()
    }

    /// Deletes every pooled handle.
    pub fn release_all(&mut self, backend: &mut dyn Backend) {
        logwise::info_sync!(
            "Freeing {count} unused texture handles",
            count = self.free.len()
        );
        if !self.free.is_empty() {
            backend.delete_textures(&self.free);
            self.free.clear();
        }
    }
}

impl Default for HandlePool {
    fn default() -> Self {
        HandlePool::new(DEFAULT_BATCH_SIZE)
    }
}
