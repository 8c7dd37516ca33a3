// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
//! Local mirror of which texture occupies each unit.

use crate::bindings::texture::TextureKey;

/// One slot per texture unit.  `None` means unknown, which never matches a texture, so the next
/// bind of that unit always reaches the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingCache {
    slots: Vec<Option<TextureKey>>,
}

impl BindingCache {
    pub fn new(unit_count: usize) -> Self {
        BindingCache {
            slots: vec![None; unit_count],
        }
    }

    pub fn unit_count(&self) -> usize {
        self.slots.len()
    }

    /// Whether `unit` is known to hold `key`.
    pub fn holds(&self, unit: usize, key: TextureKey) -> bool {
        self.slots.get(unit).copied().flatten() == Some(key)
    }

    pub fn get(&self, unit: usize) -> Option<TextureKey> {
        self.slots.get(unit).copied().flatten()
    }

    /// Records that `unit` now holds `key`.
    ///
    /// # Panics
    ///
    /// If `unit` is out of range.
    pub fn set(&mut self, unit: usize, key: TextureKey) {
        self.slots[unit] = Some(key);
    }

    /// Forgets what `unit` holds.  Out-of-range units are ignored.
    pub fn forget(&mut self, unit: usize) {
        if let Some(slot) = self.slots.get_mut(unit) {
            *slot = None;
        }
    }

    /// Forgets everything.
    pub fn invalidate(&mut self) {
        self.slots.fill(None);
    }
}
