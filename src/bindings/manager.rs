// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
//! The texture manager.
//!
//! [`TextureManager`] is the only thing that changes unit bindings.  It allocates textures from a
//! [`HandlePool`], binds them to units through a [`BindingCache`] so that redundant binds never
//! reach the backend, and uploads pixel data through a [`Binding`].
//!
//! ```
//! use texture_units::backend::{share, RecordingBackend};
//! use texture_units::bindings::{Quality, TextureManager, TextureParameters};
//! use texture_units::pixel_formats::{ChannelLayout, ElementType, OwnedPixelBuffer};
//!
//! let backend = share(RecordingBackend::desktop());
//! let mut manager = TextureManager::new(backend);
//!
//! let pixels = OwnedPixelBuffer::zeroed(ChannelLayout::RGBA, ElementType::Byte, vec![16, 16]);
//! let texture = manager.allocate(TextureParameters::new(Quality::Linear), Some(&pixels));
//! assert_eq!(texture.size(), [16, 16, 1]);
//!
//! // Already bound to unit 0, so this costs nothing.
//! manager.bind_unit(0, &texture);
//! ```

use std::rc::Rc;

use crate::backend::{
    check_graphics_error, DataType, ErrorChecking, Format, SharedBackend, Tier, WrapAxis,
};
use crate::bindings::binding_cache::BindingCache;
use crate::bindings::handle_pool::{HandlePool, DEFAULT_BATCH_SIZE};
use crate::bindings::parameters::TextureParameters;
use crate::bindings::texture::Texture;
use crate::error::FatalError;
use crate::pixel_formats::translate::{data_type_for, format_for};
use crate::pixel_formats::PixelBuffer;

/// Configuration for a [`TextureManager`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ManagerConfig {
    /// Handles minted per pool refill.
    pub handle_batch_size: usize,
    /// When the backend's error queue is polled.
    pub error_checking: ErrorChecking,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        ManagerConfig {
            handle_batch_size: DEFAULT_BATCH_SIZE,
            error_checking: ErrorChecking::default(),
        }
    }
}

/// A texture to bind to a specific unit.  See [`TextureManager::bind_all`].
#[derive(Debug, Clone, Copy)]
pub struct TextureBinding<'a> {
    pub unit: usize,
    pub texture: &'a Texture,
}

impl<'a> TextureBinding<'a> {
    pub fn new(unit: usize, texture: &'a Texture) -> Self {
        TextureBinding { unit, texture }
    }
}

pub struct TextureManager {
    backend: SharedBackend,
    config: ManagerConfig,
    unit_count: usize,
    handles: HandlePool,
    cache: BindingCache,
    /// The unit the backend's bind and upload calls currently apply to, if known.
    active_unit: Option<usize>,
}

impl std::fmt::Debug for TextureManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextureManager")
            .field("config", &self.config)
            .field("unit_count", &self.unit_count)
            .field("handles", &self.handles)
            .field("cache", &self.cache)
            .field("active_unit", &self.active_unit)
            .finish_non_exhaustive()
    }
}

impl TextureManager {
    pub fn new(backend: SharedBackend) -> Self {
        Self::with_config(backend, ManagerConfig::default())
    }

    /// Creates a manager.  The backend's unit count is probed here, once.
    pub fn with_config(backend: SharedBackend, config: ManagerConfig) -> Self {
        let unit_count = backend.borrow().max_combined_texture_units();
        logwise::info_sync!(
            "Backend has {count} combined texture units",
            count = unit_count
        );
        TextureManager {
            backend,
            config,
            unit_count,
            handles: HandlePool::new(config.handle_batch_size),
            cache: BindingCache::new(unit_count),
            active_unit: None,
        }
    }

    pub fn unit_count(&self) -> usize {
        self.unit_count
    }

    pub fn config(&self) -> ManagerConfig {
        self.config
    }

    pub fn backend(&self) -> &SharedBackend {
        &self.backend
    }

    /// What the manager believes each unit holds.
    pub fn cache(&self) -> &BindingCache {
        &self.cache
    }

    /// Handles minted and not yet given to a texture.
    pub fn pooled_handles(&self) -> usize {
        self.handles.len()
    }

    /// Creates a texture from a pooled handle.
    ///
    /// With `pixels`, the texture is bound to unit 0 and the pixels uploaded.  Without, no binding
    /// or upload happens and the texture has no storage yet.
    pub fn allocate(
        &mut self,
        parameters: TextureParameters,
        pixels: Option<&dyn PixelBuffer>,
    ) -> Rc<Texture> {
        let handle = {
            let mut backend = self.backend.borrow_mut();
            let handle = self.handles.take(&mut *backend);
            check_graphics_error(&mut *backend, self.config.error_checking);
            handle
        };
        let Some(handle) = handle else {
            FatalError::OutOfHandles.raise()
        };
        let texture = Rc::new(Texture::from_handle(
            self.backend.clone(),
            handle,
            parameters,
            self.config.error_checking,
        ));
        if let Some(pixels) = pixels {
            self.bind(&texture).update(pixels);
        }
        texture
    }

    /// Binds `texture` to `unit`.
    ///
    /// If the cache says `unit` already holds `texture`, nothing reaches the backend.  Otherwise the
    /// unit is activated, the texture bound, and its sampling parameters applied.
    ///
    /// # Fatal errors
    ///
    /// [`FatalError::UnitOutOfRange`] if `unit` is not below [`unit_count`](Self::unit_count).
    pub fn bind_unit(&mut self, unit: usize, texture: &Texture) {
        if unit >= self.unit_count {
            FatalError::UnitOutOfRange {
                unit,
                unit_count: self.unit_count,
            }
            .raise();
        }
        if self.cache.holds(unit, texture.key()) {
            return;
        }

        let parameters = texture.parameters();
        let target = parameters.target_or(Texture::DEFAULT_TARGET);
        logwise::trace_sync!(
            "bind texture {handle} to unit {unit} as {target}",
            handle = texture.handle().0,
            unit = unit,
            target = logwise::privacy::LogIt(&target)
        );

        let mut backend = self.backend.borrow_mut();
        let capabilities = backend.capabilities();
        backend.active_texture(unit);
        self.active_unit = Some(unit);
        backend.bind_texture(target, texture.handle());
        check_graphics_error(&mut *backend, self.config.error_checking);
        self.cache.set(unit, texture.key());

        if let Some(wrap) = parameters.wrap {
            backend.set_wrap(target, WrapAxis::S, wrap);
            backend.set_wrap(target, WrapAxis::T, wrap);
            if capabilities.tier == Tier::Desktop {
                backend.set_wrap(target, WrapAxis::R, wrap);
            }
        }
        backend.set_mag_filter(target, parameters.mag_filter());
        backend.set_min_filter(target, parameters.min_filter());
        if parameters.anisotropy != 1.0 && capabilities.anisotropy {
            backend.set_max_anisotropy(target, parameters.anisotropy);
        }
        check_graphics_error(&mut *backend, self.config.error_checking);
    }

    /// Binds `texture` to unit 0 and makes unit 0 active, for uploading.
    ///
    /// Uploads apply to the active unit, so unit 0 is activated even when it already holds
    /// `texture`.
    pub fn bind<'a>(&'a mut self, texture: &'a Texture) -> Binding<'a> {
        self.bind_unit(0, texture);
        self.activate(0);
        Binding {
            manager: self,
            texture,
        }
    }

    /// Makes `unit` the active unit unless it is known to be already.
    fn activate(&mut self, unit: usize) {
        if self.active_unit == Some(unit) {
            return;
        }
        let mut backend = self.backend.borrow_mut();
        backend.active_texture(unit);
        self.active_unit = Some(unit);
        check_graphics_error(&mut *backend, self.config.error_checking);
    }

    /// Binds each texture to its unit, in order.
    pub fn bind_all(&mut self, bindings: &[TextureBinding<'_>]) {
        for binding in bindings {
            self.bind_unit(binding.unit, binding.texture);
        }
    }

    /// Forgets what every unit holds, and which unit is active.
    ///
    /// Call this after anything other than this manager has touched unit bindings.  The next bind
    /// of each unit reaches the backend.
    pub fn invalidate(&mut self) {
        logwise::trace_sync!("invalidate binding cache");
        self.cache.invalidate();
        self.active_unit = None;
    }

    /// The unit the manager last activated.  `None` after [`invalidate`](Self::invalidate).
    pub fn active_unit(&self) -> Option<usize> {
        self.active_unit
    }
}

impl Drop for TextureManager {
    fn drop(&mut self) {
        match self.backend.try_borrow_mut() {
            Ok(mut backend) => self.handles.release_all(&mut *backend),
            Err(_) => {
                logwise::error_sync!(
                    "backend busy while dropping manager; leaking {count} handles",
                    count = self.handles.len()
                );
            }
        }
    }
}

/// A texture bound to unit 0, ready for uploads.
///
/// Holding a `Binding` borrows the manager, so nothing else can be bound until it is dropped.
#[derive(Debug)]
pub struct Binding<'a> {
    manager: &'a mut TextureManager,
    texture: &'a Texture,
}

impl Binding<'_> {
    pub fn texture(&self) -> &Texture {
        self.texture
    }

    /// Reallocates uninitialized storage of `size`, unless the texture is already that size.
    ///
    /// The storage keeps the format and data type of the previous upload.  `format` and
    /// `data_type` are only used when the texture has never been uploaded.
    pub fn resize(&mut self, size: [u32; 3], format: Format, data_type: DataType) {
        if self.texture.size() == size {
            return;
        }
        let layout = self.texture.layout();
        self.texture.upload(
            size,
            None,
            layout.format.unwrap_or(format),
            layout.data_type.unwrap_or(data_type),
        );
    }

    /// Uploads `pixels`, replacing the texture's storage.
    ///
    /// # Fatal errors
    ///
    /// [`FatalError::UntranslatableFormat`] if the backend has no format for the pixels' channel
    /// layout, [`FatalError::ShortPixelData`] if the buffer is smaller than its layout says, and
    /// [`FatalError::LayoutOverflow`] if the layout's size doesn't fit in memory at all.
    pub fn update(&mut self, pixels: &dyn PixelBuffer) {
        let layout = pixels.layout();
        let capabilities = self.manager.backend.borrow().capabilities();
        let Some(format) = format_for(layout.channels, &capabilities) else {
            FatalError::UntranslatableFormat.raise()
        };
        let data_type = data_type_for(layout.element);
        let data = pixels.data();
        let Some(expected) = layout.byte_len() else {
            FatalError::LayoutOverflow(layout.extent()).raise()
        };
        if data.len() < expected {
            FatalError::ShortPixelData {
                expected,
                actual: data.len(),
            }
            .raise();
        }
        self.texture
            .upload(layout.extent(), Some(data), format, data_type);
    }

    /// Replaces the texture's parameters, then uploads `pixels`.
    ///
    /// Mipmap and format parameters apply to this upload.  A new target rebinds the texture on
    /// unit 0 under that target first.  Otherwise sampling parameters reach the backend the next
    /// time the texture is bound to a unit it isn't already on.
    pub fn update_with(&mut self, parameters: TextureParameters, pixels: &dyn PixelBuffer) {
        let previous = self.texture.target();
        self.texture.set_parameters(parameters);
        if self.texture.target() != previous {
            self.manager.cache.forget(0);
            self.manager.bind_unit(0, self.texture);
        }
        self.update(pixels);
    }
}
