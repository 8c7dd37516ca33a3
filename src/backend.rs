// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
//! The graphics backend seen by this crate.
//!
//! The backend is modeled on a global, unit-indexed binding API: a fixed number of texture
//! units, each of which holds at most one bound texture, with a single "active" unit that
//! binding and parameter calls apply to.  Everything the rest of the crate needs from the GPU
//! goes through the [`Backend`] trait.
//!
//! Two implementations ship with the crate:
//!
//! * [`RecordingBackend`], a headless backend that simulates unit state and records every call.
//!   It needs no GPU and is what the tests run against.
//! * `GlowBackend` (feature `backend_glow`), which drives a real OpenGL or OpenGL ES context.
//!
//! The backend is shared between the [`TextureManager`](crate::bindings::TextureManager) and the
//! textures it creates, since each texture deletes its own handle when dropped.  All of this
//! happens on the one thread that owns the graphics context, so sharing is `Rc<RefCell<_>>`.

mod enumerants;

use std::cell::RefCell;
use std::rc::Rc;

pub use enumerants::{DataType, FilterMode, Format, Target, WrapAxis, WrapMode};

pub use crate::imp::*;

/// A backend texture name.
///
/// Handles are minted by [`Backend::gen_textures`] and are only meaningful to the backend that
/// minted them.  Backends may reuse a handle after it has been deleted, so a handle is not an
/// identity; see [`TextureKey`](crate::bindings::TextureKey).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureHandle(pub u32);

/// A capability class of backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    /// Reduced-capability backends (OpenGL ES 2 class).  No separate R/G/B formats.
    Mobile,
    /// Full-capability backends (desktop OpenGL 3 class).
    Desktop,
}

/// What a backend can do, as far as textures are concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Capabilities {
    pub tier: Tier,
    /// The backend defines a dedicated luminance format.
    pub luminance: bool,
    /// The backend defines a dedicated luminance-alpha format.
    pub luminance_alpha: bool,
    /// The backend can accept BGRA-ordered source data.
    pub bgra: bool,
    pub texture_1d: bool,
    pub texture_3d: bool,
    /// Anisotropic filtering is available.
    pub anisotropy: bool,
}

impl Capabilities {
    /// An OpenGL ES 2 class backend.
    pub const fn mobile() -> Self {
        Capabilities {
            tier: Tier::Mobile,
            luminance: true,
            luminance_alpha: true,
            bgra: false,
            texture_1d: false,
            texture_3d: false,
            anisotropy: false,
        }
    }

    /// An OpenGL 3.2 core class backend.  Core profiles have no luminance formats.
    pub const fn desktop() -> Self {
        Capabilities {
            tier: Tier::Desktop,
            luminance: false,
            luminance_alpha: false,
            bgra: true,
            texture_1d: true,
            texture_3d: true,
            anisotropy: true,
        }
    }

    /// Whether textures can be stored in `format`.
    pub fn supports_storage(&self, format: Format) -> bool {
        match format {
            Format::Red | Format::Green | Format::Blue => self.tier == Tier::Desktop,
            Format::Luminance => self.luminance,
            Format::LuminanceAlpha => self.luminance_alpha,
            Format::Bgra => self.bgra,
            Format::Alpha | Format::Rg | Format::Rgb | Format::Rgba => true,
        }
    }

    /// Whether `target` can be used with this backend at all.
    pub fn supports_target(&self, target: Target) -> bool {
        match target {
            Target::Texture1D => self.texture_1d,
            Target::Texture2D => true,
            Target::Texture3D => self.texture_3d,
        }
    }
}

/// An error code read from the backend's error queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
#[error("backend error #{code:#06x}")]
pub struct BackendError {
    pub code: u32,
}

/// Texture-related entry points of a unit-indexed graphics API.
///
/// Implementations perform the call immediately.  They do not cache anything; avoiding
/// redundant calls is the job of [`TextureManager`](crate::bindings::TextureManager).
pub trait Backend {
    fn capabilities(&self) -> Capabilities;

    /// The number of combined texture image units.
    fn max_combined_texture_units(&self) -> usize;

    /// Mints `count` texture handles in one call.
    fn gen_textures(&mut self, count: usize) -> Vec<TextureHandle>;

    fn delete_textures(&mut self, handles: &[TextureHandle]);

    /// Makes `unit` the unit that subsequent bind and parameter calls apply to.
    fn active_texture(&mut self, unit: usize);

    /// Binds `handle` to `target` on the active unit.
    fn bind_texture(&mut self, target: Target, handle: TextureHandle);

    fn set_wrap(&mut self, target: Target, axis: WrapAxis, mode: WrapMode);

    fn set_min_filter(&mut self, target: Target, filter: FilterMode);

    fn set_mag_filter(&mut self, target: Target, filter: FilterMode);

    fn set_max_anisotropy(&mut self, target: Target, anisotropy: f32);

    /// Uploads level 0 of a 1D texture.  `pixels` of `None` allocates uninitialized storage.
    fn tex_image_1d(
        &mut self,
        internal_format: Format,
        width: u32,
        format: Format,
        data_type: DataType,
        pixels: Option<&[u8]>,
    );

    fn tex_image_2d(
        &mut self,
        internal_format: Format,
        width: u32,
        height: u32,
        format: Format,
        data_type: DataType,
        pixels: Option<&[u8]>,
    );

    fn tex_image_3d(
        &mut self,
        internal_format: Format,
        size: [u32; 3],
        format: Format,
        data_type: DataType,
        pixels: Option<&[u8]>,
    );

    fn generate_mipmap(&mut self, target: Target);

    /// Pops the oldest error from the backend's error queue.
    fn poll_error(&mut self) -> Option<BackendError>;
}

/// A backend shared between a manager and its textures.
pub type SharedBackend = Rc<RefCell<dyn Backend>>;

/// Wraps a backend for sharing.
pub fn share<B: Backend + 'static>(backend: B) -> SharedBackend {
    Rc::new(RefCell::new(backend))
}

/// When the backend's error queue is polled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ErrorChecking {
    /// Poll in builds with `debug_assertions`.
    #[default]
    DebugOnly,
    Always,
    Never,
}

impl ErrorChecking {
    fn enabled(self) -> bool {
        match self {
            ErrorChecking::DebugOnly => cfg!(debug_assertions),
            ErrorChecking::Always => true,
            ErrorChecking::Never => false,
        }
    }
}

/// Polls the backend's error queue.  An error is logged and escalated to a fatal error.
pub fn check_graphics_error(backend: &mut dyn Backend, checking: ErrorChecking) {
    if !checking.enabled() {
        return;
    }
    if let Some(error) = backend.poll_error() {
        logwise::error_sync!("graphics backend error #{code}", code = error.code);
        crate::error::FatalError::Backend(error).raise();
    }
}
