// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
//! A texture and its upload protocol.

use std::cell::{Cell, Ref, RefCell};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::backend::{
    check_graphics_error, DataType, ErrorChecking, Format, SharedBackend, Target, TextureHandle,
};
use crate::bindings::parameters::TextureParameters;
use crate::error::FatalError;

/// Identity of a texture.
///
/// Keys are never reused, so unlike a [`TextureHandle`] a key can't alias a later texture
/// once the first one has been dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureKey(pub(crate) u64);

impl TextureKey {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        TextureKey(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// What the backend holds for a texture after its most recent successful upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UploadedLayout {
    pub size: [u32; 3],
    /// `None` until the first upload.
    pub format: Option<Format>,
    pub data_type: Option<DataType>,
}

/// One backend texture.
///
/// The texture owns its handle and deletes it when dropped.  It is usually shared as
/// `Rc<Texture>`; identity for binding purposes is the [`TextureKey`], not the `Rc`.
///
/// Uploads go to whichever unit the texture is bound to, so callers must bind it first.
/// [`TextureManager::bind`](crate::bindings::TextureManager::bind) does that and hands back a
/// [`Binding`](crate::bindings::Binding) to upload through.
pub struct Texture {
    key: TextureKey,
    handle: TextureHandle,
    backend: SharedBackend,
    error_checking: ErrorChecking,
    parameters: RefCell<TextureParameters>,
    layout: Cell<UploadedLayout>,
}

impl std::fmt::Debug for Texture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Texture")
            .field("key", &self.key)
            .field("handle", &self.handle)
            .field("parameters", &self.parameters.borrow())
            .field("layout", &self.layout.get())
            .finish()
    }
}

impl Texture {
    /// The dimensionality used when the parameters don't name one.
    pub const DEFAULT_TARGET: Target = Target::Texture2D;

    /// Creates a texture with a handle of its own, outside any pool.
    pub fn new(backend: &SharedBackend, parameters: TextureParameters) -> Self {
        let handle = {
            let mut backend = backend.borrow_mut();
            let handle = backend.gen_textures(1).pop();
            check_graphics_error(&mut *backend, ErrorChecking::default());
            handle
        };
        let Some(handle) = handle else {
            FatalError::OutOfHandles.raise()
        };
        Texture::from_handle(backend.clone(), handle, parameters, ErrorChecking::default())
    }

    /// Wraps a handle that has already been minted.  No backend call is made.
    pub(crate) fn from_handle(
        backend: SharedBackend,
        handle: TextureHandle,
        parameters: TextureParameters,
        error_checking: ErrorChecking,
    ) -> Self {
        Texture {
            key: TextureKey::next(),
            handle,
            backend,
            error_checking,
            parameters: RefCell::new(parameters),
            layout: Cell::new(UploadedLayout::default()),
        }
    }

    pub fn key(&self) -> TextureKey {
        self.key
    }

    pub fn handle(&self) -> TextureHandle {
        self.handle
    }

    pub fn target(&self) -> Target {
        self.parameters.borrow().target_or(Self::DEFAULT_TARGET)
    }

    pub fn parameters(&self) -> Ref<'_, TextureParameters> {
        self.parameters.borrow()
    }

    /// Replaces the parameters wholesale.
    ///
    /// Sampling state reaches the backend the next time the texture is bound to a unit.
    pub fn set_parameters(&self, parameters: TextureParameters) {
        *self.parameters.borrow_mut() = parameters;
    }

    pub fn layout(&self) -> UploadedLayout {
        self.layout.get()
    }

    pub fn size(&self) -> [u32; 3] {
        self.layout.get().size
    }

    pub fn format(&self) -> Option<Format> {
        self.layout.get().format
    }

    pub fn data_type(&self) -> Option<DataType> {
        self.layout.get().data_type
    }

    /// Uploads level 0, replacing the texture's storage.
    ///
    /// `pixels` of `None` allocates storage of `size` without initializing it.  Mipmaps are
    /// generated afterwards when the parameters ask for them.
    ///
    /// # Fatal errors
    ///
    /// Raises [`FatalError::InvalidTarget`] if the backend has no such target, and
    /// [`FatalError::IllegalInternalFormat`] if the resolved storage format is unavailable.
    /// In both cases the cached layout is left as it was.
    pub fn upload(
        &self,
        size: [u32; 3],
        pixels: Option<&[u8]>,
        format: Format,
        data_type: DataType,
    ) {
        let parameters = self.parameters.borrow();
        let target = parameters.target_or(Self::DEFAULT_TARGET);
        let internal_format = parameters.internal_format_or(format);

        let mut backend = self.backend.borrow_mut();
        let capabilities = backend.capabilities();
        if !capabilities.supports_target(target) {
            FatalError::InvalidTarget(target).raise();
        }
        if !capabilities.supports_storage(internal_format) {
            FatalError::IllegalInternalFormat(internal_format).raise();
        }

        logwise::trace_sync!(
            "upload {target} {w}x{h}x{d} format {format} stored as {internal_format}",
            target = logwise::privacy::LogIt(&target),
            w = size[0],
            h = size[1],
            d = size[2],
            format = logwise::privacy::LogIt(&format),
            internal_format = logwise::privacy::LogIt(&internal_format)
        );

        match target {
            Target::Texture1D => {
                backend.tex_image_1d(internal_format, size[0], format, data_type, pixels)
            }
            Target::Texture2D => {
                backend.tex_image_2d(internal_format, size[0], size[1], format, data_type, pixels)
            }
            Target::Texture3D => {
                backend.tex_image_3d(internal_format, size, format, data_type, pixels)
            }
        }
        check_graphics_error(&mut *backend, self.error_checking);

        self.layout.set(UploadedLayout {
            size,
            format: Some(format),
            data_type: Some(data_type),
        });

        if parameters.generate_mipmaps {
            backend.generate_mipmap(target);
            check_graphics_error(&mut *backend, self.error_checking);
        }
    }
}

impl Drop for Texture {
    fn drop(&mut self) {
        match self.backend.try_borrow_mut() {
            Ok(mut backend) => backend.delete_textures(&[self.handle]),
            Err(_) => {
                logwise::error_sync!(
                    "backend busy while dropping texture; leaking handle {handle}",
                    handle = self.handle.0
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{share, Backend, Call, RecordingBackend, INVALID_VALUE};
    use crate::bindings::parameters::Quality;

    fn bound_texture(backend: &SharedBackend, parameters: TextureParameters) -> Texture {
        let texture = Texture::new(backend, parameters);
        let mut b = backend.borrow_mut();
        b.active_texture(0);
        b.bind_texture(texture.target(), texture.handle());
        drop(b);
        texture
    }

    fn fatal_of(result: std::thread::Result<()>) -> FatalError {
        let payload = result.unwrap_err();
        payload.downcast_ref::<FatalError>().unwrap().clone()
    }

    #[test]
    fn upload_updates_layout_and_generates_mipmaps() {
        let backend = RecordingBackend::desktop();
        let recording = backend.recording();
        let backend = share(backend);
        let texture = bound_texture(&backend, TextureParameters::new(Quality::Mipmap));
        assert_eq!(texture.layout(), UploadedLayout::default());
        recording.clear();

        texture.upload([2, 2, 1], Some(&[0; 16]), Format::Rgba, DataType::UnsignedByte);

        assert_eq!(
            recording.calls(),
            vec![
                Call::TexImage {
                    target: Target::Texture2D,
                    internal_format: Format::Rgba,
                    size: [2, 2, 1],
                    format: Format::Rgba,
                    data_type: DataType::UnsignedByte,
                    initialized: true,
                },
                Call::GenerateMipmap(Target::Texture2D),
            ]
        );
        assert_eq!(texture.size(), [2, 2, 1]);
        assert_eq!(texture.format(), Some(Format::Rgba));
        assert_eq!(texture.data_type(), Some(DataType::UnsignedByte));
        assert_eq!(recording.storage(texture.handle()), Some([2, 2, 1]));
    }

    #[test]
    fn upload_without_mipmaps_and_with_internal_format() {
        let backend = RecordingBackend::desktop();
        let recording = backend.recording();
        let backend = share(backend);
        let parameters = TextureParameters {
            generate_mipmaps: false,
            internal_format: Some(Format::Rgba),
            ..TextureParameters::new(Quality::Linear)
        };
        let texture = bound_texture(&backend, parameters);
        recording.clear();

        texture.upload([8, 8, 1], None, Format::Rgb, DataType::UnsignedByte);

        assert_eq!(recording.count(|c| matches!(c, Call::GenerateMipmap(_))), 0);
        assert!(matches!(
            recording.uploads()[..],
            [Call::TexImage {
                internal_format: Format::Rgba,
                format: Format::Rgb,
                initialized: false,
                ..
            }]
        ));
    }

    #[test]
    fn three_dimensional_upload_uses_every_extent() {
        let backend = RecordingBackend::desktop();
        let recording = backend.recording();
        let backend = share(backend);
        let parameters = TextureParameters {
            target: Some(Target::Texture3D),
            generate_mipmaps: false,
            ..Default::default()
        };
        let texture = bound_texture(&backend, parameters);
        texture.upload([2, 3, 4], None, Format::Alpha, DataType::Float);
        assert_eq!(recording.storage(texture.handle()), Some([2, 3, 4]));
    }

    #[test]
    fn unsupported_target_is_fatal_and_keeps_layout() {
        let backend = share(RecordingBackend::mobile());
        let parameters = TextureParameters {
            target: Some(Target::Texture1D),
            ..Default::default()
        };
        let texture = Texture::new(&backend, parameters);
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            texture.upload([4, 1, 1], None, Format::Alpha, DataType::UnsignedByte)
        }));
        assert_eq!(fatal_of(result), FatalError::InvalidTarget(Target::Texture1D));
        assert_eq!(texture.layout(), UploadedLayout::default());
    }

    #[test]
    fn mobile_rejects_red_storage() {
        let backend = share(RecordingBackend::mobile());
        let texture = bound_texture(&backend, TextureParameters::default());
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            texture.upload([1, 1, 1], None, Format::Red, DataType::UnsignedByte)
        }));
        assert_eq!(
            fatal_of(result),
            FatalError::IllegalInternalFormat(Format::Red)
        );
    }

    #[test]
    fn backend_error_is_fatal_and_keeps_layout() {
        let backend = share(RecordingBackend::desktop());
        let handle = backend.borrow_mut().gen_textures(1)[0];
        let texture = Texture::from_handle(
            backend.clone(),
            handle,
            TextureParameters::default(),
            ErrorChecking::Always,
        );
        backend.borrow_mut().bind_texture(Target::Texture2D, handle);
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            // too little data for 2x2 RGBA
            texture.upload([2, 2, 1], Some(&[0; 4]), Format::Rgba, DataType::UnsignedByte)
        }));
        assert!(matches!(
            fatal_of(result),
            FatalError::Backend(crate::backend::BackendError { code: INVALID_VALUE })
        ));
        assert_eq!(texture.layout(), UploadedLayout::default());
    }

    #[test]
    fn drop_deletes_handle() {
        let backend = RecordingBackend::desktop();
        let recording = backend.recording();
        let backend = share(backend);
        let texture = Texture::new(&backend, TextureParameters::default());
        let handle = texture.handle();
        assert!(recording.is_live(handle));
        drop(texture);
        assert!(!recording.is_live(handle));
    }

    #[test]
    fn keys_are_unique() {
        let backend = share(RecordingBackend::desktop());
        let a = Texture::new(&backend, TextureParameters::default());
        let b = Texture::new(&backend, TextureParameters::default());
        assert_ne!(a.key(), b.key());
    }
}
