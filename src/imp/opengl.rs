// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
//! OpenGL / OpenGL ES backend over [glow](https://docs.rs/glow).
//!
//! The context must already be current on the calling thread.  Capabilities are probed once, at
//! construction, from the context's version and extension list.

use std::num::NonZeroU32;

use glow::HasContext;

use crate::backend::{
    Backend, BackendError, Capabilities, DataType, FilterMode, Format, Target, TextureHandle,
    Tier, WrapAxis, WrapMode,
};

// Not every profile's registry carries these, so they are spelled out.
const GREEN: u32 = 0x1904;
const BLUE: u32 = 0x1905;
const LUMINANCE: u32 = 0x1909;
const LUMINANCE_ALPHA: u32 = 0x190A;
const BGRA: u32 = 0x80E1;
const TEXTURE_MAX_ANISOTROPY_EXT: u32 = 0x84FE;

pub struct GlowBackend {
    gl: glow::Context,
    capabilities: Capabilities,
    unit_count: usize,
}

impl std::fmt::Debug for GlowBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlowBackend")
            .field("capabilities", &self.capabilities)
            .field("unit_count", &self.unit_count)
            .finish()
    }
}

impl GlowBackend {
    /// Wraps a current context.
    ///
    /// # Safety
    ///
    /// `gl` must be current on this thread for as long as the backend is used.
    pub unsafe fn new(gl: glow::Context) -> Self {
        let version = gl.version();
        let extensions = gl.supported_extensions();
        let has = |name: &str| extensions.contains(name);
        let capabilities = if version.is_embedded {
            Capabilities {
                tier: Tier::Mobile,
                luminance: true,
                luminance_alpha: true,
                bgra: has("GL_EXT_texture_format_BGRA8888") || has("GL_APPLE_texture_format_BGRA8888"),
                texture_1d: false,
                texture_3d: version.major >= 3,
                anisotropy: has("GL_EXT_texture_filter_anisotropic"),
            }
        } else {
            Capabilities {
                anisotropy: has("GL_EXT_texture_filter_anisotropic")
                    || has("GL_ARB_texture_filter_anisotropic"),
                ..Capabilities::desktop()
            }
        };
        let unit_count = unsafe { gl.get_parameter_i32(glow::MAX_COMBINED_TEXTURE_IMAGE_UNITS) };
        GlowBackend {
            gl,
            capabilities,
            unit_count: unit_count.max(0) as usize,
        }
    }

    pub fn context(&self) -> &glow::Context {
        &self.gl
    }

    fn texture(handle: TextureHandle) -> Option<glow::NativeTexture> {
        NonZeroU32::new(handle.0).map(glow::NativeTexture)
    }
}

fn target_enum(target: Target) -> u32 {
    match target {
        Target::Texture1D => glow::TEXTURE_1D,
        Target::Texture2D => glow::TEXTURE_2D,
        Target::Texture3D => glow::TEXTURE_3D,
    }
}

fn format_enum(format: Format) -> u32 {
    match format {
        Format::Red => glow::RED,
        Format::Green => GREEN,
        Format::Blue => BLUE,
        Format::Alpha => glow::ALPHA,
        Format::Luminance => LUMINANCE,
        Format::LuminanceAlpha => LUMINANCE_ALPHA,
        Format::Rg => glow::RG,
        Format::Rgb => glow::RGB,
        Format::Rgba => glow::RGBA,
        Format::Bgra => BGRA,
    }
}

fn data_type_enum(data_type: DataType) -> u32 {
    match data_type {
        DataType::Byte => glow::BYTE,
        DataType::UnsignedByte => glow::UNSIGNED_BYTE,
        DataType::Short => glow::SHORT,
        DataType::UnsignedShort => glow::UNSIGNED_SHORT,
        DataType::Int => glow::INT,
        DataType::UnsignedInt => glow::UNSIGNED_INT,
        DataType::Float => glow::FLOAT,
    }
}

fn filter_enum(filter: FilterMode) -> u32 {
    match filter {
        FilterMode::Nearest => glow::NEAREST,
        FilterMode::Linear => glow::LINEAR,
        FilterMode::NearestMipmapNearest => glow::NEAREST_MIPMAP_NEAREST,
        FilterMode::LinearMipmapNearest => glow::LINEAR_MIPMAP_NEAREST,
        FilterMode::NearestMipmapLinear => glow::NEAREST_MIPMAP_LINEAR,
        FilterMode::LinearMipmapLinear => glow::LINEAR_MIPMAP_LINEAR,
    }
}

fn wrap_enum(mode: WrapMode) -> u32 {
    match mode {
        WrapMode::Repeat => glow::REPEAT,
        WrapMode::ClampToEdge => glow::CLAMP_TO_EDGE,
        WrapMode::MirroredRepeat => glow::MIRRORED_REPEAT,
    }
}

impl Backend for GlowBackend {
    fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    fn max_combined_texture_units(&self) -> usize {
        self.unit_count
    }

    fn gen_textures(&mut self, count: usize) -> Vec<TextureHandle> {
        let mut handles = Vec::with_capacity(count);
        for _ in 0..count {
            match unsafe { self.gl.create_texture() } {
                Ok(texture) => handles.push(TextureHandle(texture.0.get())),
                Err(err) => {
                    logwise::error_sync!(
                        "create_texture failed: {err}",
                        err = logwise::privacy::LogIt(&err)
                    );
                }
            }
        }
        handles
    }

    fn delete_textures(&mut self, handles: &[TextureHandle]) {
        for texture in handles.iter().copied().filter_map(Self::texture) {
            unsafe { self.gl.delete_texture(texture) };
        }
    }

    fn active_texture(&mut self, unit: usize) {
        unsafe { self.gl.active_texture(glow::TEXTURE0 + unit as u32) };
    }

    fn bind_texture(&mut self, target: Target, handle: TextureHandle) {
        unsafe {
            self.gl
                .bind_texture(target_enum(target), Self::texture(handle))
        };
    }

    fn set_wrap(&mut self, target: Target, axis: WrapAxis, mode: WrapMode) {
        let parameter = match axis {
            WrapAxis::S => glow::TEXTURE_WRAP_S,
            WrapAxis::T => glow::TEXTURE_WRAP_T,
            WrapAxis::R => glow::TEXTURE_WRAP_R,
        };
        unsafe {
            self.gl
                .tex_parameter_i32(target_enum(target), parameter, wrap_enum(mode) as i32)
        };
    }

    fn set_min_filter(&mut self, target: Target, filter: FilterMode) {
        unsafe {
            self.gl.tex_parameter_i32(
                target_enum(target),
                glow::TEXTURE_MIN_FILTER,
                filter_enum(filter) as i32,
            )
        };
    }

    fn set_mag_filter(&mut self, target: Target, filter: FilterMode) {
        unsafe {
            self.gl.tex_parameter_i32(
                target_enum(target),
                glow::TEXTURE_MAG_FILTER,
                filter_enum(filter) as i32,
            )
        };
    }

    fn set_max_anisotropy(&mut self, target: Target, anisotropy: f32) {
        unsafe {
            self.gl
                .tex_parameter_f32(target_enum(target), TEXTURE_MAX_ANISOTROPY_EXT, anisotropy)
        };
    }

    fn tex_image_1d(
        &mut self,
        internal_format: Format,
        width: u32,
        format: Format,
        data_type: DataType,
        pixels: Option<&[u8]>,
    ) {
        unsafe {
            self.gl.tex_image_1d(
                glow::TEXTURE_1D,
                0,
                format_enum(internal_format) as i32,
                width as i32,
                0,
                format_enum(format),
                data_type_enum(data_type),
                pixels,
            )
        };
    }

    fn tex_image_2d(
        &mut self,
        internal_format: Format,
        width: u32,
        height: u32,
        format: Format,
        data_type: DataType,
        pixels: Option<&[u8]>,
    ) {
        unsafe {
            self.gl.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                format_enum(internal_format) as i32,
                width as i32,
                height as i32,
                0,
                format_enum(format),
                data_type_enum(data_type),
                pixels,
            )
        };
    }

    fn tex_image_3d(
        &mut self,
        internal_format: Format,
        size: [u32; 3],
        format: Format,
        data_type: DataType,
        pixels: Option<&[u8]>,
    ) {
        unsafe {
            self.gl.tex_image_3d(
                glow::TEXTURE_3D,
                0,
                format_enum(internal_format) as i32,
                size[0] as i32,
                size[1] as i32,
                size[2] as i32,
                0,
                format_enum(format),
                data_type_enum(data_type),
                pixels,
            )
        };
    }

    fn generate_mipmap(&mut self, target: Target) {
        unsafe { self.gl.generate_mipmap(target_enum(target)) };
    }

    fn poll_error(&mut self) -> Option<BackendError> {
        match unsafe { self.gl.get_error() } {
            glow::NO_ERROR => None,
            code => Some(BackendError { code }),
        }
    }
}
