// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
//! Sampling, wrap and mipmap policy for a texture.
//!
//! Fields that are `None` are resolved when read, not when the parameters are built, so
//! clearing or setting a field later always takes effect.
//!
//! ```
//! use texture_units::backend::FilterMode;
//! use texture_units::bindings::{Quality, TextureParameters};
//!
//! let mut parameters = TextureParameters::from(Quality::Filtered);
//! assert_eq!(parameters.anisotropy, 4.0);
//! assert_eq!(parameters.min_filter(), FilterMode::LinearMipmapLinear);
//!
//! parameters.min_filter = None;
//! parameters.generate_mipmaps = false;
//! assert_eq!(parameters.min_filter(), FilterMode::Linear);
//! ```

use crate::backend::{FilterMode, Format, Target, WrapMode};

/// Named parameter presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quality {
    Nearest,
    Linear,
    /// [`Quality::Mipmap`] with 4x anisotropic filtering.
    Filtered,
    Mipmap,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextureParameters {
    pub generate_mipmaps: bool,
    /// `None` derives the filter from `generate_mipmaps`.
    pub min_filter: Option<FilterMode>,
    /// `None` means linear.
    pub mag_filter: Option<FilterMode>,
    /// `None` leaves the backend's wrap state untouched.
    pub wrap: Option<WrapMode>,
    /// 1.0 disables anisotropic filtering.
    pub anisotropy: f32,
    pub target: Option<Target>,
    /// Storage format.  `None` stores in the format the data is uploaded in.
    pub internal_format: Option<Format>,
}

impl Default for TextureParameters {
    fn default() -> Self {
        TextureParameters {
            generate_mipmaps: true,
            min_filter: None,
            mag_filter: None,
            wrap: Some(WrapMode::Repeat),
            anisotropy: 1.0,
            target: None,
            internal_format: None,
        }
    }
}

impl From<Quality> for TextureParameters {
    fn from(quality: Quality) -> Self {
        let mut parameters = TextureParameters::default();
        match quality {
            Quality::Nearest => {
                parameters.min_filter = Some(FilterMode::Nearest);
                parameters.mag_filter = Some(FilterMode::Nearest);
            }
            Quality::Linear => {
                parameters.min_filter = Some(FilterMode::Linear);
                parameters.mag_filter = Some(FilterMode::Linear);
            }
            Quality::Filtered | Quality::Mipmap => {
                if quality == Quality::Filtered {
                    parameters.anisotropy = 4.0;
                }
                parameters.min_filter = Some(FilterMode::LinearMipmapLinear);
                parameters.mag_filter = Some(FilterMode::Linear);
                parameters.generate_mipmaps = true;
            }
        }
        parameters
    }
}

impl TextureParameters {
    pub fn new(quality: Quality) -> Self {
        quality.into()
    }

    pub fn min_filter(&self) -> FilterMode {
        match self.min_filter {
            Some(filter) => filter,
            None if self.generate_mipmaps => FilterMode::LinearMipmapLinear,
            None => FilterMode::Linear,
        }
    }

    pub fn mag_filter(&self) -> FilterMode {
        self.mag_filter.unwrap_or(FilterMode::Linear)
    }

    pub fn target_or(&self, default: Target) -> Target {
        self.target.unwrap_or(default)
    }

    pub fn internal_format_or(&self, default: Format) -> Format {
        self.internal_format.unwrap_or(default)
    }
}
