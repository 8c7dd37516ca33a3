// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
//! Backend-neutral enumerants.
//!
//! These mirror the values a unit-indexed API accepts.  Each backend maps them onto its own
//! constants; the rest of the crate only ever sees these types.

use std::fmt::{Display, Formatter};

/// Texture dimensionality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Target {
    Texture1D,
    #[default]
    Texture2D,
    Texture3D,
}

impl Display for Target {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Target::Texture1D => "TEXTURE_1D",
            Target::Texture2D => "TEXTURE_2D",
            Target::Texture3D => "TEXTURE_3D",
        };
        f.write_str(name)
    }
}

/// Pixel formats, used both for source data and for storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Red,
    Green,
    Blue,
    Alpha,
    Luminance,
    LuminanceAlpha,
    /// Generic two-channel format.
    Rg,
    Rgb,
    Rgba,
    Bgra,
}

impl Format {
    /// Number of channels per pixel.
    pub fn channels(self) -> usize {
        match self {
            Format::Red
            | Format::Green
            | Format::Blue
            | Format::Alpha
            | Format::Luminance => 1,
            Format::LuminanceAlpha | Format::Rg => 2,
            Format::Rgb => 3,
            Format::Rgba | Format::Bgra => 4,
        }
    }
}

impl Display for Format {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Format::Red => "RED",
            Format::Green => "GREEN",
            Format::Blue => "BLUE",
            Format::Alpha => "ALPHA",
            Format::Luminance => "LUMINANCE",
            Format::LuminanceAlpha => "LUMINANCE_ALPHA",
            Format::Rg => "RG",
            Format::Rgb => "RGB",
            Format::Rgba => "RGBA",
            Format::Bgra => "BGRA",
        };
        f.write_str(name)
    }
}

/// Numeric type of each channel of source data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    Byte,
    UnsignedByte,
    Short,
    UnsignedShort,
    Int,
    UnsignedInt,
    Float,
}

impl DataType {
    /// Size of one channel in bytes.
    pub fn size(self) -> usize {
        match self {
            DataType::Byte | DataType::UnsignedByte => 1,
            DataType::Short | DataType::UnsignedShort => 2,
            DataType::Int | DataType::UnsignedInt | DataType::Float => 4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterMode {
    Nearest,
    Linear,
    NearestMipmapNearest,
    LinearMipmapNearest,
    NearestMipmapLinear,
    LinearMipmapLinear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WrapMode {
    Repeat,
    ClampToEdge,
    MirroredRepeat,
}

/// Texture coordinate axis for wrap state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WrapAxis {
    S,
    T,
    R,
}
