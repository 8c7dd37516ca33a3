// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
//! Abstract pixel layouts and the pixel buffers that carry them.
//!
//! Pixel data arrives described in backend-neutral terms: which channels each pixel has
//! ([`ChannelLayout`]), the numeric type of each channel ([`ElementType`]), and up to three
//! extents.  Turning that description into backend enumerants is the job of [`translate`].
//!
//! # Examples
//!
//! ```
//! use texture_units::pixel_formats::{ChannelLayout, ElementType, OwnedPixelBuffer, PixelBuffer};
//!
//! // a 2x2 luminance-alpha image
//! let buffer = OwnedPixelBuffer::new(
//!     ChannelLayout::LA,
//!     ElementType::Byte,
//!     vec![2, 2],
//!     vec![0; 8],
//! ).expect("8 bytes is exactly 2x2 LA");
//! assert_eq!(buffer.layout().byte_len(), Some(8));
//! ```

pub mod png_support;
pub mod translate;

use crate::backend::DataType;
use crate::error::{Error, FatalError};

/// The channels of each pixel, in memory order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelLayout {
    R,
    G,
    B,
    /// Luminance.
    L,
    /// Luminance followed by alpha.
    LA,
    A,
    RGB,
    RGBA,
    BGRA,
}

impl ChannelLayout {
    pub fn channels(self) -> usize {
        match self {
            ChannelLayout::R
            | ChannelLayout::G
            | ChannelLayout::B
            | ChannelLayout::L
            | ChannelLayout::A => 1,
            ChannelLayout::LA => 2,
            ChannelLayout::RGB => 3,
            ChannelLayout::RGBA | ChannelLayout::BGRA => 4,
        }
    }
}

/// Numeric type of one channel.  All element types are unsigned, except `Float`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementType {
    Byte,
    Short,
    Integer,
    Float,
}

impl ElementType {
    pub fn size(self) -> usize {
        match self {
            ElementType::Byte => 1,
            ElementType::Short => 2,
            ElementType::Integer | ElementType::Float => 4,
        }
    }
}

/// Describes a block of pixel data.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PixelLayout {
    pub channels: ChannelLayout,
    pub element: ElementType,
    /// Extents, width first.  At most three are meaningful.
    pub dimensions: Vec<u32>,
}

impl PixelLayout {
    pub fn new(channels: ChannelLayout, element: ElementType, dimensions: Vec<u32>) -> Self {
        PixelLayout {
            channels,
            element,
            dimensions,
        }
    }

    /// The first three extents, padded with 1.
    pub fn extent(&self) -> [u32; 3] {
        let mut extent = [1; 3];
        for (slot, dimension) in extent.iter_mut().zip(&self.dimensions) {
            *slot = *dimension;
        }
        extent
    }

    pub fn bytes_per_pixel(&self) -> usize {
        self.channels.channels() * self.element.size()
    }

    /// Bytes needed for the whole block.  `None` if that doesn't fit in a `usize`.
    pub fn byte_len(&self) -> Option<usize> {
        self.extent()
            .iter()
            .try_fold(self.bytes_per_pixel(), |len, &d| len.checked_mul(d as usize))
    }
}

/// Source of pixel data for uploads.
///
/// `data` must hold at least `layout().byte_len()` bytes.  Uploads never mutate the buffer.
pub trait PixelBuffer {
    fn layout(&self) -> &PixelLayout;
    fn data(&self) -> &[u8];
}

/// A [`PixelBuffer`] that owns its bytes.
#[derive(Debug, Clone, PartialEq)]
pub struct OwnedPixelBuffer {
    layout: PixelLayout,
    data: Vec<u8>,
}

impl OwnedPixelBuffer {
    /// Fails when `data` is not exactly the length the layout requires.
    pub fn new(
        channels: ChannelLayout,
        element: ElementType,
        dimensions: Vec<u32>,
        data: Vec<u8>,
    ) -> Result<Self, Error> {
        let layout = PixelLayout::new(channels, element, dimensions);
        let Some(expected) = layout.byte_len() else {
            return Err(Error::LayoutOverflow(layout.extent()));
        };
        if data.len() != expected {
            return Err(Error::DataLength {
                expected,
                actual: data.len(),
            });
        }
        Ok(OwnedPixelBuffer { layout, data })
    }

    /// A zero-filled buffer.
    ///
    /// # Fatal errors
    ///
    /// [`FatalError::LayoutOverflow`] if the layout is too large to address.
    pub fn zeroed(channels: ChannelLayout, element: ElementType, dimensions: Vec<u32>) -> Self {
        let layout = PixelLayout::new(channels, element, dimensions);
        let Some(len) = layout.byte_len() else {
            FatalError::LayoutOverflow(layout.extent()).raise()
        };
        let data = vec![0; len];
        OwnedPixelBuffer { layout, data }
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }
}

impl PixelBuffer for OwnedPixelBuffer {
    fn layout(&self) -> &PixelLayout {
        &self.layout
    }

    fn data(&self) -> &[u8] {
        &self.data
    }
}

pub(crate) mod sealed {
    pub trait Sealed {}
}

/// Rust scalar types with a backend data type.
///
/// This trait is sealed.
///
/// ```
/// use texture_units::backend::DataType;
/// use texture_units::pixel_formats::GpuScalar;
///
/// assert_eq!(<u16 as GpuScalar>::DATA_TYPE, DataType::UnsignedShort);
/// ```
pub trait GpuScalar: sealed::Sealed + Copy {
    const DATA_TYPE: DataType;
}

macro_rules! gpu_scalar {
    ($($ty:ty => $data_type:ident),* $(,)?) => {
        $(
            impl sealed::Sealed for $ty {}
            impl GpuScalar for $ty {
                const DATA_TYPE: DataType = DataType::$data_type;
            }
        )*
    };
}

gpu_scalar! {
    i8 => Byte,
    u8 => UnsignedByte,
    i16 => Short,
    u16 => UnsignedShort,
    i32 => Int,
    u32 => UnsignedInt,
    f32 => Float,
}
