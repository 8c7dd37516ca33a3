// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
//! Translation from abstract pixel layouts to backend enumerants.
//!
//! All portability branching lives here.  Reduced-capability backends lack separate
//! single-channel color formats and may lack luminance formats, so some layouts are substituted.
//! A layout with no valid translation yields `None` rather than a guessed format.

use crate::backend::{Capabilities, DataType, Format, Tier};
use crate::pixel_formats::{ChannelLayout, ElementType};

/// The source format for pixels laid out as `channels` on a backend with `capabilities`.
pub fn format_for(channels: ChannelLayout, capabilities: &Capabilities) -> Option<Format> {
    let format = match channels {
        ChannelLayout::R | ChannelLayout::G | ChannelLayout::B
            if capabilities.tier == Tier::Mobile =>
        {
            Format::Alpha
        }
        ChannelLayout::R => Format::Red,
        ChannelLayout::G => Format::Green,
        ChannelLayout::B => Format::Blue,
        ChannelLayout::L if capabilities.luminance => Format::Luminance,
        ChannelLayout::L => Format::Red,
        ChannelLayout::LA if capabilities.luminance_alpha => Format::LuminanceAlpha,
        ChannelLayout::LA => Format::Rg,
        ChannelLayout::A => Format::Alpha,
        ChannelLayout::RGB => Format::Rgb,
        ChannelLayout::RGBA => Format::Rgba,
        ChannelLayout::BGRA if capabilities.bgra => Format::Bgra,
        ChannelLayout::BGRA => return None,
    };
    Some(format)
}

pub fn data_type_for(element: ElementType) -> DataType {
    match element {
        ElementType::Byte => DataType::UnsignedByte,
        ElementType::Short => DataType::UnsignedShort,
        ElementType::Integer => DataType::UnsignedInt,
        ElementType::Float => DataType::Float,
    }
}
