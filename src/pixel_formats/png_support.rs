// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
//! Decoding PNG images into pixel buffers.

use std::fs::File;
use std::io::{BufRead, BufReader, Cursor, Seek};
use std::path::Path;

use png::{BitDepth, ColorType, Transformations};

use crate::error::Error;
use crate::pixel_formats::{ChannelLayout, ElementType, OwnedPixelBuffer};

fn layout_for(color_type: ColorType, bit_depth: BitDepth) -> Result<(ChannelLayout, ElementType), Error> {
    let channels = match color_type {
        ColorType::Grayscale => ChannelLayout::L,
        ColorType::GrayscaleAlpha => ChannelLayout::LA,
        ColorType::Rgb => ChannelLayout::RGB,
        ColorType::Rgba => ChannelLayout::RGBA,
        // palettes are expanded before we get here
        ColorType::Indexed => return Err(Error::UnsupportedPng { color_type, bit_depth }),
    };
    let element = match bit_depth {
        BitDepth::Eight => ElementType::Byte,
        BitDepth::Sixteen => ElementType::Short,
        _ => return Err(Error::UnsupportedPng { color_type, bit_depth }),
    };
    Ok((channels, element))
}

fn decode<R: BufRead + Seek>(reader: R) -> Result<OwnedPixelBuffer, Error> {
    let mut decoder = png::Decoder::new(reader);
    decoder.set_transformations(Transformations::EXPAND);
    let mut reader = decoder.read_info()?;
    let (color_type, bit_depth) = reader.output_color_type();
    let (channels, element) = layout_for(color_type, bit_depth)?;
    let (width, height) = {
        let info = reader.info();
        (info.width, info.height)
    };
    let mut data = vec![0; width as usize * height as usize * channels.channels() * element.size()];
    reader.next_frame(&mut data)?;
    if element == ElementType::Short {
        // png stores samples big-endian
        for sample in data.chunks_exact_mut(2) {
            let value = u16::from_be_bytes([sample[0], sample[1]]);
            sample.copy_from_slice(&value.to_ne_bytes());
        }
    }
    OwnedPixelBuffer::new(channels, element, vec![width, height], data)
}

impl OwnedPixelBuffer {
    /// Decodes a PNG held in memory.
    pub fn from_png_bytes(bytes: &[u8]) -> Result<Self, Error> {
        decode(Cursor::new(bytes))
    }

    /// Decodes a PNG file.
    pub fn from_png_path(path: impl AsRef<Path>) -> Result<Self, Error> {
        let file = File::open(path)?;
        decode(BufReader::new(file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pixel_formats::PixelBuffer;

    fn encode(width: u32, height: u32, color_type: ColorType, bit_depth: BitDepth, data: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut out, width, height);
            encoder.set_color(color_type);
            encoder.set_depth(bit_depth);
            let mut writer = encoder.write_header().unwrap();
            writer.write_image_data(data).unwrap();
        }
        out
    }

    #[test]
    fn decodes_rgba() {
        let pixels: Vec<u8> = (0..16).collect();
        let bytes = encode(2, 2, ColorType::Rgba, BitDepth::Eight, &pixels);
        let buffer = OwnedPixelBuffer::from_png_bytes(&bytes).unwrap();
        assert_eq!(buffer.layout().channels, ChannelLayout::RGBA);
        assert_eq!(buffer.layout().element, ElementType::Byte);
        assert_eq!(buffer.layout().dimensions, vec![2, 2]);
        assert_eq!(buffer.data(), &pixels[..]);
    }

    #[test]
    fn decodes_sixteen_bit_gray_alpha() {
        // one pixel: luminance 0x0102, alpha 0xff00
        let bytes = encode(1, 1, ColorType::GrayscaleAlpha, BitDepth::Sixteen, &[1, 2, 0xff, 0]);
        let buffer = OwnedPixelBuffer::from_png_bytes(&bytes).unwrap();
        assert_eq!(buffer.layout().channels, ChannelLayout::LA);
        assert_eq!(buffer.layout().element, ElementType::Short);
        let data = buffer.data();
        assert_eq!(u16::from_ne_bytes([data[0], data[1]]), 0x0102);
        assert_eq!(u16::from_ne_bytes([data[2], data[3]]), 0xff00);
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(
            OwnedPixelBuffer::from_png_bytes(b"not a png"),
            Err(Error::Png(_))
        ));
    }
}
