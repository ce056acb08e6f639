//! Farbfeld image format decoder and encoder (internal).
//!
//! Farbfeld is a simple lossless format: 8-byte magic ("farbfeld"),
//! width/height as u32 big-endian, then RGBA u16 big-endian pixels.
//! The format defines its samples as sRGB.

pub(crate) mod decode;
mod encode;

use crate::buffer::{Image, PixelBuffer};
use crate::error::StripError;
use crate::limits::Limits;
use crate::pixel::{ColorSpace, PixelFormat, PixelLayout};
use alloc::vec::Vec;
use enough::Stop;

/// Decode farbfeld data to RGBA16 pixels (native endian).
pub(crate) fn decode(
    data: &[u8],
    limits: Option<&Limits>,
    stop: &dyn Stop,
) -> Result<Image, StripError> {
    let (width, height) = decode::parse_header(data)?;
    if let Some(limits) = limits {
        limits.check_image(width, height, 8)?;
    }
    stop.check()?;
    let pixels = decode::decode_pixels(data, width, height, stop)?;
    let buffer = PixelBuffer::packed(width, height, 8, pixels)?;
    Image::new(buffer, PixelFormat::new(PixelLayout::Rgba16, ColorSpace::SRGB))
}

/// Encode an image as farbfeld.
pub(crate) fn encode(image: &Image, stop: &dyn Stop) -> Result<Vec<u8>, StripError> {
    encode::encode_farbfeld(&image.buffer, image.format.layout, stop)
}
