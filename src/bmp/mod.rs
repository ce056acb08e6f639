//! BMP image format decoder and encoder (internal).
//!
//! Uncompressed 24-bit and 32-bit bitmaps only; that is what strip tools
//! produce. BMP files are treated as sRGB.

mod decode;
mod encode;

use crate::buffer::{Image, PixelBuffer};
use crate::error::StripError;
use crate::info::{ImageFormat, ImageInfo};
use crate::limits::Limits;
use crate::pixel::{ColorSpace, PixelFormat};
use alloc::vec::Vec;
use enough::Stop;

pub(crate) fn probe_header(data: &[u8]) -> Result<ImageInfo, StripError> {
    let header = decode::parse_bmp_header(data)?;
    Ok(ImageInfo {
        width: header.width,
        height: header.height,
        format: ImageFormat::Bmp,
        native_layout: header.layout,
    })
}

/// Decode BMP data (output in RGB/RGBA byte order).
pub(crate) fn decode(
    data: &[u8],
    limits: Option<&Limits>,
    stop: &dyn Stop,
) -> Result<Image, StripError> {
    let header = decode::parse_bmp_header(data)?;
    let bpp = header.layout.bytes_per_pixel();
    if let Some(limits) = limits {
        limits.check_image(header.width, header.height, bpp)?;
    }
    stop.check()?;
    let pixels = decode::decode_bmp_pixels(data, &header, stop)?;
    let buffer = PixelBuffer::packed(header.width, header.height, bpp as u32, pixels)?;
    Image::new(buffer, PixelFormat::new(header.layout, ColorSpace::SRGB))
}

/// Encode to BMP.
pub(crate) fn encode(image: &Image, alpha: bool, stop: &dyn Stop) -> Result<Vec<u8>, StripError> {
    encode::encode_bmp(&image.buffer, image.format.layout, alpha, stop)
}
