//! PNM family: P5 (PGM), P6 (PPM), P7 (PAM).
//!
//! Binary variants only. PNM carries no color space, so decoded images
//! report [`ColorSpace::UNKNOWN`].

mod decode;
mod encode;

use crate::buffer::{Image, PixelBuffer};
use crate::error::StripError;
use crate::info::{ImageFormat, ImageInfo};
use crate::limits::Limits;
use crate::pixel::{ColorSpace, PixelFormat, PixelLayout};
use alloc::vec::Vec;
use enough::Stop;

/// Which PNM sub-format to write.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PnmFormat {
    /// P5, binary grayscale.
    Pgm,
    /// P6, binary RGB.
    Ppm,
    /// P7, arbitrary channels with a TUPLTYPE header. The only PNM that keeps alpha.
    Pam,
}

impl PnmFormat {
    pub fn extension(self) -> &'static str {
        match self {
            PnmFormat::Pgm => "pgm",
            PnmFormat::Ppm => "ppm",
            PnmFormat::Pam => "pam",
        }
    }
}

pub(crate) struct PnmHeader {
    pub format: PnmFormat,
    pub width: u32,
    pub height: u32,
    pub maxval: u32,
    pub depth: u32,
    pub layout: PixelLayout,
    pub data_offset: usize,
}

pub(crate) fn probe_header(data: &[u8]) -> Result<ImageInfo, StripError> {
    let header = decode::parse_header(data)?;
    Ok(ImageInfo {
        width: header.width,
        height: header.height,
        format: ImageFormat::Pnm(header.format),
        native_layout: header.layout,
    })
}

pub(crate) fn decode(
    data: &[u8],
    limits: Option<&Limits>,
    stop: &dyn Stop,
) -> Result<Image, StripError> {
    let header = decode::parse_header(data)?;
    if let Some(limits) = limits {
        limits.check_image(header.width, header.height, header.layout.bytes_per_pixel())?;
    }

    let w = header.width as usize;
    let h = header.height as usize;
    let src_bps = if header.maxval > 255 { 2 } else { 1 };
    let expected_src = w
        .checked_mul(h)
        .and_then(|wh| wh.checked_mul(header.depth as usize))
        .and_then(|whd| whd.checked_mul(src_bps))
        .ok_or(StripError::DimensionsTooLarge {
            width: header.width,
            height: header.height,
        })?;
    stop.check()?;

    let raster = data
        .get(header.data_offset..)
        .and_then(|d| d.get(..expected_src))
        .ok_or(StripError::UnexpectedEof)?;
    let pixels = decode::decode_samples(raster, &header, stop)?;
    let buffer = PixelBuffer::packed(
        header.width,
        header.height,
        header.layout.bytes_per_pixel() as u32,
        pixels,
    )?;
    Image::new(buffer, PixelFormat::new(header.layout, ColorSpace::UNKNOWN))
}

pub(crate) fn encode(
    image: &Image,
    format: PnmFormat,
    stop: &dyn Stop,
) -> Result<Vec<u8>, StripError> {
    encode::encode_pnm(&image.buffer, image.format.layout, format, stop)
}
