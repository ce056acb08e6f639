//! QOI decoder and encoder via rapid-qoi (internal).
//!
//! QOI is lossless, compressed, keeps alpha and records whether samples
//! are sRGB or linear, which maps onto [`ColorSpace::SRGB`] and
//! [`ColorSpace::LINEAR`].

use alloc::format;
use alloc::vec::Vec;
use enough::Stop;
use rapid_qoi::{Colors, Qoi};

use crate::buffer::{Image, PixelBuffer, try_alloc};
use crate::error::StripError;
use crate::info::{ImageFormat, ImageInfo};
use crate::limits::Limits;
use crate::pixel::{ColorSpace, PixelFormat, PixelLayout};

const MAX_RUN: u64 = 62;

fn layout_of(colors: Colors) -> PixelLayout {
    if colors.has_alpha() {
        PixelLayout::Rgba8
    } else {
        PixelLayout::Rgb8
    }
}

fn color_space_of(colors: Colors) -> ColorSpace {
    match colors {
        Colors::Srgb | Colors::SrgbLinA => ColorSpace::SRGB,
        Colors::Rgb | Colors::Rgba => ColorSpace::LINEAR,
    }
}

pub(crate) fn probe_header(data: &[u8]) -> Result<ImageInfo, StripError> {
    let qoi = Qoi::decode_header(data)
        .map_err(|e| StripError::InvalidHeader(format!("QOI: {e:?}")))?;
    Ok(ImageInfo {
        width: qoi.width,
        height: qoi.height,
        format: ImageFormat::Qoi,
        native_layout: layout_of(qoi.colors),
    })
}

pub(crate) fn decode(
    data: &[u8],
    limits: Option<&Limits>,
    stop: &dyn Stop,
) -> Result<Image, StripError> {
    let header = Qoi::decode_header(data)
        .map_err(|e| StripError::InvalidHeader(format!("QOI: {e:?}")))?;
    let layout = layout_of(header.colors);
    if let Some(limits) = limits {
        limits.check_image(header.width, header.height, layout.bytes_per_pixel())?;
    }
    // A single run op covers at most 62 pixels, so the stream length bounds
    // the pixel count before anything is allocated.
    let pixel_count = u64::from(header.width) * u64::from(header.height);
    let max_pixels = (data.len() as u64).saturating_mul(MAX_RUN);
    if pixel_count > max_pixels {
        return Err(StripError::InvalidData(format!(
            "QOI header claims {}x{} pixels but {} bytes encode at most {max_pixels}",
            header.width,
            header.height,
            data.len()
        )));
    }
    let len = usize::try_from(pixel_count)
        .ok()
        .and_then(|n| n.checked_mul(layout.bytes_per_pixel()))
        .ok_or(StripError::DimensionsTooLarge {
            width: header.width,
            height: header.height,
        })?;
    stop.check()?;

    let mut pixels = try_alloc(len)?;
    pixels.resize(len, 0);
    let qoi = Qoi::decode(data, &mut pixels)
        .map_err(|e| StripError::InvalidData(format!("QOI: {e:?}")))?;
    let buffer = PixelBuffer::packed(
        qoi.width,
        qoi.height,
        layout.bytes_per_pixel() as u32,
        pixels,
    )?;
    Image::new(
        buffer,
        PixelFormat::new(layout, color_space_of(qoi.colors)),
    )
}

/// Encode as QOI. Linear images are flagged linear; every other color
/// space is written as sRGB, the only other value QOI can record.
pub(crate) fn encode(image: &Image, stop: &dyn Stop) -> Result<Vec<u8>, StripError> {
    let layout = image.format.layout;
    let linear = image.format.color_space == ColorSpace::LINEAR;
    let (colors, channels) = match (layout, linear) {
        (PixelLayout::Rgb8 | PixelLayout::Gray8, false) => (Colors::Srgb, 3),
        (PixelLayout::Rgb8 | PixelLayout::Gray8, true) => (Colors::Rgb, 3),
        (PixelLayout::Rgba8 | PixelLayout::Bgra8, false) => (Colors::SrgbLinA, 4),
        (PixelLayout::Rgba8 | PixelLayout::Bgra8, true) => (Colors::Rgba, 4),
        _ => {
            return Err(StripError::UnsupportedVariant(format!(
                "cannot encode {layout:?} as QOI (8-bit layouts only)"
            )));
        }
    };

    let buffer = &image.buffer;
    let mut packed = try_alloc(buffer.width() as usize * buffer.height() as usize * channels)?;
    for (row_idx, row) in buffer.rows().enumerate() {
        if row_idx % 16 == 0 {
            stop.check()?;
        }
        if layout == PixelLayout::Rgb8 || layout == PixelLayout::Rgba8 {
            packed.extend_from_slice(row);
            continue;
        }
        for px in row.chunks_exact(layout.bytes_per_pixel()) {
            if let Some(rgba) = layout.rgba8(px) {
                packed.extend_from_slice(&rgba[..channels]);
            }
        }
    }

    let qoi = Qoi {
        width: buffer.width(),
        height: buffer.height(),
        colors,
    };
    qoi.encode_alloc(&packed)
        .map_err(|e| StripError::InvalidData(format!("QOI encode: {e:?}")))
}
