//! PNM encoder: P5, P6, P7.

use super::PnmFormat;
use crate::buffer::{PixelBuffer, try_alloc};
use crate::error::StripError;
use crate::pixel::PixelLayout;
use alloc::format;
use alloc::vec::Vec;
use enough::Stop;

pub(crate) fn encode_pnm(
    buffer: &PixelBuffer,
    layout: PixelLayout,
    fmt: PnmFormat,
    stop: &dyn Stop,
) -> Result<Vec<u8>, StripError> {
    stop.check()?;
    match fmt {
        PnmFormat::Pgm => encode_pgm(buffer, layout, stop),
        PnmFormat::Ppm => encode_ppm(buffer, layout, stop),
        PnmFormat::Pam => encode_pam(buffer, layout, stop),
    }
}

fn luma(rgba: [u8; 4]) -> u8 {
    let [r, g, b, _] = rgba.map(u32::from);
    ((r * 299 + g * 587 + b * 114 + 500) / 1000) as u8
}

fn encode_pgm(
    buffer: &PixelBuffer,
    layout: PixelLayout,
    stop: &dyn Stop,
) -> Result<Vec<u8>, StripError> {
    let (width, height) = (buffer.width(), buffer.height());
    let maxval = if layout == PixelLayout::Gray16 { 65535 } else { 255 };
    let header = format!("P5\n{width} {height}\n{maxval}\n");
    let sample_bytes = if maxval > 255 { 2 } else { 1 };
    let mut out = try_alloc(header.len() + width as usize * height as usize * sample_bytes)?;
    out.extend_from_slice(header.as_bytes());

    for (row_idx, row) in buffer.rows().enumerate() {
        if row_idx % 16 == 0 {
            stop.check()?;
        }
        match layout {
            PixelLayout::Gray8 => out.extend_from_slice(row),
            PixelLayout::Gray16 => push_be16(&mut out, row),
            PixelLayout::Rgb8 | PixelLayout::Rgba8 | PixelLayout::Bgra8 => {
                for px in row.chunks_exact(layout.bytes_per_pixel()) {
                    if let Some(rgba) = layout.rgba8(px) {
                        out.push(luma(rgba));
                    }
                }
            }
            _ => {
                return Err(StripError::UnsupportedVariant(format!(
                    "cannot encode {layout:?} as PGM"
                )));
            }
        }
    }
    Ok(out)
}

fn encode_ppm(
    buffer: &PixelBuffer,
    layout: PixelLayout,
    stop: &dyn Stop,
) -> Result<Vec<u8>, StripError> {
    if !matches!(
        layout,
        PixelLayout::Gray8 | PixelLayout::Rgb8 | PixelLayout::Rgba8 | PixelLayout::Bgra8
    ) {
        return Err(StripError::UnsupportedVariant(format!(
            "cannot encode {layout:?} as PPM"
        )));
    }
    let (width, height) = (buffer.width(), buffer.height());
    let header = format!("P6\n{width} {height}\n255\n");
    let mut out = try_alloc(header.len() + width as usize * height as usize * 3)?;
    out.extend_from_slice(header.as_bytes());

    for (row_idx, row) in buffer.rows().enumerate() {
        if row_idx % 16 == 0 {
            stop.check()?;
        }
        if layout == PixelLayout::Rgb8 {
            out.extend_from_slice(row);
            continue;
        }
        for px in row.chunks_exact(layout.bytes_per_pixel()) {
            if let Some([r, g, b, _]) = layout.rgba8(px) {
                out.extend_from_slice(&[r, g, b]);
            }
        }
    }
    Ok(out)
}

fn encode_pam(
    buffer: &PixelBuffer,
    layout: PixelLayout,
    stop: &dyn Stop,
) -> Result<Vec<u8>, StripError> {
    let (depth, tupltype, maxval) = match layout {
        PixelLayout::Gray8 => (1, "GRAYSCALE", 255),
        PixelLayout::Gray16 => (1, "GRAYSCALE", 65535),
        PixelLayout::Rgb8 => (3, "RGB", 255),
        PixelLayout::Rgba8 | PixelLayout::Bgra8 => (4, "RGB_ALPHA", 255),
        PixelLayout::Rgba16 => (4, "RGB_ALPHA", 65535),
    };
    let (width, height) = (buffer.width(), buffer.height());
    let header = format!(
        "P7\nWIDTH {width}\nHEIGHT {height}\nDEPTH {depth}\nMAXVAL {maxval}\nTUPLTYPE {tupltype}\nENDHDR\n"
    );
    let mut out = try_alloc(header.len() + buffer.row_bytes() * height as usize)?;
    out.extend_from_slice(header.as_bytes());

    for (row_idx, row) in buffer.rows().enumerate() {
        if row_idx % 16 == 0 {
            stop.check()?;
        }
        match layout {
            PixelLayout::Bgra8 => {
                for px in row.chunks_exact(4) {
                    out.extend_from_slice(&[px[2], px[1], px[0], px[3]]);
                }
            }
            PixelLayout::Gray16 | PixelLayout::Rgba16 => push_be16(&mut out, row),
            _ => out.extend_from_slice(row),
        }
    }
    Ok(out)
}

/// Native-endian u16 samples → big-endian.
fn push_be16(out: &mut Vec<u8>, row: &[u8]) {
    for pair in row.chunks_exact(2) {
        let v = u16::from_ne_bytes([pair[0], pair[1]]);
        out.extend_from_slice(&v.to_be_bytes());
    }
}
