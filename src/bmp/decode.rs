//! BMP decoder for uncompressed 24-bit and 32-bit bitmaps.

use alloc::format;
use alloc::vec::Vec;

use enough::Stop;

use crate::buffer::try_alloc;
use crate::error::StripError;
use crate::pixel::PixelLayout;

const FILE_HEADER_LEN: usize = 14;

const BI_RGB: u32 = 0;
const BI_BITFIELDS: u32 = 3;
const BI_ALPHABITFIELDS: u32 = 6;

/// Parsed BMP headers (internal).
#[derive(Debug, Clone, Copy)]
pub(crate) struct BmpHeader {
    pub width: u32,
    pub height: u32,
    pub top_down: bool,
    pub bits_per_pixel: u16,
    pub data_offset: usize,
    pub layout: PixelLayout,
}

impl BmpHeader {
    /// Bytes per row in the file, padded to 4 bytes.
    fn file_row_stride(&self) -> usize {
        (self.width as usize * usize::from(self.bits_per_pixel)).div_ceil(32) * 4
    }
}

fn u16_at(data: &[u8], off: usize) -> Result<u16, StripError> {
    data.get(off..off + 2)
        .map(|b| u16::from_le_bytes([b[0], b[1]]))
        .ok_or(StripError::UnexpectedEof)
}

fn u32_at(data: &[u8], off: usize) -> Result<u32, StripError> {
    data.get(off..off + 4)
        .map(|b| u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .ok_or(StripError::UnexpectedEof)
}

pub(crate) fn parse_bmp_header(data: &[u8]) -> Result<BmpHeader, StripError> {
    if data.len() < 2 || &data[0..2] != b"BM" {
        return Err(StripError::UnrecognizedFormat);
    }
    let data_offset = u32_at(data, 10)? as usize;
    let dib_len = u32_at(data, FILE_HEADER_LEN)? as usize;
    if !matches!(dib_len, 40 | 52 | 56 | 108 | 124) {
        return Err(StripError::UnsupportedVariant(format!(
            "BMP info header of {dib_len} bytes"
        )));
    }
    let raw_width = u32_at(data, 18)? as i32;
    let raw_height = u32_at(data, 22)? as i32;
    let planes = u16_at(data, 26)?;
    let bits_per_pixel = u16_at(data, 28)?;
    let compression = u32_at(data, 30)?;

    if planes != 1 {
        return Err(StripError::InvalidHeader(format!("BMP planes = {planes}")));
    }
    if raw_width <= 0 || raw_height == 0 || raw_height == i32::MIN {
        return Err(StripError::InvalidHeader(format!(
            "BMP dimensions {raw_width}x{raw_height}"
        )));
    }
    let layout = match (bits_per_pixel, compression) {
        (24, BI_RGB) => PixelLayout::Rgb8,
        (32, BI_RGB) => PixelLayout::Rgba8,
        (32, BI_BITFIELDS | BI_ALPHABITFIELDS) => {
            // A zero alpha mask means the fourth byte is padding.
            if check_standard_masks(data, dib_len, compression)? {
                PixelLayout::Rgba8
            } else {
                PixelLayout::Rgb8
            }
        }
        _ => {
            return Err(StripError::UnsupportedVariant(format!(
                "BMP with {bits_per_pixel} bpp and compression {compression}"
            )));
        }
    };
    if data_offset < FILE_HEADER_LEN + dib_len {
        return Err(StripError::InvalidHeader(format!(
            "BMP pixel data offset {data_offset} overlaps the headers"
        )));
    }

    Ok(BmpHeader {
        width: raw_width as u32,
        height: raw_height.unsigned_abs(),
        top_down: raw_height < 0,
        bits_per_pixel,
        data_offset,
        layout,
    })
}

/// Bitfield masks must describe plain BGRA byte order. Returns whether the
/// alpha mask is set.
fn check_standard_masks(
    data: &[u8],
    dib_len: usize,
    compression: u32,
) -> Result<bool, StripError> {
    // With a 40-byte info header the masks follow it; larger headers embed them.
    let base = FILE_HEADER_LEN + 40;
    let red = u32_at(data, base)?;
    let green = u32_at(data, base + 4)?;
    let blue = u32_at(data, base + 8)?;
    let alpha = if dib_len >= 56 || compression == BI_ALPHABITFIELDS {
        u32_at(data, base + 12)?
    } else {
        0
    };
    if (red, green, blue) != (0x00FF_0000, 0x0000_FF00, 0x0000_00FF)
        || !matches!(alpha, 0 | 0xFF00_0000)
    {
        return Err(StripError::UnsupportedVariant(format!(
            "BMP bitfields r={red:#010x} g={green:#010x} b={blue:#010x} a={alpha:#010x}"
        )));
    }
    Ok(alpha != 0)
}

/// Decode pixel rows to packed RGB8/RGBA8, top row first.
///
/// 32-bit files whose alpha bytes are all zero are treated as opaque: that
/// is how writers that ignore alpha leave the fourth byte.
pub(crate) fn decode_bmp_pixels(
    data: &[u8],
    header: &BmpHeader,
    stop: &dyn Stop,
) -> Result<Vec<u8>, StripError> {
    let (w, h) = (header.width as usize, header.height as usize);
    let file_stride = header.file_row_stride();
    let src_bpp = usize::from(header.bits_per_pixel) / 8;
    let out_bpp = header.layout.bytes_per_pixel();
    let needed = file_stride
        .checked_mul(h)
        .ok_or(StripError::DimensionsTooLarge {
            width: header.width,
            height: header.height,
        })?;
    let raster = data
        .get(header.data_offset..)
        .and_then(|d| d.get(..needed))
        .ok_or(StripError::UnexpectedEof)?;

    let mut out = try_alloc(w * h * out_bpp)?;
    for y in 0..h {
        if y % 16 == 0 {
            stop.check()?;
        }
        let file_row = if header.top_down { y } else { h - 1 - y };
        let row = &raster[file_row * file_stride..file_row * file_stride + w * src_bpp];
        for px in row.chunks_exact(src_bpp) {
            out.extend_from_slice(&[px[2], px[1], px[0]]);
            if out_bpp == 4 {
                out.push(px[3]);
            }
        }
    }

    if header.layout == PixelLayout::Rgba8 && out.chunks_exact(4).all(|px| px[3] == 0) {
        for px in out.chunks_exact_mut(4) {
            px[3] = 255;
        }
    }
    Ok(out)
}
