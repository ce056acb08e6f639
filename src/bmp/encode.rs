//! BMP encoder: uncompressed 24-bit and 32-bit BMP.

use crate::buffer::{PixelBuffer, try_alloc};
use crate::error::StripError;
use crate::pixel::PixelLayout;
use alloc::vec::Vec;
use enough::Stop;

/// Encode 8-bit pixels to BMP, bottom-up. `alpha` selects 32-bit output.
pub(crate) fn encode_bmp(
    buffer: &PixelBuffer,
    layout: PixelLayout,
    alpha: bool,
    stop: &dyn Stop,
) -> Result<Vec<u8>, StripError> {
    if matches!(layout, PixelLayout::Gray16 | PixelLayout::Rgba16) {
        return Err(StripError::UnsupportedVariant(alloc::format!(
            "cannot encode {layout:?} as BMP (8-bit layouts only)"
        )));
    }
    let (width, height) = (buffer.width(), buffer.height());
    let (w, h) = (width as usize, height as usize);
    let out_bpp = if alpha { 4 } else { 3 };
    let row_stride = w
        .checked_mul(out_bpp)
        .and_then(|r| r.checked_add(3))
        .map(|r| r & !3)
        .ok_or(StripError::DimensionsTooLarge { width, height })?;
    let pixel_data_size = row_stride
        .checked_mul(h)
        .ok_or(StripError::DimensionsTooLarge { width, height })?;
    let file_size = pixel_data_size
        .checked_add(54)
        .filter(|&s| u32::try_from(s).is_ok())
        .ok_or(StripError::DimensionsTooLarge { width, height })?;

    stop.check()?;

    let mut out = try_alloc(file_size)?;
    write_bmp_header(
        &mut out,
        file_size,
        pixel_data_size,
        width,
        height,
        (out_bpp * 8) as u16,
    );

    let pad_bytes = row_stride - w * out_bpp;
    let src_bpp = layout.bytes_per_pixel();
    for y in (0..height).rev() {
        if y % 16 == 0 {
            stop.check()?;
        }
        let row = buffer.row(y);
        if alpha && layout == PixelLayout::Bgra8 {
            // Already in file byte order.
            out.extend_from_slice(row);
        } else {
            for px in row.chunks_exact(src_bpp) {
                if let Some([r, g, b, a]) = layout.rgba8(px) {
                    out.extend_from_slice(&[b, g, r]);
                    if alpha {
                        out.push(a);
                    }
                }
            }
        }
        out.extend(core::iter::repeat_n(0u8, pad_bytes));
    }

    Ok(out)
}

fn write_bmp_header(
    out: &mut Vec<u8>,
    file_size: usize,
    pixel_data_size: usize,
    width: u32,
    height: u32,
    bpp: u16,
) {
    // File header (14 bytes)
    out.extend_from_slice(b"BM");
    out.extend_from_slice(&(file_size as u32).to_le_bytes());
    out.extend_from_slice(&[0u8; 4]); // reserved
    out.extend_from_slice(&54u32.to_le_bytes()); // data offset

    // DIB header (BITMAPINFOHEADER, 40 bytes)
    out.extend_from_slice(&40u32.to_le_bytes());
    out.extend_from_slice(&(width as i32).to_le_bytes());
    out.extend_from_slice(&(height as i32).to_le_bytes()); // positive = bottom-up
    out.extend_from_slice(&1u16.to_le_bytes()); // planes
    out.extend_from_slice(&bpp.to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes()); // compression
    out.extend_from_slice(&(pixel_data_size as u32).to_le_bytes());
    out.extend_from_slice(&2835u32.to_le_bytes()); // h resolution (72 DPI)
    out.extend_from_slice(&2835u32.to_le_bytes()); // v resolution
    out.extend_from_slice(&0u32.to_le_bytes()); // colors used
    out.extend_from_slice(&0u32.to_le_bytes()); // important colors
}
