//! Farbfeld encoder.

use alloc::vec::Vec;
use enough::Stop;

use crate::buffer::{PixelBuffer, try_alloc};
use crate::error::StripError;
use crate::pixel::PixelLayout;

/// Encode to farbfeld.
///
/// `Rgba16` is written as is; 8-bit layouts expand via `val * 257` with
/// opaque alpha where the layout has none.
pub(crate) fn encode_farbfeld(
    buffer: &PixelBuffer,
    layout: PixelLayout,
    stop: &dyn Stop,
) -> Result<Vec<u8>, StripError> {
    let (width, height) = (buffer.width(), buffer.height());
    if layout == PixelLayout::Gray16 {
        return Err(StripError::UnsupportedVariant(
            "cannot encode Gray16 as farbfeld (supported: Rgba16 and 8-bit layouts)".into(),
        ));
    }
    let total = (width as usize)
        .checked_mul(height as usize)
        .and_then(|wh| wh.checked_mul(8))
        .and_then(|b| b.checked_add(16))
        .ok_or(StripError::DimensionsTooLarge { width, height })?;

    let mut out = try_alloc(total)?;
    out.extend_from_slice(b"farbfeld");
    out.extend_from_slice(&width.to_be_bytes());
    out.extend_from_slice(&height.to_be_bytes());

    stop.check()?;

    let bpp = layout.bytes_per_pixel();
    for (row_idx, row) in buffer.rows().enumerate() {
        if row_idx % 16 == 0 {
            stop.check()?;
        }
        if layout == PixelLayout::Rgba16 {
            for pair in row.chunks_exact(2) {
                let val = u16::from_ne_bytes([pair[0], pair[1]]);
                out.extend_from_slice(&val.to_be_bytes());
            }
            continue;
        }
        for px in row.chunks_exact(bpp) {
            if let Some(rgba) = layout.rgba8(px) {
                for c in rgba {
                    out.extend_from_slice(&(u16::from(c) * 257).to_be_bytes());
                }
            }
        }
    }
    Ok(out)
}
