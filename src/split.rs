//! Strip → tiles.

use alloc::format;
use alloc::vec::Vec;

use crate::buffer::{PixelBuffer, try_alloc};
use crate::error::{GeometryError, StripError};
use crate::geometry::{SplitGeometry, StripOrientation};

/// Cut `strip` into `geometry.tile_count()` tiles, left to right or top to
/// bottom.
///
/// Horizontal tiles are gathered row by row and come out packed. Vertical
/// tiles are contiguous row blocks of the strip, each taken with a single
/// copy, and keep the strip's row stride.
///
/// The only failures are a geometry that does not describe `strip` and
/// allocation failure. Either way no tiles are returned.
pub fn split(
    strip: &PixelBuffer,
    geometry: &SplitGeometry,
) -> Result<Vec<PixelBuffer>, StripError> {
    check_geometry(strip, geometry)?;
    let mut tiles = Vec::new();
    tiles
        .try_reserve_exact(geometry.tile_count())
        .map_err(|_| StripError::AllocationFailed {
            bytes: geometry.tile_count() * core::mem::size_of::<PixelBuffer>(),
        })?;

    match geometry.orientation() {
        StripOrientation::Horizontal => {
            for i in 0..geometry.tile_count() {
                tiles.push(horizontal_tile(strip, geometry, i)?);
            }
        }
        StripOrientation::Vertical => {
            for i in 0..geometry.tile_count() {
                tiles.push(vertical_tile(strip, geometry, i)?);
            }
        }
    }
    Ok(tiles)
}

fn horizontal_tile(
    strip: &PixelBuffer,
    geometry: &SplitGeometry,
    index: usize,
) -> Result<PixelBuffer, StripError> {
    let bpp = strip.bytes_per_pixel() as usize;
    let tile_row_bytes = geometry.tile_width() as usize * bpp;
    let height = geometry.tile_height() as usize;
    let stride = strip.row_stride() as usize;
    let src = strip.as_bytes();

    let mut pixels = try_alloc(tile_row_bytes * height)?;
    let column_offset = index * tile_row_bytes;
    for r in 0..height {
        let start = r * stride + column_offset;
        pixels.extend_from_slice(&src[start..start + tile_row_bytes]);
    }
    PixelBuffer::packed(
        geometry.tile_width(),
        geometry.tile_height(),
        strip.bytes_per_pixel(),
        pixels,
    )
}

fn vertical_tile(
    strip: &PixelBuffer,
    geometry: &SplitGeometry,
    index: usize,
) -> Result<PixelBuffer, StripError> {
    let block = geometry.tile_height() as usize * strip.row_stride() as usize;
    let start = index * block;

    let mut pixels = try_alloc(block)?;
    pixels.extend_from_slice(&strip.as_bytes()[start..start + block]);
    PixelBuffer::new(
        geometry.tile_width(),
        geometry.tile_height(),
        strip.bytes_per_pixel(),
        strip.row_stride(),
        pixels,
    )
}

fn check_geometry(strip: &PixelBuffer, geometry: &SplitGeometry) -> Result<(), GeometryError> {
    let count = geometry.tile_count() as u64;
    let (w, h) = (u64::from(strip.width()), u64::from(strip.height()));
    let (tw, th) = (
        u64::from(geometry.tile_width()),
        u64::from(geometry.tile_height()),
    );
    let fits = match geometry.orientation() {
        StripOrientation::Horizontal => tw * count == w && th == h,
        StripOrientation::Vertical => tw == w && th * count == h,
    };
    if !fits {
        return Err(GeometryError::GeometryMismatch(format!(
            "{} {:?} tiles of {}x{} do not make up a {}x{} strip",
            geometry.tile_count(),
            geometry.orientation(),
            geometry.tile_width(),
            geometry.tile_height(),
            strip.width(),
            strip.height()
        )));
    }
    Ok(())
}
