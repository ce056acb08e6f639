//! Tiles → strip.

use alloc::format;

use crate::buffer::{PixelBuffer, try_alloc};
use crate::error::{GeometryError, StripError};
use crate::geometry::{MergeGeometry, StripOrientation};

/// Concatenate `tiles` into one strip, in slice order.
///
/// The merger never reorders: the first tile lands leftmost (horizontal) or
/// topmost (vertical). Callers that let users arrange tiles own that order.
///
/// Horizontal strips are assembled row by row and come out packed.
/// Vertical strips are assembled from one block copy per tile when every
/// tile shares a row stride, which the strip then keeps; otherwise rows
/// are copied individually into a packed strip.
pub fn merge<B: AsRef<PixelBuffer>>(
    tiles: &[B],
    orientation: StripOrientation,
    geometry: &MergeGeometry,
) -> Result<PixelBuffer, StripError> {
    check_geometry(tiles, orientation, geometry)?;
    match orientation {
        StripOrientation::Horizontal => merge_horizontal(tiles, geometry),
        StripOrientation::Vertical => merge_vertical(tiles, geometry),
    }
}

fn merge_horizontal<B: AsRef<PixelBuffer>>(
    tiles: &[B],
    geometry: &MergeGeometry,
) -> Result<PixelBuffer, StripError> {
    let bpp = tiles[0].as_ref().bytes_per_pixel();
    let tile_row_bytes = geometry.tile_width() as usize * bpp as usize;
    let strip_row_bytes = tile_row_bytes * tiles.len();

    let mut pixels = try_alloc(strip_row_bytes * geometry.merged_height() as usize)?;
    for r in 0..geometry.tile_height() {
        for tile in tiles {
            pixels.extend_from_slice(tile.as_ref().row(r));
        }
    }
    PixelBuffer::packed(
        geometry.merged_width(),
        geometry.merged_height(),
        bpp,
        pixels,
    )
}

fn merge_vertical<B: AsRef<PixelBuffer>>(
    tiles: &[B],
    geometry: &MergeGeometry,
) -> Result<PixelBuffer, StripError> {
    let first = tiles[0].as_ref();
    let bpp = first.bytes_per_pixel();
    let shared_stride = tiles
        .iter()
        .all(|t| t.as_ref().row_stride() == first.row_stride());

    let stride = if shared_stride {
        first.row_stride()
    } else {
        geometry.tile_width() * bpp
    };
    let mut pixels = try_alloc(stride as usize * geometry.merged_height() as usize)?;
    for tile in tiles {
        let tile = tile.as_ref();
        if shared_stride {
            pixels.extend_from_slice(tile.as_bytes());
        } else {
            for row in tile.rows() {
                pixels.extend_from_slice(row);
            }
        }
    }
    PixelBuffer::new(
        geometry.merged_width(),
        geometry.merged_height(),
        bpp,
        stride,
        pixels,
    )
}

fn check_geometry<B: AsRef<PixelBuffer>>(
    tiles: &[B],
    orientation: StripOrientation,
    geometry: &MergeGeometry,
) -> Result<(), GeometryError> {
    if orientation != geometry.orientation() {
        return Err(GeometryError::GeometryMismatch(format!(
            "asked for a {orientation:?} merge with a {:?} geometry",
            geometry.orientation()
        )));
    }
    if tiles.len() != geometry.tile_count() {
        return Err(GeometryError::GeometryMismatch(format!(
            "geometry is for {} tiles, got {}",
            geometry.tile_count(),
            tiles.len()
        )));
    }
    let Some(first) = tiles.first() else {
        return Err(GeometryError::DegenerateStrip { tile_count: 0 });
    };
    let first = first.as_ref();
    for (index, tile) in tiles.iter().enumerate() {
        let tile = tile.as_ref();
        if tile.width() != geometry.tile_width() || tile.height() != geometry.tile_height() {
            return Err(GeometryError::GeometryMismatch(format!(
                "tile {index} is {}x{}, geometry expects {}x{}",
                tile.width(),
                tile.height(),
                geometry.tile_width(),
                geometry.tile_height()
            )));
        }
        if tile.bytes_per_pixel() != first.bytes_per_pixel() {
            return Err(GeometryError::InconsistentTiles {
                index,
                reason: format!(
                    "{} bytes per pixel, expected {}",
                    tile.bytes_per_pixel(),
                    first.bytes_per_pixel()
                ),
            });
        }
    }
    Ok(())
}
