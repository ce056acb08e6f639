//! Strip geometry: classifying strips and checking tile sets before any
//! pixel is copied.
//!
//! [`SplitGeometry`] and [`MergeGeometry`] can only be obtained from the
//! validators here, so holding one means the checks have passed for some
//! buffer. [`split`](crate::split) and [`merge`](crate::merge) still confirm
//! the geometry matches the buffers they are handed.

use alloc::format;

use crate::buffer::PixelBuffer;
use crate::error::GeometryError;
use crate::limits::Limits;
use crate::pixel::PixelFormat;

/// Axis along which tiles are concatenated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StripOrientation {
    /// Tiles side by side along the width.
    Horizontal,
    /// Tiles stacked along the height.
    Vertical,
}

/// Validation rules that are domain policy rather than structural necessity.
///
/// The defaults describe cube-map face strips: square 8-bit RGBA tiles of
/// any size.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StripPolicy {
    /// Tiles must have `width == height`.
    pub require_square_tiles: bool,
    /// Tile width and height must both be powers of two.
    pub require_power_of_two: bool,
    /// Merged tiles must be 8 bits per channel, 4 bytes per pixel.
    pub require_rgba8: bool,
    /// Bounds on the merged strip.
    pub limits: Limits,
}

impl Default for StripPolicy {
    fn default() -> Self {
        Self {
            require_square_tiles: true,
            require_power_of_two: false,
            require_rgba8: true,
            limits: Limits::none(),
        }
    }
}

impl StripPolicy {
    /// No domain rules: any tile shape, any pixel size, no limits.
    pub fn permissive() -> Self {
        Self {
            require_square_tiles: false,
            require_power_of_two: false,
            require_rgba8: false,
            limits: Limits::none(),
        }
    }

    pub fn with_square_tiles(mut self, require: bool) -> Self {
        self.require_square_tiles = require;
        self
    }

    pub fn with_power_of_two(mut self, require: bool) -> Self {
        self.require_power_of_two = require;
        self
    }

    pub fn with_rgba8(mut self, require: bool) -> Self {
        self.require_rgba8 = require;
        self
    }

    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Classify `strip` and derive its tiles.
    ///
    /// The longer axis gives the orientation and must be an exact multiple
    /// of the shorter one; the multiple is the tile count.
    pub fn validate_split(&self, strip: &PixelBuffer) -> Result<SplitGeometry, GeometryError> {
        let (width, height) = (strip.width(), strip.height());
        let (orientation, length, breadth) = if width > height {
            (StripOrientation::Horizontal, width, height)
        } else if height > width {
            (StripOrientation::Vertical, height, width)
        } else {
            return Err(GeometryError::AmbiguousOrientation { size: width });
        };
        if length % breadth != 0 {
            return Err(GeometryError::NotAMultiple { length, breadth });
        }
        let tile_count = (length / breadth) as usize;
        self.validate_split_into(strip, orientation, tile_count)
    }

    /// Derive tiles for an explicitly chosen layout, for strips whose tiles
    /// are not square and so cannot be classified by shape alone.
    pub fn validate_split_into(
        &self,
        strip: &PixelBuffer,
        orientation: StripOrientation,
        tile_count: usize,
    ) -> Result<SplitGeometry, GeometryError> {
        if tile_count < 2 {
            return Err(GeometryError::DegenerateStrip { tile_count });
        }
        let count = u32::try_from(tile_count).map_err(|_| {
            GeometryError::GeometryMismatch(format!(
                "{tile_count} tiles cannot fit in a {}x{} strip",
                strip.width(),
                strip.height()
            ))
        })?;
        let (tile_width, tile_height) = match orientation {
            StripOrientation::Horizontal => {
                if strip.width() % count != 0 {
                    return Err(GeometryError::NotAMultiple {
                        length: strip.width(),
                        breadth: count,
                    });
                }
                (strip.width() / count, strip.height())
            }
            StripOrientation::Vertical => {
                if strip.height() % count != 0 {
                    return Err(GeometryError::NotAMultiple {
                        length: strip.height(),
                        breadth: count,
                    });
                }
                (strip.width(), strip.height() / count)
            }
        };
        self.check_tile_shape(tile_width, tile_height)?;
        Ok(SplitGeometry {
            orientation,
            tile_width,
            tile_height,
            tile_count,
        })
    }

    /// Check that `tiles` can be concatenated along `orientation`.
    ///
    /// Order is not inspected; the merged strip uses the slice order as is.
    pub fn validate_merge<B: AsRef<PixelBuffer>>(
        &self,
        tiles: &[B],
        orientation: StripOrientation,
    ) -> Result<MergeGeometry, GeometryError> {
        if tiles.len() < 2 {
            return Err(GeometryError::DegenerateStrip {
                tile_count: tiles.len(),
            });
        }
        let first = tiles[0].as_ref();
        for (index, tile) in tiles.iter().enumerate().skip(1) {
            let tile = tile.as_ref();
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
            if tile.width() != first.width() || tile.height() != first.height() {
                return Err(GeometryError::InconsistentTiles {
                    index,
                    reason: format!(
                        "{}x{}, expected {}x{}",
                        tile.width(),
                        tile.height(),
                        first.width(),
                        first.height()
                    ),
                });
            }
        }
        let (tile_width, tile_height) = (first.width(), first.height());
        self.check_tile_shape(tile_width, tile_height)?;
        if self.require_rgba8 && first.bytes_per_pixel() != 4 {
            return Err(GeometryError::UnsupportedPixelFormat(format!(
                "only 8-bit, 4-byte pixels can be merged, tiles have {} bytes per pixel",
                first.bytes_per_pixel()
            )));
        }

        let count = u32::try_from(tiles.len()).ok();
        let (merged_width, merged_height) = match orientation {
            StripOrientation::Horizontal => (
                count.and_then(|c| tile_width.checked_mul(c)),
                Some(tile_height),
            ),
            StripOrientation::Vertical => (
                Some(tile_width),
                count.and_then(|c| tile_height.checked_mul(c)),
            ),
        };
        let (Some(merged_width), Some(merged_height)) = (merged_width, merged_height) else {
            return Err(GeometryError::GeometryMismatch(format!(
                "{} tiles of {tile_width}x{tile_height} overflow the strip dimensions",
                tiles.len()
            )));
        };
        self.limits
            .check_image(merged_width, merged_height, first.bytes_per_pixel() as usize)?;

        Ok(MergeGeometry {
            orientation,
            tile_width,
            tile_height,
            tile_count: tiles.len(),
            merged_width,
            merged_height,
        })
    }

    /// Check the format metadata of images about to be merged.
    ///
    /// Layouts and color spaces must all agree with the first image. Color
    /// spaces are compared as opaque tokens.
    pub fn validate_merge_formats<'a, I>(&self, formats: I) -> Result<(), GeometryError>
    where
        I: IntoIterator<Item = &'a PixelFormat>,
    {
        let mut formats = formats.into_iter();
        let Some(first) = formats.next() else {
            return Ok(());
        };
        for (i, format) in formats.enumerate() {
            let index = i + 1;
            if format.layout != first.layout {
                return Err(GeometryError::InconsistentTiles {
                    index,
                    reason: format!("layout {:?}, expected {:?}", format.layout, first.layout),
                });
            }
            if format.color_space != first.color_space {
                return Err(GeometryError::InconsistentTiles {
                    index,
                    reason: format!(
                        "color space {:?}, expected {:?}",
                        format.color_space.name(),
                        first.color_space.name()
                    ),
                });
            }
        }
        if self.require_rgba8 && !first.layout.is_rgba8_class() {
            return Err(GeometryError::UnsupportedPixelFormat(format!(
                "only 8-bit 4-channel layouts can be merged, got {:?} ({} x {}-bit)",
                first.layout,
                first.layout.channels(),
                first.layout.bits_per_channel()
            )));
        }
        Ok(())
    }

    fn check_tile_shape(&self, width: u32, height: u32) -> Result<(), GeometryError> {
        if self.require_square_tiles && width != height {
            return Err(GeometryError::TilesNotSquare { width, height });
        }
        if self.require_power_of_two {
            for side in [width, height] {
                if !side.is_power_of_two() {
                    return Err(GeometryError::NotPowerOfTwo(side));
                }
            }
        }
        Ok(())
    }
}

/// [`StripPolicy::validate_split`] with the default policy.
pub fn validate_split(strip: &PixelBuffer) -> Result<SplitGeometry, GeometryError> {
    StripPolicy::default().validate_split(strip)
}

/// [`StripPolicy::validate_merge`] with the default policy.
pub fn validate_merge<B: AsRef<PixelBuffer>>(
    tiles: &[B],
    orientation: StripOrientation,
) -> Result<MergeGeometry, GeometryError> {
    StripPolicy::default().validate_merge(tiles, orientation)
}

/// How a validated strip divides into tiles.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SplitGeometry {
    orientation: StripOrientation,
    tile_width: u32,
    tile_height: u32,
    tile_count: usize,
}

impl SplitGeometry {
    pub fn orientation(&self) -> StripOrientation {
        self.orientation
    }

    pub fn tile_width(&self) -> u32 {
        self.tile_width
    }

    pub fn tile_height(&self) -> u32 {
        self.tile_height
    }

    pub fn tile_count(&self) -> usize {
        self.tile_count
    }

    /// Geometry that merges the tiles of this split back into the strip.
    pub fn merge_geometry(&self) -> MergeGeometry {
        let count = self.tile_count as u32;
        let (merged_width, merged_height) = match self.orientation {
            StripOrientation::Horizontal => (self.tile_width * count, self.tile_height),
            StripOrientation::Vertical => (self.tile_width, self.tile_height * count),
        };
        MergeGeometry {
            orientation: self.orientation,
            tile_width: self.tile_width,
            tile_height: self.tile_height,
            tile_count: self.tile_count,
            merged_width,
            merged_height,
        }
    }
}

/// How a validated tile sequence concatenates into a strip.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MergeGeometry {
    orientation: StripOrientation,
    tile_width: u32,
    tile_height: u32,
    tile_count: usize,
    merged_width: u32,
    merged_height: u32,
}

impl MergeGeometry {
    pub fn orientation(&self) -> StripOrientation {
        self.orientation
    }

    pub fn tile_width(&self) -> u32 {
        self.tile_width
    }

    pub fn tile_height(&self) -> u32 {
        self.tile_height
    }

    pub fn tile_count(&self) -> usize {
        self.tile_count
    }

    pub fn merged_width(&self) -> u32 {
        self.merged_width
    }

    pub fn merged_height(&self) -> u32 {
        self.merged_height
    }
}
