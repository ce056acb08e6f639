//! Owned raw pixel storage.

use alloc::format;
use alloc::vec::Vec;

use crate::error::StripError;
use crate::pixel::PixelFormat;

/// A rectangular region of raw pixels that owns its bytes.
///
/// Rows start every `row_stride` bytes; the first `width * bytes_per_pixel`
/// bytes of each row are pixels and anything after that is padding.
/// The storage is exactly `row_stride * height` bytes long.
///
/// Equality compares dimensions, pixel size and the pixel bytes of every
/// row. Padding bytes and the stride itself are not compared.
#[derive(Clone, Debug)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    bytes_per_pixel: u32,
    row_stride: u32,
    pixels: Vec<u8>,
}

impl PixelBuffer {
    /// Wrap `pixels`, validating the stride/length relationship.
    pub fn new(
        width: u32,
        height: u32,
        bytes_per_pixel: u32,
        row_stride: u32,
        pixels: Vec<u8>,
    ) -> Result<Self, StripError> {
        if width == 0 || height == 0 {
            return Err(StripError::InvalidBuffer(format!(
                "zero-sized buffer {width}x{height}"
            )));
        }
        if bytes_per_pixel == 0 {
            return Err(StripError::InvalidBuffer("bytes_per_pixel is zero".into()));
        }
        let min_stride = u64::from(width) * u64::from(bytes_per_pixel);
        if u64::from(row_stride) < min_stride {
            return Err(StripError::InvalidBuffer(format!(
                "row stride {row_stride} is smaller than {width} px * {bytes_per_pixel} B = {min_stride}"
            )));
        }
        let expected = usize::try_from(u64::from(row_stride) * u64::from(height))
            .map_err(|_| StripError::DimensionsTooLarge { width, height })?;
        if pixels.len() != expected {
            return Err(StripError::InvalidBuffer(format!(
                "expected {expected} bytes ({row_stride} stride * {height} rows), got {}",
                pixels.len()
            )));
        }
        Ok(Self {
            width,
            height,
            bytes_per_pixel,
            row_stride,
            pixels,
        })
    }

    /// Wrap tightly packed rows (`row_stride == width * bytes_per_pixel`).
    pub fn packed(
        width: u32,
        height: u32,
        bytes_per_pixel: u32,
        pixels: Vec<u8>,
    ) -> Result<Self, StripError> {
        let stride = width
            .checked_mul(bytes_per_pixel)
            .ok_or(StripError::DimensionsTooLarge { width, height })?;
        Self::new(width, height, bytes_per_pixel, stride, pixels)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn bytes_per_pixel(&self) -> u32 {
        self.bytes_per_pixel
    }

    /// Byte distance between row starts.
    pub fn row_stride(&self) -> u32 {
        self.row_stride
    }

    /// Pixel bytes in one row, excluding padding.
    pub fn row_bytes(&self) -> usize {
        self.width as usize * self.bytes_per_pixel as usize
    }

    /// Whether rows follow each other without padding.
    pub fn is_packed(&self) -> bool {
        self.row_stride as usize == self.row_bytes()
    }

    /// The whole storage, padding included.
    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    /// Mutable access to the whole storage. The length is fixed.
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.pixels
    }

    /// Pixel bytes of row `y`, excluding padding.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    pub fn row(&self, y: u32) -> &[u8] {
        assert!(y < self.height, "row {y} out of bounds (height {})", self.height);
        let start = y as usize * self.row_stride as usize;
        &self.pixels[start..start + self.row_bytes()]
    }

    /// Iterate rows top to bottom, excluding padding.
    pub fn rows(&self) -> impl Iterator<Item = &[u8]> + '_ {
        let row_bytes = self.row_bytes();
        self.pixels
            .chunks(self.row_stride as usize)
            .map(move |row| &row[..row_bytes])
    }

    /// Byte at `col` (a byte column, not a pixel column) of row `row`.
    /// Padding bytes are out of range.
    pub fn byte_at(&self, row: u32, col: usize) -> Option<u8> {
        if row >= self.height || col >= self.row_bytes() {
            return None;
        }
        self.pixels
            .get(row as usize * self.row_stride as usize + col)
            .copied()
    }

    /// Bytes of the pixel at (`x`, `y`).
    pub fn pixel(&self, x: u32, y: u32) -> Option<&[u8]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let bpp = self.bytes_per_pixel as usize;
        let start = y as usize * self.row_stride as usize + x as usize * bpp;
        self.pixels.get(start..start + bpp)
    }

    /// Copy into a buffer without row padding. Packed buffers are cloned.
    pub fn to_packed(&self) -> Result<Self, StripError> {
        if self.is_packed() {
            return Ok(self.clone());
        }
        let row_bytes = self.row_bytes();
        let mut pixels = try_alloc(row_bytes * self.height as usize)?;
        for row in self.rows() {
            pixels.extend_from_slice(row);
        }
        Self::new(
            self.width,
            self.height,
            self.bytes_per_pixel,
            row_bytes as u32,
            pixels,
        )
    }

    /// Same width, height and pixel size.
    pub fn same_shape(&self, other: &PixelBuffer) -> bool {
        self.width == other.width
            && self.height == other.height
            && self.bytes_per_pixel == other.bytes_per_pixel
    }

    /// Reinterpret pixel data as a typed pixel slice.
    ///
    /// Requires a packed buffer whose pixel size matches `P`.
    #[cfg(feature = "rgb")]
    pub fn as_pixels<P: crate::StripPixel>(&self) -> Result<&[P], StripError>
    where
        [u8]: rgb::AsPixels<P>,
    {
        use rgb::AsPixels as _;

        self.check_pixel_type::<P>()?;
        if !self.is_packed() {
            return Err(StripError::InvalidBuffer(
                "typed pixel slices need a packed buffer; use as_imgref for strided rows".into(),
            ));
        }
        Ok(self.pixels.as_pixels())
    }

    /// Zero-copy strided view as an [`imgref::ImgRef`] of typed pixels.
    ///
    /// The stride must be a whole number of pixels.
    #[cfg(feature = "imgref")]
    pub fn as_imgref<P: crate::StripPixel>(&self) -> Result<imgref::ImgRef<'_, P>, StripError>
    where
        [u8]: rgb::AsPixels<P>,
    {
        use rgb::AsPixels as _;

        self.check_pixel_type::<P>()?;
        let bpp = self.bytes_per_pixel as usize;
        let stride = self.row_stride as usize;
        if stride % bpp != 0 {
            return Err(StripError::InvalidBuffer(format!(
                "row stride {stride} is not a multiple of the {bpp}-byte pixel size"
            )));
        }
        // The last row's padding is part of the buffer, so the slice holds
        // exactly stride_px * height pixels.
        let pixels: &[P] = self.pixels.as_pixels();
        Ok(imgref::ImgRef::new_stride(
            pixels,
            self.width as usize,
            self.height as usize,
            stride / bpp,
        ))
    }

    #[cfg(feature = "rgb")]
    fn check_pixel_type<P: crate::StripPixel>(&self) -> Result<(), StripError> {
        if P::layout().bytes_per_pixel() != self.bytes_per_pixel as usize {
            return Err(StripError::InvalidBuffer(format!(
                "{:?} pixels are {} bytes, buffer has {} bytes per pixel",
                P::layout(),
                P::layout().bytes_per_pixel(),
                self.bytes_per_pixel
            )));
        }
        Ok(())
    }
}

impl PartialEq for PixelBuffer {
    fn eq(&self, other: &Self) -> bool {
        self.same_shape(other) && self.rows().eq(other.rows())
    }
}

impl Eq for PixelBuffer {}

impl AsRef<PixelBuffer> for PixelBuffer {
    fn as_ref(&self) -> &PixelBuffer {
        self
    }
}

/// A pixel buffer together with its format metadata.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Image {
    pub buffer: PixelBuffer,
    pub format: PixelFormat,
}

impl Image {
    /// Pair a buffer with its format. The layout's pixel size must match
    /// the buffer's.
    pub fn new(buffer: PixelBuffer, format: PixelFormat) -> Result<Self, StripError> {
        if format.bytes_per_pixel() != buffer.bytes_per_pixel() as usize {
            return Err(StripError::InvalidBuffer(format!(
                "{:?} needs {} bytes per pixel, buffer has {}",
                format.layout,
                format.bytes_per_pixel(),
                buffer.bytes_per_pixel()
            )));
        }
        Ok(Self { buffer, format })
    }

    pub fn width(&self) -> u32 {
        self.buffer.width()
    }

    pub fn height(&self) -> u32 {
        self.buffer.height()
    }

    /// Typed pixel slice; the layout must be exactly `P`'s.
    #[cfg(feature = "rgb")]
    pub fn as_pixels<P: crate::StripPixel>(&self) -> Result<&[P], StripError>
    where
        [u8]: rgb::AsPixels<P>,
    {
        self.check_layout::<P>()?;
        self.buffer.as_pixels()
    }

    /// Typed strided view; the layout must be exactly `P`'s.
    #[cfg(feature = "imgref")]
    pub fn as_imgref<P: crate::StripPixel>(&self) -> Result<imgref::ImgRef<'_, P>, StripError>
    where
        [u8]: rgb::AsPixels<P>,
    {
        self.check_layout::<P>()?;
        self.buffer.as_imgref()
    }

    #[cfg(feature = "rgb")]
    fn check_layout<P: crate::StripPixel>(&self) -> Result<(), StripError> {
        if self.format.layout != P::layout() {
            return Err(StripError::LayoutMismatch {
                expected: P::layout(),
                actual: self.format.layout,
            });
        }
        Ok(())
    }
}

impl AsRef<Image> for Image {
    fn as_ref(&self) -> &Image {
        self
    }
}

impl AsRef<PixelBuffer> for Image {
    fn as_ref(&self) -> &PixelBuffer {
        &self.buffer
    }
}

/// Allocate an empty vector with room for `bytes`, reporting failure.
pub(crate) fn try_alloc(bytes: usize) -> Result<Vec<u8>, StripError> {
    let mut v = Vec::new();
    v.try_reserve_exact(bytes)
        .map_err(|_| StripError::AllocationFailed { bytes })?;
    Ok(v)
}
