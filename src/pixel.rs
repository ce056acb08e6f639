use alloc::borrow::Cow;

/// Pixel memory layout.
///
/// Every layout is byte-aligned with a fixed size per pixel, which is all the
/// strip engine needs to know. Channel meaning only matters to the codecs.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PixelLayout {
    /// Single channel, 8-bit grayscale.
    Gray8,
    /// Single channel, 16-bit grayscale (native endian).
    Gray16,
    /// 3 channels, 8-bit RGB.
    Rgb8,
    /// 4 channels, 8-bit RGBA.
    Rgba8,
    /// 4 channels, 8-bit BGRA.
    Bgra8,
    /// 4 channels, 16-bit RGBA (native endian).
    Rgba16,
}

impl PixelLayout {
    /// Bytes per pixel for this layout.
    pub fn bytes_per_pixel(&self) -> usize {
        match self {
            Self::Gray8 => 1,
            Self::Gray16 => 2,
            Self::Rgb8 => 3,
            Self::Rgba8 | Self::Bgra8 => 4,
            Self::Rgba16 => 8,
        }
    }

    /// Number of channels.
    pub fn channels(&self) -> usize {
        match self {
            Self::Gray8 | Self::Gray16 => 1,
            Self::Rgb8 => 3,
            Self::Rgba8 | Self::Bgra8 | Self::Rgba16 => 4,
        }
    }

    /// Bits per channel sample.
    pub fn bits_per_channel(&self) -> usize {
        self.bytes_per_pixel() * 8 / self.channels()
    }

    /// 8 bits per channel, 4 bytes per pixel. The only class the merge
    /// path accepts under [`StripPolicy::require_rgba8`](crate::StripPolicy).
    pub fn is_rgba8_class(&self) -> bool {
        self.channels() == 4 && self.bits_per_channel() == 8
    }

    /// Whether the layout carries an alpha channel.
    pub fn has_alpha(&self) -> bool {
        matches!(self, Self::Rgba8 | Self::Bgra8 | Self::Rgba16)
    }
}

/// Opaque color space identifier.
///
/// Decoders report one, encoders that can store one write it back, and the
/// strip engine only ever compares two of them for equality.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ColorSpace(Cow<'static, str>);

impl ColorSpace {
    pub const SRGB: ColorSpace = ColorSpace(Cow::Borrowed("srgb"));
    pub const LINEAR: ColorSpace = ColorSpace(Cow::Borrowed("linear"));
    /// The source format had no way to say.
    pub const UNKNOWN: ColorSpace = ColorSpace(Cow::Borrowed("unknown"));

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl Default for ColorSpace {
    fn default() -> Self {
        Self::UNKNOWN
    }
}

/// Pixel format metadata carried next to a [`PixelBuffer`](crate::PixelBuffer).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PixelFormat {
    pub layout: PixelLayout,
    pub color_space: ColorSpace,
}

impl PixelFormat {
    pub fn new(layout: PixelLayout, color_space: ColorSpace) -> Self {
        Self {
            layout,
            color_space,
        }
    }

    pub fn bytes_per_pixel(&self) -> usize {
        self.layout.bytes_per_pixel()
    }
}

impl PixelLayout {
    /// RGBA of one 8-bit pixel. Opaque alpha for layouts without one.
    /// `None` for 16-bit layouts.
    pub(crate) fn rgba8(&self, px: &[u8]) -> Option<[u8; 4]> {
        Some(match self {
            Self::Gray8 => [px[0], px[0], px[0], 255],
            Self::Rgb8 => [px[0], px[1], px[2], 255],
            Self::Rgba8 => [px[0], px[1], px[2], px[3]],
            Self::Bgra8 => [px[2], px[1], px[0], px[3]],
            Self::Gray16 | Self::Rgba16 => return None,
        })
    }
}

/// Pixel types that have a [`PixelLayout`], for typed buffer views.
#[cfg(feature = "rgb")]
pub trait StripPixel: Copy {
    fn layout() -> PixelLayout;
}

#[cfg(feature = "rgb")]
impl StripPixel for rgb::Gray<u8> {
    fn layout() -> PixelLayout {
        PixelLayout::Gray8
    }
}

#[cfg(feature = "rgb")]
impl StripPixel for rgb::Gray<u16> {
    fn layout() -> PixelLayout {
        PixelLayout::Gray16
    }
}

#[cfg(feature = "rgb")]
impl StripPixel for rgb::Rgb<u8> {
    fn layout() -> PixelLayout {
        PixelLayout::Rgb8
    }
}

#[cfg(feature = "rgb")]
impl StripPixel for rgb::Rgba<u8> {
    fn layout() -> PixelLayout {
        PixelLayout::Rgba8
    }
}

#[cfg(feature = "rgb")]
impl StripPixel for rgb::alt::BGRA<u8> {
    fn layout() -> PixelLayout {
        PixelLayout::Bgra8
    }
}

#[cfg(feature = "rgb")]
impl StripPixel for rgb::Rgba<u16> {
    fn layout() -> PixelLayout {
        PixelLayout::Rgba16
    }
}
